//! A read-only filesystem view of a decoded resource fork.
//!
//! [`Vfs`] answers path-based calls over an immutable [`Node`] tree.
//! [`RsrcFs`] adapts it to the inode-based FUSE protocol.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::time::{Duration, UNIX_EPOCH};

use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEntry, ReplyOpen,
    Request,
};
use libc::{EINVAL, ENOENT};

mod node;
mod vfs;

pub use node::{File, Folder, Node, NodeKind};
pub use vfs::{AccessMode, Attributes, DirEntry, DirectorySink, FsError, Vfs};

pub use fuser::{mount2, MountOption};

// Nothing ever changes, so the kernel may cache for as long as it likes.
const TTL: Duration = Duration::from_secs(3600);
const BLOCK_SIZE: u32 = 512;

pub const ROOT_INO: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListedEntry {
    ino: u64,
    offset: i64,
    kind: FileType,
    name: String,
}

#[derive(Debug)]
struct Inode {
    path: String,
    parent: u64,
}

/// Serves a [`Vfs`] over FUSE. Inodes are assigned once, up front, by
/// walking the tree; inode `n` is `inodes[n - 1]`.
#[derive(Debug)]
pub struct RsrcFs {
    vfs: Vfs,
    inodes: Vec<Inode>,
    by_path: HashMap<String, u64>,
}

impl RsrcFs {
    pub fn new(vfs: Vfs) -> RsrcFs {
        let mut fs = RsrcFs {
            vfs,
            inodes: Vec::new(),
            by_path: HashMap::new(),
        };

        let mut inodes = Vec::new();
        collect_paths(fs.vfs.root(), "/".to_string(), ROOT_INO, &mut inodes);
        for inode in inodes {
            let ino = fs.inodes.len() as u64 + 1;
            fs.by_path.insert(inode.path.clone(), ino);
            fs.inodes.push(inode);
        }

        tracing::debug!(inodes = fs.inodes.len(), "assigned inodes");
        fs
    }

    #[inline(always)]
    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    fn inode(&self, ino: u64) -> Option<&Inode> {
        let index = usize::try_from(ino.checked_sub(1)?).ok()?;
        self.inodes.get(index)
    }

    /// The inode for a path, if the tree has one.
    pub fn ino(&self, path: &str) -> Option<u64> {
        self.by_path.get(path).copied()
    }

    /// Attributes of `name` inside the folder with inode `parent`.
    fn lookup_child(&self, parent: u64, name: &str) -> Result<FileAttr, FsError> {
        let parent = self.inode(parent).ok_or(FsError::NotFound)?;
        let path = child_path(&parent.path, name);
        let ino = self.ino(&path).ok_or(FsError::NotFound)?;
        self.file_attr(ino, &path)
    }

    /// The entries of folder `ino` after the kernel's resume `offset`. The
    /// kernel resumes at the offset of the last entry it received, so each
    /// entry's offset is its position plus one.
    fn dir_entries(&self, ino: u64, offset: i64) -> Result<Vec<ListedEntry>, FsError> {
        let inode = self.inode(ino).ok_or(FsError::NotFound)?;

        let mut entries: Vec<DirEntry> = Vec::new();
        self.vfs.readdir(&inode.path, &mut entries)?;

        let skip = usize::try_from(offset).unwrap_or(0);
        let listed = entries
            .into_iter()
            .enumerate()
            .skip(skip)
            .filter_map(|(index, entry)| {
                let entry_ino = match entry.name.as_str() {
                    "." => Some(ino),
                    ".." => Some(inode.parent),
                    name => self.ino(&child_path(&inode.path, name)),
                };
                if entry_ino.is_none() {
                    tracing::warn!(ino, name = %entry.name, "readdir: entry has no inode");
                }

                Some(ListedEntry {
                    ino: entry_ino?,
                    offset: index as i64 + 1,
                    kind: file_type(entry.kind),
                    name: entry.name,
                })
            })
            .collect();

        Ok(listed)
    }

    fn file_attr(&self, ino: u64, path: &str) -> Result<FileAttr, FsError> {
        let attrs = self.vfs.getattr(path)?;

        Ok(FileAttr {
            ino,
            size: attrs.size,
            blocks: attrs.size.div_ceil(u64::from(BLOCK_SIZE)),
            atime: UNIX_EPOCH,
            mtime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
            crtime: UNIX_EPOCH,
            kind: file_type(attrs.kind),
            perm: attrs.permissions(),
            nlink: attrs.nlink,
            uid: attrs.uid,
            gid: attrs.gid,
            rdev: 0,
            flags: 0,
            blksize: BLOCK_SIZE,
        })
    }
}

/// Pre-order walk; children are visited by name so inode numbers are
/// stable across mounts of the same fork.
fn collect_paths(node: &Node, path: String, parent: u64, out: &mut Vec<Inode>) {
    out.push(Inode {
        path: path.clone(),
        parent,
    });
    let ino = out.len() as u64;

    if let Some(folder) = node.as_folder() {
        let mut children: Vec<&Node> = folder.children().values().collect();
        children.sort_by(|a, b| a.name().cmp(b.name()));
        for child in children {
            collect_paths(child, child_path(&path, child.name()), ino, out);
        }
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

fn file_type(kind: NodeKind) -> FileType {
    match kind {
        NodeKind::File => FileType::RegularFile,
        NodeKind::Folder => FileType::Directory,
    }
}

impl Filesystem for RsrcFs {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(name) = name.to_str() else {
            tracing::debug!(parent, "lookup: invalid name");
            reply.error(ENOENT);
            return;
        };

        match self.lookup_child(parent, name) {
            Ok(attr) => {
                tracing::trace!(parent, name, ino = attr.ino, "lookup");
                reply.entry(&TTL, &attr, 0);
            }
            Err(e) => {
                tracing::trace!(parent, name, "lookup: not found");
                reply.error(e.errno());
            }
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        tracing::trace!(ino, "getattr");
        let Some(inode) = self.inode(ino) else {
            reply.error(ENOENT);
            return;
        };

        match self.file_attr(ino, &inode.path) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        tracing::trace!(ino, flags, "open");
        let Some(inode) = self.inode(ino) else {
            reply.error(ENOENT);
            return;
        };

        match self.vfs.open(&inode.path, AccessMode::from_flags(flags)) {
            Ok(()) => reply.opened(0, 0),
            Err(e) => {
                tracing::debug!(ino, error = %e, "open refused");
                reply.error(e.errno());
            }
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let Some(inode) = self.inode(ino) else {
            reply.error(ENOENT);
            return;
        };
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(EINVAL);
            return;
        };

        match self.vfs.read(&inode.path, size as usize, offset) {
            Ok(data) => {
                tracing::trace!(ino, offset, size, returned = data.len(), "read");
                reply.data(data);
            }
            Err(e) => reply.error(e.errno()),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let entries = match self.dir_entries(ino, offset) {
            Ok(entries) => entries,
            Err(e) => {
                reply.error(e.errno());
                return;
            }
        };
        tracing::debug!(ino, offset, entries = entries.len(), "readdir");

        for entry in &entries {
            if reply.add(entry.ino, entry.offset, entry.kind, &entry.name) {
                break;
            }
        }
        reply.ok();
    }
}
