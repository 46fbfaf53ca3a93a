//! The path-based call surface over a projected resource tree.

use rsrc_format::translate::{TranslatorFilter, Translators};
use rsrc_format::ResourceMap;

use crate::node::{Folder, Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    #[error("no such file or directory")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("directory listing did not fit")]
    ListingOverflow,
}

impl FsError {
    pub fn errno(&self) -> i32 {
        match self {
            FsError::NotFound => libc::ENOENT,
            FsError::PermissionDenied => libc::EACCES,
            FsError::ListingOverflow => libc::EIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    /// Reads the access mode bits of POSIX `open` flags.
    pub fn from_flags(flags: i32) -> AccessMode {
        match flags & libc::O_ACCMODE {
            libc::O_RDONLY => AccessMode::ReadOnly,
            libc::O_WRONLY => AccessMode::WriteOnly,
            _ => AccessMode::ReadWrite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub kind: NodeKind,
    /// File type and permission bits, as in `st_mode`.
    pub mode: u32,
    pub nlink: u32,
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
}

impl Attributes {
    #[inline(always)]
    pub fn permissions(&self) -> u16 {
        (self.mode & 0o7777) as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

/// Receives directory entries. Returning `false` means the entry could not
/// be accepted.
pub trait DirectorySink {
    fn push(&mut self, name: &str, kind: NodeKind) -> bool;
}

impl DirectorySink for Vec<DirEntry> {
    fn push(&mut self, name: &str, kind: NodeKind) -> bool {
        Vec::push(
            self,
            DirEntry {
                name: name.to_string(),
                kind,
            },
        );
        true
    }
}

#[derive(Debug)]
pub struct Vfs {
    root: Node,
    uid: u32,
    gid: u32,
}

impl Vfs {
    /// Serves `root`, owned by the effective user and group of this process.
    pub fn new(root: Node) -> Vfs {
        // SAFETY: geteuid and getegid cannot fail and touch no memory.
        let (uid, gid) = unsafe { (libc::geteuid(), libc::getegid()) };
        Vfs::with_owner(root, uid, gid)
    }

    pub fn with_owner(root: Node, uid: u32, gid: u32) -> Vfs {
        Vfs { root, uid, gid }
    }

    /// Projects decoded resources: a folder per type holding a file per
    /// resource, plus a sibling file per translation the filter selects.
    pub fn from_resources(
        name: &str,
        resources: &ResourceMap,
        translators: &Translators,
        filter: TranslatorFilter,
    ) -> Vfs {
        Vfs::new(build_tree(name, resources, translators, filter))
    }

    #[inline(always)]
    pub fn root(&self) -> &Node {
        &self.root
    }

    fn node(&self, path: &str) -> Result<&Node, FsError> {
        self.root.resolve(path).ok_or(FsError::NotFound)
    }

    pub fn getattr(&self, path: &str) -> Result<Attributes, FsError> {
        let node = self.node(path)?;
        let mode = match node.kind() {
            NodeKind::File => libc::S_IFREG as u32 | 0o444,
            NodeKind::Folder => libc::S_IFDIR as u32 | 0o555,
        };

        Ok(Attributes {
            kind: node.kind(),
            mode,
            nlink: node.link_count(),
            size: node.size(),
            uid: self.uid,
            gid: self.gid,
        })
    }

    /// Lists `.`, `..` and then every child of the folder at `path`, in no
    /// particular order.
    pub fn readdir<S: DirectorySink>(&self, path: &str, sink: &mut S) -> Result<(), FsError> {
        let folder = self.node(path)?.as_folder().ok_or(FsError::NotFound)?;

        let entries = [(".", NodeKind::Folder), ("..", NodeKind::Folder)]
            .into_iter()
            .chain(
                folder
                    .children()
                    .values()
                    .map(|child| (child.name(), child.kind())),
            );

        for (name, kind) in entries {
            if !sink.push(name, kind) {
                tracing::warn!(path, name, "directory listing overflowed");
                return Err(FsError::ListingOverflow);
            }
        }

        Ok(())
    }

    pub fn open(&self, path: &str, mode: AccessMode) -> Result<(), FsError> {
        self.node(path)?;
        match mode {
            AccessMode::ReadOnly => Ok(()),
            _ => Err(FsError::PermissionDenied),
        }
    }

    /// Returns at most `length` bytes of the file at `path` starting at
    /// `offset`. Reading at or past the end returns nothing.
    pub fn read(&self, path: &str, length: usize, offset: u64) -> Result<&[u8], FsError> {
        let data = self
            .node(path)?
            .as_file()
            .ok_or(FsError::NotFound)?
            .data();

        let start = match usize::try_from(offset) {
            Ok(start) if start < data.len() => start,
            _ => return Ok(&[]),
        };
        let end = start + length.min(data.len() - start);

        Ok(&data[start..end])
    }
}

fn build_tree(
    name: &str,
    resources: &ResourceMap,
    translators: &Translators,
    filter: TranslatorFilter,
) -> Node {
    let mut root = Folder::new(name);

    for (type_code, list) in resources {
        let mut folder = Folder::new(type_code.file_name());

        for resource in list {
            let stem = resource.file_stem();
            folder.insert(Node::file(stem.clone(), resource.data.clone()));

            for result in translators.translate(resource, filter) {
                match result {
                    Ok(translation) => {
                        folder.insert(Node::file(
                            format!("{}.{}", stem, translation.extension),
                            translation.data,
                        ));
                    }
                    Err(e) => tracing::warn!(
                        %type_code,
                        id = resource.id,
                        error = %rsrc_format::report(&e),
                        "translation failed"
                    ),
                }
            }
        }

        tracing::debug!(%type_code, entries = folder.children().len(), "projected type folder");
        root.insert(folder);
    }

    root.into()
}
