use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};

use crate::{de, Error, ErrorKind, ResourceMap, Result};

/// Appended to a path to reach its resource fork on filesystems that have one.
const NAMED_FORK_SUFFIX: &str = "..namedfork/rsrc";

/// The raw bytes of a resource fork, memory-mapped from disk.
#[derive(Debug)]
pub struct ResourceFork {
    path: PathBuf,
    mmap: Mmap,
}

impl ResourceFork {
    /// Opens the resource fork of `path`. The named fork is tried first; if
    /// that is missing or empty, `path` itself is read as a bare fork.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ResourceFork> {
        let path = path.as_ref();
        Self::open_first(&[path.join(NAMED_FORK_SUFFIX), path.to_path_buf()])
    }

    /// Maps the first candidate that opens and is non-empty. If none does,
    /// the error from the last candidate is returned.
    fn open_first(candidates: &[PathBuf]) -> Result<ResourceFork> {
        let mut last_error = Error::new(ErrorKind::ReadFork);
        for candidate in candidates {
            match Self::map(candidate) {
                Ok(fork) => {
                    tracing::debug!(path = %candidate.display(), bytes = fork.mmap.len(), "mapped resource fork");
                    return Ok(fork);
                }
                Err(e) => {
                    tracing::debug!(path = %candidate.display(), error = %e, "resource fork candidate rejected");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    fn map(path: &Path) -> Result<ResourceFork> {
        let file = File::open(path).map_err(|e| Error::with_source(ErrorKind::ReadFork, e))?;
        let length = file
            .metadata()
            .map_err(|e| Error::with_source(ErrorKind::ReadFork, e))?
            .len();

        // Zero-length mappings are rejected by the OS, and an empty fork is
        // its own condition anyway.
        if length == 0 {
            return Err(Error::new(ErrorKind::EmptyFork));
        }

        // SAFETY: the fork is only ever read, and callers are expected not to
        // truncate the file while it is mapped.
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .map_err(|e| Error::with_source(ErrorKind::ReadFork, e))?;

        Ok(ResourceFork {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// The path that was actually mapped.
    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn decode(&self) -> Result<ResourceMap> {
        de::from_bytes(self.bytes())
    }
}

/// Reads and decodes the resource fork of `path`.
pub fn read_resource_fork<P: AsRef<Path>>(path: P) -> Result<ResourceMap> {
    ResourceFork::open(path)?.decode()
}
