//! Decoding of classic Mac OS resource forks.
//!
//! [`read_resource_fork`] opens and decodes a fork from disk; [`from_bytes`]
//! decodes one already in memory. The [`translate`] module converts a few
//! well-known resource types into modern file formats.

pub mod cursor;
mod de;
mod error;
mod fork;
mod fourcc;
pub mod macroman;
mod resource;
pub mod translate;

pub use cursor::{Cursor, CursorError};
pub use de::{from_bytes, StructureError};
pub use error::{report, BoxError, Error, ErrorKind, Report, Result};
pub use fork::{read_resource_fork, ResourceFork};
pub use fourcc::{TypeCode, TypeCodeError};
pub use resource::{Resource, ResourceMap};
