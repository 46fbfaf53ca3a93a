use std::fmt;
use std::str::FromStr;

use crate::macroman::{self, ConversionOptions};

/// The four-byte code tagging a resource's kind, such as `snd ` or `STR `.
/// Codes compare by their raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeCode([u8; 4]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeCodeError {
    #[error("a type code is exactly 4 bytes, found {0}")]
    InvalidLength(usize),

    #[error("type code contains characters outside Mac OS Roman")]
    Unrepresentable,
}

impl TypeCode {
    #[inline(always)]
    pub const fn new(bytes: [u8; 4]) -> TypeCode {
        TypeCode(bytes)
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The code as a single path component. Codes made entirely of unsafe
    /// characters fall back to their hex value so a folder is never nameless.
    pub fn file_name(&self) -> String {
        let name = macroman::filesystem_safe(&self.0);
        if name.is_empty() {
            format!("0x{:08x}", u32::from_be_bytes(self.0))
        } else {
            name
        }
    }
}

impl TryFrom<&[u8]> for TypeCode {
    type Error = TypeCodeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 4]>::try_from(bytes)
            .map(TypeCode)
            .map_err(|_| TypeCodeError::InvalidLength(bytes.len()))
    }
}

impl FromStr for TypeCode {
    type Err = TypeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = macroman::encode(s).ok_or(TypeCodeError::Unrepresentable)?;
        TypeCode::try_from(bytes.as_slice())
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&macroman::decode(&self.0, &ConversionOptions::DISPLAY))
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode({:?})", self.to_string())
    }
}
