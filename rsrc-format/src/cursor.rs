//! Bounds-checked big-endian reads over an immutable byte buffer.
//!
//! Every failing operation leaves the cursor where it was, so a caller can
//! report the offending location without having to reconstruct it.

use byteorder::{BigEndian, ByteOrder};

pub type Result<T> = std::result::Result<T, CursorError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("Invalid seek to location {0:#x}.")]
    InvalidLocation(i64),

    #[error("Invalid read at location {location:#x} with length {length}.")]
    InvalidRange { location: usize, length: i64 },

    #[error("Invalid parameter `{name}` with value {value}.")]
    InvalidParameter { name: &'static str, value: i64 },

    #[error("Internal error.")]
    Internal,
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Cursor<'a> {
        Cursor { data, offset: 0 }
    }

    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn take(&mut self, length: usize) -> Result<&'a [u8]> {
        if length == 0 {
            return Err(CursorError::Internal);
        }

        let end = self
            .offset
            .checked_add(length)
            .filter(|end| *end <= self.data.len())
            .ok_or(CursorError::InvalidRange {
                location: self.offset,
                length: length as i64,
            })?;

        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    /// Reads a single byte without sign extension, as used by length prefixes.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    /// Reads three bytes, zero-extended. Only used for unsigned offsets.
    pub fn read_i24_as_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_u24(self.take(3)?) as i32)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn read_bytes<L: Into<i64>>(&mut self, length: L) -> Result<Vec<u8>> {
        let length = length.into();
        if length <= 0 {
            return Err(CursorError::InvalidParameter {
                name: "length",
                value: length,
            });
        }

        let length = usize::try_from(length).map_err(|_| CursorError::InvalidRange {
            location: self.offset,
            length,
        })?;

        self.take(length).map(<[u8]>::to_vec)
    }

    /// Moves to `offset`, which must lie inside the buffer. Seeking to the
    /// end of the buffer is rejected as well.
    pub fn seek<O: Into<i64>>(&mut self, offset: O) -> Result<()> {
        let offset = offset.into();
        match usize::try_from(offset) {
            Ok(target) if target < self.data.len() => {
                self.offset = target;
                Ok(())
            }
            _ => Err(CursorError::InvalidLocation(offset)),
        }
    }

    pub fn skip<D: Into<i64>>(&mut self, delta: D) -> Result<()> {
        let current = i64::try_from(self.offset).map_err(|_| CursorError::Internal)?;
        let delta = delta.into();
        let target = current
            .checked_add(delta)
            .ok_or(CursorError::InvalidLocation(i64::MAX))?;
        self.seek(target)
    }
}
