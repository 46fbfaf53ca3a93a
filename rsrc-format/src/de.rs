//! Resource map decoding.
//!
//! Layout notes come from Inside Macintosh: More Macintosh Toolbox (1993).
//! All values are big-endian. The decoder juggles four offset bases and
//! they must not be mixed up:
//!
//! * the header's data offset, which data entries are relative to,
//! * the map offset, which the type list and name list offsets are relative to,
//! * the type list offset, which reference list offsets are relative to,
//! * the name list offset, which name entries are relative to.

use crate::cursor::{Cursor, CursorError};
use crate::{Error, ErrorKind, Resource, ResourceMap, TypeCode};

/// Header copy (16), next map handle (4), file reference number (2), fork attributes (2).
const MAP_RESERVED: i64 = 16 + 4 + 2 + 2;

const NO_NAME: i16 = -1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("{what} count is negative ({count})")]
    NegativeCount { what: &'static str, count: i32 },
}

#[derive(Debug)]
enum DecodeError {
    Cursor(CursorError),
    Structure(StructureError),
}

impl From<CursorError> for DecodeError {
    fn from(e: CursorError) -> Self {
        DecodeError::Cursor(e)
    }
}

impl From<StructureError> for DecodeError {
    fn from(e: StructureError) -> Self {
        DecodeError::Structure(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Cursor(e) => Error::with_source(ErrorKind::InvalidFormat, e),
            DecodeError::Structure(e) => Error::with_source(ErrorKind::InvalidFormat, e),
        }
    }
}

type Result<T> = std::result::Result<T, DecodeError>;

/// Decodes the complete contents of a resource fork.
pub fn from_bytes(bytes: &[u8]) -> crate::Result<ResourceMap> {
    if bytes.is_empty() {
        return Err(Error::new(ErrorKind::EmptyFork));
    }

    let mut reader = Cursor::new(bytes);
    let map = read_header(&mut reader).and_then(|header| read_map(&reader, header))?;

    tracing::debug!(
        types = map.len(),
        resources = map.resource_count(),
        "decoded resource fork"
    );

    Ok(map)
}

#[derive(Debug, Clone, Copy)]
struct Header {
    data_offset: i64,
    map_offset: i64,
}

// The resource header is:
// * Offset from beginning of resource fork to resource data (4)
// * Offset from beginning of resource fork to resource map (4)
// * Length of resource data (4)
// * Length of resource map (4)
fn read_header(reader: &mut Cursor<'_>) -> Result<Header> {
    let data_offset = reader.read_i32()?;
    let map_offset = reader.read_i32()?;

    tracing::debug!(
        data_offset = format_args!("{:#x}", data_offset),
        map_offset = format_args!("{:#x}", map_offset),
        "read resource header"
    );

    Ok(Header {
        data_offset: data_offset.into(),
        map_offset: map_offset.into(),
    })
}

/// Turns a stored "count minus one" into a count. A stored `-1` is an empty
/// list; anything lower is malformed.
fn count(what: &'static str, stored: i16) -> Result<usize> {
    let count = i32::from(stored) + 1;
    usize::try_from(count).map_err(|_| StructureError::NegativeCount { what, count }.into())
}

// The resource map is:
// * Reserved (24, see MAP_RESERVED)
// * Offset from beginning of map to resource type list (2)
// * Offset from beginning of map to resource name list (2)
//
// The type list offset points at the type count, which is followed by one
// entry per type:
// * Resource type (4)
// * Number of resources of this type in map minus 1 (2)
// * Offset from beginning of resource type list to reference list for this type (2)
fn read_map(reader: &Cursor<'_>, header: Header) -> Result<ResourceMap> {
    let mut reader = reader.clone();
    let mut map = ResourceMap::new();

    reader.seek(header.map_offset)?;
    reader.skip(MAP_RESERVED)?;

    let type_list_offset = header.map_offset + i64::from(reader.read_i16()? as u16);
    let name_list_offset = header.map_offset + i64::from(reader.read_i16()? as u16);

    reader.seek(type_list_offset)?;
    let type_count = count("type", reader.read_i16()?)?;

    tracing::debug!(
        type_list = format_args!("{:#x}", type_list_offset),
        name_list = format_args!("{:#x}", name_list_offset),
        count = type_count,
        "read resource map"
    );

    let lists = Lists {
        data: header.data_offset,
        names: name_list_offset,
    };

    for _ in 0..type_count {
        let start = reader.offset();
        let type_code = TypeCode::new([
            reader.read_u8()?,
            reader.read_u8()?,
            reader.read_u8()?,
            reader.read_u8()?,
        ]);
        let resource_count = count("resource", reader.read_i16()?)?;
        let reference_list_offset = type_list_offset + i64::from(reader.read_i16()? as u16);

        tracing::debug!(
            start = format_args!("{:#x}", start),
            reference_list = format_args!("{:#x}", reference_list_offset),
            count = resource_count,
            %type_code,
            "read type entry"
        );

        let resources =
            read_reference_list(&reader, lists, reference_list_offset, type_code, resource_count)?;

        if map.insert(type_code, resources).is_some() {
            tracing::warn!(%type_code, "type listed twice in resource map, keeping the later list");
        }
    }

    Ok(map)
}

#[derive(Debug, Clone, Copy)]
struct Lists {
    data: i64,
    names: i64,
}

// A reference list entry is:
// * Resource ID (2)
// * Offset from beginning of resource name list to resource name, or -1 (2)
// * Resource attributes (1)
// * Offset from beginning of resource data to data for this resource (3)
// * Reserved for handle to resource (4)
fn read_reference_list(
    reader: &Cursor<'_>,
    lists: Lists,
    offset: i64,
    type_code: TypeCode,
    count: usize,
) -> Result<Vec<Resource>> {
    let mut reader = reader.clone();
    let mut resources = Vec::with_capacity(count);

    reader.seek(offset)?;
    for _ in 0..count {
        let start = reader.offset();
        let id = reader.read_i16()?;

        let name_offset = reader.read_i16()?;
        let name = if name_offset == NO_NAME {
            None
        } else {
            Some(read_name(&reader, lists.names + i64::from(name_offset))?)
        };

        reader.skip(1)?; // Resource attributes

        let data_offset = lists.data + i64::from(reader.read_i24_as_i32()?);
        let data = read_data(&reader, data_offset)?;

        tracing::debug!(
            start = format_args!("{:#x}", start),
            data = format_args!("{:#x}", data_offset),
            bytes = data.len(),
            %type_code,
            id,
            "read reference"
        );

        resources.push(Resource {
            type_code,
            id,
            name,
            data,
        });

        // The handle is an in-memory placeholder. It must be present, but the
        // last entry may end exactly at end of file, where seeking past it
        // would fail.
        if reader.offset() + 4 > reader.len() {
            return Err(CursorError::InvalidRange {
                location: reader.offset(),
                length: 4,
            }
            .into());
        }
        if resources.len() < count {
            reader.skip(4)?;
        }
    }

    Ok(resources)
}

// A name is:
// * Length of following resource name (1)
// * Characters of resource name (Variable)
fn read_name(reader: &Cursor<'_>, offset: i64) -> Result<Vec<u8>> {
    let mut reader = reader.clone();
    reader.seek(offset)?;

    match reader.read_u8()? {
        // read_bytes rejects a zero length; an empty name is still valid.
        0 => Ok(Vec::new()),
        length => Ok(reader.read_bytes(length)?),
    }
}

// A data entry is:
// * Length of following resource data (4)
// * Resource data (Variable)
fn read_data(reader: &Cursor<'_>, offset: i64) -> Result<Vec<u8>> {
    let mut reader = reader.clone();
    reader.seek(offset)?;

    match reader.read_i32()? {
        // read_bytes rejects a zero length; an empty payload is still valid.
        0 => Ok(Vec::new()),
        length => Ok(reader.read_bytes(length)?),
    }
}
