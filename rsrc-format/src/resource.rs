use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::macroman::{self, ConversionOptions};
use crate::TypeCode;

/// A single decoded resource.
#[derive(Clone, PartialEq, Eq)]
pub struct Resource {
    pub type_code: TypeCode,

    /// Resource IDs are signed; system resources commonly use negative ones.
    pub id: i16,

    /// The raw Mac OS Roman name, if the reference list gave one.
    pub name: Option<Vec<u8>>,

    pub data: Vec<u8>,
}

impl Resource {
    /// The name as text for display, with control characters replaced.
    pub fn display_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(|name| macroman::decode(name, &ConversionOptions::DISPLAY))
    }

    /// `"<id>"` or `"<id> <name>"`, safe to use as a file name. Translations
    /// append their extension to this stem.
    pub fn file_stem(&self) -> String {
        let name = self
            .name
            .as_deref()
            .map(macroman::filesystem_safe)
            .filter(|name| !name.is_empty());

        match name {
            Some(name) => format!("{} {}", self.id, name),
            None => self.id.to_string(),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("type_code", &self.type_code)
            .field("id", &self.id)
            .field("name", &self.display_name())
            .field("length", &self.data.len())
            .finish()
    }
}

/// Resources grouped by type. Within a type, resources keep the order of
/// the fork's reference list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    types: BTreeMap<TypeCode, Vec<Resource>>,
}

impl ResourceMap {
    pub fn new() -> ResourceMap {
        ResourceMap::default()
    }

    /// Sets the resources of one type. Returns the list it replaced, if the
    /// type was already present.
    pub(crate) fn insert(
        &mut self,
        type_code: TypeCode,
        resources: Vec<Resource>,
    ) -> Option<Vec<Resource>> {
        self.types.insert(type_code, resources)
    }

    #[inline(always)]
    pub fn get(&self, type_code: &TypeCode) -> Option<&[Resource]> {
        self.types.get(type_code).map(Vec::as_slice)
    }

    /// Every resource, type by type.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.types.values().flatten()
    }

    /// Number of distinct types.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn resource_count(&self) -> usize {
        self.types.values().map(Vec::len).sum()
    }

    /// Keeps only resources matching both filters. A `None` filter matches
    /// everything. Types left without resources are dropped.
    pub fn filter(&self, type_code: Option<TypeCode>, id: Option<i16>) -> ResourceMap {
        self.resources()
            .filter(|r| type_code.map_or(true, |t| r.type_code == t))
            .filter(|r| id.map_or(true, |id| r.id == id))
            .cloned()
            .collect()
    }
}

impl FromIterator<Resource> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut types: BTreeMap<TypeCode, Vec<Resource>> = BTreeMap::new();
        for resource in iter {
            types.entry(resource.type_code).or_default().push(resource);
        }
        ResourceMap { types }
    }
}

impl<'a> IntoIterator for &'a ResourceMap {
    type Item = (&'a TypeCode, &'a Vec<Resource>);
    type IntoIter = btree_map::Iter<'a, TypeCode, Vec<Resource>>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}
