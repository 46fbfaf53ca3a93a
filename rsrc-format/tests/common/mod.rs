//! Builds synthetic resource forks for tests.

#![allow(dead_code)]

pub struct Entry {
    pub id: i16,
    pub name: Option<Vec<u8>>,
    pub data: Vec<u8>,
}

pub fn entry(id: i16, name: Option<&str>, data: &[u8]) -> Entry {
    Entry {
        id,
        name: name.map(|n| n.as_bytes().to_vec()),
        data: data.to_vec(),
    }
}

/// Lays out a fork as header, padding, data area, then map. Type entries
/// and reference lists follow the map header directly; the name list comes
/// last, optionally preceded by padding.
#[derive(Default)]
pub struct ForkBuilder {
    data_offset: usize,
    name_padding: usize,
    types: Vec<([u8; 4], Vec<Entry>)>,
}

impl ForkBuilder {
    pub fn new() -> ForkBuilder {
        ForkBuilder {
            data_offset: 16,
            ..Default::default()
        }
    }

    pub fn data_offset(mut self, offset: usize) -> Self {
        assert!(offset >= 16);
        self.data_offset = offset;
        self
    }

    pub fn name_padding(mut self, padding: usize) -> Self {
        self.name_padding = padding;
        self
    }

    pub fn add_type(mut self, code: &[u8; 4], entries: Vec<Entry>) -> Self {
        self.types.push((*code, entries));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        let mut data_offsets = Vec::new();
        for (_, entries) in &self.types {
            for entry in entries {
                data_offsets.push(data.len() as u32);
                data.extend_from_slice(&(entry.data.len() as i32).to_be_bytes());
                data.extend_from_slice(&entry.data);
            }
        }

        let mut names = vec![0u8; self.name_padding];
        let mut name_offsets = Vec::new();
        for (_, entries) in &self.types {
            for entry in entries {
                name_offsets.push(entry.name.as_ref().map(|name| {
                    let offset = names.len() as i16;
                    names.push(name.len() as u8);
                    names.extend_from_slice(name);
                    offset
                }));
            }
        }

        let type_list_len = 2 + 8 * self.types.len();
        let mut type_list = Vec::new();
        type_list.extend_from_slice(&(self.types.len() as i16 - 1).to_be_bytes());
        let mut references = Vec::new();
        let mut index = 0;
        for (code, entries) in &self.types {
            type_list.extend_from_slice(code);
            type_list.extend_from_slice(&(entries.len() as i16 - 1).to_be_bytes());
            type_list.extend_from_slice(&((type_list_len + references.len()) as u16).to_be_bytes());
            for entry in entries {
                references.extend_from_slice(&entry.id.to_be_bytes());
                references.extend_from_slice(&name_offsets[index].unwrap_or(-1).to_be_bytes());
                references.push(0);
                references.extend_from_slice(&data_offsets[index].to_be_bytes()[1..]);
                references.extend_from_slice(&[0; 4]);
                index += 1;
            }
        }

        let map_offset = self.data_offset + data.len();
        let type_list_offset = 28;
        let name_list_offset = type_list_offset + type_list.len() + references.len();
        let map_len = name_list_offset + names.len();

        let mut fork = Vec::new();
        fork.extend_from_slice(&(self.data_offset as i32).to_be_bytes());
        fork.extend_from_slice(&(map_offset as i32).to_be_bytes());
        fork.extend_from_slice(&(data.len() as i32).to_be_bytes());
        fork.extend_from_slice(&(map_len as i32).to_be_bytes());
        fork.resize(self.data_offset, 0);
        fork.extend_from_slice(&data);

        fork.extend_from_slice(&[0; 24]);
        fork.extend_from_slice(&(type_list_offset as u16).to_be_bytes());
        fork.extend_from_slice(&(name_list_offset as u16).to_be_bytes());
        fork.extend_from_slice(&type_list);
        fork.extend_from_slice(&references);
        fork.extend_from_slice(&names);

        fork
    }
}

/// The fork from the documentation example: one `TEXT` resource, id 128,
/// named "Hello", holding `hi`, with its data area at 0x1E.
pub fn hello_fork() -> Vec<u8> {
    ForkBuilder::new()
        .data_offset(0x1e)
        .add_type(b"TEXT", vec![entry(128, Some("Hello"), b"hi")])
        .build()
}
