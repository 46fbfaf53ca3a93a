use rsrc_format::{Resource, ResourceMap};
use serde::Serialize;

use crate::error::Result;
use crate::util::{format_resource, hexdump};

#[derive(Serialize)]
struct JsonEntry {
    #[serde(rename = "type")]
    type_code: String,
    id: i16,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl From<&Resource> for JsonEntry {
    fn from(resource: &Resource) -> Self {
        JsonEntry {
            type_code: resource.type_code.to_string(),
            id: resource.id,
            size: resource.data.len(),
            name: resource.display_name(),
        }
    }
}

pub fn print_entry(resource: &Resource, with_hexdump: bool) {
    println!("{}", format_resource(resource));
    if with_hexdump && !resource.data.is_empty() {
        println!("{}", hexdump(&resource.data));
    }
}

pub fn print_json(resources: &ResourceMap) -> Result<()> {
    println!("{}", to_json(resources)?);
    Ok(())
}

fn to_json(resources: &ResourceMap) -> Result<String> {
    let entries: Vec<JsonEntry> = resources.resources().map(JsonEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
