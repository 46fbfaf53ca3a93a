use std::fmt::Write;

use rsrc_format::macroman::{self, ConversionOptions};
use rsrc_format::Resource;

const ROW_LEN: usize = 16;

/// `'snd '     128     4096 bytes "Name"`
pub fn format_resource(resource: &Resource) -> String {
    let mut line = format!(
        "'{}' {:>7} {:>8} bytes",
        resource.type_code,
        resource.id,
        resource.data.len()
    );
    if let Some(name) = resource.display_name() {
        let _ = write!(line, " \"{}\"", name);
    }
    line
}

/// `'snd ' 128`, for messages about one resource.
pub fn format_short(resource: &Resource) -> String {
    format!("'{}' {}", resource.type_code, resource.id)
}

/// Sixteen bytes per row: offset, hex in two-byte groups, then the bytes as
/// text. A short last row is padded so the text column lines up.
pub fn hexdump(data: &[u8]) -> String {
    data.chunks(ROW_LEN)
        .enumerate()
        .map(|(row, bytes)| {
            let mut line = format!("{:08x}: ", row * ROW_LEN);
            for index in 0..ROW_LEN {
                if index > 0 && index % 2 == 0 {
                    line.push(' ');
                }
                match bytes.get(index) {
                    Some(byte) => {
                        let _ = write!(line, "{:02x}", byte);
                    }
                    None => line.push_str("  "),
                }
            }
            line.push_str("  ");
            line.push_str(&macroman::decode(bytes, &ConversionOptions::HEXDUMP));
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsrc_format::TypeCode;

    fn resource(name: Option<&[u8]>, data: &[u8]) -> Resource {
        Resource {
            type_code: TypeCode::new(*b"snd "),
            id: -16455,
            name: name.map(<[u8]>::to_vec),
            data: data.to_vec(),
        }
    }

    #[test]
    fn resource_lines() {
        assert_eq!(
            format_resource(&resource(None, &[0; 4096])),
            "'snd '  -16455     4096 bytes"
        );
        assert_eq!(
            format_resource(&resource(Some(b"Simple Beep"), b"")),
            "'snd '  -16455        0 bytes \"Simple Beep\""
        );
        assert_eq!(format_short(&resource(None, b"")), "'snd ' -16455");
    }

    #[test]
    fn hexdump_rows() {
        let data: Vec<u8> = b"Hello, world!\r\n\x00\x8e\xff".to_vec();
        assert_eq!(
            hexdump(&data),
            "00000000: 4865 6c6c 6f2c 2077 6f72 6c64 210d 0a00  Hello, world!...\n\
             00000010: 8eff                                     .."
        );
    }

    #[test]
    fn hexdump_empty() {
        assert_eq!(hexdump(&[]), "");
    }
}
