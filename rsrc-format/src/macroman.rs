//! Mac OS Roman text conversion.

const FULL_STOP: u8 = b'.';
const QUESTION_MARK: u8 = b'?';

#[rustfmt::skip]
const HIGH_HALF: [char; 128] = [
    'Ä', 'Å', 'Ç', 'É', 'Ñ', 'Ö', 'Ü', 'á', 'à', 'â', 'ä', 'ã', 'å', 'ç', 'é', 'è',
    'ê', 'ë', 'í', 'ì', 'î', 'ï', 'ñ', 'ó', 'ò', 'ô', 'ö', 'õ', 'ú', 'ù', 'û', 'ü',
    '†', '°', '¢', '£', '§', '•', '¶', 'ß', '®', '©', '™', '´', '¨', '≠', 'Æ', 'Ø',
    '∞', '±', '≤', '≥', '¥', 'µ', '∂', '∑', '∏', 'π', '∫', 'ª', 'º', 'Ω', 'æ', 'ø',
    '¿', '¡', '¬', '√', 'ƒ', '≈', '∆', '«', '»', '…', '\u{a0}', 'À', 'Ã', 'Õ', 'Œ', 'œ',
    '–', '—', '“', '”', '‘', '’', '÷', '◊', 'ÿ', 'Ÿ', '⁄', '€', '‹', '›', 'ﬁ', 'ﬂ',
    '‡', '·', '‚', '„', '‰', 'Â', 'Ê', 'Á', 'Ë', 'È', 'Í', 'Î', 'Ï', 'Ì', 'Ó', 'Ô',
    '\u{f8ff}', 'Ò', 'Ú', 'Û', 'Ù', 'ı', 'ˆ', '˜', '¯', '˘', '˙', '˚', '¸', '˝', '˛', 'ˇ',
];

/// Controls which bytes are filtered while converting, and what a filtered
/// byte becomes. A filtered byte is replaced by `replacement` when one is
/// set, and dropped otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOptions {
    pub filter_control: bool,
    /// Also filters control characters.
    pub filter_filesystem_unsafe: bool,
    pub filter_non_ascii: bool,
    pub replacement: Option<u8>,
}

impl ConversionOptions {
    /// Control characters become `?`. Used for type codes and names shown to a person.
    pub const DISPLAY: ConversionOptions = ConversionOptions {
        filter_control: true,
        filter_filesystem_unsafe: false,
        filter_non_ascii: false,
        replacement: Some(QUESTION_MARK),
    };

    /// Control and shell-unsafe characters are dropped.
    pub const FILESYSTEM_SAFE: ConversionOptions = ConversionOptions {
        filter_control: true,
        filter_filesystem_unsafe: true,
        filter_non_ascii: false,
        replacement: None,
    };

    /// Anything outside printable ASCII becomes `.`.
    pub const HEXDUMP: ConversionOptions = ConversionOptions {
        filter_control: true,
        filter_filesystem_unsafe: false,
        filter_non_ascii: true,
        replacement: Some(FULL_STOP),
    };

    pub const VERBATIM: ConversionOptions = ConversionOptions {
        filter_control: false,
        filter_filesystem_unsafe: false,
        filter_non_ascii: false,
        replacement: None,
    };

    fn filters(&self, byte: u8) -> bool {
        let filter_control = self.filter_control || self.filter_filesystem_unsafe;

        (filter_control && (byte < 0x20 || byte == 0x7f))
            || (self.filter_non_ascii && byte > 0x7f)
            // A leading `.` hides a file and `~` confuses shells, so both go too.
            || (self.filter_filesystem_unsafe && matches!(byte, b'*' | b'.' | b'/' | b':' | b'\\' | b'~'))
    }
}

#[inline]
fn to_char(byte: u8) -> char {
    if byte < 0x80 {
        byte as char
    } else {
        HIGH_HALF[(byte - 0x80) as usize]
    }
}

pub fn decode(bytes: &[u8], options: &ConversionOptions) -> String {
    let mut out = String::with_capacity(bytes.len());

    for &byte in bytes {
        if !options.filters(byte) {
            out.push(to_char(byte));
        } else if let Some(replacement) = options.replacement {
            out.push(to_char(replacement));
        }
    }

    out
}

/// Renders bytes as a single path component that is safe to hand to a
/// filesystem. The result may be empty.
pub fn filesystem_safe(bytes: &[u8]) -> String {
    decode(bytes, &ConversionOptions::FILESYSTEM_SAFE)
}

/// Converts text back to Mac OS Roman, or `None` if a character has no
/// Mac OS Roman equivalent.
pub fn encode(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| {
            if c.is_ascii() {
                Some(c as u8)
            } else {
                HIGH_HALF
                    .iter()
                    .position(|candidate| *candidate == c)
                    .map(|index| 0x80 + index as u8)
            }
        })
        .collect()
}
