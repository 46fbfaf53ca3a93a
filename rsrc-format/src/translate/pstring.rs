use crate::macroman::{self, ConversionOptions};
use crate::{Resource, TypeCode};

use super::{Compatibility, TranslateError, Translation, Translator};

const STR_TYPE: TypeCode = TypeCode::new(*b"STR ");

/// Converts length-prefixed Mac OS Roman strings to UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PascalStringTranslator;

/// Returns the string body if `data` is exactly one Pascal string.
fn pascal_string(data: &[u8]) -> Result<&[u8], TranslateError> {
    let (&length, body) = data
        .split_first()
        .ok_or_else(|| TranslateError::unsupported("Can't translate empty data."))?;

    if body.len() != usize::from(length) {
        return Err(TranslateError::unsupported(
            "Resource length doesn't match first byte prefix.",
        ));
    }

    Ok(body)
}

impl Translator for PascalStringTranslator {
    fn name(&self) -> &'static str {
        "pascal-string"
    }

    fn compatibility(&self, resource: &Resource) -> Compatibility {
        if pascal_string(&resource.data).is_err() {
            return Compatibility::NotCompatible;
        }

        if resource.type_code == STR_TYPE {
            Compatibility::LikelyCompatible
        } else {
            Compatibility::PossiblyCompatible
        }
    }

    fn translate(&self, resource: &Resource) -> Result<Translation, TranslateError> {
        let body = pascal_string(&resource.data)?;
        let text = macroman::decode(body, &ConversionOptions::VERBATIM);

        Ok(Translation {
            data: text.into_bytes(),
            extension: "txt",
        })
    }
}
