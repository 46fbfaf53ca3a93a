//! Conversion of raw resources into modern file formats.

use std::fmt;

use crate::{BoxError, Resource};

mod pstring;
mod snd;

pub use pstring::PascalStringTranslator;
pub use snd::SndTranslator;

/// How confident a translator is that it can convert a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compatibility {
    NotCompatible,
    PossiblyCompatible,
    LikelyCompatible,
}

/// Which translators a caller wants to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TranslatorFilter {
    #[default]
    None,
    Likely,
    LikelyAndPossible,
}

impl TranslatorFilter {
    fn accepts(&self, compatibility: Compatibility) -> bool {
        match compatibility {
            Compatibility::NotCompatible => false,
            Compatibility::PossiblyCompatible => *self >= TranslatorFilter::LikelyAndPossible,
            Compatibility::LikelyCompatible => *self >= TranslatorFilter::Likely,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub data: Vec<u8>,
    pub extension: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateErrorKind {
    /// The resource may be fine but the translator cannot handle it.
    Unsupported,
    /// The resource does not look valid.
    Invalid,
}

#[derive(Debug, thiserror::Error)]
pub struct TranslateError {
    kind: TranslateErrorKind,
    reason: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl TranslateError {
    pub fn unsupported<S: Into<String>>(reason: S) -> TranslateError {
        TranslateError {
            kind: TranslateErrorKind::Unsupported,
            reason: Some(reason.into()),
            source: None,
        }
    }

    pub fn invalid<S: Into<String>>(reason: S) -> TranslateError {
        TranslateError {
            kind: TranslateErrorKind::Invalid,
            reason: Some(reason.into()),
            source: None,
        }
    }

    pub fn with_source<E: Into<BoxError>>(mut self, source: E) -> TranslateError {
        self.source = Some(source.into());
        self
    }

    #[inline(always)]
    pub fn kind(&self) -> TranslateErrorKind {
        self.kind
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TranslateErrorKind::Unsupported => f.write_str(
                "The resource may be valid but this translator is not able to convert it.",
            )?,
            TranslateErrorKind::Invalid => f.write_str("The resource does not appear to be valid.")?,
        }
        match &self.reason {
            Some(reason) => write!(f, " {}", reason),
            None => Ok(()),
        }
    }
}

pub trait Translator {
    fn name(&self) -> &'static str;
    fn compatibility(&self, resource: &Resource) -> Compatibility;
    fn translate(&self, resource: &Resource) -> Result<Translation, TranslateError>;
}

/// The set of translators a front end runs resources through.
pub struct Translators {
    translators: Vec<Box<dyn Translator + Send + Sync>>,
}

impl Translators {
    pub fn new(translators: Vec<Box<dyn Translator + Send + Sync>>) -> Translators {
        Translators { translators }
    }

    /// Runs every translator the filter selects for this resource, likely
    /// ones first. Each selected translator contributes exactly one result.
    pub fn translate(
        &self,
        resource: &Resource,
        filter: TranslatorFilter,
    ) -> Vec<Result<Translation, TranslateError>> {
        let mut selected: Vec<(Compatibility, &dyn Translator)> = self
            .translators
            .iter()
            .map(|t| (t.compatibility(resource), t.as_ref() as &dyn Translator))
            .filter(|(compatibility, _)| filter.accepts(*compatibility))
            .collect();
        selected.sort_by(|a, b| b.0.cmp(&a.0));

        selected
            .into_iter()
            .map(|(compatibility, translator)| {
                tracing::debug!(
                    translator = translator.name(),
                    ?compatibility,
                    type_code = %resource.type_code,
                    id = resource.id,
                    "translating resource"
                );
                translator.translate(resource)
            })
            .collect()
    }
}

impl Default for Translators {
    fn default() -> Self {
        Translators::new(vec![
            Box::new(PascalStringTranslator),
            Box::new(SndTranslator),
        ])
    }
}

impl fmt::Debug for Translators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.translators.iter().map(|t| t.name()))
            .finish()
    }
}
