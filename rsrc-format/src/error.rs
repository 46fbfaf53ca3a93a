use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyFork,
    ReadFork,
    InvalidFormat,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::EmptyFork => "The resource fork is empty.",
            ErrorKind::ReadFork => "Couldn't read resource fork.",
            ErrorKind::InvalidFormat => "Input file is corrupted or not a resource fork.",
        }
    }
}

/// A failure to obtain or decode a resource fork. The underlying cause, if
/// any, is available through [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
#[error("{}", .kind.as_str())]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }

    pub fn with_source<E: Into<BoxError>>(kind: ErrorKind, source: E) -> Error {
        Error {
            kind,
            source: Some(source.into()),
        }
    }

    #[inline(always)]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// Displays an error followed by each of its causes, one per line.
pub struct Report<'a>(&'a (dyn std::error::Error + 'static));

pub fn report<'a>(error: &'a (dyn std::error::Error + 'static)) -> Report<'a> {
    Report(error)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        match self.0.source() {
            Some(source) => write!(f, "\n{}", Report(source)),
            None => Ok(()),
        }
    }
}
