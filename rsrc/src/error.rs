use std::path::PathBuf;

use rsrc_format::translate::TranslateError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot load resource fork of `{}`.", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: rsrc_format::Error,
    },

    #[error("Output directory `{}` is not a folder.", .path.display())]
    OutputNotADirectory { path: PathBuf },

    #[error("Output directory `{}` already exists. Use -f to overwrite existing files.", .path.display())]
    OutputExists { path: PathBuf },

    #[error("Cannot create output directory `{}`.", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot dump resource {resource} to `{}`.", .path.display())]
    DumpResource {
        resource: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write translation for resource {resource} to `{}`.", .path.display())]
    WriteTranslation {
        resource: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to translate resource {resource}.")]
    Translate {
        resource: String,
        #[source]
        source: TranslateError,
    },

    #[error("Cannot write JSON listing")]
    Json(#[from] serde_json::Error),
}
