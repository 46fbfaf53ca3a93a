use std::fs;
use std::path::{Path, PathBuf};

use rsrc_format::translate::{TranslatorFilter, Translators};
use rsrc_format::Resource;

use crate::error::{Error, Result};
use crate::util::format_short;

/// Checks the output directory and creates it if needed. An existing
/// directory is only accepted with `force`.
pub fn prepare_output_dir(path: &Path, force: bool) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => {
            return Err(Error::OutputNotADirectory {
                path: path.to_path_buf(),
            })
        }
        Ok(_) if !force => {
            return Err(Error::OutputExists {
                path: path.to_path_buf(),
            })
        }
        _ => {}
    }

    fs::create_dir_all(path).map_err(|source| Error::CreateOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes resources as `<output>/<type>/<id>[ <name>]`, with translations
/// alongside as `<id>[ <name>].<extension>`.
pub struct Dumper {
    output: PathBuf,
    translators: Translators,
    filter: TranslatorFilter,
}

impl Dumper {
    pub fn new(output: &Path, translators: Translators, filter: TranslatorFilter) -> Dumper {
        Dumper {
            output: output.to_path_buf(),
            translators,
            filter,
        }
    }

    fn location(&self, resource: &Resource) -> (PathBuf, String) {
        (
            self.output.join(resource.type_code.file_name()),
            resource.file_stem(),
        )
    }

    /// Dumps one resource. Every failure is returned; none stops the others.
    pub fn dump(&self, resource: &Resource) -> Vec<Error> {
        let mut errors = Vec::new();
        let (folder, stem) = self.location(resource);
        let path = folder.join(&stem);

        let written = fs::create_dir_all(&folder).and_then(|()| fs::write(&path, &resource.data));
        match written {
            Ok(()) => tracing::debug!(path = %path.display(), bytes = resource.data.len(), "dumped resource"),
            Err(source) => errors.push(Error::DumpResource {
                resource: format_short(resource),
                path,
                source,
            }),
        }

        for result in self.translators.translate(resource, self.filter) {
            let translation = match result {
                Ok(translation) => translation,
                Err(source) => {
                    errors.push(Error::Translate {
                        resource: format_short(resource),
                        source,
                    });
                    continue;
                }
            };

            let path = folder.join(format!("{}.{}", stem, translation.extension));
            if let Err(source) = fs::write(&path, &translation.data) {
                errors.push(Error::WriteTranslation {
                    resource: format_short(resource),
                    path,
                    source,
                });
            }
        }

        errors
    }
}
