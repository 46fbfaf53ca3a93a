use std::path::PathBuf;

use clap::Parser;
use rsrc_format::translate::TranslatorFilter;
use rsrc_format::TypeCode;

#[derive(Debug, Parser)]
#[command(
    name = "rsrc",
    about = "List, print and extract classic Mac OS resources.",
    version,
    after_help = "\
Examples:
  rsrc file.rsrc                    List every resource.
  rsrc -d -t 'snd ' file.rsrc       Dump all `snd ' resources.
  rsrc -d -t 'snd ' -i 1000 file    Dump the `snd ' resource with id 1000.
  rsrc -d -o /tmp/foo file.rsrc     Dump all resources to /tmp/foo."
)]
pub struct Cli {
    /// File whose resource fork to read, or a bare resource fork file
    pub fork: PathBuf,

    /// Only resources of this type (four Mac OS Roman characters)
    #[arg(short = 't', value_name = "TYPE")]
    pub type_code: Option<TypeCode>,

    /// Only resources with this identifier
    #[arg(short = 'i', value_name = "ID", allow_negative_numbers = true)]
    pub id: Option<i16>,

    /// Print a hexdump of each resource
    #[arg(short = 'p', conflicts_with = "json")]
    pub print: bool,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,

    /// Dump resources to files
    #[arg(short = 'd')]
    pub dump: bool,

    /// Output directory for dumped resources
    #[arg(short = 'o', value_name = "DIR", default_value = "rsrc-dump")]
    pub output: PathBuf,

    /// Write into an existing output directory, replacing files
    #[arg(short = 'f')]
    pub force: bool,

    /// Also write conversions to modern formats from likely translators
    #[arg(short = 'c')]
    pub convert: bool,

    /// Also write best guess conversions (implies -c)
    #[arg(short = 'C')]
    pub convert_all: bool,
}

impl Cli {
    pub fn translator_filter(&self) -> TranslatorFilter {
        if self.convert_all {
            TranslatorFilter::LikelyAndPossible
        } else if self.convert {
            TranslatorFilter::Likely
        } else {
            TranslatorFilter::None
        }
    }
}
