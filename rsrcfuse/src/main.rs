use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rsrc_format::translate::{TranslatorFilter, Translators};
use rsrcfuse::{MountOption, RsrcFs, Vfs};

#[derive(Debug, Parser)]
#[command(
    name = "rsrcfuse",
    about = "Mount a classic Mac OS resource fork as a read-only filesystem"
)]
struct Options {
    /// File whose resource fork to mount, or a bare resource fork file
    fork: PathBuf,

    /// Mount point directory
    mountpoint: PathBuf,

    /// Also show conversions from translators likely to understand a resource
    #[arg(short = 'c')]
    convert: bool,

    /// Also show conversions from translators that might understand a resource (implies -c)
    #[arg(short = 'C')]
    convert_all: bool,

    /// Log debug information
    #[arg(long)]
    debug: bool,
}

impl Options {
    fn filter(&self) -> TranslatorFilter {
        if self.convert_all {
            TranslatorFilter::LikelyAndPossible
        } else if self.convert {
            TranslatorFilter::Likely
        } else {
            TranslatorFilter::None
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("Couldn't load resource fork of {}.", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: rsrc_format::Error,
    },

    #[error("Couldn't mount at {}.", path.display())]
    Mount {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    let opts = Options::parse();

    let filter = if opts.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", rsrc_format::report(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Options) -> Result<(), Error> {
    let resources = rsrc_format::read_resource_fork(&opts.fork).map_err(|source| Error::Load {
        path: opts.fork.clone(),
        source,
    })?;

    let name = opts
        .fork
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rsrc".to_string());

    let vfs = Vfs::from_resources(&name, &resources, &Translators::default(), opts.filter());
    let fs = RsrcFs::new(vfs);

    tracing::info!(
        fork = %opts.fork.display(),
        mountpoint = %opts.mountpoint.display(),
        types = resources.len(),
        resources = resources.resource_count(),
        "mounting"
    );

    let mount_opts = [MountOption::RO, MountOption::FSName("rsrcfuse".to_string())];
    rsrcfuse::mount2(fs, &opts.mountpoint, &mount_opts).map_err(|source| Error::Mount {
        path: opts.mountpoint.clone(),
        source,
    })
}
