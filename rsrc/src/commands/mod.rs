mod dump;
mod list;

use rsrc_format::translate::Translators;

use crate::cli::Cli;
use crate::error::{Error, Result};

pub use dump::{prepare_output_dir, Dumper};

/// Lists the selected resources and, as asked, prints and dumps each one.
/// Only loading the fork and preparing the output directory are fatal.
pub fn run(cli: &Cli) -> Result<()> {
    let resources = rsrc_format::read_resource_fork(&cli.fork).map_err(|source| Error::Load {
        path: cli.fork.clone(),
        source,
    })?;

    let selected = resources.filter(cli.type_code, cli.id);
    tracing::debug!(
        total = resources.resource_count(),
        selected = selected.resource_count(),
        "loaded resources"
    );

    let dumper = if cli.dump {
        prepare_output_dir(&cli.output, cli.force)?;
        Some(Dumper::new(
            &cli.output,
            Translators::default(),
            cli.translator_filter(),
        ))
    } else {
        None
    };

    if cli.json {
        list::print_json(&selected)?;
    }

    for resource in selected.resources() {
        if !cli.json {
            list::print_entry(resource, cli.print);
        }

        if let Some(dumper) = &dumper {
            for error in dumper.dump(resource) {
                eprintln!("{}", rsrc_format::report(&error));
            }
        }
    }

    Ok(())
}
