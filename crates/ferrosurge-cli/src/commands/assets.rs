use std::io::{self, Write};

use ferrosurge_core::Watchlist;
use serde::Serialize;

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct AssetRow<'a> {
    id: &'a str,
    name: String,
}

pub fn run(cli: &Cli, watchlist: &Watchlist) -> Result<(), CliError> {
    let rows = watchlist
        .iter()
        .map(|asset| AssetRow {
            id: asset.as_str(),
            name: asset.display_name(),
        })
        .collect::<Vec<_>>();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Json => {
            let payload = if cli.pretty {
                serde_json::to_string_pretty(&rows)?
            } else {
                serde_json::to_string(&rows)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => {
            for row in &rows {
                writeln!(out, "{:<16} {}", row.id, row.name)?;
            }
        }
    }

    Ok(())
}
