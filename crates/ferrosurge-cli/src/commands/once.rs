use crate::cli::Cli;
use crate::error::CliError;
use crate::output;

use super::Monitor;

pub async fn run(cli: &Cli, mut monitor: Monitor) -> Result<(), CliError> {
    let report = monitor.session.run_cycle(monitor.source.as_ref()).await;
    output::render_cycle(&report, monitor.session.histories(), cli.format, cli.pretty)
}
