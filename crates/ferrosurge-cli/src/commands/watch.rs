use std::future::Future;

use ferrosurge_core::{CycleReport, HistoryStore, RefreshConfig};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::cli::{Cli, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::Monitor;

pub async fn run(cli: &Cli, args: &WatchArgs, monitor: Monitor) -> Result<(), CliError> {
    let refresh = RefreshConfig::new(args.interval_secs, !args.no_refresh)?;

    info!(
        interval_secs = refresh.refresh_interval_seconds,
        enabled = refresh.enabled,
        "watch loop starting"
    );

    let completed = watch_loop(
        monitor,
        refresh,
        args.cycles,
        shutdown_signal(),
        |report, histories| output::render_cycle(report, histories, cli.format, cli.pretty),
    )
    .await?;

    info!(cycles = completed, "watch loop stopped");
    Ok(())
}

/// Resolves on the first Ctrl-C. If the handler cannot be installed the
/// loop keeps running until its cycle limit.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Refresh loop; returns the number of rendered cycles.
///
/// `shutdown` is polled both while waiting for the next tick and while a
/// cycle is fetching, so an interrupt is never lost between cycles. Each
/// cycle runs to completion before the next tick is awaited, so cycles
/// never overlap.
async fn watch_loop<S, R>(
    mut monitor: Monitor,
    refresh: RefreshConfig,
    max_cycles: Option<u64>,
    shutdown: S,
    mut render: R,
) -> Result<u64, CliError>
where
    S: Future<Output = ()>,
    R: FnMut(&CycleReport, &HistoryStore) -> Result<(), CliError>,
{
    tokio::pin!(shutdown);

    let mut ticker = interval(refresh.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut completed = 0_u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut shutdown => {
                info!(cycles = completed, "interrupt received, stopping watch loop");
                break;
            }
        }

        let report = tokio::select! {
            report = monitor.session.run_cycle(monitor.source.as_ref()) => report,
            () = &mut shutdown => {
                info!(cycles = completed, "interrupt received mid-cycle, stopping watch loop");
                break;
            }
        };

        render(&report, monitor.session.histories())?;
        completed += 1;

        if !refresh.enabled || max_cycles.is_some_and(|max| completed >= max) {
            break;
        }
    }

    Ok(completed)
}
