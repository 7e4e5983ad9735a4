mod assets;
mod once;
mod watch;

use std::sync::Arc;

use ferrosurge_core::{
    CoinGeckoSource, FetchConfig, MonitorConfig, QuoteSource, Session, SimulatedQuoteSource,
    Watchlist,
};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Session plus the source that feeds it.
pub struct Monitor {
    pub session: Session,
    pub source: Arc<dyn QuoteSource>,
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Assets => assets::run(cli, &watchlist(cli)?),
        Command::Once => once::run(cli, build_monitor(cli)?).await,
        Command::Watch(args) => watch::run(cli, args, build_monitor(cli)?).await,
    }
}

fn watchlist(cli: &Cli) -> Result<Watchlist, CliError> {
    if cli.assets.is_empty() {
        return Ok(Watchlist::default());
    }
    Ok(Watchlist::parse(cli.assets.as_slice())?)
}

fn build_monitor(cli: &Cli) -> Result<Monitor, CliError> {
    let config = MonitorConfig::default()
        .with_watchlist(watchlist(cli)?)
        .with_ranking(cli.ranking.into())
        .with_display_limit(cli.limit);
    let session = Session::new(config)?;

    let source: Arc<dyn QuoteSource> = if cli.offline {
        Arc::new(SimulatedQuoteSource::new())
    } else {
        let fetch = FetchConfig::from_env()?
            .with_vs_currency(&cli.vs_currency)?
            .with_timeout_ms(cli.timeout_ms);
        Arc::new(CoinGeckoSource::new(fetch))
    };

    info!(
        session = %session.id(),
        source = source.id(),
        assets = session.watchlist().len(),
        "monitor session started"
    );

    Ok(Monitor { session, source })
}
