//! CLI argument definitions for ferrosurge.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `watch` | Poll on an interval and re-render projections every cycle |
//! | `once` | Run a single refresh cycle |
//! | `assets` | List the watchlist with display names |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--offline` | `false` | Use the simulated quote source |
//! | `--vs-currency` | `usd` | Quote currency |
//! | `--timeout-ms` | `10000` | Upstream request timeout |
//! | `--asset` | reference list | Asset id to monitor (repeatable) |
//! | `--ranking` | `threshold` | Ranking policy |
//! | `--limit` | `5` | Rows to display |
//!
//! # Examples
//!
//! ```bash
//! # Refresh every minute until Ctrl-C
//! ferrosurge watch
//!
//! # Three fast offline cycles as JSON
//! ferrosurge --offline --format json watch --interval-secs 1 --cycles 3
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

use ferrosurge_core::RankingPolicy;

/// Crypto surge monitor
///
/// Polls current prices for a watchlist, keeps the last hour of samples per
/// asset in memory, and ranks assets by a projected 30 minute gain.
#[derive(Debug, Parser)]
#[command(
    name = "ferrosurge",
    author,
    version,
    about = "Crypto watchlist momentum monitor",
    long_about = "ferrosurge polls a public price API for a watchlist of coins and projects \
which ones are most likely to surge by 5% or more in the next 30 minutes.\n\
\n\
Projections are heuristic and for informational purposes only; they do not \
constitute financial advice."
)]
pub struct Cli {
    /// Output format for cycle results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use a deterministic simulated price feed instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Quote currency requested from the upstream API.
    #[arg(long, global = true, default_value = "usd")]
    pub vs_currency: String,

    /// Upstream request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Asset identifier to monitor; repeat to build a custom watchlist.
    #[arg(long = "asset", global = true)]
    pub assets: Vec<String>,

    /// Ranking policy for the projection table.
    #[arg(long, global = true, value_enum, default_value_t = RankingSelector::Threshold)]
    pub ranking: RankingSelector,

    /// Maximum number of ranked rows to display.
    #[arg(long, global = true, default_value_t = 5)]
    pub limit: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table and sparklines for terminal display.
    Table,
    /// One JSON object per cycle.
    Json,
}

/// Ranking policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankingSelector {
    /// Surging assets first, backfilled with the overall top by gain.
    Threshold,
    /// Top assets by confidence only.
    Confidence,
}

impl From<RankingSelector> for RankingPolicy {
    fn from(value: RankingSelector) -> Self {
        match value {
            RankingSelector::Threshold => Self::ThresholdWithFallback,
            RankingSelector::Confidence => Self::ConfidenceOnly,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll and re-render on a fixed interval.
    ///
    /// # Examples
    ///
    ///   ferrosurge watch
    ///   ferrosurge watch --interval-secs 30
    ///   ferrosurge watch --cycles 10 --format json
    Watch(WatchArgs),

    /// Run a single refresh cycle.
    ///
    /// A fresh session has no history yet, so this mostly reports the
    /// latest fetch; use `watch` to accumulate projections.
    Once,

    /// List the monitored assets.
    Assets,
}

/// Arguments for the `watch` command.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refresh cycles.
    #[arg(long, default_value_t = 60)]
    pub interval_secs: u64,

    /// Run one cycle and stop instead of refreshing.
    #[arg(long, default_value_t = false)]
    pub no_refresh: bool,

    /// Stop after this many cycles.
    #[arg(long)]
    pub cycles: Option<u64>,
}
