//! # Ferrosurge Core
//!
//! Watchlist momentum monitoring: poll a batch price endpoint, keep a short
//! rolling history per asset, and rank assets by a projected 30 minute gain.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Quote sources (CoinGecko, offline simulation) |
//! | [`config`] | Fetch, monitor and refresh settings |
//! | [`domain`] | Domain models (AssetId, Watchlist, Quote, UtcDateTime) |
//! | [`error`] | Validation errors |
//! | [`history`] | Bounded per-asset price history |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`projection`] | Momentum projection and confidence |
//! | [`ranking`] | Display ranking policies |
//! | [`session`] | Session context and refresh cycle |
//! | [`source`] | Quote source trait and errors |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrosurge_core::{CoinGeckoSource, FetchConfig, MonitorConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = CoinGeckoSource::new(FetchConfig::from_env()?);
//!     let mut session = Session::new(MonitorConfig::default())?;
//!
//!     let report = session.run_cycle(&source).await;
//!     for projection in &report.ranked {
//!         println!(
//!             "{}: {:.2}% ({:.1}% confidence)",
//!             projection.asset.display_name(),
//!             projection.projected_gain_pct,
//!             projection.confidence * 100.0
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Quote Source   │────▶│ HTTP Client      │
//! │ (fetch, never   │     │ (reqwest/noop)   │
//! │  fails)         │     └──────────────────┘
//! └────────┬────────┘
//!          │ QuoteMap
//!          ▼
//! ┌─────────────────┐
//! │ History Store   │  append + FIFO truncate (60)
//! └────────┬────────┘
//!          │ &HistoryStore
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Projection      │────▶│ Ranking          │──▶ CycleReport
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Upstream failures never reach the caller of [`QuoteSource::fetch`]; they
//! are logged through `tracing` and become an empty batch. Construction of
//! domain and config types returns [`ValidationError`].

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod http_client;
pub mod projection;
pub mod ranking;
pub mod session;
pub mod source;

pub use adapters::{parse_price_payload, CoinGeckoSource, SimulatedQuoteSource};

pub use config::{FetchConfig, MonitorConfig, RefreshConfig};

pub use domain::{
    validate_currency_code, AssetId, Quote, QuoteMap, UtcDateTime, Watchlist, DEFAULT_WATCHLIST,
};

pub use error::ValidationError;

pub use history::{History, HistoryStore, Sample};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

pub use projection::{confidence, Projection, WindowReturns, SURGE_THRESHOLD_PCT};

pub use ranking::{rank, RankingPolicy};

pub use session::{CycleReport, Session};

pub use source::{QuoteSource, SourceError, SourceErrorKind, StaticQuoteSource};
