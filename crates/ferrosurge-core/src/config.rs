//! Runtime configuration.
//!
//! | Type | Consumed by |
//! |------|-------------|
//! | [`FetchConfig`] | [`CoinGeckoSource`](crate::adapters::CoinGeckoSource) |
//! | [`MonitorConfig`] | [`Session`](crate::Session) |
//! | [`RefreshConfig`] | the CLI refresh loop only; the core never schedules itself |
//!
//! Environment overrides:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `FERROSURGE_COINGECKO_URL` | Upstream API base URL |
//! | `FERROSURGE_COINGECKO_API_KEY` | Demo API key sent as a request header |

use std::time::Duration;

use serde::Serialize;

use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::ranking::{RankingPolicy, DEFAULT_DISPLAY_LIMIT};
use crate::{validate_currency_code, ValidationError, Watchlist};

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_VS_CURRENCY: &str = "usd";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

const BASE_URL_ENV: &str = "FERROSURGE_COINGECKO_URL";
const API_KEY_ENV: &str = "FERROSURGE_COINGECKO_API_KEY";

/// Periodic re-execution settings for the external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshConfig {
    pub refresh_interval_seconds: u64,
    pub enabled: bool,
}

impl RefreshConfig {
    pub fn new(refresh_interval_seconds: u64, enabled: bool) -> Result<Self, ValidationError> {
        if refresh_interval_seconds == 0 {
            return Err(ValidationError::ZeroRefreshInterval);
        }
        Ok(Self {
            refresh_interval_seconds,
            enabled,
        })
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECS,
            enabled: true,
        }
    }
}

/// Upstream request settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    base_url: String,
    vs_currency: String,
    timeout_ms: u64,
    api_key: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(COINGECKO_BASE_URL),
            vs_currency: String::from(DEFAULT_VS_CURRENCY),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_key: None,
        }
    }
}

impl FetchConfig {
    /// Defaults overlaid with the `FERROSURGE_COINGECKO_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(base_url)?;
        }
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            config = config.with_api_key(api_key);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ValidationError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl { value: base_url });
        }
        self.base_url = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_vs_currency(mut self, currency: &str) -> Result<Self, ValidationError> {
        self.vs_currency = validate_currency_code(currency)?;
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Blank keys are ignored.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then(|| api_key.trim().to_owned());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// Session-level settings: what to track and how to rank it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub watchlist: Watchlist,
    pub history_capacity: usize,
    pub ranking: RankingPolicy,
    pub display_limit: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            watchlist: Watchlist::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            ranking: RankingPolicy::default(),
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl MonitorConfig {
    pub fn with_watchlist(mut self, watchlist: Watchlist) -> Self {
        self.watchlist = watchlist;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_display_limit(mut self, display_limit: usize) -> Self {
        self.display_limit = display_limit;
        self
    }

    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_capacity == 0 {
            return Err(ValidationError::ZeroHistoryCapacity);
        }
        if self.display_limit == 0 {
            return Err(ValidationError::ZeroDisplayLimit);
        }
        Ok(())
    }
}
