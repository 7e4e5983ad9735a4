//! Quote source trait and its error type.
//!
//! A [`QuoteSource`] performs one batched upstream call per refresh cycle.
//! Callers normally use [`QuoteSource::fetch`], which never fails: any
//! [`SourceError`] is logged and collapsed into an empty [`QuoteMap`] so a
//! bad upstream response only ever means "no update this cycle".

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::{QuoteMap, Watchlist};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure, timeout or non-success status.
    Unavailable,
    /// Payload that could not be interpreted.
    InvalidResponse,
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Upstream quote provider contract.
///
/// Implementations must be `Send + Sync`; they are shared behind `Arc` by
/// the CLI and borrowed by [`Session::run_cycle`](crate::Session::run_cycle).
pub trait QuoteSource: Send + Sync {
    /// Short provider name used in logs.
    fn id(&self) -> &'static str;

    /// Fetches the latest quote for every watchlist asset in one batch.
    ///
    /// Assets the upstream omits, or reports without a usable price and
    /// update time, are left out of the map rather than failing the batch.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the whole batch is unusable: transport
    /// failure, timeout, non-success status or an unparseable payload.
    fn try_fetch<'a>(
        &'a self,
        watchlist: &'a Watchlist,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteMap, SourceError>> + Send + 'a>>;

    /// Best-effort fetch: errors are logged and collapse to an empty map.
    fn fetch<'a>(
        &'a self,
        watchlist: &'a Watchlist,
    ) -> Pin<Box<dyn Future<Output = QuoteMap> + Send + 'a>> {
        Box::pin(async move {
            match self.try_fetch(watchlist).await {
                Ok(quotes) => {
                    debug!(
                        source = self.id(),
                        requested = watchlist.len(),
                        received = quotes.len(),
                        "quote batch received"
                    );
                    quotes
                }
                Err(error) => {
                    warn!(
                        source = self.id(),
                        code = error.code(),
                        "quote fetch failed, no update this cycle: {}",
                        error.message()
                    );
                    QuoteMap::new()
                }
            }
        })
    }
}

/// Deterministic in-memory source for offline runs and tests.
///
/// Scripted responses are served in order; once exhausted every call
/// returns the fallback response.
#[derive(Debug)]
pub struct StaticQuoteSource {
    scripted: Mutex<VecDeque<Result<QuoteMap, SourceError>>>,
    fallback: Result<QuoteMap, SourceError>,
}

impl StaticQuoteSource {
    pub fn new(quotes: QuoteMap) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            fallback: Ok(quotes),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            fallback: Err(error),
        }
    }

    pub fn with_script(mut self, responses: Vec<Result<QuoteMap, SourceError>>) -> Self {
        self.scripted = Mutex::new(responses.into());
        self
    }

    fn next_response(&self) -> Result<QuoteMap, SourceError> {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl QuoteSource for StaticQuoteSource {
    fn id(&self) -> &'static str {
        "static"
    }

    fn try_fetch<'a>(
        &'a self,
        watchlist: &'a Watchlist,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteMap, SourceError>> + Send + 'a>> {
        let response = self.next_response().map(|quotes| {
            quotes
                .into_iter()
                .filter(|(asset, _)| watchlist.contains(asset))
                .collect()
        });
        Box::pin(async move { response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetId, Quote, UtcDateTime};

    fn quotes(raw: &[(&str, f64)]) -> QuoteMap {
        let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        raw.iter()
            .map(|(id, price)| {
                let asset = AssetId::parse(id).expect("valid asset");
                (asset.clone(), Quote::new(asset, *price, ts).expect("valid quote"))
            })
            .collect()
    }

    #[tokio::test]
    async fn fetch_collapses_errors_to_empty_map() {
        let source = StaticQuoteSource::failing(SourceError::unavailable("boom"));
        let watchlist = Watchlist::default();

        assert!(source.try_fetch(&watchlist).await.is_err());
        assert!(source.fetch(&watchlist).await.is_empty());
    }

    #[tokio::test]
    async fn scripted_responses_run_before_fallback() {
        let source = StaticQuoteSource::new(quotes(&[("bitcoin", 2.0)])).with_script(vec![
            Err(SourceError::invalid_response("garbled")),
            Ok(quotes(&[("bitcoin", 1.0)])),
        ]);
        let watchlist = Watchlist::default();

        assert!(source.fetch(&watchlist).await.is_empty());
        let second = source.fetch(&watchlist).await;
        let third = source.fetch(&watchlist).await;
        let bitcoin = AssetId::parse("bitcoin").expect("valid");
        assert_eq!(second[&bitcoin].price, 1.0);
        assert_eq!(third[&bitcoin].price, 2.0);
    }

    #[tokio::test]
    async fn static_source_only_returns_watchlist_assets() {
        let source = StaticQuoteSource::new(quotes(&[("bitcoin", 1.0), ("monero", 2.0)]));
        let watchlist = Watchlist::parse(&["bitcoin"]).expect("valid");

        let fetched = source.fetch(&watchlist).await;
        assert_eq!(fetched.len(), 1);
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert_eq!(
            SourceError::invalid_response("x").to_string(),
            "x (source.invalid_response)"
        );
    }
}
