use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::source::{QuoteSource, SourceError};
use crate::{AssetId, FetchConfig, Quote, QuoteMap, UtcDateTime, Watchlist};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko `simple/price` adapter.
///
/// One GET per cycle for the whole watchlist; no retry and no backoff.
#[derive(Clone)]
pub struct CoinGeckoSource {
    http_client: Arc<dyn HttpClient>,
    config: FetchConfig,
}

impl Default for CoinGeckoSource {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl CoinGeckoSource {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            config,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: FetchConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn build_request(&self, watchlist: &Watchlist) -> HttpRequest {
        let auth = match self.config.api_key() {
            Some(key) => HttpAuth::Header {
                name: String::from(API_KEY_HEADER),
                value: key.to_owned(),
            },
            None => HttpAuth::None,
        };

        HttpRequest::get(format!("{}/simple/price", self.config.base_url()))
            .with_query("ids", watchlist.joined_ids())
            .with_query("vs_currencies", self.config.vs_currency())
            .with_query("include_last_updated_at", "true")
            .with_header("accept", "application/json")
            .with_auth(&auth)
            .with_timeout_ms(self.config.timeout_ms())
    }
}

impl QuoteSource for CoinGeckoSource {
    fn id(&self) -> &'static str {
        "coingecko"
    }

    fn try_fetch<'a>(
        &'a self,
        watchlist: &'a Watchlist,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteMap, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = self.build_request(watchlist);
            let response = self.http_client.execute(request).await.map_err(|error| {
                if error.timed_out() {
                    SourceError::unavailable(format!("coingecko timed out: {}", error.message()))
                } else {
                    SourceError::unavailable(format!(
                        "coingecko transport error: {}",
                        error.message()
                    ))
                }
            })?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "coingecko returned status {}",
                    response.status
                )));
            }

            parse_price_payload(&response.body, watchlist, self.config.vs_currency())
        })
    }
}

/// Per-asset entry of the `simple/price` payload. The price key is the
/// requested currency code, so it is captured through the flattened map.
#[derive(Debug, Clone, Deserialize)]
struct CoinGeckoEntry {
    #[serde(default)]
    last_updated_at: Option<i64>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

/// Parse a `simple/price` body into quotes for the requested assets.
///
/// A body that is not a JSON object fails the batch; individual entries
/// that are null, malformed, or missing the price or update time are
/// skipped.
pub fn parse_price_payload(
    body: &str,
    watchlist: &Watchlist,
    vs_currency: &str,
) -> Result<QuoteMap, SourceError> {
    let payload: BTreeMap<String, Value> = serde_json::from_str(body).map_err(|e| {
        SourceError::invalid_response(format!("failed to parse coingecko response: {e}"))
    })?;

    let quotes = watchlist
        .iter()
        .filter_map(|asset| {
            let quote = payload
                .get(asset.as_str())
                .and_then(|raw| normalize_entry(asset, raw, vs_currency));
            if quote.is_none() {
                debug!(asset = asset.as_str(), "no usable quote in coingecko payload");
            }
            quote.map(|quote| (asset.clone(), quote))
        })
        .collect();

    Ok(quotes)
}

fn normalize_entry(asset: &AssetId, raw: &Value, vs_currency: &str) -> Option<Quote> {
    let entry: CoinGeckoEntry = serde_json::from_value(raw.clone()).ok()?;
    let price = entry.fields.get(vs_currency).and_then(Value::as_f64)?;
    let observed_at = UtcDateTime::from_unix_timestamp(entry.last_updated_at?).ok()?;
    Quote::new(asset.clone(), price, observed_at).ok()
}
