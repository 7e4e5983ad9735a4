use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::source::{QuoteSource, SourceError};
use crate::{AssetId, Quote, QuoteMap, UtcDateTime, ValidationError, Watchlist};

/// Deterministic offline source producing a slow oscillating walk per asset.
///
/// Every asset gets a seed-derived base price, amplitude and phase, so some
/// assets trend up while others fall on any given call.
#[derive(Debug, Default)]
pub struct SimulatedQuoteSource {
    tick: AtomicU64,
}

impl SimulatedQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed fetches.
    pub fn ticks(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }
}

impl QuoteSource for SimulatedQuoteSource {
    fn id(&self) -> &'static str {
        "simulated"
    }

    fn try_fetch<'a>(
        &'a self,
        watchlist: &'a Watchlist,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteMap, SourceError>> + Send + 'a>> {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        let observed_at = UtcDateTime::now();
        let quotes = watchlist
            .iter()
            .map(|asset| {
                simulated_quote(asset, tick, observed_at).map(|quote| (asset.clone(), quote))
            })
            .collect::<Result<QuoteMap, _>>()
            .map_err(validation_to_error);
        Box::pin(async move { quotes })
    }
}

fn simulated_quote(
    asset: &AssetId,
    tick: u64,
    observed_at: UtcDateTime,
) -> Result<Quote, ValidationError> {
    let seed = asset_seed(asset);
    let base = 0.5 + (seed % 60_000) as f64;
    let amplitude = 0.01 + (seed % 7) as f64 / 100.0;
    let period = 12.0 + (seed % 17) as f64;
    let phase = (seed % 360) as f64 / 57.3;
    let angle = tick as f64 / period * std::f64::consts::TAU + phase;

    Quote::new(asset.clone(), base * (1.0 + amplitude * angle.sin()), observed_at)
}

fn asset_seed(asset: &AssetId) -> u64 {
    asset.as_str().bytes().fold(13_u64, |acc, byte| {
        acc.wrapping_mul(29).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}
