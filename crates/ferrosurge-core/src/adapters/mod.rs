//! Quote source adapters.

mod coingecko;
mod simulated;

pub use coingecko::{parse_price_payload, CoinGeckoSource};
pub use simulated::SimulatedQuoteSource;
