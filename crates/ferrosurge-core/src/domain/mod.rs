//! # Domain Models
//!
//! Canonical domain types for ferrosurge.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AssetId`] | Validated upstream asset identifier |
//! | [`Watchlist`] | Ordered set of monitored assets |
//! | [`Quote`] | Latest price for one asset |
//! | [`QuoteMap`] | Quotes from one fetch cycle |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! All types enforce their invariants at construction time:
//!
//! ```rust
//! use ferrosurge_core::{AssetId, ValidationError};
//!
//! let coin = AssetId::parse("ripple")?;
//! assert_eq!(coin.display_name(), "XRP");
//!
//! assert!(matches!(
//!     AssetId::parse("bit$coin"),
//!     Err(ValidationError::AssetIdInvalidChar { .. })
//! ));
//! # Ok::<(), ValidationError>(())
//! ```

mod asset;
mod quote;
mod timestamp;

pub use asset::{AssetId, Watchlist, DEFAULT_WATCHLIST};
pub use quote::{validate_currency_code, Quote, QuoteMap};
pub use timestamp::UtcDateTime;
