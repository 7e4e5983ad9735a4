use thiserror::Error;

/// Validation and contract errors exposed by `ferrosurge-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("asset id cannot be empty")]
    EmptyAssetId,
    #[error("asset id length {len} exceeds max {max}")]
    AssetIdTooLong { len: usize, max: usize },
    #[error("asset id contains invalid character '{ch}' at index {index}")]
    AssetIdInvalidChar { ch: char, index: usize },
    #[error("watchlist must contain at least one asset")]
    EmptyWatchlist,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("unix timestamp {value} is out of range")]
    TimestampOutOfRange { value: i64 },

    #[error("currency must be a 3-5 letter code: '{value}'")]
    InvalidCurrency { value: String },
    #[error("base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("refresh interval must be at least one second")]
    ZeroRefreshInterval,
    #[error("history capacity must be greater than zero")]
    ZeroHistoryCapacity,
    #[error("display limit must be greater than zero")]
    ZeroDisplayLimit,
}
