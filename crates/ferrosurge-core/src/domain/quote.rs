use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AssetId, UtcDateTime, ValidationError};

/// Latest upstream price for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub asset: AssetId,
    pub price: f64,
    /// Upstream last-update time; history samples use capture time instead.
    pub observed_at: UtcDateTime,
}

impl Quote {
    pub fn new(
        asset: AssetId,
        price: f64,
        observed_at: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;

        Ok(Self {
            asset,
            price,
            observed_at,
        })
    }
}

/// Quotes from a single fetch cycle keyed by asset.
pub type QuoteMap = BTreeMap<AssetId, Quote>;

/// Validate and normalize a quote currency to a lowercase 3-5 letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_lowercase();
    let is_valid = (3..=5).contains(&normalized.len())
        && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
