use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_ASSET_ID_LEN: usize = 64;

/// Reference watchlist, in CoinGecko identifier form.
pub const DEFAULT_WATCHLIST: [&str; 10] = [
    "bitcoin",
    "ethereum",
    "binancecoin",
    "ripple",
    "cardano",
    "solana",
    "dogecoin",
    "tron",
    "polkadot",
    "litecoin",
];

/// Identifier fragments rendered verbatim instead of title-cased.
const DISPLAY_OVERRIDES: [(&str, &str); 2] = [("binancecoin", "Binance Coin"), ("ripple", "XRP")];

/// Normalized upstream asset identifier (e.g. `bitcoin`, `binancecoin`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    /// Parse and normalize an identifier to lowercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAssetId);
        }

        let normalized = trimmed.to_ascii_lowercase();
        let len = normalized.chars().count();
        if len > MAX_ASSET_ID_LEN {
            return Err(ValidationError::AssetIdTooLong {
                len,
                max: MAX_ASSET_ID_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-';
            if !valid {
                return Err(ValidationError::AssetIdInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-friendly name: known fragments are substituted, the rest is
    /// title-cased per alphabetic run (`shiba-inu` -> `Shiba-Inu`).
    pub fn display_name(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 4);
        let mut rest = self.0.as_str();
        let mut after_letter = false;

        while let Some(ch) = rest.chars().next() {
            if let Some((fragment, replacement)) = DISPLAY_OVERRIDES
                .iter()
                .find(|(fragment, _)| rest.starts_with(fragment))
            {
                out.push_str(replacement);
                rest = &rest[fragment.len()..];
                after_letter = true;
                continue;
            }

            if ch.is_ascii_alphabetic() {
                if after_letter {
                    out.push(ch.to_ascii_lowercase());
                } else {
                    out.push(ch.to_ascii_uppercase());
                }
                after_letter = true;
            } else {
                out.push(ch);
                after_letter = false;
            }
            rest = &rest[ch.len_utf8()..];
        }

        out
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssetId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for AssetId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AssetId> for String {
    fn from(value: AssetId) -> Self {
        value.0
    }
}

/// Ordered, de-duplicated, non-empty set of monitored assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Watchlist {
    assets: Vec<AssetId>,
}

impl Watchlist {
    pub fn new(assets: Vec<AssetId>) -> Result<Self, ValidationError> {
        let mut unique: Vec<AssetId> = Vec::with_capacity(assets.len());
        for asset in assets {
            if !unique.contains(&asset) {
                unique.push(asset);
            }
        }

        if unique.is_empty() {
            return Err(ValidationError::EmptyWatchlist);
        }

        Ok(Self { assets: unique })
    }

    /// Parse raw identifiers, failing on the first invalid entry.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, ValidationError> {
        let assets = raw
            .iter()
            .map(|value| AssetId::parse(value.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(assets)
    }

    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetId> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.assets.contains(asset)
    }

    /// Comma-joined identifiers as sent to the upstream batch endpoint.
    pub fn joined_ids(&self) -> String {
        self.assets
            .iter()
            .map(AssetId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            assets: DEFAULT_WATCHLIST
                .iter()
                .filter_map(|id| AssetId::parse(id).ok())
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Watchlist {
    type Item = &'a AssetId;
    type IntoIter = std::slice::Iter<'a, AssetId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> String {
        AssetId::parse(raw).expect("valid asset id").display_name()
    }

    #[test]
    fn parses_and_normalizes_asset_id() {
        let parsed = AssetId::parse(" Bitcoin ").expect("asset should parse");
        assert_eq!(parsed.as_str(), "bitcoin");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = AssetId::parse("bit coin").expect_err("must fail");
        assert!(matches!(err, ValidationError::AssetIdInvalidChar { index: 3, .. }));
    }

    #[test]
    fn display_names_cover_special_cases() {
        assert_eq!(name("binancecoin"), "Binance Coin");
        assert_eq!(name("ripple"), "XRP");
        assert_eq!(name("bitcoin"), "Bitcoin");
        assert_eq!(name("shiba-inu"), "Shiba-Inu");
        assert_eq!(name("1inch"), "1Inch");
    }

    #[test]
    fn default_watchlist_keeps_reference_order() {
        let watchlist = Watchlist::default();
        assert_eq!(watchlist.len(), DEFAULT_WATCHLIST.len());
        assert_eq!(watchlist.assets()[0].as_str(), "bitcoin");
        assert!(watchlist.joined_ids().starts_with("bitcoin,ethereum,binancecoin"));
    }

    #[test]
    fn watchlist_drops_duplicates_and_rejects_empty() {
        let watchlist = Watchlist::parse(&["solana", "SOLANA", "tron"]).expect("valid");
        assert_eq!(watchlist.joined_ids(), "solana,tron");

        let empty: [&str; 0] = [];
        assert_eq!(
            Watchlist::parse(&empty).expect_err("must fail"),
            ValidationError::EmptyWatchlist
        );
    }
}
