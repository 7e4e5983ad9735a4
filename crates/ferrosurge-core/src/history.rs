//! Rolling per-asset price history.
//!
//! [`HistoryStore`] owns every [`Sample`]. Each refresh cycle appends one
//! sample per fetched asset, stamped with the local capture time (not the
//! upstream `observed_at`), and drops the oldest samples beyond the
//! capacity. Assets are never removed once tracked and samples are never
//! de-duplicated: two updates in the same instant append two samples.
//!
//! Mutation needs `&mut HistoryStore`; presentation code only ever gets a
//! shared reference, so an append/truncate can never race a reader.

use std::collections::btree_map;
use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::{AssetId, QuoteMap, UtcDateTime, ValidationError};

/// Samples kept per asset; one hour at the default refresh rate.
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: UtcDateTime,
    pub price: f64,
}

impl Sample {
    pub const fn new(time: UtcDateTime, price: f64) -> Self {
        Self { time, price }
    }
}

/// Bounded, insertion-ordered sample sequence for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    samples: VecDeque<Sample>,
    #[serde(skip)]
    capacity: usize,
}

impl History {
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn from_samples(capacity: usize, samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut history = Self::with_capacity(capacity);
        for sample in samples {
            history.push(sample);
        }
        history
    }

    /// Append a sample, then drop the oldest entries beyond capacity.
    ///
    /// Times stay non-decreasing: a sample older than the latest one is
    /// re-stamped with the latest time.
    pub fn push(&mut self, mut sample: Sample) {
        if let Some(latest) = self.samples.back() {
            if sample.time < latest.time {
                debug!(
                    captured = %sample.time,
                    latest = %latest.time,
                    "clock moved backwards; clamping sample time"
                );
                sample.time = latest.time;
            }
        }

        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|sample| sample.price)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Sample;
    type IntoIter = std::collections::vec_deque::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Session-scoped map of asset histories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HistoryStore {
    histories: BTreeMap<AssetId, History>,
    #[serde(skip)]
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self {
            histories: BTreeMap::new(),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Result<Self, ValidationError> {
        if capacity == 0 {
            return Err(ValidationError::ZeroHistoryCapacity);
        }
        Ok(Self {
            histories: BTreeMap::new(),
            capacity,
        })
    }

    /// Append one sample per quote, stamped with the current UTC time.
    pub fn update(&mut self, quotes: &QuoteMap) -> usize {
        self.update_at(quotes, UtcDateTime::now())
    }

    /// Append one sample per quote stamped with `captured_at`.
    ///
    /// Returns the number of samples appended.
    pub fn update_at(&mut self, quotes: &QuoteMap, captured_at: UtcDateTime) -> usize {
        let capacity = self.capacity;
        for (asset, quote) in quotes {
            self.histories
                .entry(asset.clone())
                .or_insert_with(|| History::with_capacity(capacity))
                .push(Sample::new(captured_at, quote.price));
        }
        quotes.len()
    }

    pub fn get(&self, asset: &AssetId) -> Option<&History> {
        self.histories.get(asset)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AssetId, History> {
        self.histories.iter()
    }

    /// Number of tracked assets.
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn sample_count(&self) -> usize {
        self.histories.values().map(History::len).sum()
    }
}

impl<'a> IntoIterator for &'a HistoryStore {
    type Item = (&'a AssetId, &'a History);
    type IntoIter = btree_map::Iter<'a, AssetId, History>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quote;

    fn at(seconds: i64) -> UtcDateTime {
        UtcDateTime::from_unix_timestamp(1_704_067_200 + seconds).expect("in range")
    }

    fn quotes(raw: &[(&str, f64)]) -> QuoteMap {
        raw.iter()
            .map(|(id, price)| {
                let asset = AssetId::parse(id).expect("valid asset");
                (asset.clone(), Quote::new(asset, *price, at(0)).expect("valid quote"))
            })
            .collect()
    }

    #[test]
    fn truncation_drops_the_oldest_sample() {
        let mut history =
            History::from_samples(60, (0..60).map(|i| Sample::new(at(i * 60), i as f64 + 1.0)));
        assert_eq!(history.len(), 60);

        history.push(Sample::new(at(3600), 61.0));
        assert_eq!(history.len(), 60);
        assert_eq!(history.oldest().map(|s| s.price), Some(2.0));
        assert_eq!(history.latest().map(|s| s.price), Some(61.0));
    }

    #[test]
    fn samples_use_capture_time_not_observation_time() {
        let mut store = HistoryStore::default();
        store.update_at(&quotes(&[("bitcoin", 100.0)]), at(90));

        let history = store.get(&AssetId::parse("bitcoin").expect("valid")).expect("tracked");
        assert_eq!(history.latest().map(|s| s.time), Some(at(90)));
    }

    #[test]
    fn repeated_updates_are_not_deduplicated() {
        let mut store = HistoryStore::default();
        let batch = quotes(&[("bitcoin", 100.0), ("ethereum", 10.0)]);

        store.update_at(&batch, at(0));
        store.update_at(&batch, at(0));

        assert_eq!(store.len(), 2);
        assert_eq!(store.sample_count(), 4);
    }

    #[test]
    fn assets_missing_from_a_batch_keep_their_history() {
        let mut store = HistoryStore::default();
        store.update_at(&quotes(&[("bitcoin", 100.0), ("tron", 0.1)]), at(0));
        store.update_at(&quotes(&[("bitcoin", 101.0)]), at(60));

        let tron = store.get(&AssetId::parse("tron").expect("valid")).expect("tracked");
        assert_eq!(tron.len(), 1);
    }

    #[test]
    fn backwards_clock_is_clamped() {
        let history = History::from_samples(
            5,
            [Sample::new(at(120), 1.0), Sample::new(at(60), 2.0)],
        );
        let times: Vec<_> = history.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![at(120), at(120)]);
    }

    #[test]
    fn zero_capacity_store_is_rejected() {
        assert_eq!(
            HistoryStore::new(0).expect_err("must fail"),
            ValidationError::ZeroHistoryCapacity
        );
    }
}
