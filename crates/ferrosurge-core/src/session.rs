//! Per-session refresh cycle.
//!
//! A [`Session`] is the explicit context object for one monitoring run. It
//! owns the history store and is driven through `&mut self`, so cycles can
//! never overlap. Each cycle runs fetch, history update, projection and
//! ranking to completion before returning a [`CycleReport`].

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::history::HistoryStore;
use crate::projection::{self, Projection};
use crate::ranking::{self, RankingPolicy};
use crate::source::QuoteSource;
use crate::{MonitorConfig, QuoteMap, UtcDateTime, ValidationError, Watchlist};

/// Output of one refresh cycle, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub session_id: Uuid,
    pub cycle: u64,
    pub generated_at: UtcDateTime,
    pub ranking: RankingPolicy,
    /// Assets that received a new sample this cycle.
    pub fetched: usize,
    /// Assets with any history.
    pub tracked: usize,
    /// Assets with enough history to project.
    pub projected: usize,
    /// Projected assets at or above the surge threshold.
    pub surging: usize,
    pub ranked: Vec<Projection>,
}

impl CycleReport {
    /// True until at least one asset has two samples.
    pub fn is_warming_up(&self) -> bool {
        self.projected == 0
    }
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: UtcDateTime,
    watchlist: Watchlist,
    histories: HistoryStore,
    ranking: RankingPolicy,
    display_limit: usize,
    cycles: u64,
}

impl Session {
    pub fn new(config: MonitorConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            started_at: UtcDateTime::now(),
            histories: HistoryStore::new(config.history_capacity)?,
            watchlist: config.watchlist,
            ranking: config.ranking,
            display_limit: config.display_limit,
            cycles: 0,
        })
    }

    /// Fetch, record, project and rank once.
    pub async fn run_cycle(&mut self, source: &dyn QuoteSource) -> CycleReport {
        let quotes = source.fetch(&self.watchlist).await;
        self.apply(&quotes, UtcDateTime::now())
    }

    /// Record an already-fetched batch captured at `captured_at`, then
    /// project and rank. An empty batch leaves the histories untouched.
    pub fn apply(&mut self, quotes: &QuoteMap, captured_at: UtcDateTime) -> CycleReport {
        self.cycles += 1;

        let fetched = if quotes.is_empty() {
            0
        } else {
            self.histories.update_at(quotes, captured_at)
        };

        let projections = projection::compute(&self.histories);
        let projected = projections.len();
        let surging = ranking::surging(&projections);
        let ranked = ranking::rank(projections, self.ranking, self.display_limit);

        info!(
            session = %self.id,
            cycle = self.cycles,
            fetched,
            tracked = self.histories.len(),
            projected,
            surging,
            "refresh cycle complete"
        );

        CycleReport {
            session_id: self.id,
            cycle: self.cycles,
            generated_at: captured_at,
            ranking: self.ranking,
            fetched,
            tracked: self.histories.len(),
            projected,
            surging,
            ranked,
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn started_at(&self) -> UtcDateTime {
        self.started_at
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Read-only view for charts and tables.
    pub fn histories(&self) -> &HistoryStore {
        &self.histories
    }

    pub const fn cycles(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetId, Quote};

    fn at(seconds: i64) -> UtcDateTime {
        UtcDateTime::from_unix_timestamp(1_704_067_200 + seconds).expect("in range")
    }

    fn batch(price: f64) -> QuoteMap {
        let asset = AssetId::parse("bitcoin").expect("valid");
        let quote = Quote::new(asset.clone(), price, at(0)).expect("valid quote");
        QuoteMap::from([(asset, quote)])
    }

    #[test]
    fn first_cycle_warms_up_and_second_projects() {
        let mut session = Session::new(MonitorConfig::default()).expect("valid config");

        let first = session.apply(&batch(100.0), at(0));
        assert!(first.is_warming_up());
        assert_eq!(first.fetched, 1);

        let second = session.apply(&batch(101.0), at(60));
        assert_eq!(second.cycle, 2);
        assert_eq!(second.projected, 1);
        assert_eq!(second.ranked.len(), 1);
    }

    #[test]
    fn empty_batch_counts_a_cycle_without_touching_history() {
        let mut session = Session::new(MonitorConfig::default()).expect("valid config");
        session.apply(&batch(100.0), at(0));

        let report = session.apply(&QuoteMap::new(), at(60));
        assert_eq!(report.fetched, 0);
        assert_eq!(report.tracked, 1);
        assert_eq!(session.histories().sample_count(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MonitorConfig::default().with_history_capacity(0);
        assert_eq!(
            Session::new(config).expect_err("must fail"),
            ValidationError::ZeroHistoryCapacity
        );
    }
}
