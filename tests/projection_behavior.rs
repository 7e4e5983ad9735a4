//! Behavior-driven tests for the projection engine and ranking.

use ferrosurge_core::projection::{self, compute, window_return};
use ferrosurge_core::{
    confidence, rank, AssetId, History, HistoryStore, Quote, QuoteMap, RankingPolicy, Sample,
    UtcDateTime,
};

const BASE: i64 = 1_704_067_200;

fn at_minute(minute: i64) -> UtcDateTime {
    UtcDateTime::from_unix_timestamp(BASE + minute * 60).expect("in range")
}

fn batch(prices: &[(&str, f64)]) -> QuoteMap {
    prices
        .iter()
        .map(|(id, price)| {
            let asset = AssetId::parse(id).expect("valid asset");
            let quote = Quote::new(asset.clone(), *price, at_minute(0)).expect("valid quote");
            (asset, quote)
        })
        .collect()
}

// =============================================================================
// Projection arithmetic
// =============================================================================

#[test]
fn two_samples_two_minutes_apart_project_seventy_five_percent() {
    // Given: bitcoin at 100 then 105 two minutes later
    let mut store = HistoryStore::default();
    store.update_at(&batch(&[("bitcoin", 100.0)]), at_minute(0));
    store.update_at(&batch(&[("bitcoin", 105.0)]), at_minute(2));

    // When: Projections are computed
    let projections = compute(&store);

    // Then: Only the 1-minute window finds a sample; 0.5 * 0.05 * 30 = 0.75
    assert_eq!(projections.len(), 1);
    let p = &projections[0];
    assert!((p.returns.one_minute - 0.05).abs() < 1e-12);
    assert_eq!(p.returns.five_minutes, 0.0);
    assert_eq!(p.returns.fifteen_minutes, 0.0);
    assert!((p.projected_gain_pct - 75.0).abs() < 1e-9);
    assert!(p.confidence > 0.999_999);
}

#[test]
fn all_three_windows_contribute_when_history_is_long_enough() {
    // Given: samples every minute for 20 minutes rising 1 per minute from 100
    let history = History::from_samples(
        60,
        (0..=20).map(|minute| Sample::new(at_minute(minute), 100.0 + minute as f64)),
    );

    // When: Window returns are measured
    let r1 = window_return(&history, 1);
    let r5 = window_return(&history, 5);
    let r15 = window_return(&history, 15);

    // Then: Each scan stops at the oldest sample (minute 0, price 100)
    assert!((r1 - 0.2).abs() < 1e-12);
    assert!((r5 - 0.2).abs() < 1e-12);
    assert!((r15 - 0.2).abs() < 1e-12);

    let asset = AssetId::parse("ethereum").expect("valid");
    let p = projection::project_history(&asset, &history).expect("enough history");
    let expected = (0.5 * 0.2 * 30.0 + 0.3 * 0.2 * 6.0 + 0.2 * 0.2 * 2.0) * 100.0;
    assert!((p.projected_gain_pct - expected).abs() < 1e-9);
}

#[test]
fn falling_prices_project_negative_gain_with_low_confidence() {
    let mut store = HistoryStore::default();
    store.update_at(&batch(&[("dogecoin", 0.10)]), at_minute(0));
    store.update_at(&batch(&[("dogecoin", 0.099)]), at_minute(1));

    let p = &compute(&store)[0];
    assert!(p.projected_gain_pct < 0.0);
    assert!(p.confidence < 0.5);
}

#[test]
fn assets_with_fewer_than_two_samples_are_excluded() {
    // Given: bitcoin has two samples, cardano only one
    let mut store = HistoryStore::default();
    store.update_at(&batch(&[("bitcoin", 1.0), ("cardano", 1.0)]), at_minute(0));
    store.update_at(&batch(&[("bitcoin", 1.0)]), at_minute(1));

    // When: Projections are computed
    let projections = compute(&store);

    // Then: cardano is absent, not zero-filled
    assert_eq!(projections.len(), 1);
    assert_eq!(projections[0].asset.as_str(), "bitcoin");
}

#[test]
fn compute_does_not_mutate_histories() {
    let mut store = HistoryStore::default();
    store.update_at(&batch(&[("bitcoin", 1.0)]), at_minute(0));
    store.update_at(&batch(&[("bitcoin", 2.0)]), at_minute(1));
    let before = store.clone();

    let first = compute(&store);
    let second = compute(&store);

    assert_eq!(store, before);
    assert_eq!(first, second);
}

// =============================================================================
// Confidence
// =============================================================================

#[test]
fn confidence_is_exactly_half_at_five_percent() {
    assert_eq!(confidence(5.0), 0.5);
}

#[test]
fn confidence_is_strictly_increasing_and_bounded() {
    let gains = [-20.0, -5.0, 0.0, 2.5, 4.9, 5.0, 5.1, 7.5, 12.0, 20.0];
    for pair in gains.windows(2) {
        let (low, high) = (confidence(pair[0]), confidence(pair[1]));
        assert!(low < high, "confidence({}) must be < confidence({})", pair[0], pair[1]);
        assert!(low > 0.0 && high < 1.0);
    }
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn three_assets_below_threshold_are_all_displayed() {
    // Given: three assets each projecting under 5%
    let mut store = HistoryStore::default();
    store.update_at(
        &batch(&[("bitcoin", 100.0), ("litecoin", 100.0), ("polkadot", 100.0)]),
        at_minute(0),
    );
    store.update_at(
        &batch(&[("bitcoin", 100.1), ("litecoin", 100.2), ("polkadot", 99.9)]),
        at_minute(1),
    );
    let projections = compute(&store);
    assert!(projections.iter().all(|p| p.projected_gain_pct < 5.0));

    // When: The default policy ranks them
    let ranked = rank(projections, RankingPolicy::ThresholdWithFallback, 5);

    // Then: All three are shown, ordered by projected gain
    let ids: Vec<_> = ranked.iter().map(|p| p.asset.as_str()).collect();
    assert_eq!(ids, vec!["litecoin", "bitcoin", "polkadot"]);
}

#[test]
fn display_count_is_capped_at_limit() {
    let ids = [
        "bitcoin", "ethereum", "binancecoin", "ripple", "cardano", "solana", "dogecoin",
    ];
    let mut store = HistoryStore::default();
    let first: Vec<_> = ids.iter().map(|id| (*id, 10.0)).collect();
    let second: Vec<_> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, 10.0 + i as f64 * 0.01))
        .collect();
    store.update_at(&batch(&first), at_minute(0));
    store.update_at(&batch(&second), at_minute(1));

    for policy in [RankingPolicy::ThresholdWithFallback, RankingPolicy::ConfidenceOnly] {
        assert_eq!(rank(compute(&store), policy, 5).len(), 5);
    }
}
