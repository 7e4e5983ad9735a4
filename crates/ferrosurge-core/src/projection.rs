//! Momentum projection engine.
//!
//! For every asset with at least two samples the engine measures trailing
//! returns over 1, 5 and 15 minute windows, extrapolates each one linearly
//! to a 30 minute horizon, blends them with fixed weights and maps the
//! projected gain to a logistic confidence centred on the 5% surge
//! threshold:
//!
//! ```text
//! projected_change   = 0.5 * r1 * 30 + 0.3 * r5 * 6 + 0.2 * r15 * 2
//! projected_gain_pct = projected_change * 100
//! confidence         = 1 / (1 + e^-(projected_gain_pct - 5))
//! ```
//!
//! The engine is a pure function of the history it is given.

use serde::Serialize;

use crate::history::{History, HistoryStore};
use crate::AssetId;

pub const PROJECTION_HORIZON_MINUTES: u32 = 30;

/// Projected gain (percent) at which confidence is exactly 0.5.
pub const SURGE_THRESHOLD_PCT: f64 = 5.0;

/// Trailing window and its blend weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumWindow {
    pub minutes: u32,
    pub weight: f64,
}

/// Weights sum to 1.0.
pub const MOMENTUM_WINDOWS: [MomentumWindow; 3] = [
    MomentumWindow {
        minutes: 1,
        weight: 0.5,
    },
    MomentumWindow {
        minutes: 5,
        weight: 0.3,
    },
    MomentumWindow {
        minutes: 15,
        weight: 0.2,
    },
];

/// Fractional trailing returns (0.05 == +5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowReturns {
    pub one_minute: f64,
    pub five_minutes: f64,
    pub fifteen_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub asset: AssetId,
    pub current_price: f64,
    pub projected_gain_pct: f64,
    pub confidence: f64,
    pub returns: WindowReturns,
}

impl Projection {
    pub fn is_surge(&self) -> bool {
        self.projected_gain_pct >= SURGE_THRESHOLD_PCT
    }
}

/// Project every asset with enough history; others are omitted.
pub fn compute(histories: &HistoryStore) -> Vec<Projection> {
    histories
        .iter()
        .filter_map(|(asset, history)| project_history(asset, history))
        .collect()
}

/// Returns `None` for histories with fewer than two samples.
pub fn project_history(asset: &AssetId, history: &History) -> Option<Projection> {
    if history.len() < 2 {
        return None;
    }
    let current_price = history.latest()?.price;

    let [one_minute, five_minutes, fifteen_minutes] =
        MOMENTUM_WINDOWS.map(|window| window_return(history, window.minutes));
    let returns = WindowReturns {
        one_minute,
        five_minutes,
        fifteen_minutes,
    };

    let projected_gain_pct = projected_change(&returns) * 100.0;

    Some(Projection {
        asset: asset.clone(),
        current_price,
        projected_gain_pct,
        confidence: confidence(projected_gain_pct),
        returns,
    })
}

/// Return from the first sample at or before `latest.time - minutes` to the
/// latest price.
///
/// The scan runs oldest to newest and the first match wins. No qualifying
/// sample, or a non-positive old price, yields exactly 0.0.
pub fn window_return(history: &History, minutes: u32) -> f64 {
    let Some(latest) = history.latest() else {
        return 0.0;
    };
    let Some(cutoff) = latest.time.checked_sub_minutes(minutes) else {
        return 0.0;
    };
    let Some(old) = history.iter().find(|sample| sample.time <= cutoff) else {
        return 0.0;
    };

    if old.price > 0.0 {
        (latest.price - old.price) / old.price
    } else {
        0.0
    }
}

/// Weighted blend of window returns, each scaled to the 30 minute horizon.
pub fn projected_change(returns: &WindowReturns) -> f64 {
    let horizon = f64::from(PROJECTION_HORIZON_MINUTES);
    let values = [
        returns.one_minute,
        returns.five_minutes,
        returns.fifteen_minutes,
    ];

    MOMENTUM_WINDOWS
        .iter()
        .zip(values)
        .map(|(window, value)| window.weight * value * (horizon / f64::from(window.minutes)))
        .sum()
}

/// Logistic confidence; exactly 0.5 at the surge threshold.
pub fn confidence(projected_gain_pct: f64) -> f64 {
    1.0 / (1.0 + (-(projected_gain_pct - SURGE_THRESHOLD_PCT)).exp())
}
