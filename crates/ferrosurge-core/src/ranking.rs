//! Ranking of projections for display.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::projection::Projection;

pub const DEFAULT_DISPLAY_LIMIT: usize = 5;

/// How projections are ordered and filtered before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Assets at or above the surge threshold, ordered by projected gain
    /// then confidence. When fewer than `limit` qualify, the overall top
    /// `limit` by the same order is shown instead.
    #[default]
    ThresholdWithFallback,
    /// Top `limit` by confidence, then projected gain, ignoring the threshold.
    ConfidenceOnly,
}

impl RankingPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThresholdWithFallback => "threshold_with_fallback",
            Self::ConfidenceOnly => "confidence_only",
        }
    }
}

impl Display for RankingPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank projections; returns `min(limit, projections.len())` entries.
///
/// Ties fall back to asset id so the order is deterministic.
pub fn rank(mut projections: Vec<Projection>, policy: RankingPolicy, limit: usize) -> Vec<Projection> {
    match policy {
        RankingPolicy::ThresholdWithFallback => {
            projections.sort_by(by_gain_then_confidence);
            let surging = projections.iter().filter(|p| p.is_surge()).count();
            if surging >= limit {
                projections.retain(Projection::is_surge);
            }
        }
        RankingPolicy::ConfidenceOnly => {
            projections.sort_by(by_confidence);
        }
    }

    projections.truncate(limit);
    projections
}

/// Number of projections at or above the surge threshold.
pub fn surging(projections: &[Projection]) -> usize {
    projections.iter().filter(|p| p.is_surge()).count()
}

fn by_gain_then_confidence(a: &Projection, b: &Projection) -> Ordering {
    b.projected_gain_pct
        .total_cmp(&a.projected_gain_pct)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.asset.cmp(&b.asset))
}

/// Confidence saturates at 1.0 for large gains, so equal confidence falls
/// back to projected gain before asset id.
fn by_confidence(a: &Projection, b: &Projection) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.projected_gain_pct.total_cmp(&a.projected_gain_pct))
        .then_with(|| a.asset.cmp(&b.asset))
}
