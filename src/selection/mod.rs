//! Top-fraction anomaly selection
//!
//! Given a contamination fraction, ranks passengers by one score and flags
//! the first `ceil(fraction × n)` of them. Ranking is a stable descending
//! sort, so passengers with equal scores keep their load order and the
//! result is reproducible. Each method is selected independently.
//!
//! Policy for out-of-range fractions at this level: `<= 0` (or NaN) flags
//! nobody, and so does a vanishing fraction (`<= 1e-10`); `>= 1` flags
//! everybody. Range checking of user input happens in
//! [`Contamination`].

use crate::error::{VoyageError, VoyageResult};
use crate::models::{ScoreMethod, ScoredPassenger};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// `fraction × n` within this many machine epsilons (relative) of an
/// integer is that integer: 0.07 × 100 evaluates to 7.000000000000001 and
/// must flag 7, not 8. Products genuinely above an integer still round up.
const INTEGER_SNAP_EPSILONS: f64 = 4.0;

/// Fractions at or below this are treated as zero contamination and flag
/// nobody, whatever the population size.
const VANISHING_FRACTION: f64 = 1e-10;

/// Target share of the population to flag, held as a percentage in (0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Contamination {
    percent: f64,
}

impl Contamination {
    pub const DEFAULT_PERCENT: f64 = 5.0;

    /// Validate a percentage. Values outside (0, 100] are rejected, not clamped.
    pub fn from_percent(percent: f64) -> VoyageResult<Self> {
        if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
            return Err(VoyageError::invalid(
                "contamination",
                format!("must be a percentage in (0, 100], got {percent}"),
            ));
        }
        Ok(Self { percent })
    }

    /// Validate a fraction in (0, 1]
    pub fn from_fraction(fraction: f64) -> VoyageResult<Self> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(VoyageError::invalid(
                "contamination",
                format!("must be a fraction in (0, 1], got {fraction}"),
            ));
        }
        Ok(Self {
            percent: fraction * 100.0,
        })
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn fraction(&self) -> f64 {
        self.percent / 100.0
    }

    /// Number of passengers flagged out of `total`
    pub fn anomaly_count(&self, total: usize) -> usize {
        anomaly_count(total, self.fraction())
    }
}

impl Default for Contamination {
    fn default() -> Self {
        Self {
            percent: Self::DEFAULT_PERCENT,
        }
    }
}

impl std::fmt::Display for Contamination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent)
    }
}

/// `ceil(fraction × total)`, clamped to `[0, total]`
pub fn anomaly_count(total: usize, fraction: f64) -> usize {
    if total == 0 || fraction.is_nan() || fraction <= VANISHING_FRACTION {
        return 0;
    }
    if fraction >= 1.0 {
        return total;
    }

    let raw = fraction * total as f64;
    let nearest = raw.round();
    let k = if (raw - nearest).abs() <= f64::EPSILON * INTEGER_SNAP_EPSILONS * raw {
        nearest
    } else {
        raw.ceil()
    };
    (k as usize).min(total)
}

/// Indices of `scores` ordered by descending score; ties keep input order
pub fn rank(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// Flag the top `fraction` of `scores`; the result is index-aligned with the input
pub fn flag_top(scores: &[f64], fraction: f64) -> Vec<bool> {
    let k = anomaly_count(scores.len(), fraction);
    let mut flags = vec![false; scores.len()];
    for idx in rank(scores).into_iter().take(k) {
        flags[idx] = true;
    }
    flags
}

/// Identifiers of the passengers flagged under `method` at `fraction`
pub fn select(records: &[ScoredPassenger], method: ScoreMethod, fraction: f64) -> HashSet<u32> {
    let scores = method_scores(records, method);
    let k = anomaly_count(records.len(), fraction);
    rank(&scores)
        .into_iter()
        .take(k)
        .map(|idx| records[idx].passenger.id)
        .collect()
}

fn method_scores(records: &[ScoredPassenger], method: ScoreMethod) -> Vec<f64> {
    records.iter().map(|r| r.scores.get(method)).collect()
}

/// Anomaly flags for both methods, computed together for one contamination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagSet {
    contamination: Contamination,
    isolation: Vec<bool>,
    local_outlier: Vec<bool>,
}

impl FlagSet {
    /// Recompute both flag vectors over the full record set
    pub fn compute(records: &[ScoredPassenger], contamination: Contamination) -> Self {
        let fraction = contamination.fraction();
        let isolation = flag_top(&method_scores(records, ScoreMethod::Isolation), fraction);
        let local_outlier = flag_top(&method_scores(records, ScoreMethod::LocalOutlier), fraction);

        info!(
            "Flagged {} of {} passengers per method at {} contamination",
            contamination.anomaly_count(records.len()),
            records.len(),
            contamination
        );

        Self {
            contamination,
            isolation,
            local_outlier,
        }
    }

    pub fn contamination(&self) -> Contamination {
        self.contamination
    }

    /// Flags for one method, index-aligned with the record set
    pub fn get(&self, method: ScoreMethod) -> &[bool] {
        match method {
            ScoreMethod::Isolation => &self.isolation,
            ScoreMethod::LocalOutlier => &self.local_outlier,
        }
    }

    pub fn flagged_count(&self, method: ScoreMethod) -> usize {
        self.get(method).iter().filter(|f| **f).count()
    }
}
