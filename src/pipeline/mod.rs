//! Anomaly detection session
//!
//! Orchestrates the full pipeline over a caller-owned passenger set:
//! 1. Derive features (title, family size, ...)
//! 2. Score every passenger under both methods
//! 3. Flag the top contamination fraction per method
//! 4. Summarize either method on demand
//!
//! Records and scores are fixed once the session is built. Only the
//! flags change, and only through [`AnomalySession::set_contamination`],
//! which replaces both methods' flags in a single assignment.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::{VoyageError, VoyageResult};
use crate::models::{Passenger, RawPassenger, ScoreMethod, ScoredPassenger};
use crate::scoring;
use crate::selection::{self, Contamination, FlagSet};
use crate::stats::{self, Statistics};

/// Passengers with their scores and the flags for the current contamination.
#[derive(Debug, Clone)]
pub struct AnomalySession {
    records: Vec<ScoredPassenger>,
    flags: FlagSet,
}

impl AnomalySession {
    /// Score the passengers and flag them at `contamination`.
    pub fn new(passengers: Vec<Passenger>, contamination: Contamination) -> Self {
        let records = scoring::score_all(passengers);
        let flags = FlagSet::compute(&records, contamination);
        info!("Session ready with {} passengers", records.len());
        Self { records, flags }
    }

    /// Validate raw records first; fails on a missing required field or a
    /// repeated identifier.
    pub fn from_raw(raw: Vec<RawPassenger>, contamination: Contamination) -> VoyageResult<Self> {
        let passengers = raw
            .into_iter()
            .map(Passenger::try_from)
            .collect::<VoyageResult<Vec<_>>>()?;
        ensure_unique_ids(&passengers)?;
        Ok(Self::new(passengers, contamination))
    }

    /// Re-flag both methods at a new contamination. Scores are reused.
    pub fn set_contamination(&mut self, contamination: Contamination) {
        debug!(
            "Contamination {} -> {}",
            self.flags.contamination(),
            contamination
        );
        self.flags = FlagSet::compute(&self.records, contamination);
    }

    /// Same as [`set_contamination`](Self::set_contamination), from a
    /// percentage in (0, 100].
    pub fn set_contamination_percent(&mut self, percent: f64) -> VoyageResult<()> {
        let contamination = Contamination::from_percent(percent)?;
        self.set_contamination(contamination);
        Ok(())
    }

    pub fn contamination(&self) -> Contamination {
        self.flags.contamination()
    }

    pub fn records(&self) -> &[ScoredPassenger] {
        &self.records
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Comparison statistics for one method under the current flags
    pub fn summarize(&self, method: ScoreMethod) -> Statistics {
        stats::compare(&self.records, self.flags.get(method), method)
    }

    /// Identifiers currently flagged under `method`
    pub fn flagged_ids(&self, method: ScoreMethod) -> HashSet<u32> {
        selection::select(&self.records, method, self.contamination().fraction())
    }

    /// Every passenger with both flags attached, in load order
    pub fn annotated(&self) -> Vec<AnnotatedPassenger<'_>> {
        (0..self.records.len()).map(|idx| self.annotate(idx)).collect()
    }

    /// Passengers ordered by descending `method` score (ties in load order)
    pub fn ranked(&self, method: ScoreMethod) -> Vec<AnnotatedPassenger<'_>> {
        let scores: Vec<f64> = self.records.iter().map(|r| r.scores.get(method)).collect();
        selection::rank(&scores)
            .into_iter()
            .map(|idx| self.annotate(idx))
            .collect()
    }

    pub fn find(&self, id: u32) -> Option<AnnotatedPassenger<'_>> {
        self.records
            .iter()
            .position(|r| r.passenger.id == id)
            .map(|idx| self.annotate(idx))
    }

    fn annotate(&self, idx: usize) -> AnnotatedPassenger<'_> {
        AnnotatedPassenger {
            record: &self.records[idx],
            is_anomaly_isolation: self.flags.get(ScoreMethod::Isolation)[idx],
            is_anomaly_lof: self.flags.get(ScoreMethod::LocalOutlier)[idx],
        }
    }
}

/// A scored passenger plus its current anomaly flags
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnnotatedPassenger<'a> {
    #[serde(flatten)]
    pub record: &'a ScoredPassenger,
    pub is_anomaly_isolation: bool,
    pub is_anomaly_lof: bool,
}

impl AnnotatedPassenger<'_> {
    pub fn is_anomaly(&self, method: ScoreMethod) -> bool {
        match method {
            ScoreMethod::Isolation => self.is_anomaly_isolation,
            ScoreMethod::LocalOutlier => self.is_anomaly_lof,
        }
    }
}

/// Reject a passenger set in which an identifier appears twice
pub fn ensure_unique_ids(passengers: &[Passenger]) -> VoyageResult<()> {
    let mut seen = HashSet::with_capacity(passengers.len());
    for p in passengers {
        if !seen.insert(p.id) {
            return Err(VoyageError::malformed(
                format!("PassengerId={}", p.id),
                "duplicate PassengerId",
            ));
        }
    }
    Ok(())
}
