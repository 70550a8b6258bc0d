//! Heuristic anomaly scoring
//!
//! Each passenger gets two independent scores built from fixed-weight
//! deviations of its own fields. Nothing here looks at the rest of the
//! population: despite the names, these are rule-based stand-ins for an
//! isolation forest and a local outlier factor, not the real algorithms.
//!
//! # Scoring Formula
//!
//! ```text
//! fare_dev              = |fare - 33| / 50        (0 when fare unknown)
//! age_dev               = |age - 30| / 30         (0 when age unknown)
//! high_fare_first_class = 1 if class 1 and fare > 200
//! large_family          = 1 if family size > 5
//!
//! isolation     = 0.4 × fare_dev + 0.3 × age_dev + 0.2 × high_fare_first_class + 0.1 × large_family
//! local_outlier = 0.5 × fare_dev + 0.2 × age_dev + 0.3 × large_family
//! ```
//!
//! Scores are non-negative and unbounded; no clamping is applied.
//!
//! "Unknown" means the field is absent. A recorded fare or age of 0 is a
//! value like any other: a zero fare gives `fare_dev = 0.66` and a newborn
//! gives `age_dev = 1`. Scorers that test these fields for truthiness
//! treat a zero as missing; this one deliberately does not, so the roughly
//! fifteen zero-fare passengers of the full manifest rank higher here than
//! in such a scorer.
//!
//! # Example
//!
//! A 30 year old first-class passenger travelling alone on a 500 fare:
//! - fare_dev = 467 / 50 = 9.34
//! - isolation = 0.4 × 9.34 + 0.2 = 3.936

mod heuristic;

pub use heuristic::{explain, score, score_all, ScoreComponents};
