//! anomaly-voyage - rule-based anomaly scoring for passenger manifests
//!
//! Scores every passenger under two heuristic methods, flags the top
//! contamination fraction per method, and compares the flagged passengers
//! with everyone else.
//!
//! ```no_run
//! use anomaly_voyage::{dataset, models::ScoreMethod, pipeline::AnomalySession, selection::Contamination};
//!
//! let passengers = dataset::load_csv("titanic.csv".as_ref())?;
//! let mut session = AnomalySession::new(passengers, Contamination::default());
//! let stats = session.summarize(ScoreMethod::Isolation);
//! println!("{} anomalies", stats.count);
//!
//! session.set_contamination_percent(10.0)?;
//! # Ok::<(), anomaly_voyage::error::VoyageError>(())
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod selection;
pub mod stats;
