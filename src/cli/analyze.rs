//! Analyze command - score, flag, and compare

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tracing::info;

use crate::dataset;
use crate::models::ScoreMethod;
use crate::pipeline::AnomalySession;
use crate::reporters::{self, AnalysisReport};
use crate::selection::Contamination;

/// Run the analyze command
pub fn run(
    data: &Path,
    contamination: Contamination,
    methods: &[ScoreMethod],
    format: &str,
    output_path: Option<&Path>,
) -> Result<()> {
    let session = load_session(data, contamination)?;

    let summaries = methods.iter().map(|m| session.summarize(*m)).collect();
    let report = AnalysisReport::new(
        data.display().to_string(),
        contamination.percent(),
        summaries,
    );
    let output = reporters::report(&report, format)?;

    match output_path {
        Some(out_path) => {
            std::fs::write(out_path, &output)
                .with_context(|| format!("Failed to write report to {}", out_path.display()))?;
            // stderr keeps stdout clean for machine-readable formats
            eprintln!(
                "Report written to: {}",
                style(out_path.display()).cyan()
            );
        }
        None => println!("{}", output),
    }
    Ok(())
}

/// Load a manifest and build a session, with CLI-facing error context
pub(super) fn load_session(data: &Path, contamination: Contamination) -> Result<AnomalySession> {
    let passengers = dataset::load_csv(data)
        .with_context(|| format!("Failed to load passengers from {}", data.display()))?;
    info!(
        "Scoring {} passengers at {} contamination",
        passengers.len(),
        contamination
    );
    Ok(AnomalySession::new(passengers, contamination))
}
