//! Explain command - per-passenger score breakdown

use anyhow::{bail, Result};
use console::style;
use std::path::Path;

use super::analyze::load_session;
use crate::models::ScoreMethod;
use crate::scoring;
use crate::selection::Contamination;

/// Run the explain command
pub fn run(data: &Path, id: u32, contamination: Contamination) -> Result<()> {
    let session = load_session(data, contamination)?;
    let Some(entry) = session.find(id) else {
        bail!("No passenger with PassengerId {} in {}", id, data.display());
    };

    let passenger = &entry.record.passenger;
    println!("\n{}", scoring::explain(entry.record));
    println!(
        "{} {}  Class: {}  Sex: {}",
        style("Title:").bold(),
        entry.record.derived.title, passenger.pclass, passenger.sex
    );

    for method in ScoreMethod::all() {
        let verdict = if entry.is_anomaly(*method) {
            style("anomaly").red().bold().to_string()
        } else {
            style("normal").green().to_string()
        };
        println!(
            "{} at {}: {}",
            method.label(),
            session.contamination(),
            verdict
        );
    }
    Ok(())
}
