//! Scores command - ranked passenger table

use anyhow::Result;
use std::path::Path;

use super::analyze::load_session;
use crate::models::ScoreMethod;
use crate::reporters::ScoreTable;
use crate::selection::Contamination;

/// Run the scores command
pub fn run(
    data: &Path,
    contamination: Contamination,
    method: ScoreMethod,
    top: usize,
    anomalies_only: bool,
    json: bool,
) -> Result<()> {
    let session = load_session(data, contamination)?;
    let table = ScoreTable::build(&session, method, top, anomalies_only);

    if json {
        println!("{}", table.to_json()?);
    } else {
        print!("{}", table.to_text());
    }
    Ok(())
}
