//! Ranked score table for the `scores` command

use crate::models::ScoreMethod;
use crate::pipeline::AnomalySession;
use anyhow::Result;
use console::style;
use serde::Serialize;

/// One passenger row of the score table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub rank: usize,
    pub id: u32,
    pub name: Option<String>,
    pub pclass: u8,
    pub age: Option<f64>,
    pub fare: Option<f64>,
    pub isolation: f64,
    pub local_outlier: f64,
    pub is_anomaly_isolation: bool,
    pub is_anomaly_lof: bool,
}

/// Passengers ranked by one method's score
#[derive(Debug, Clone, Serialize)]
pub struct ScoreTable {
    pub method: ScoreMethod,
    pub contamination_percent: f64,
    pub total: usize,
    pub rows: Vec<ScoreRow>,
}

impl ScoreTable {
    /// Top `top` passengers by `method`. With `anomalies_only`, rows not
    /// flagged under `method` are dropped before the cut.
    pub fn build(session: &AnomalySession, method: ScoreMethod, top: usize, anomalies_only: bool) -> Self {
        let rows = session
            .ranked(method)
            .into_iter()
            .enumerate()
            .filter(|(_, a)| !anomalies_only || a.is_anomaly(method))
            .take(top)
            .map(|(i, a)| {
                let p = &a.record.passenger;
                ScoreRow {
                    rank: i + 1,
                    id: p.id,
                    name: p.name.clone(),
                    pclass: p.pclass,
                    age: p.age,
                    fare: p.fare,
                    isolation: a.record.scores.isolation,
                    local_outlier: a.record.scores.local_outlier,
                    is_anomaly_isolation: a.is_anomaly_isolation,
                    is_anomaly_lof: a.is_anomaly_lof,
                }
            })
            .collect();

        Self {
            method,
            contamination_percent: session.contamination().percent(),
            total: session.len(),
            rows,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "\n{} ranked by {} (contamination {}%, {} passengers)\n\n",
            style("Passengers").bold(),
            style(self.method.label()).cyan(),
            self.contamination_percent,
            self.total
        );

        if self.rows.is_empty() {
            out.push_str(&format!("  {}\n", style("No passengers to show.").dim()));
            return out;
        }

        out.push_str(&format!(
            "{}\n",
            style(format!(
                "  {:>4}  {:>5}  {:<32} {:>3} {:>6} {:>9}  {:>9} {:>9}  {}",
                "#", "ID", "NAME", "CLS", "AGE", "FARE", "ISOLATION", "LOF", "FLAGS"
            ))
            .dim()
        ));
        for row in &self.rows {
            let name = truncate(row.name.as_deref().unwrap_or("-"), 32);
            let flags = match (row.is_anomaly_isolation, row.is_anomaly_lof) {
                (true, true) => style("iso+lof").red().to_string(),
                (true, false) => style("iso").yellow().to_string(),
                (false, true) => style("lof").yellow().to_string(),
                (false, false) => String::new(),
            };
            out.push_str(&format!(
                "  {:>4}  {:>5}  {:<32} {:>3} {:>6} {:>9}  {:>9.4} {:>9.4}  {}\n",
                row.rank,
                row.id,
                name,
                row.pclass,
                optional(row.age, 1),
                optional(row.fare, 2),
                row.isolation,
                row.local_outlier,
                flags
            ));
        }
        out
    }
}

fn optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

/// Truncate on char boundaries
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}
