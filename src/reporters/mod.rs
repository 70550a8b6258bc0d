//! Output reporters for anomaly-voyage results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown

mod json;
mod markdown;
mod scores;
mod text;

pub use scores::{ScoreRow, ScoreTable};

use crate::stats::Statistics;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Everything an `analyze` run reports
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// RFC 3339 timestamp
    pub generated_at: String,
    /// Where the passengers were loaded from
    pub source: String,
    pub total_passengers: usize,
    pub contamination_percent: f64,
    pub summaries: Vec<Statistics>,
}

impl AnalysisReport {
    pub fn new(source: impl Into<String>, contamination_percent: f64, summaries: Vec<Statistics>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: source.into(),
            total_passengers: summaries.first().map(|s| s.total).unwrap_or(0),
            contamination_percent,
            summaries,
        }
    }
}

/// Render a report in the specified format
pub fn report(report: &AnalysisReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// Plain-language comparison of the anomalous and normal groups
pub fn insights(stats: &Statistics) -> Vec<String> {
    let delta = stats.survival_delta();
    let direction = if delta > 0.0 { "increases" } else { "decreases" };

    vec![
        format!(
            "Age: anomalies average {:.1} years vs {:.1} for normal passengers",
            stats.avg_age.anomalies, stats.avg_age.normal
        ),
        format!(
            "Fare: anomalies paid {:.2} on average vs {:.2} for normal passengers",
            stats.avg_fare.anomalies, stats.avg_fare.normal
        ),
        format!(
            "Family size: anomalies have {:.1} family members vs {:.1} for normal passengers",
            stats.avg_family_size.anomalies, stats.avg_family_size.normal
        ),
        format!(
            "Survival impact: being classified as an anomaly {} survival probability by {:.1}%",
            direction,
            delta.abs()
        ),
    ]
}
