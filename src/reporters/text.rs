//! Text (terminal) reporter with colors and formatting

use super::{insights, AnalysisReport};
use crate::stats::{CategoricalField, Statistics};
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Distribution values shown per field before eliding
const MAX_DISTRIBUTION_ROWS: usize = 8;

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{BOLD}Anomaly Voyage Analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Source: {}  Passengers: {BOLD}{}{RESET}  Contamination: {BOLD}{}%{RESET}\n\n",
        report.source, report.total_passengers, report.contamination_percent
    ));

    if report.total_passengers == 0 {
        out.push_str(&format!("{DIM}No passengers loaded, nothing to compare.{RESET}\n"));
        return Ok(out);
    }

    for stats in &report.summaries {
        out.push_str(&render_summary(stats));
        out.push('\n');
    }

    Ok(out)
}

fn render_summary(stats: &Statistics) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{BOLD}{}{RESET}  {YELLOW}{} anomalies{RESET} ({:.1}% of {})\n",
        stats.method.label().to_uppercase(),
        stats.count,
        stats.percentage,
        stats.total
    ));

    out.push_str(&format!(
        "{DIM}  {:<16} {:>12} {:>12}{RESET}\n",
        "", "ANOMALIES", "NORMAL"
    ));
    for (label, anomalies, normal) in [
        ("Avg age", stats.avg_age.anomalies, stats.avg_age.normal),
        ("Avg fare", stats.avg_fare.anomalies, stats.avg_fare.normal),
        (
            "Avg family size",
            stats.avg_family_size.anomalies,
            stats.avg_family_size.normal,
        ),
    ] {
        out.push_str(&format!("  {:<16} {:>12.2} {:>12.2}\n", label, anomalies, normal));
    }
    out.push_str(&format!(
        "  {:<16} {:>11.1}% {:>11.1}%\n",
        "Survival rate", stats.survival_rate.anomalies, stats.survival_rate.normal
    ));

    for field in CategoricalField::all() {
        let rows = stats.distribution_rows(*field);
        if rows.is_empty() {
            continue;
        }
        out.push_str(&format!("\n  {BOLD}{}{RESET}\n", field.name()));
        for row in rows.iter().take(MAX_DISTRIBUTION_ROWS) {
            out.push_str(&format!(
                "  {:<16} {:>12} {:>12}\n",
                row.value, row.anomalies, row.normal
            ));
        }
        let remaining = rows.len().saturating_sub(MAX_DISTRIBUTION_ROWS);
        if remaining > 0 {
            out.push_str(&format!("  {DIM}...and {} more{RESET}\n", remaining));
        }
    }

    out.push_str(&format!("\n  {BOLD}Insights{RESET}\n"));
    let delta = stats.survival_delta();
    for (i, line) in insights(stats).into_iter().enumerate() {
        // last line is the survival impact
        let color = match (i, delta > 0.0) {
            (3, true) => GREEN,
            (3, false) => RED,
            _ => "",
        };
        out.push_str(&format!("  • {color}{line}{RESET}\n"));
    }
    out
}
