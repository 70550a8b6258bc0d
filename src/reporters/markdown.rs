//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - README files
//! - Notebooks and wikis
//! - Pull request comments

use super::{insights, AnalysisReport};
use crate::stats::{CategoricalField, Statistics};
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    if report.summaries.is_empty() || report.total_passengers == 0 {
        md.push_str("No passengers loaded, nothing to compare.\n");
        md.push('\n');
        md.push_str(&render_footer());
        return Ok(md);
    }

    for stats in &report.summaries {
        md.push_str(&render_method(stats));
        md.push('\n');
    }

    md.push_str(&render_footer());
    Ok(md)
}

fn render_header(report: &AnalysisReport) -> String {
    format!(
        r#"# Passenger Anomaly Report

| Metric | Value |
|--------|-------|
| **Source** | `{}` |
| **Passengers** | {} |
| **Contamination** | {}% |

Generated: {}
"#,
        report.source, report.total_passengers, report.contamination_percent, report.generated_at
    )
}

fn render_method(stats: &Statistics) -> String {
    let mut md = format!(
        "## {}\n\n**{}** anomalies ({:.1}% of {} passengers)\n\n",
        stats.method.label(),
        stats.count,
        stats.percentage,
        stats.total
    );

    md.push_str(&format!(
        r#"| Measure | Anomalies | Normal |
|---------|-----------|--------|
| Avg age | {:.1} | {:.1} |
| Avg fare | {:.2} | {:.2} |
| Avg family size | {:.2} | {:.2} |
| Survival rate | {:.1}% | {:.1}% |
"#,
        stats.avg_age.anomalies,
        stats.avg_age.normal,
        stats.avg_fare.anomalies,
        stats.avg_fare.normal,
        stats.avg_family_size.anomalies,
        stats.avg_family_size.normal,
        stats.survival_rate.anomalies,
        stats.survival_rate.normal,
    ));

    for field in CategoricalField::all() {
        let rows = stats.distribution_rows(*field);
        if rows.is_empty() {
            continue;
        }
        md.push_str(&format!(
            "\n### {}\n\n| {} | Anomalies | Normal |\n|---|---|---|\n",
            field.name(),
            field.name()
        ));
        for row in rows {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&row.value),
                row.anomalies,
                row.normal
            ));
        }
    }

    md.push_str("\n### Insights\n\n");
    for line in insights(stats) {
        md.push_str(&format!("- {}\n", line));
    }
    md
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn render_footer() -> String {
    format!(
        "---\n\n*Generated by anomaly-voyage v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}
