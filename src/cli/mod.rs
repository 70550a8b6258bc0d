//! CLI command definitions and handlers

mod analyze;
mod explain;
mod init;
mod scores;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{load_project_config, ProjectConfig};
use crate::models::ScoreMethod;
use crate::selection::Contamination;

/// Rows shown by `scores` when neither the flag nor the config sets one
const DEFAULT_TOP: usize = 10;

/// Parse a contamination percentage, (0, 100]
fn parse_contamination(s: &str) -> Result<f64, String> {
    let pct: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    Contamination::from_percent(pct)
        .map(|c| c.percent())
        .map_err(|e| e.to_string())
}

/// Parse a scoring method name
fn parse_method(s: &str) -> Result<ScoreMethod, String> {
    s.parse::<ScoreMethod>().map_err(|e| e.to_string())
}

/// anomaly-voyage - flag unusual passengers and compare them with the rest
#[derive(Parser, Debug)]
#[command(name = "anomaly-voyage")]
#[command(
    version,
    about = "Rule-based anomaly scoring and comparative statistics for passenger manifests",
    after_help = "\
Examples:
  anomaly-voyage analyze titanic.csv                      Compare anomalies at 5% contamination
  anomaly-voyage analyze titanic.csv --contamination 10   Flag the top 10% instead
  anomaly-voyage analyze titanic.csv -f json -o out.json  JSON report written to a file
  anomaly-voyage scores titanic.csv --method lof --top 20 Highest local outlier scores
  anomaly-voyage explain titanic.csv --id 680             Score breakdown for one passenger"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score passengers and compare anomalies with normal passengers
    Analyze {
        /// Passenger manifest (CSV with a header row)
        data: PathBuf,

        /// Percentage of passengers to flag per method, (0, 100]
        #[arg(long, short = 'c', env = "ANOMALY_VOYAGE_CONTAMINATION", value_parser = parse_contamination)]
        contamination: Option<f64>,

        /// Report only one method: isolation (scoreA) or lof (scoreB)
        #[arg(long, short = 'm', value_parser = parse_method)]
        method: Option<ScoreMethod>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List passengers ranked by anomaly score
    Scores {
        /// Passenger manifest (CSV with a header row)
        data: PathBuf,

        /// Percentage of passengers to flag per method, (0, 100]
        #[arg(long, short = 'c', env = "ANOMALY_VOYAGE_CONTAMINATION", value_parser = parse_contamination)]
        contamination: Option<f64>,

        /// Method to rank by (default: isolation)
        #[arg(long, short = 'm', value_parser = parse_method)]
        method: Option<ScoreMethod>,

        /// Maximum rows to show
        #[arg(long, short = 'n')]
        top: Option<usize>,

        /// Only list passengers flagged under the ranking method
        #[arg(long)]
        anomalies_only: bool,

        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,
    },

    /// Show how one passenger's scores are built up
    Explain {
        /// Passenger manifest (CSV with a header row)
        data: PathBuf,

        /// PassengerId to explain
        #[arg(long)]
        id: u32,

        /// Percentage of passengers to flag per method, (0, 100]
        #[arg(long, short = 'c', env = "ANOMALY_VOYAGE_CONTAMINATION", value_parser = parse_contamination)]
        contamination: Option<f64>,
    },

    /// Write an example anomaly-voyage.toml
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Show version info
    Version,
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            data,
            contamination,
            method,
            format,
            output,
        } => {
            let config = working_dir_config()?;
            let contamination = resolve_contamination(contamination, &config)?;
            let methods = match method {
                Some(m) => vec![m],
                None => resolve_methods(&config)?,
            };
            let format = format
                .or_else(|| config.defaults.format.clone())
                .unwrap_or_else(|| "text".to_string());
            analyze::run(&data, contamination, &methods, &format, output.as_deref())
        }

        Commands::Scores {
            data,
            contamination,
            method,
            top,
            anomalies_only,
            format,
        } => {
            let config = working_dir_config()?;
            let contamination = resolve_contamination(contamination, &config)?;
            let method = match method {
                Some(m) => m,
                None => resolve_methods(&config)?
                    .first()
                    .copied()
                    .unwrap_or(ScoreMethod::Isolation),
            };
            let top = top.or(config.defaults.top).unwrap_or(DEFAULT_TOP);
            // markdown has no table form here; anything but json prints text
            let json = format
                .or_else(|| config.defaults.format.clone())
                .is_some_and(|f| f.eq_ignore_ascii_case("json"));
            scores::run(&data, contamination, method, top, anomalies_only, json)
        }

        Commands::Explain {
            data,
            id,
            contamination,
        } => {
            let config = working_dir_config()?;
            let contamination = resolve_contamination(contamination, &config)?;
            explain::run(&data, id, contamination)
        }

        Commands::Init { dir } => init::run(&dir),

        Commands::Version => {
            println!("anomaly-voyage {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn working_dir_config() -> Result<ProjectConfig> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    Ok(load_project_config(&cwd))
}

/// Flag (or env) first, then config, then the built-in default
fn resolve_contamination(flag: Option<f64>, config: &ProjectConfig) -> Result<Contamination> {
    match flag {
        Some(pct) => Ok(Contamination::from_percent(pct)?),
        None => config
            .detection
            .contamination()
            .context("Invalid [detection] contamination in project config"),
    }
}

/// Methods to report when no `--method` is given: the configured one, or both
fn resolve_methods(config: &ProjectConfig) -> Result<Vec<ScoreMethod>> {
    let configured = config
        .detection
        .method()
        .context("Invalid [detection] method in project config")?;
    Ok(match configured {
        Some(m) => vec![m],
        None => ScoreMethod::all().to_vec(),
    })
}
