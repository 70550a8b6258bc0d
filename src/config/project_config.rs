//! Project-level configuration support
//!
//! Loads configuration from `anomaly-voyage.toml` or `.anomaly-voyagerc.json`
//! in the working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # anomaly-voyage.toml
//!
//! [detection]
//! contamination = 5.0   # percent of passengers to flag, (0, 100]
//! method = "isolation"  # isolation (scoreA) or lof (scoreB); omit for both
//!
//! [defaults]
//! format = "text"       # text, json, markdown
//! top = 10              # rows shown by `scores`
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::VoyageResult;
use crate::models::ScoreMethod;
use crate::selection::Contamination;

pub const TOML_CONFIG_FILE: &str = "anomaly-voyage.toml";
pub const JSON_CONFIG_FILE: &str = ".anomaly-voyagerc.json";

/// Commented example written by `anomaly-voyage init`
pub const EXAMPLE_CONFIG: &str = r#"# anomaly-voyage configuration

[detection]
# Percentage of passengers flagged as anomalous under each method, (0, 100]
contamination = 5.0

# Report a single method: "isolation" (scoreA) or "lof" (scoreB).
# Leave unset to report both.
# method = "isolation"

[defaults]
# Output format: text, json, markdown
format = "text"

# Rows shown by the `scores` command
top = 10
"#;

/// Project-level configuration loaded from anomaly-voyage.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Anomaly selection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Anomaly selection settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DetectionConfig {
    /// Contamination percentage (default: 5.0)
    #[serde(default)]
    pub contamination: Option<f64>,

    /// Method to report (default: both)
    #[serde(default)]
    pub method: Option<String>,
}

impl DetectionConfig {
    /// Configured contamination, validated; the built-in default when unset
    pub fn contamination(&self) -> VoyageResult<Contamination> {
        match self.contamination {
            Some(percent) => Contamination::from_percent(percent),
            None => Ok(Contamination::default()),
        }
    }

    /// Configured method, validated; `None` means report both
    pub fn method(&self) -> VoyageResult<Option<ScoreMethod>> {
        self.method.as_deref().map(str::parse::<ScoreMethod>).transpose()
    }
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of rows for `scores`
    #[serde(default)]
    pub top: Option<usize>,
}

/// Load project configuration from a directory.
///
/// Searches for configuration files in this order:
/// 1. `anomaly-voyage.toml`
/// 2. `.anomaly-voyagerc.json`
///
/// Returns default configuration if no config file is found or the one
/// found cannot be parsed.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let toml_path = dir.join(TOML_CONFIG_FILE);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_FILE);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoyageError;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.detection.contamination().unwrap().percent(), 5.0);
        assert_eq!(config.detection.method().unwrap(), None);
        assert!(config.defaults.format.is_none());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
[detection]
contamination = 12.5
method = "lof"

[defaults]
format = "json"
top = 25
"#;
        let config: ProjectConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.detection.contamination().unwrap().percent(), 12.5);
        assert_eq!(
            config.detection.method().unwrap(),
            Some(ScoreMethod::LocalOutlier)
        );
        assert_eq!(config.defaults.format.as_deref(), Some("json"));
        assert_eq!(config.defaults.top, Some(25));
    }

    #[test]
    fn test_example_config_parses() {
        let config: ProjectConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.detection.contamination, Some(5.0));
        assert_eq!(config.defaults.top, Some(10));
    }

    #[test]
    fn test_invalid_values_surface_on_access() {
        let config: ProjectConfig =
            toml::from_str("[detection]\ncontamination = 0\nmethod = \"svm\"\n").unwrap();
        assert!(matches!(
            config.detection.contamination(),
            Err(VoyageError::InvalidParameter { .. })
        ));
        assert!(matches!(
            config.detection.method(),
            Err(VoyageError::InvalidParameter { name: "method", .. })
        ));
    }

    #[test]
    fn test_load_prefers_toml_then_json() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_project_config(dir.path()).detection.contamination.is_none());

        std::fs::write(
            dir.path().join(JSON_CONFIG_FILE),
            r#"{"detection": {"contamination": 8}}"#,
        )
        .unwrap();
        assert_eq!(
            load_project_config(dir.path()).detection.contamination,
            Some(8.0)
        );

        std::fs::write(
            dir.path().join(TOML_CONFIG_FILE),
            "[detection]\ncontamination = 3.0\n",
        )
        .unwrap();
        assert_eq!(
            load_project_config(dir.path()).detection.contamination,
            Some(3.0)
        );
    }

    #[test]
    fn test_broken_toml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOML_CONFIG_FILE), "[detection\n").unwrap();
        let config = load_project_config(dir.path());
        assert!(config.detection.contamination.is_none());
    }
}
