//! Configuration module for anomaly-voyage
//!
//! This module handles:
//! - Project-level configuration (anomaly-voyage.toml)
//! - Contamination and method defaults
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_project_config, CliDefaults, DetectionConfig, ProjectConfig, EXAMPLE_CONFIG,
    JSON_CONFIG_FILE, TOML_CONFIG_FILE,
};
