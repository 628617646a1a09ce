//! Analysis configuration loaded from TOML
//!
//! Every heuristic threshold used by the pipeline lives in one of the
//! sections below so it can be tuned without touching control flow. Missing
//! sections and keys fall back to their defaults.
//!
//! # Example TOML
//! ```toml
//! [resample]
//! resolution = 2000
//!
//! [degradation]
//! heavy_slope = 0.1
//!
//! [comparison]
//! min_speed_margin_kph = 2.5
//! ```

use crate::compare::ComparisonConfig;
use crate::degradation::DegradationConfig;
use crate::error::AnalysisError;
use crate::resample::ResampleConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Full pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub resample: ResampleConfig,
    pub degradation: DegradationConfig,
    pub comparison: ComparisonConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        self.resample
            .validate()
            .and_then(|()| self.degradation.validate())
            .and_then(|()| self.comparison.validate())
            .map_err(AnalysisError::InvalidConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [resample]
            resolution = 2000

            [degradation]
            heavy_slope = 0.1
        "#;

        let config = AnalysisConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.resample.resolution, 2000);
        assert_eq!(config.resample.gravity, 9.81);
        assert_eq!(config.degradation.heavy_slope, 0.1);
        assert_eq!(config.degradation.degraded_slope, 0.03);
        assert_eq!(config.comparison, ComparisonConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let toml = r#"
            [resample]
            resolution = 1
        "#;
        let err = AnalysisConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("resolution"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(AnalysisConfig::from_toml_str("[resample\nresolution = ").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[comparison]\nmax_insights = 5").unwrap();

        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.comparison.max_insights, 5);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AnalysisConfig::from_file("/nonexistent/apexline.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/apexline.toml"));
    }
}
