//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.launchdash.toml` files.

use crate::analysis::{PAYLOAD_BIN_COUNT, TREND_WINDOW_MONTHS};
use crate::models::ALL_SITES;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".launchdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Default filter selection.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Aggregation parameters.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "launch_dashboard.md".to_string()
}

/// Input data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the launch CSV.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/dash_dataset.csv")
}

/// Default filter selection. Payload bounds fall back to the dataset's range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Launch site, or `ALL`.
    #[serde(default = "default_site")]
    pub site: String,

    /// Lower payload bound in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_min: Option<f64>,

    /// Upper payload bound in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_max: Option<f64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            site: default_site(),
            payload_min: None,
            payload_max: None,
        }
    }
}

fn default_site() -> String {
    ALL_SITES.to_string()
}

/// Aggregation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Rolling window for the monthly trend, in months.
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Target number of payload quantile bins.
    #[serde(default = "default_payload_bins")]
    pub payload_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_window: default_trend_window(),
            payload_bins: default_payload_bins(),
        }
    }
}

fn default_trend_window() -> usize {
    TREND_WINDOW_MONTHS
}

fn default_payload_bins() -> usize {
    PAYLOAD_BIN_COUNT
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the monthly trend section.
    #[serde(default = "default_true")]
    pub include_trend: bool,

    /// Include the payload bin section.
    #[serde(default = "default_true")]
    pub include_bins: bool,

    /// Include the launch map section.
    #[serde(default = "default_true")]
    pub include_map: bool,

    /// Include the payload-vs-outcome scatter section.
    #[serde(default = "default_true")]
    pub include_scatter: bool,

    /// Total spread of the vertical scatter jitter (0 disables it).
    #[serde(default = "default_jitter_amplitude")]
    pub jitter_amplitude: f64,

    /// Seed for the scatter jitter.
    #[serde(default = "default_jitter_seed")]
    pub jitter_seed: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_trend: true,
            include_bins: true,
            include_map: true,
            include_scatter: true,
            jitter_amplitude: default_jitter_amplitude(),
            jitter_seed: default_jitter_seed(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_jitter_amplitude() -> f64 {
    0.12
}

fn default_jitter_seed() -> u64 {
    42
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.to_string_lossy().to_string();
        }

        if let Some(ref site) = args.site {
            self.filter.site = site.clone();
        }
        if args.payload_min.is_some() {
            self.filter.payload_min = args.payload_min;
        }
        if args.payload_max.is_some() {
            self.filter.payload_max = args.payload_max;
        }

        if let Some(window) = args.trend_window {
            self.analysis.trend_window = window;
        }
        if let Some(bins) = args.bins {
            self.analysis.payload_bins = bins;
        }
        if let Some(seed) = args.seed {
            self.report.jitter_seed = seed;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.filter.site, "ALL");
        assert_eq!(config.analysis.trend_window, 6);
        assert_eq!(config.analysis.payload_bins, 8);
        assert_eq!(config.report.jitter_amplitude, 0.12);
        assert!(config.filter.payload_min.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_dashboard.json"
verbose = true

[data]
path = "launches.csv"

[filter]
site = "KSC LC-39A"
payload_min = 1000.0
payload_max = 5000.0

[analysis]
trend_window = 3
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_dashboard.json");
        assert!(config.general.verbose);
        assert_eq!(config.data.path, PathBuf::from("launches.csv"));
        assert_eq!(config.filter.site, "KSC LC-39A");
        assert_eq!(config.filter.payload_min, Some(1000.0));
        assert_eq!(config.filter.payload_max, Some(5000.0));
        assert_eq!(config.analysis.trend_window, 3);
        assert_eq!(config.analysis.payload_bins, 8);
        assert!(config.report.include_map);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.general.output, "launch_dashboard.md");
        assert_eq!(config.data.path, PathBuf::from("data/dash_dataset.csv"));
        assert_eq!(config.report.jitter_seed, 42);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[filter]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.analysis.payload_bins, 8);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[filter]\nsite = \"VAFB SLC-4E\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.filter.site, "VAFB SLC-4E");

        std::fs::write(&path, "[filter\nsite = ").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
