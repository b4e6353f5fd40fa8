//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// LaunchDash - filter-and-aggregate dashboards over SpaceX launch records
///
/// Loads a launch CSV, filters it by launch site and payload range, and
/// writes the derived views (site success, KPIs, monthly trend, payload
/// bins, map points, scatter) as a Markdown or JSON report.
///
/// Examples:
///   launchdash --data data/dash_dataset.csv
///   launchdash --data data/dash_dataset.csv --site "KSC LC-39A"
///   launchdash --payload-min 2000 --payload-max 6000 --format json -o dash.json
///   launchdash --list-sites
///   launchdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Launch records CSV
    ///
    /// Defaults to the path in .launchdash.toml, or data/dash_dataset.csv.
    #[arg(short, long, value_name = "FILE", env = "LAUNCHDASH_DATA")]
    pub data: Option<PathBuf>,

    /// Launch site to select, or ALL for every site
    #[arg(short, long, value_name = "SITE")]
    pub site: Option<String>,

    /// Lower payload bound in kg (defaults to the dataset minimum)
    #[arg(long, value_name = "KG", allow_negative_numbers = true)]
    pub payload_min: Option<f64>,

    /// Upper payload bound in kg (defaults to the dataset maximum)
    #[arg(long, value_name = "KG", allow_negative_numbers = true)]
    pub payload_max: Option<f64>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .launchdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rolling window for the monthly trend, in months
    #[arg(long, value_name = "MONTHS")]
    pub trend_window: Option<usize>,

    /// Target number of payload quantile bins
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<usize>,

    /// Seed for the scatter jitter
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the launch sites found in the data and exit
    #[arg(long)]
    pub list_sites: bool,

    /// Generate a default .launchdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.trend_window == Some(0) {
            return Err("Trend window must be at least 1 month".to_string());
        }

        if self.bins == Some(0) {
            return Err("Bin count must be at least 1".to_string());
        }

        if let (Some(min), Some(max)) = (self.payload_min, self.payload_max) {
            if min > max {
                return Err(format!(
                    "--payload-min ({}) must not exceed --payload-max ({})",
                    min, max
                ));
            }
        }

        if let Some(ref data) = self.data {
            if data.exists() && !data.is_file() {
                return Err(format!("Data path is not a file: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level. `--quiet` wins over a config file that asks
    /// for verbose output.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
