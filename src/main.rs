//! LaunchDash - SpaceX launch dashboard generator
//!
//! Loads launch records once, applies the requested site and payload
//! filter, and writes every derived view as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing columns, bad filter, unreadable file, etc.)

use anyhow::{Context, Result};
use launchdash::cli::{Args, OutputFormat};
use launchdash::config::{Config, DEFAULT_CONFIG_FILE};
use launchdash::models::{FilterSelection, PayloadRange, SiteSelector};
use launchdash::report::{self, DashboardOptions};
use launchdash::Dataset;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Resolve configuration first: the file can raise the log level
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("LaunchDash v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();
    debug!("Arguments: {:?}", args);

    match run(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard generation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .launchdash.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the data path, default filter, and report sections.");
    Ok(())
}

/// Initialize logging at the resolved verbosity.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the data, build the dashboard and write it. Returns the exit code.
fn run(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    // Step 1: Load the dataset (fatal on missing columns)
    let dataset = Dataset::load(&config.data.path)
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;
    info!(
        "Loaded {} launch records ({} rows dropped)",
        dataset.len(),
        dataset.dropped_rows()
    );

    if args.list_sites {
        return handle_list_sites(&dataset);
    }

    // Step 2: Build the filter selection
    let selection = build_selection(&config, &dataset)?;
    if let SiteSelector::Site(ref site) = selection.site {
        if !dataset.launch_sites().contains(site) {
            warn!("Launch site '{}' does not appear in the data", site);
        }
    }

    // Step 3: Compute every view
    let options = DashboardOptions::from(&config);
    let dashboard = report::build_dashboard(&dataset, &selection, &options);

    // Step 4: Render and save
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if !args.quiet {
        println!("\n📊 Dashboard Summary:");
        println!("   Site: {}", dashboard.kpis.selected_site);
        println!("   Payload: {}", selection.payload);
        println!("   Records: {}", dashboard.kpis.records);
        println!("   Success rate: {}", dashboard.kpis.success_rate);
        println!("   Median payload: {} kg", dashboard.kpis.median_payload);
        println!(
            "   Duration: {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
        println!("\n✅ Report saved to: {}", output_path.display());
    }

    Ok(0)
}

/// Handle --list-sites: print the site selector options and exit.
fn handle_list_sites(dataset: &Dataset) -> Result<i32> {
    let sites = dataset.launch_sites();

    if sites.is_empty() {
        println!("No launch sites found.");
    } else {
        println!("{} launch sites:", sites.len());
        for site in sites {
            println!("  {}", site);
        }
    }

    if let Some(bounds) = dataset.payload_bounds() {
        println!("Payload range: {}", bounds);
    }

    Ok(0)
}

/// Resolve the selection. A missing payload bound falls back to the data's
/// range, widened so that a one-sided bound never inverts the interval.
fn build_selection(config: &Config, dataset: &Dataset) -> Result<FilterSelection> {
    let bounds = dataset.payload_bounds();

    let (low, high) = match (config.filter.payload_min, config.filter.payload_max) {
        (Some(low), Some(high)) => (low, high),
        (Some(low), None) => (low, bounds.map_or(low, |b| b.high().max(low))),
        (None, Some(high)) => (bounds.map_or(high, |b| b.low().min(high)), high),
        (None, None) => bounds.map_or((0.0, 0.0), |b| (b.low(), b.high())),
    };

    let payload = PayloadRange::new(low, high).context("Invalid payload filter")?;

    Ok(FilterSelection::new(
        SiteSelector::parse(&config.filter.site),
        payload,
    ))
}

/// Where the configuration came from, reported once logging is up.
#[derive(Debug)]
enum ConfigSource {
    File(PathBuf),
    Default,
    Builtin,
    Unreadable(String),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::Default => info!("Loaded default config from {}", DEFAULT_CONFIG_FILE),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Unreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::File(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::Default)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Unreadable(format!("{:#}", e)))),
    }
}
