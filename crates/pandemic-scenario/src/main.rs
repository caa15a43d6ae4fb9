//! Scenario generator binary for the cellular pandemic simulator.
//!
//! ```text
//! pandemic-scenario <AREA> [--no-progress] [--config <PATH>]
//! ```
//!
//! `AREA` is `Ottawa` or `Ontario` in any letter case. The scenario is
//! written to `<output_root>/scenario_<area>_<unit>.json`.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration from `--config` or `pandemic-config.yaml`
//! 3. Initialize structured logging (tracing)
//! 4. Resolve the area preset
//! 5. Run the pipeline and log the summary

mod error;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use pandemic_core::{AreaPreset, ScenarioConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "pandemic-config.yaml";

/// Generate a pandemic simulator scenario from GIS data.
#[derive(Debug, Parser)]
#[command(name = "pandemic-scenario", version, about)]
struct Cli {
    /// Area to generate: Ottawa or Ontario.
    area: String,

    /// Only report completion, not per-row progress.
    #[arg(long)]
    no_progress: bool,

    /// YAML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Where the configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = load_config(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
        ConfigSource::Defaults => info!("Config file not found, using defaults"),
    }

    let preset: AreaPreset = cli.area.parse().map_err(CliError::from)?;
    info!(
        area = %preset,
        progress = !cli.no_progress,
        gis_root = %config.paths.gis_root.display(),
        templates_root = %config.paths.templates_root.display(),
        "pandemic-scenario starting"
    );

    let summary = pandemic_core::run(&config, preset, !cli.no_progress)
        .map_err(CliError::from)
        .with_context(|| format!("failed to generate the {preset} scenario"))?;
    info!(
        output = %summary.output.display(),
        cells = summary.cells,
        edges = summary.edges,
        invalid_regions = summary.invalid,
        "Scenario generated"
    );
    Ok(())
}

/// Load configuration from `explicit`, else from `pandemic-config.yaml` in
/// the working directory, else built-in defaults.
fn load_config(explicit: Option<&Path>) -> Result<(ScenarioConfig, ConfigSource), CliError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(CliError::ConfigNotFound(path.to_path_buf()));
        }
        let config = ScenarioConfig::from_file(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    let config_path = Path::new(DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        let config = ScenarioConfig::from_file(config_path)?;
        Ok((config, ConfigSource::File(config_path.to_path_buf())))
    } else {
        Ok((ScenarioConfig::from_env(), ConfigSource::Defaults))
    }
}
