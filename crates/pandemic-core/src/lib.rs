//! Scenario generation for the cellular pandemic simulator.
//!
//! Turns a region attributes table, an adjacency table, a polygon layer, and
//! three JSON templates into one scenario document.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `pandemic-config.yaml` and the
//!   built-in Ottawa and Ontario area presets.
//! - [`loader`] -- Reads every input of an area into memory.
//! - [`templates`] -- The default cell, field manifest, and seed overrides.
//! - [`validator`] -- Finds regions with a null or zero population.
//! - [`aggregator`] -- The adjacency pass that builds one cell per region.
//! - [`progress`] -- [`ProgressSink`] trait, [`LogProgress`] and
//!   [`QuietProgress`].
//! - [`assembler`] -- Applies seeds and writes the scenario file.
//! - [`pipeline`] -- One end-to-end run.
//! - [`error`] -- Load and pipeline error types.
//!
//! [`ProgressSink`]: progress::ProgressSink
//! [`LogProgress`]: progress::LogProgress
//! [`QuietProgress`]: progress::QuietProgress

pub mod aggregator;
pub mod assembler;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod progress;
pub mod templates;
pub mod validator;

pub use config::{AreaPreset, ConfigError, ScenarioConfig};
pub use error::{LoadError, PipelineError};
pub use pipeline::{RunSummary, run};
