//! Error types for the scenario generator binary.

use std::path::PathBuf;

/// Top-level error for the `pandemic-scenario` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or area selection failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: pandemic_core::ConfigError,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file {0} not found")]
    ConfigNotFound(PathBuf),

    /// Scenario generation failed.
    #[error("{source}")]
    Pipeline {
        /// The underlying pipeline error.
        #[from]
        source: pandemic_core::PipelineError,
    },
}
