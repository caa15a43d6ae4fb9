//! Error types for the `pandemic-core` crate.
//!
//! Every error here aborts the run. Per-row data problems (invalid region
//! ids, zero correlations, unmatched seed overrides) are not errors; they
//! are logged and skipped where they occur.

use std::path::PathBuf;

use pandemic_geo::GeoError;
use pandemic_types::RegionId;

/// Errors raised while reading the input files of an area.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A CSV table could not be parsed.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        /// The table.
        path: PathBuf,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// A required column is missing from a CSV header.
    #[error("{path} has no column named {column}")]
    MissingColumn {
        /// The table.
        path: PathBuf,
        /// The missing column.
        column: String,
    },

    /// A cell of a numeric column could not be interpreted.
    #[error("{path}, data row {row}: invalid {column} value '{value}'")]
    InvalidNumber {
        /// The table.
        path: PathBuf,
        /// One-based data row (the header is not counted).
        row: usize,
        /// The column.
        column: String,
        /// The offending text.
        value: String,
    },

    /// A JSON template could not be parsed.
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        /// The template file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A JSON template parsed but lacks a required member.
    #[error("template {path}: {reason}")]
    Template {
        /// The template file.
        path: PathBuf,
        /// What is missing or mistyped.
        reason: String,
    },

    /// The polygon layer could not be loaded.
    #[error("polygon layer: {source}")]
    Geo {
        /// The underlying geometry error.
        #[from]
        source: GeoError,
    },
}

/// Errors that abort a scenario run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An input file could not be loaded.
    #[error("load error: {source}")]
    Load {
        /// The underlying load error.
        #[from]
        source: LoadError,
    },

    /// A geometry lookup failed during aggregation.
    #[error("geometry error: {source}")]
    Geo {
        /// The underlying geometry error.
        #[from]
        source: GeoError,
    },

    /// An adjacency row names a region absent from the attributes table.
    #[error("region {0} is not in the attributes table")]
    UnknownRegion(RegionId),

    /// The scenario document could not be serialized.
    #[error("failed to serialize scenario: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The scenario file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The output file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
