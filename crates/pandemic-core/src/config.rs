//! Configuration loading and area presets for the scenario generator.
//!
//! Two areas are supported: Ottawa dissemination areas and Ontario public
//! health units. Each has a built-in [`AreaLayout`] naming its input files
//! and table columns. An optional `pandemic-config.yaml` can move the root
//! directories and override individual layout fields:
//!
//! ```yaml
//! paths:
//!   gis_root: "../../cadmium_gis/"
//!   templates_root: "."
//!   output_root: "output"
//! areas:
//!   ontario:
//!     progress_interval: 5
//! logging:
//!   level: "debug"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// File name of the default-cell template inside the templates directory.
pub const DEFAULT_CELL_FILE: &str = "default.json";
/// File name of the field manifest inside the templates directory.
pub const FIELDS_FILE: &str = "fields.json";
/// File name of the seed override inside the templates directory.
pub const SEED_FILE: &str = "infectedCell.json";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The area selector is neither Ottawa nor Ontario.
    #[error("only 'Ottawa' or 'Ontario' are accepted as input areas, got '{0}'")]
    UnknownArea(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// The two supported area presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaPreset {
    /// Ottawa dissemination areas.
    Ottawa,
    /// Ontario public health units.
    Ontario,
}

impl AreaPreset {
    /// Lower-case preset name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ottawa => "ottawa",
            Self::Ontario => "ontario",
        }
    }
}

impl core::fmt::Display for AreaPreset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AreaPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ottawa" => Ok(Self::Ottawa),
            "ontario" => Ok(Self::Ontario),
            _ => Err(ConfigError::UnknownArea(s.to_owned())),
        }
    }
}

/// Input file names and column names for one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaLayout {
    /// Directory under the GIS root holding the area's tables and polygons.
    pub gis_subdir: String,
    /// Region attributes table (id, population, area).
    pub attributes_csv: String,
    /// Adjacency table (region id, neighbor id).
    pub adjacency_csv: String,
    /// GeoPackage holding the region polygons.
    pub polygons_gpkg: String,
    /// Feature layer inside the GeoPackage; the first layer when unset.
    pub polygon_layer: Option<String>,
    /// Region id attribute of the polygon layer.
    pub polygon_id_column: String,
    /// Region id column of the attributes table.
    pub attributes_id_column: String,
    /// Population column of the attributes table.
    pub population_column: String,
    /// Area column of the attributes table.
    pub area_column: String,
    /// Region id column of the adjacency table.
    pub adjacency_region_column: String,
    /// Neighbor id column of the adjacency table.
    pub adjacency_neighbor_column: String,
    /// Directory under the templates root holding the JSON templates.
    pub templates_subdir: String,
    /// Scenario file name under the output root.
    pub output_file: String,
    /// Adjacency rows between progress messages.
    pub progress_interval: usize,
}

impl AreaLayout {
    /// The built-in layout of a preset.
    pub fn builtin(preset: AreaPreset) -> Self {
        match preset {
            AreaPreset::Ottawa => Self {
                gis_subdir: "Ottawa_DAs".to_owned(),
                attributes_csv: "DA Ottawa Clean.csv".to_owned(),
                adjacency_csv: "DA Ottawa Adjacency.csv".to_owned(),
                polygons_gpkg: "DA Ottawa.gpkg".to_owned(),
                polygon_layer: None,
                polygon_id_column: "dauid".to_owned(),
                attributes_id_column: "DAuid".to_owned(),
                population_column: "DApop_2016".to_owned(),
                area_column: "DAarea".to_owned(),
                adjacency_region_column: "dauid".to_owned(),
                adjacency_neighbor_column: "Neighbor_dauid".to_owned(),
                templates_subdir: "input_ottawa_da".to_owned(),
                output_file: "scenario_ottawa_da.json".to_owned(),
                progress_interval: 1000,
            },
            AreaPreset::Ontario => Self {
                gis_subdir: "Ontario_PHUs".to_owned(),
                attributes_csv: "ontario_phu_clean.csv".to_owned(),
                adjacency_csv: "ontario_phu_adjacency.csv".to_owned(),
                polygons_gpkg: "ontario_phu.gpkg".to_owned(),
                polygon_layer: None,
                polygon_id_column: "PHU_ID".to_owned(),
                attributes_id_column: "phu_id".to_owned(),
                population_column: "population".to_owned(),
                area_column: "area_epsg4326".to_owned(),
                adjacency_region_column: "region_id".to_owned(),
                adjacency_neighbor_column: "neighbor_id".to_owned(),
                templates_subdir: "input_ontario_phu".to_owned(),
                output_file: "scenario_ontario_phu.json".to_owned(),
                progress_interval: 10,
            },
        }
    }

    /// Replace every field that `overrides` sets.
    pub fn apply(&mut self, overrides: &AreaOverrides) {
        fn set<T: Clone>(target: &mut T, value: Option<&T>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        set(&mut self.gis_subdir, overrides.gis_subdir.as_ref());
        set(&mut self.attributes_csv, overrides.attributes_csv.as_ref());
        set(&mut self.adjacency_csv, overrides.adjacency_csv.as_ref());
        set(&mut self.polygons_gpkg, overrides.polygons_gpkg.as_ref());
        if overrides.polygon_layer.is_some() {
            self.polygon_layer.clone_from(&overrides.polygon_layer);
        }
        set(&mut self.polygon_id_column, overrides.polygon_id_column.as_ref());
        set(&mut self.attributes_id_column, overrides.attributes_id_column.as_ref());
        set(&mut self.population_column, overrides.population_column.as_ref());
        set(&mut self.area_column, overrides.area_column.as_ref());
        set(&mut self.adjacency_region_column, overrides.adjacency_region_column.as_ref());
        set(&mut self.adjacency_neighbor_column, overrides.adjacency_neighbor_column.as_ref());
        set(&mut self.templates_subdir, overrides.templates_subdir.as_ref());
        set(&mut self.output_file, overrides.output_file.as_ref());
        set(&mut self.progress_interval, overrides.progress_interval.as_ref());
    }
}

/// Optional per-field overrides of an [`AreaLayout`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AreaOverrides {
    /// See [`AreaLayout::gis_subdir`].
    pub gis_subdir: Option<String>,
    /// See [`AreaLayout::attributes_csv`].
    pub attributes_csv: Option<String>,
    /// See [`AreaLayout::adjacency_csv`].
    pub adjacency_csv: Option<String>,
    /// See [`AreaLayout::polygons_gpkg`].
    pub polygons_gpkg: Option<String>,
    /// See [`AreaLayout::polygon_layer`].
    pub polygon_layer: Option<String>,
    /// See [`AreaLayout::polygon_id_column`].
    pub polygon_id_column: Option<String>,
    /// See [`AreaLayout::attributes_id_column`].
    pub attributes_id_column: Option<String>,
    /// See [`AreaLayout::population_column`].
    pub population_column: Option<String>,
    /// See [`AreaLayout::area_column`].
    pub area_column: Option<String>,
    /// See [`AreaLayout::adjacency_region_column`].
    pub adjacency_region_column: Option<String>,
    /// See [`AreaLayout::adjacency_neighbor_column`].
    pub adjacency_neighbor_column: Option<String>,
    /// See [`AreaLayout::templates_subdir`].
    pub templates_subdir: Option<String>,
    /// See [`AreaLayout::output_file`].
    pub output_file: Option<String>,
    /// See [`AreaLayout::progress_interval`].
    pub progress_interval: Option<usize>,
}

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Root directories.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Per-area layout overrides.
    #[serde(default)]
    pub areas: AreasConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScenarioConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the root directories:
    /// - `PANDEMIC_GIS_ROOT` overrides `paths.gis_root`
    /// - `PANDEMIC_TEMPLATES_ROOT` overrides `paths.templates_root`
    /// - `PANDEMIC_OUTPUT_ROOT` overrides `paths.output_root`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.paths.apply_env_overrides();
        Ok(config)
    }

    /// Built-in defaults with env overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.paths.apply_env_overrides();
        config
    }

    /// The effective layout of `preset`: built-in values plus overrides.
    pub fn layout(&self, preset: AreaPreset) -> AreaLayout {
        let mut layout = AreaLayout::builtin(preset);
        layout.apply(self.areas.get(preset));
        layout
    }

    /// Resolve every input and output path of `preset`.
    pub fn area_paths(&self, preset: AreaPreset) -> AreaPaths {
        AreaPaths::resolve(&self.paths, &self.layout(preset))
    }
}

/// Root directories that area layouts are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one GIS subdirectory per area.
    #[serde(default = "default_gis_root")]
    pub gis_root: PathBuf,

    /// Directory holding one templates subdirectory per area.
    #[serde(default = "default_templates_root")]
    pub templates_root: PathBuf,

    /// Directory the scenario file is written to.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
}

impl PathsConfig {
    /// Override root directories with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PANDEMIC_GIS_ROOT") {
            self.gis_root = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PANDEMIC_TEMPLATES_ROOT") {
            self.templates_root = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PANDEMIC_OUTPUT_ROOT") {
            self.output_root = PathBuf::from(val);
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            gis_root: default_gis_root(),
            templates_root: default_templates_root(),
            output_root: default_output_root(),
        }
    }
}

/// Layout overrides keyed by area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreasConfig {
    /// Overrides for the Ottawa preset.
    #[serde(default)]
    pub ottawa: AreaOverrides,

    /// Overrides for the Ontario preset.
    #[serde(default)]
    pub ontario: AreaOverrides,
}

impl AreasConfig {
    /// Overrides of one preset.
    pub const fn get(&self, preset: AreaPreset) -> &AreaOverrides {
        match preset {
            AreaPreset::Ottawa => &self.ottawa,
            AreaPreset::Ontario => &self.ontario,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Fully resolved file locations of one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaPaths {
    /// Region attributes table.
    pub attributes: PathBuf,
    /// Adjacency table.
    pub adjacency: PathBuf,
    /// Polygon GeoPackage.
    pub polygons: PathBuf,
    /// Default-cell template.
    pub default_cell: PathBuf,
    /// Field manifest.
    pub fields: PathBuf,
    /// Seed override file.
    pub seeds: PathBuf,
    /// Scenario output file.
    pub output: PathBuf,
}

impl AreaPaths {
    /// Join a layout onto the root directories.
    pub fn resolve(paths: &PathsConfig, layout: &AreaLayout) -> Self {
        let gis = paths.gis_root.join(&layout.gis_subdir);
        let templates = paths.templates_root.join(&layout.templates_subdir);
        Self {
            attributes: gis.join(&layout.attributes_csv),
            adjacency: gis.join(&layout.adjacency_csv),
            polygons: gis.join(&layout.polygons_gpkg),
            default_cell: templates.join(DEFAULT_CELL_FILE),
            fields: templates.join(FIELDS_FILE),
            seeds: templates.join(SEED_FILE),
            output: paths.output_root.join(&layout.output_file),
        }
    }
}

fn default_gis_root() -> PathBuf {
    PathBuf::from("../../cadmium_gis")
}

fn default_templates_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

fn default_log_level() -> String {
    "info".to_owned()
}
