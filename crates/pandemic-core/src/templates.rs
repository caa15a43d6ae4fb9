//! The three JSON templates of an area.
//!
//! - `default.json` -- `{"default": {"state": {...}, "neighborhood":
//!   {"default_cell_id": {"correlation": f, "infection_correction_factors": [...]}}, ...}}`
//! - `fields.json` -- `{"fields": {...}}`
//! - `infectedCell.json` -- one seed override object, or a list of them

use std::path::Path;

use serde_json::{Number, Value};
use tracing::debug;

use pandemic_types::{CellState, SeedOverrides, Vicinity};

use crate::error::LoadError;

/// Key of the template vicinity inside the default cell's neighborhood.
pub const DEFAULT_VICINITY_KEY: &str = "default_cell_id";

/// The `default` entry of `default.json`, plus the values cells inherit.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultCellTemplate {
    /// The entry exactly as read; written back verbatim as `cells.default`.
    pub raw: Value,
    /// State every region cell starts from.
    pub state: CellState,
    /// Correlation of each cell with itself, exactly as written in the template.
    pub self_correlation: Number,
    /// Correction factors attached to every neighborhood entry.
    pub correction_factors: Value,
}

impl DefaultCellTemplate {
    /// Interpret a parsed `default.json` document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Template`] naming the first missing or mistyped
    /// member.
    pub fn from_document(path: &Path, document: &Value) -> Result<Self, LoadError> {
        let template_error = |reason: &str| LoadError::Template {
            path: path.to_path_buf(),
            reason: reason.to_owned(),
        };

        let raw = document
            .get("default")
            .ok_or_else(|| template_error("missing `default` entry"))?;
        let state = raw
            .get("state")
            .and_then(Value::as_object)
            .ok_or_else(|| template_error("`default.state` must be an object"))?;
        let vicinity = raw
            .get("neighborhood")
            .and_then(|n| n.get(DEFAULT_VICINITY_KEY))
            .ok_or_else(|| template_error("missing `default.neighborhood.default_cell_id`"))?;
        let self_correlation = vicinity
            .get("correlation")
            .and_then(|value| match value {
                Value::Number(number) => Some(number.clone()),
                _ => None,
            })
            .ok_or_else(|| template_error("`default_cell_id.correlation` must be a number"))?;
        let correction_factors = vicinity
            .get("infection_correction_factors")
            .cloned()
            .ok_or_else(|| template_error("missing `default_cell_id.infection_correction_factors`"))?;

        Ok(Self {
            raw: raw.clone(),
            state: state.clone(),
            self_correlation,
            correction_factors,
        })
    }

    /// Vicinity entry for a neighbor with the given correlation.
    pub fn vicinity(&self, correlation: Number) -> Vicinity {
        Vicinity {
            correlation,
            infection_correction_factors: self.correction_factors.clone(),
        }
    }

    /// Vicinity entry of a cell with itself.
    pub fn self_vicinity(&self) -> Vicinity {
        self.vicinity(self.self_correlation.clone())
    }
}

/// All templates of one area.
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    /// The default cell.
    pub default_cell: DefaultCellTemplate,
    /// The field manifest (`fields.json` -> `fields`).
    pub fields: Value,
    /// Seed overrides in file order.
    pub seeds: SeedOverrides,
}

impl Templates {
    /// Read and interpret the three template files.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] or [`LoadError::Json`] if a file cannot be
    /// read or parsed, and [`LoadError::Template`] if its content has the
    /// wrong shape.
    pub fn load(default_cell: &Path, fields: &Path, seeds: &Path) -> Result<Self, LoadError> {
        let default_doc = read_json(default_cell)?;
        let default_cell_template = DefaultCellTemplate::from_document(default_cell, &default_doc)?;

        let fields_doc = read_json(fields)?;
        let fields_value = fields_doc
            .get("fields")
            .cloned()
            .ok_or_else(|| LoadError::Template {
                path: fields.to_path_buf(),
                reason: "missing `fields` entry".to_owned(),
            })?;

        let seeds_doc = read_json(seeds)?;
        let seed_overrides: SeedOverrides =
            serde_json::from_value(seeds_doc).map_err(|source| LoadError::Json {
                path: seeds.to_path_buf(),
                source,
            })?;

        debug!(
            self_correlation = %default_cell_template.self_correlation,
            state_fields = default_cell_template.state.len(),
            seeds = seed_overrides.len(),
            "Templates loaded"
        );

        Ok(Self {
            default_cell: default_cell_template,
            fields: fields_value,
            seeds: seed_overrides,
        })
    }
}

/// Read a whole file and parse it as JSON, keeping key order.
///
/// # Errors
///
/// Returns [`LoadError::Io`] or [`LoadError::Json`].
pub fn read_json(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn default_doc() -> Value {
        json!({
            "default": {
                "delay": "inertial",
                "cell_type": "zhong",
                "state": { "population": 0, "susceptible": [1.0] },
                "neighborhood": {
                    "default_cell_id": {
                        "correlation": 1.0,
                        "infection_correction_factors": [1.0, 0.5]
                    }
                },
                "config": { "precision": 100 }
            }
        })
    }

    #[test]
    fn interprets_default_cell() {
        let template = DefaultCellTemplate::from_document(Path::new("default.json"), &default_doc()).unwrap();
        assert_eq!(template.self_correlation.as_f64(), Some(1.0));
        assert_eq!(template.correction_factors, json!([1.0, 0.5]));
        assert_eq!(template.state.get("susceptible"), Some(&json!([1.0])));
        assert_eq!(template.raw, default_doc()["default"]);
    }

    #[test]
    fn raw_template_keeps_key_order() {
        let template = DefaultCellTemplate::from_document(Path::new("default.json"), &default_doc()).unwrap();
        let keys: Vec<&String> = template.raw.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["delay", "cell_type", "state", "neighborhood", "config"]);
    }

    #[test]
    fn integer_self_correlation_stays_integer() {
        let doc = json!({ "default": { "state": {}, "neighborhood": {
            "default_cell_id": { "correlation": 1, "infection_correction_factors": [] }
        } } });
        let template = DefaultCellTemplate::from_document(Path::new("default.json"), &doc).unwrap();
        let text = serde_json::to_string(&template.self_vicinity()).unwrap();
        assert_eq!(text, r#"{"correlation":1,"infection_correction_factors":[]}"#);
    }

    #[test]
    fn missing_vicinity_is_a_template_error() {
        let doc = json!({ "default": { "state": {}, "neighborhood": {} } });
        let result = DefaultCellTemplate::from_document(Path::new("default.json"), &doc);
        assert!(matches!(result, Err(LoadError::Template { reason, .. }) if reason.contains("default_cell_id")));
    }

    #[test]
    fn non_numeric_correlation_is_a_template_error() {
        let doc = json!({ "default": { "state": {}, "neighborhood": {
            "default_cell_id": { "correlation": "high", "infection_correction_factors": [] }
        } } });
        let result = DefaultCellTemplate::from_document(Path::new("default.json"), &doc);
        assert!(matches!(result, Err(LoadError::Template { .. })));
    }

    #[test]
    fn loads_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("default.json");
        let fields_path = dir.path().join("fields.json");
        let seeds_path = dir.path().join("infectedCell.json");
        std::fs::write(&default_path, default_doc().to_string()).unwrap();
        std::fs::write(&fields_path, r#"{"fields": {"infected": {"type": "float"}}}"#).unwrap();
        std::fs::write(&seeds_path, r#"{"cell_id": "A", "state": {"infected": [[0.1]]}}"#).unwrap();

        let templates = Templates::load(&default_path, &fields_path, &seeds_path).unwrap();
        assert_eq!(templates.fields, json!({"infected": {"type": "float"}}));
        assert_eq!(templates.seeds.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_json(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
