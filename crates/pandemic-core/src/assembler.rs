//! Builds the scenario document and writes it to disk.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use pandemic_types::{Cell, RegionId, ScenarioDocument, SeedOverrides};

use crate::error::PipelineError;

/// Combine the template, the region cells and the field manifest, then apply
/// seed overrides in file order.
///
/// A seed whose `cell_id` matches no aggregated cell is logged and ignored.
/// The `default` entry is never touched.
pub fn assemble(
    default_cell: &Value,
    cells: IndexMap<RegionId, Cell>,
    fields: &Value,
    seeds: &SeedOverrides,
) -> ScenarioDocument {
    let mut document = ScenarioDocument {
        default_cell: default_cell.clone(),
        cells,
        fields: fields.clone(),
    };

    for seed in seeds.iter() {
        match document.cells.get_mut(&seed.cell_id) {
            Some(cell) => {
                let written = seed.state.apply_to(&mut cell.state);
                debug!(cell = %seed.cell_id, fields = written, "Seed applied");
            }
            None => warn!(cell = %seed.cell_id, "Seed names no cell in the scenario, ignored"),
        }
    }

    document
}

/// Serialize `document` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`PipelineError::Serialize`] or [`PipelineError::Write`].
pub fn write_document(document: &ScenarioDocument, path: &Path) -> Result<(), PipelineError> {
    let bytes = document.to_pretty_json()?;
    let write_error = |source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, &bytes).map_err(write_error)?;
    info!(
        path = %path.display(),
        bytes = bytes.len(),
        cells = document.cell_count(),
        "Scenario written"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pandemic_types::Vicinity;
    use serde_json::json;

    use super::*;

    fn cells() -> IndexMap<RegionId, Cell> {
        let template = json!({ "population": 0, "susceptible": [1.0], "infected": [0.0] });
        let state = template.as_object().unwrap();
        let mut a = Cell::from_template(state, 100);
        a.set_neighbor(
            RegionId::new("A"),
            Vicinity { correlation: 1.into(), infection_correction_factors: json!([1.0]) },
        );
        let mut map = IndexMap::new();
        map.insert(RegionId::new("A"), a);
        map
    }

    fn seeds(value: Value) -> SeedOverrides {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn applies_matching_seed() {
        let doc = assemble(
            &json!({ "state": {} }),
            cells(),
            &json!({}),
            &seeds(json!({ "cell_id": "A", "state": { "susceptible": [0.9], "infected": [0.1] } })),
        );
        let state = &doc.cells.get("A").unwrap().state;
        assert_eq!(state.get("susceptible"), Some(&json!([0.9])));
        assert_eq!(state.get("infected"), Some(&json!([0.1])));
        assert_eq!(state.get("population"), Some(&json!(100)));
    }

    #[test]
    fn unmatched_seed_changes_nothing() {
        let doc = assemble(
            &json!({ "state": {} }),
            cells(),
            &json!({}),
            &seeds(json!([{ "cell_id": "Q", "state": { "infected": [0.5] } }])),
        );
        assert_eq!(doc.cells, cells());
    }

    #[test]
    fn later_seed_wins() {
        let doc = assemble(
            &json!({ "state": {} }),
            cells(),
            &json!({}),
            &seeds(json!([
                { "cell_id": "A", "state": { "infected": [0.1] } },
                { "cell_id": "A", "state": { "infected": [0.2] } }
            ])),
        );
        assert_eq!(doc.cells.get("A").unwrap().state.get("infected"), Some(&json!([0.2])));
    }

    #[test]
    fn default_seed_leaves_template_verbatim() {
        let template = json!({ "state": { "infected": [0.0] } });
        let doc = assemble(
            &template,
            IndexMap::new(),
            &json!({}),
            &seeds(json!({ "cell_id": "default", "state": { "infected": [0.3] } })),
        );
        assert_eq!(doc.default_cell, template);
        assert!(doc.cells.is_empty());
    }

    #[test]
    fn writes_into_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("scenario.json");
        let doc = assemble(&json!({ "state": {} }), cells(), &json!({ "f": 1 }), &SeedOverrides::default());
        write_document(&doc, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.ends_with('\n'));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["fields"], json!({ "f": 1 }));
        assert_eq!(parsed["cells"]["A"]["state"]["population"], json!(100));
    }
}
