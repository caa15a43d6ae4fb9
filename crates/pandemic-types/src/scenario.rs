//! The scenario document handed to the simulator.
//!
//! Layout:
//!
//! ```text
//! {
//!     "cells": {
//!         "default": <default cell template>,
//!         "<region id>": { "state": {...}, "neighborhood": {...} },
//!         ...
//!     },
//!     "fields": <field manifest>
//! }
//! ```
//!
//! Keys are written in construction order, never sorted.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::cell::Cell;
use crate::ids::RegionId;

/// Key of the template entry inside `cells`.
pub const DEFAULT_CELL_KEY: &str = "default";

/// Fully assembled scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDocument {
    /// The `default` entry, copied verbatim from the template file.
    pub default_cell: Value,
    /// Region cells in adjacency-table order.
    pub cells: IndexMap<RegionId, Cell>,
    /// Field manifest consumed by the GIS web viewer.
    pub fields: Value,
}

impl ScenarioDocument {
    /// Number of region cells (the `default` entry is not counted).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total neighborhood entries across all cells, self-edges included.
    pub fn edge_count(&self) -> usize {
        self.cells
            .values()
            .fold(0_usize, |acc, cell| acc.saturating_add(cell.neighborhood.len()))
    }

    /// Serialize with four-space indentation and no trailing newline.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        Ok(buffer)
    }
}

/// The `cells` object: template entry first, then regions.
struct CellsView<'a>(&'a ScenarioDocument);

impl Serialize for CellsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let doc = self.0;
        // A region literally named "default" takes the template's slot.
        let shadowing = doc.cells.get(DEFAULT_CELL_KEY);
        let regions = doc
            .cells
            .iter()
            .filter(|(id, _)| id.as_str() != DEFAULT_CELL_KEY);

        let mut map = serializer.serialize_map(None)?;
        match shadowing {
            Some(cell) => map.serialize_entry(DEFAULT_CELL_KEY, cell)?,
            None => map.serialize_entry(DEFAULT_CELL_KEY, &doc.default_cell)?,
        }
        for (id, cell) in regions {
            map.serialize_entry(id, cell)?;
        }
        map.end()
    }
}

impl Serialize for ScenarioDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("cells", &CellsView(self))?;
        map.serialize_entry("fields", &self.fields)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cell::Vicinity;

    fn cell(population: u64) -> Cell {
        let template = json!({ "population": 0 }).as_object().cloned().unwrap_or_default();
        Cell::from_template(&template, population)
    }

    fn document() -> ScenarioDocument {
        let mut cells = IndexMap::new();
        let mut b = cell(200);
        b.set_neighbor(
            RegionId::new("B"),
            Vicinity { correlation: 1.into(), infection_correction_factors: json!([]) },
        );
        cells.insert(RegionId::new("Z"), cell(1));
        cells.insert(RegionId::new("B"), b);
        ScenarioDocument {
            default_cell: json!({ "delay": "inertial", "state": {} }),
            cells,
            fields: json!({ "population": { "type": "int" } }),
        }
    }

    #[test]
    fn keys_keep_insertion_order() {
        let text = String::from_utf8(document().to_pretty_json().unwrap_or_default())
            .unwrap_or_default();
        let default_at = text.find("\"default\"").unwrap_or(usize::MAX);
        let z_at = text.find("\"Z\"").unwrap_or(usize::MAX);
        let b_at = text.find("\"B\"").unwrap_or(0);
        let fields_at = text.find("\"fields\"").unwrap_or(0);
        assert!(default_at < z_at);
        assert!(z_at < b_at);
        assert!(b_at < fields_at);
    }

    #[test]
    fn uses_four_space_indent_without_trailing_newline() {
        let text = String::from_utf8(document().to_pretty_json().unwrap_or_default())
            .unwrap_or_default();
        assert!(text.starts_with("{\n    \"cells\": {\n        \"default\""));
        assert!(text.ends_with('}'));
    }

    #[test]
    fn counts_cells_and_edges() {
        let doc = document();
        assert_eq!(doc.cell_count(), 2);
        assert_eq!(doc.edge_count(), 1);
    }

    #[test]
    fn region_named_default_replaces_template() {
        let mut doc = document();
        doc.cells.insert(RegionId::new(DEFAULT_CELL_KEY), cell(9));
        let value: Value = serde_json::from_slice(&doc.to_pretty_json().unwrap_or_default())
            .unwrap_or(Value::Null);
        assert_eq!(value["cells"]["default"]["state"]["population"], json!(9));
        assert_eq!(value["cells"].as_object().map(serde_json::Map::len), Some(3));
    }
}
