//! Output-side cell records in the simulator's scenario format.
//!
//! A [`Cell`] is `{ "state": {...}, "neighborhood": { id: Vicinity } }`.
//! The state is an open JSON object taken from the default template, so
//! fields the generator does not know about pass through unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::ids::RegionId;

/// Open cell state object (population, age groups, SEIRD compartments...).
pub type CellState = Map<String, Value>;

/// Key of the population field inside a cell state.
pub const POPULATION_FIELD: &str = "population";

/// Influence of one neighbor on a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vicinity {
    /// Boundary-sharing weight, nominally in `(0, 1]`. Kept as a JSON number
    /// so a template's `1` is written back as `1`, not `1.0`.
    pub correlation: Number,
    /// Opaque per-phase correction factors copied from the default template.
    pub infection_correction_factors: Value,
}

/// One region ready for the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Initial state, cloned from the default template.
    pub state: CellState,
    /// Neighbor id to vicinity, in insertion order.
    pub neighborhood: IndexMap<RegionId, Vicinity>,
}

impl Cell {
    /// Create a cell from a template state with the given population.
    ///
    /// The template is cloned, so cells never share nested state.
    pub fn from_template(template: &CellState, population: u64) -> Self {
        let mut state = template.clone();
        state.insert(POPULATION_FIELD.to_owned(), Value::from(population));
        Self {
            state,
            neighborhood: IndexMap::new(),
        }
    }

    /// Population recorded in the state, if it is an integer.
    pub fn population(&self) -> Option<u64> {
        self.state.get(POPULATION_FIELD).and_then(Value::as_u64)
    }

    /// Insert or replace the vicinity entry for `neighbor`.
    ///
    /// Replacing keeps the neighbor's original position.
    pub fn set_neighbor(&mut self, neighbor: RegionId, vicinity: Vicinity) {
        self.neighborhood.insert(neighbor, vicinity);
    }
}
