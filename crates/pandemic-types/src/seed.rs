//! Seed infection overrides (`infectedCell.json`).
//!
//! An override names one cell and supplies replacement values for the five
//! epidemic compartments. The file may hold a single override object or a
//! list of them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cell::CellState;
use crate::ids::RegionId;

/// Compartment values written over a seeded cell's state.
///
/// Every field is optional; an absent field leaves the cell's value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedState {
    /// Susceptible share per age group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub susceptible: Option<Value>,
    /// Exposed share per age group and day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposed: Option<Value>,
    /// Infected share per age group and day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infected: Option<Value>,
    /// Recovered share per age group and day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovered: Option<Value>,
    /// Fatalities share per age group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatalities: Option<Value>,
}

impl SeedState {
    /// Write the present compartments into `state`, returning how many were set.
    pub fn apply_to(&self, state: &mut CellState) -> usize {
        let fields = [
            ("susceptible", &self.susceptible),
            ("exposed", &self.exposed),
            ("infected", &self.infected),
            ("recovered", &self.recovered),
            ("fatalities", &self.fatalities),
        ];
        let mut written = 0_usize;
        for (name, value) in fields {
            if let Some(value) = value {
                state.insert(name.to_owned(), value.clone());
                written = written.saturating_add(1);
            }
        }
        written
    }
}

/// Initial-condition injection for one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedOverride {
    /// Target region.
    pub cell_id: RegionId,
    /// Replacement compartments.
    pub state: SeedState,
}

/// All seed overrides of a run, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SeedOverrides(Vec<SeedOverride>);

impl SeedOverrides {
    /// Iterate over the overrides.
    pub fn iter(&self) -> impl Iterator<Item = &SeedOverride> {
        self.0.iter()
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SeedOverrides {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(SeedOverride),
            Many(Vec<SeedOverride>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(seed) => Self(vec![seed]),
            OneOrMany::Many(seeds) => Self(seeds),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn state() -> CellState {
        json!({
            "population": 100,
            "susceptible": [1.0],
            "exposed": [[0.0]],
            "infected": [[0.0]],
            "recovered": [[0.0]],
            "fatalities": [0.0],
            "disobedience": 0.1,
        })
        .as_object()
        .cloned()
        .unwrap_or_default()
    }

    #[test]
    fn single_object_file_parses() {
        let seeds: SeedOverrides = serde_json::from_value(json!({
            "cell_id": "A",
            "state": { "susceptible": [0.9], "infected": [[0.1]] }
        }))
        .unwrap_or_default();
        assert_eq!(seeds.len(), 1);
    }

    #[test]
    fn list_file_parses_in_order() {
        let seeds: SeedOverrides = serde_json::from_value(json!([
            { "cell_id": "A", "state": {} },
            { "cell_id": 42, "state": {} }
        ]))
        .unwrap_or_default();
        let ids: Vec<&str> = seeds.iter().map(|s| s.cell_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "42"]);
    }

    #[test]
    fn apply_touches_only_compartments() {
        let mut target = state();
        let seed = SeedState {
            susceptible: Some(json!([0.7])),
            exposed: Some(json!([[0.1]])),
            infected: Some(json!([[0.2]])),
            recovered: Some(json!([[0.0]])),
            fatalities: Some(json!([0.0])),
        };
        assert_eq!(seed.apply_to(&mut target), 5);
        assert_eq!(target.get("susceptible"), Some(&json!([0.7])));
        assert_eq!(target.get("infected"), Some(&json!([[0.2]])));
        assert_eq!(target.get("population"), Some(&json!(100)));
        assert_eq!(target.get("disobedience"), Some(&json!(0.1)));
    }

    #[test]
    fn absent_compartment_is_left_alone() {
        let mut target = state();
        let seed = SeedState {
            infected: Some(json!([[0.5]])),
            ..SeedState::default()
        };
        assert_eq!(seed.apply_to(&mut target), 1);
        assert_eq!(target.get("susceptible"), Some(&json!([1.0])));
    }
}
