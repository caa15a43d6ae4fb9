//! Input-side records: regions from the attributes table and adjacency rows.

use serde::{Deserialize, Serialize};

use crate::ids::RegionId;

/// One row of the region attributes table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region identifier.
    pub id: RegionId,
    /// Resident population. `None` when the table cell is blank or `NaN`.
    pub population: Option<u64>,
    /// Region area in the units of the source coordinate system.
    pub area: Option<f64>,
}

impl Region {
    /// Whether the region takes part in the scenario.
    ///
    /// Regions with a null or zero population are excluded everywhere,
    /// including as neighbors of other regions.
    pub const fn is_populated(&self) -> bool {
        matches!(self.population, Some(population) if population > 0)
    }
}

/// One row of the adjacency table.
///
/// Rows are directional: `(A, B)` only contributes to `A`'s neighborhood.
/// The reverse direction is expected as its own row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdjacencyPair {
    /// Region whose neighborhood receives the entry.
    pub region: RegionId,
    /// Neighboring region.
    pub neighbor: RegionId,
}

impl AdjacencyPair {
    /// Build a pair from anything convertible into region ids.
    pub fn new(region: impl Into<RegionId>, neighbor: impl Into<RegionId>) -> Self {
        Self {
            region: region.into(),
            neighbor: neighbor.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(population: Option<u64>) -> Region {
        Region {
            id: RegionId::new("1"),
            population,
            area: Some(1.5),
        }
    }

    #[test]
    fn null_and_zero_population_are_unpopulated() {
        assert!(!region(None).is_populated());
        assert!(!region(Some(0)).is_populated());
        assert!(region(Some(1)).is_populated());
    }

    #[test]
    fn pair_keeps_direction() {
        let pair = AdjacencyPair::new("A", "B");
        assert_eq!(pair.region.as_str(), "A");
        assert_eq!(pair.neighbor.as_str(), "B");
    }
}
