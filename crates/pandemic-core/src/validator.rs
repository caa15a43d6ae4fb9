//! Finds the regions excluded from the scenario.

use std::collections::HashSet;

use tracing::info;

use pandemic_types::RegionId;

use crate::loader::AttributesTable;

/// Ids of every region with a null or zero population.
///
/// An id is invalid if any of its rows is unpopulated.
pub fn invalid_region_ids(attributes: &AttributesTable) -> HashSet<RegionId> {
    let invalid: HashSet<RegionId> = attributes
        .iter()
        .filter(|region| !region.is_populated())
        .map(|region| region.id.clone())
        .collect();
    info!(
        invalid = invalid.len(),
        regions = attributes.len(),
        "Invalid region ids found"
    );
    invalid
}
