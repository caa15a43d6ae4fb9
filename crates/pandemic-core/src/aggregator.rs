//! The adjacency pass: one [`Cell`] per valid region, in first-encounter order.
//!
//! For each adjacency row `(region, neighbor)`:
//!
//! 1. skip it if either id is invalid;
//! 2. create `region`'s cell on first sight (deep-cloned default state with
//!    the region's population);
//! 3. compute the boundary-sharing correlation of the two polygons;
//! 4. skip a zero correlation, otherwise set `neighborhood[neighbor]`.
//!
//! Only the `region` side of a row is written. Ids that only ever appear as
//! `neighbor` never get a cell. After the pass every cell receives a
//! self-entry with the template's self-correlation.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Number;
use tracing::{debug, info, trace};

use pandemic_geo::PolygonLayer;
use pandemic_types::{AdjacencyPair, Cell, RegionId};

use crate::error::PipelineError;
use crate::loader::AttributesTable;
use crate::progress::ProgressSink;
use crate::templates::DefaultCellTemplate;

/// Counters describing one adjacency pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Adjacency rows read.
    pub rows: usize,
    /// Rows skipped because an endpoint is invalid.
    pub invalid_rows: usize,
    /// Rows skipped because the regions share no boundary.
    pub zero_correlation_rows: usize,
    /// Rows that set a neighborhood entry.
    pub linked_rows: usize,
}

/// Cells produced by the adjacency pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Region cells in first-encounter order.
    pub cells: IndexMap<RegionId, Cell>,
    /// Pass counters.
    pub stats: AggregationStats,
}

/// Joins adjacency rows with attributes and polygons.
#[derive(Debug, Clone, Copy)]
pub struct AdjacencyAggregator<'a> {
    attributes: &'a AttributesTable,
    polygons: &'a PolygonLayer,
    invalid: &'a HashSet<RegionId>,
    defaults: &'a DefaultCellTemplate,
}

impl<'a> AdjacencyAggregator<'a> {
    /// Bind the lookup tables of one run.
    pub const fn new(
        attributes: &'a AttributesTable,
        polygons: &'a PolygonLayer,
        invalid: &'a HashSet<RegionId>,
        defaults: &'a DefaultCellTemplate,
    ) -> Self {
        Self {
            attributes,
            polygons,
            invalid,
            defaults,
        }
    }

    /// Run the pass over `pairs` in order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownRegion`] if a valid region has no
    /// attributes row, and [`PipelineError::Geo`] if either region of a row
    /// has no polygon.
    pub fn aggregate(
        &self,
        pairs: &[AdjacencyPair],
        progress: &mut dyn ProgressSink,
    ) -> Result<Aggregation, PipelineError> {
        let mut cells: IndexMap<RegionId, Cell> = IndexMap::new();
        let mut stats = AggregationStats {
            rows: pairs.len(),
            ..AggregationStats::default()
        };

        for (row, pair) in pairs.iter().enumerate() {
            if let Some(bad) = [&pair.region, &pair.neighbor]
                .into_iter()
                .find(|id| self.invalid.contains(*id))
            {
                debug!(row, region = %bad, "Invalid region id found");
                stats.invalid_rows = stats.invalid_rows.saturating_add(1);
                continue;
            }

            if !cells.contains_key(&pair.region) {
                let cell = self.new_cell(&pair.region)?;
                cells.insert(pair.region.clone(), cell);
            }

            let sharing = self.polygons.boundary_sharing(&pair.region, &pair.neighbor)?;
            let correlation = sharing.correlation();
            let Some(weight) = Number::from_f64(correlation).filter(|_| correlation > 0.0) else {
                trace!(row, region = %pair.region, neighbor = %pair.neighbor, "No shared boundary");
                stats.zero_correlation_rows = stats.zero_correlation_rows.saturating_add(1);
                continue;
            };

            if let Some(cell) = cells.get_mut(&pair.region) {
                cell.set_neighbor(pair.neighbor.clone(), self.defaults.vicinity(weight));
            }
            stats.linked_rows = stats.linked_rows.saturating_add(1);
            progress.row_processed(row, pairs.len());
        }
        progress.finished(pairs.len().saturating_sub(1), pairs.len());

        for (id, cell) in &mut cells {
            cell.set_neighbor(id.clone(), self.defaults.self_vicinity());
        }

        info!(
            cells = cells.len(),
            rows = stats.rows,
            invalid_rows = stats.invalid_rows,
            zero_correlation_rows = stats.zero_correlation_rows,
            "Adjacency aggregated"
        );
        Ok(Aggregation { cells, stats })
    }

    fn new_cell(&self, id: &RegionId) -> Result<Cell, PipelineError> {
        let region = self
            .attributes
            .get(id)
            .ok_or_else(|| PipelineError::UnknownRegion(id.clone()))?;
        let population = region
            .population
            .ok_or_else(|| PipelineError::UnknownRegion(id.clone()))?;
        trace!(region = %id, population, area = ?region.area, "New cell");
        Ok(Cell::from_template(&self.defaults.state, population))
    }
}
