//! One end-to-end run: load, validate, aggregate, assemble, write.

use std::path::PathBuf;

use tracing::info;

use crate::aggregator::{AdjacencyAggregator, AggregationStats};
use crate::assembler::{assemble, write_document};
use crate::config::{AreaPreset, ScenarioConfig};
use crate::error::PipelineError;
use crate::loader::load_inputs;
use crate::progress::{LogProgress, ProgressSink, QuietProgress};
use crate::validator::invalid_region_ids;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// File the scenario was written to.
    pub output: PathBuf,
    /// Region cells written (the template entry excluded).
    pub cells: usize,
    /// Neighborhood entries written, self-entries included.
    pub edges: usize,
    /// Regions excluded for a null or zero population.
    pub invalid: usize,
    /// Adjacency pass counters.
    pub stats: AggregationStats,
}

/// Generate the scenario of `preset`.
///
/// With `progress` off only completion is reported.
///
/// # Errors
///
/// Any load, geometry, or write failure aborts the run; no partial output is
/// written.
pub fn run(config: &ScenarioConfig, preset: AreaPreset, progress: bool) -> Result<RunSummary, PipelineError> {
    let layout = config.layout(preset);
    let paths = config.area_paths(preset);
    info!(
        area = %preset,
        attributes = %paths.attributes.display(),
        adjacency = %paths.adjacency.display(),
        polygons = %paths.polygons.display(),
        "Generating scenario"
    );

    let inputs = load_inputs(&paths, &layout)?;
    let invalid = invalid_region_ids(&inputs.attributes);

    let mut log_sink = LogProgress::new(layout.progress_interval);
    let mut quiet_sink = QuietProgress;
    let sink: &mut dyn ProgressSink = if progress { &mut log_sink } else { &mut quiet_sink };

    let aggregation = AdjacencyAggregator::new(
        &inputs.attributes,
        &inputs.polygons,
        &invalid,
        &inputs.templates.default_cell,
    )
    .aggregate(&inputs.adjacency, sink)?;

    let document = assemble(
        &inputs.templates.default_cell.raw,
        aggregation.cells,
        &inputs.templates.fields,
        &inputs.templates.seeds,
    );
    write_document(&document, &paths.output)?;

    Ok(RunSummary {
        output: paths.output,
        cells: document.cell_count(),
        edges: document.edge_count(),
        invalid: invalid.len(),
        stats: aggregation.stats,
    })
}
