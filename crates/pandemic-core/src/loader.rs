//! Reads the tables, polygons, and templates of an area into memory.
//!
//! Everything is read in full before aggregation starts. Any unreadable or
//! malformed input aborts the run with a [`LoadError`].

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use pandemic_geo::{PolygonLayer, read_geopackage};
use pandemic_types::{AdjacencyPair, Region, RegionId};

use crate::config::{AreaLayout, AreaPaths};
use crate::error::LoadError;
use crate::templates::Templates;

/// Tokens treated as a missing value in numeric columns.
const NULL_TOKENS: &[&str] = &["", "nan", "na", "n/a", "null", "none"];

/// The region attributes table.
///
/// Rows are kept in file order. Lookups by id return the first row with
/// that id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributesTable {
    rows: Vec<Region>,
    first_row: HashMap<RegionId, usize>,
}

impl AttributesTable {
    /// Build a table from rows in file order.
    pub fn from_regions(rows: Vec<Region>) -> Self {
        let mut first_row = HashMap::new();
        for (index, region) in rows.iter().enumerate() {
            first_row.entry(region.id.clone()).or_insert(index);
        }
        Self { rows, first_row }
    }

    /// First row for `id`.
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.first_row.get(id).and_then(|&index| self.rows.get(index))
    }

    /// All rows in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything one run reads from disk.
#[derive(Debug, Clone)]
pub struct ScenarioInputs {
    /// Region attributes.
    pub attributes: AttributesTable,
    /// Adjacency rows in file order.
    pub adjacency: Vec<AdjacencyPair>,
    /// Region polygons.
    pub polygons: PolygonLayer,
    /// JSON templates.
    pub templates: Templates,
}

/// Load every input of an area.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered; nothing is loaded partially.
pub fn load_inputs(paths: &AreaPaths, layout: &AreaLayout) -> Result<ScenarioInputs, LoadError> {
    let attributes = load_attributes(&paths.attributes, layout)?;
    let adjacency = load_adjacency(&paths.adjacency, layout)?;
    let polygons = read_geopackage(
        &paths.polygons,
        &layout.polygon_id_column,
        layout.polygon_layer.as_deref(),
    )?;
    let templates = Templates::load(&paths.default_cell, &paths.fields, &paths.seeds)?;

    info!(
        regions = attributes.len(),
        adjacency_rows = adjacency.len(),
        polygons = polygons.len(),
        seeds = templates.seeds.len(),
        "Inputs loaded"
    );

    Ok(ScenarioInputs {
        attributes,
        adjacency,
        polygons,
        templates,
    })
}

/// Read the region attributes table.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] for unreadable CSV, [`LoadError::MissingColumn`]
/// if a configured column is absent, and [`LoadError::InvalidNumber`] for a
/// population that is negative or non-numeric or an area that is non-numeric.
pub fn load_attributes(path: &Path, layout: &AreaLayout) -> Result<AttributesTable, LoadError> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers().map_err(|source| csv_error(path, source))?.clone();
    let id_col = column_index(path, &headers, &layout.attributes_id_column)?;
    let pop_col = column_index(path, &headers, &layout.population_column)?;
    let area_col = column_index(path, &headers, &layout.area_column)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|source| csv_error(path, source))?;
        let row = index.saturating_add(1);
        let field = |col: usize| record.get(col).unwrap_or_default();
        let invalid = |column: &str, value: &str| LoadError::InvalidNumber {
            path: path.to_path_buf(),
            row,
            column: column.to_owned(),
            value: value.to_owned(),
        };

        let population_text = field(pop_col);
        let population = parse_population(population_text)
            .ok_or_else(|| invalid(&layout.population_column, population_text))?;
        let area_text = field(area_col);
        let area = parse_optional_f64(area_text).ok_or_else(|| invalid(&layout.area_column, area_text))?;

        rows.push(Region {
            id: RegionId::from_text(field(id_col)),
            population,
            area,
        });
    }
    Ok(AttributesTable::from_regions(rows))
}

/// Read the adjacency table, preserving row order.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] for unreadable CSV and
/// [`LoadError::MissingColumn`] if a configured column is absent.
pub fn load_adjacency(path: &Path, layout: &AreaLayout) -> Result<Vec<AdjacencyPair>, LoadError> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers().map_err(|source| csv_error(path, source))?.clone();
    let region_col = column_index(path, &headers, &layout.adjacency_region_column)?;
    let neighbor_col = column_index(path, &headers, &layout.adjacency_neighbor_column)?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        pairs.push(AdjacencyPair {
            region: RegionId::from_text(record.get(region_col).unwrap_or_default()),
            neighbor: RegionId::from_text(record.get(neighbor_col).unwrap_or_default()),
        });
    }
    Ok(pairs)
}

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, LoadError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

fn csv_error(path: &Path, source: csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn column_index(path: &Path, headers: &csv::StringRecord, column: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_owned(),
        })
}

fn is_null(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    NULL_TOKENS.contains(&lowered.as_str())
}

/// `Some(None)` for a null cell, `Some(Some(n))` for a count, `None` if invalid.
///
/// Fractional counts are truncated toward zero.
fn parse_population(text: &str) -> Option<Option<u64>> {
    if is_null(text) {
        return Some(None);
    }
    if let Ok(count) = text.parse::<u64>() {
        return Some(Some(count));
    }
    let value = text.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value >= 1.8e19 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value.trunc() as u64;
    Some(Some(count))
}

/// `Some(None)` for a null cell, `Some(Some(x))` for a number, `None` if invalid.
fn parse_optional_f64(text: &str) -> Option<Option<f64>> {
    if is_null(text) {
        return Some(None);
    }
    text.parse::<f64>().ok().map(Some)
}
