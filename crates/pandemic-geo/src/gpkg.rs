//! GeoPackage polygon layer reader.
//!
//! The feature table and its geometry column are discovered through the
//! `gpkg_geometry_columns` registry. Each feature contributes one
//! [`RegionShape`] keyed by the configured id column.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::{debug, warn};

use pandemic_types::RegionId;

use crate::error::GeoError;
use crate::layer::PolygonLayer;
use crate::shape::RegionShape;
use crate::wkb::decode_gpkg_geometry;

/// Feature table and geometry column of one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LayerInfo {
    table: String,
    geometry_column: String,
}

/// Read every feature of a GeoPackage layer into a [`PolygonLayer`].
///
/// When `layer` is `None` the first registered geometry layer (by table
/// name) is used. Features with a null id or null geometry are skipped;
/// duplicate ids keep the first feature.
///
/// # Errors
///
/// Returns [`GeoError::Sqlite`] if the file cannot be opened or queried
/// (including a missing id column), [`GeoError::NoGeometryLayer`] or
/// [`GeoError::LayerNotFound`] if no matching layer is registered, and
/// [`GeoError::Geometry`] if a geometry blob cannot be decoded.
pub fn read_geopackage(
    path: &Path,
    id_column: &str,
    layer: Option<&str>,
) -> Result<PolygonLayer, GeoError> {
    let sqlite = |source| GeoError::Sqlite {
        path: path.to_path_buf(),
        source,
    };

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(sqlite)?;
    let info = find_layer(&conn, path, layer)?;
    debug!(
        path = %path.display(),
        table = info.table,
        geometry_column = info.geometry_column,
        "Reading GeoPackage layer"
    );

    let sql = format!(
        "SELECT {}, {} FROM {}",
        quote_ident(id_column),
        quote_ident(&info.geometry_column),
        quote_ident(&info.table)
    );
    let mut stmt = conn.prepare(&sql).map_err(sqlite)?;
    let mut rows = stmt.query([]).map_err(sqlite)?;

    let mut polygons = PolygonLayer::new();
    let mut skipped = 0_usize;
    while let Some(row) = rows.next().map_err(sqlite)? {
        let Some(id) = region_id(row.get_ref(0).map_err(sqlite)?) else {
            skipped = skipped.saturating_add(1);
            continue;
        };
        let blob = match row.get_ref(1).map_err(sqlite)? {
            ValueRef::Blob(bytes) => bytes,
            _ => {
                warn!(region = %id, "Feature has no geometry, skipping");
                skipped = skipped.saturating_add(1);
                continue;
            }
        };
        let geometry = decode_gpkg_geometry(blob).map_err(|source| GeoError::Geometry {
            region: id.clone(),
            source,
        })?;
        if !polygons.insert(id.clone(), RegionShape::new(&geometry)) {
            warn!(region = %id, "Duplicate feature id, keeping the first geometry");
        }
    }

    debug!(features = polygons.len(), skipped, "GeoPackage layer loaded");
    Ok(polygons)
}

fn find_layer(conn: &Connection, path: &Path, layer: Option<&str>) -> Result<LayerInfo, GeoError> {
    let sqlite = |source| GeoError::Sqlite {
        path: path.to_path_buf(),
        source,
    };
    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<LayerInfo> {
        Ok(LayerInfo {
            table: row.get(0)?,
            geometry_column: row.get(1)?,
        })
    };

    match layer {
        Some(name) => conn
            .query_row(
                "SELECT table_name, column_name FROM gpkg_geometry_columns WHERE table_name = ?1",
                [name],
                map_row,
            )
            .optional()
            .map_err(sqlite)?
            .ok_or_else(|| GeoError::LayerNotFound {
                path: path.to_path_buf(),
                layer: name.to_owned(),
            }),
        None => conn
            .query_row(
                "SELECT table_name, column_name FROM gpkg_geometry_columns ORDER BY table_name LIMIT 1",
                [],
                map_row,
            )
            .optional()
            .map_err(sqlite)?
            .ok_or_else(|| GeoError::NoGeometryLayer {
                path: path.to_path_buf(),
            }),
    }
}

/// Coerce an id cell to a region id. Null and blob ids yield `None`.
fn region_id(value: ValueRef<'_>) -> Option<RegionId> {
    match value {
        ValueRef::Integer(id) => Some(RegionId::from_integer(id)),
        ValueRef::Real(id) => Some(RegionId::from_float(id)),
        ValueRef::Text(bytes) => Some(RegionId::from_text(&String::from_utf8_lossy(bytes))),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
