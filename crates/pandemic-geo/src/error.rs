//! Error types for the `pandemic-geo` crate.
//!
//! Every variant is fatal for a scenario run: a polygon layer that cannot be
//! read or decoded leaves no way to compute correlations.

use std::path::PathBuf;

use pandemic_types::RegionId;

/// Errors raised while loading or querying region geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The GeoPackage could not be opened or queried.
    #[error("failed to read GeoPackage {path}: {source}")]
    Sqlite {
        /// The GeoPackage file.
        path: PathBuf,
        /// The underlying `SQLite` error.
        source: rusqlite::Error,
    },

    /// The GeoPackage declares no feature layer with a geometry column.
    #[error("GeoPackage {path} has no geometry layer")]
    NoGeometryLayer {
        /// The GeoPackage file.
        path: PathBuf,
    },

    /// The requested layer is not listed in `gpkg_geometry_columns`.
    #[error("GeoPackage {path} has no layer named {layer}")]
    LayerNotFound {
        /// The GeoPackage file.
        path: PathBuf,
        /// The requested layer name.
        layer: String,
    },

    /// A feature's geometry blob could not be decoded.
    #[error("feature {region}: {source}")]
    Geometry {
        /// The feature's region id.
        region: RegionId,
        /// What was wrong with the blob.
        source: WkbError,
    },

    /// A region referenced by the adjacency table has no polygon.
    #[error("no geometry for region {0}")]
    MissingGeometry(RegionId),
}

/// Problems found while decoding a GeoPackage geometry blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WkbError {
    /// The blob does not start with the `GP` magic bytes.
    #[error("missing GeoPackage magic bytes")]
    BadMagic,

    /// The header declares an envelope layout outside the standard set.
    #[error("invalid envelope indicator {0}")]
    BadEnvelope(u8),

    /// The header uses the extended geometry type flag.
    #[error("extended GeoPackage geometries are not supported")]
    Extended,

    /// A WKB byte-order marker other than 0 or 1.
    #[error("invalid byte order marker {0}")]
    BadByteOrder(u8),

    /// The blob ended before the geometry was complete.
    #[error("geometry blob truncated at byte {0}")]
    Truncated(usize),

    /// A geometry type other than Polygon or `MultiPolygon`.
    #[error("unsupported geometry type code {0}")]
    UnsupportedType(u32),
}
