//! Region polygons and boundary sharing for the pandemic scenario generator.
//!
//! This crate owns everything geometric: decoding the GeoPackage polygon
//! layer, measuring perimeters, and measuring how much boundary two regions
//! share. The boundary-sharing correlation between regions `a` and `b` is
//!
//! ```text
//! (shared / perimeter_a + shared / perimeter_b) / 2
//! ```
//!
//! # Modules
//!
//! - [`error`] -- [`GeoError`] and the blob decoding [`WkbError`].
//! - [`gpkg`] -- Reads a GeoPackage feature layer into a [`PolygonLayer`].
//! - [`layer`] -- Region shapes indexed by region id.
//! - [`shape`] -- [`RegionShape`] and [`BoundarySharing`].
//! - [`wkb`] -- GeoPackage binary header and WKB decoding.
//!
//! [`WkbError`]: error::WkbError

pub mod error;
pub mod gpkg;
pub mod layer;
pub mod shape;
pub mod wkb;

// Re-export primary types at crate root.
pub use error::{GeoError, WkbError};
pub use gpkg::read_geopackage;
pub use layer::PolygonLayer;
pub use shape::{BoundarySharing, RegionShape};
