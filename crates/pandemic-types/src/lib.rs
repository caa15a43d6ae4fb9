//! Shared type definitions for the pandemic scenario generator.
//!
//! These types describe both sides of the transform: the region records read
//! from the attributes and adjacency tables, and the cell records written to
//! the scenario document consumed by the geographical cell simulator.
//!
//! # Modules
//!
//! - [`ids`] -- [`RegionId`], the coerced string identifier of a region
//! - [`region`] -- Attribute rows and directional adjacency pairs
//! - [`cell`] -- Cells, vicinities, and the open cell state object
//! - [`seed`] -- Seed infection overrides
//! - [`scenario`] -- The assembled, order-preserving scenario document

pub mod cell;
pub mod ids;
pub mod region;
pub mod scenario;
pub mod seed;

// Re-export all public types at crate root for convenience.
pub use cell::{Cell, CellState, POPULATION_FIELD, Vicinity};
pub use ids::RegionId;
pub use region::{AdjacencyPair, Region};
pub use scenario::{DEFAULT_CELL_KEY, ScenarioDocument};
pub use seed::{SeedOverride, SeedOverrides, SeedState};
