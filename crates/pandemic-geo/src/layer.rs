//! The polygon layer: region shapes indexed by region id.

use std::collections::HashMap;

use pandemic_types::RegionId;

use crate::error::GeoError;
use crate::shape::{BoundarySharing, RegionShape};

/// All region shapes of one area.
#[derive(Debug, Clone, Default)]
pub struct PolygonLayer {
    shapes: HashMap<RegionId, RegionShape>,
}

impl PolygonLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape. Returns `false` and keeps the existing shape when the id
    /// is already present.
    pub fn insert(&mut self, id: RegionId, shape: RegionShape) -> bool {
        if self.shapes.contains_key(&id) {
            return false;
        }
        self.shapes.insert(id, shape);
        true
    }

    /// Look up a region's shape.
    pub fn get(&self, id: &RegionId) -> Option<&RegionShape> {
        self.shapes.get(id)
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the layer holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Measure the boundary shared by two regions.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::MissingGeometry`] if either region has no shape.
    pub fn boundary_sharing(
        &self,
        region: &RegionId,
        neighbor: &RegionId,
    ) -> Result<BoundarySharing, GeoError> {
        let a = self
            .get(region)
            .ok_or_else(|| GeoError::MissingGeometry(region.clone()))?;
        let b = self
            .get(neighbor)
            .ok_or_else(|| GeoError::MissingGeometry(neighbor.clone()))?;
        Ok(BoundarySharing::between(a, b))
    }
}

impl FromIterator<(RegionId, RegionShape)> for PolygonLayer {
    fn from_iter<I: IntoIterator<Item = (RegionId, RegionShape)>>(iter: I) -> Self {
        let mut layer = Self::new();
        for (id, shape) in iter {
            layer.insert(id, shape);
        }
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::tests::rect;

    #[test]
    fn first_shape_wins() {
        let mut layer = PolygonLayer::new();
        assert!(layer.insert(RegionId::new("A"), rect(0.0, 0.0, 1.0, 1.0)));
        assert!(!layer.insert(RegionId::new("A"), rect(0.0, 0.0, 5.0, 5.0)));
        assert_eq!(layer.len(), 1);
        let perimeter = layer.get(&RegionId::new("A")).map(RegionShape::perimeter);
        assert!(perimeter.is_some_and(|p| (p - 4.0).abs() < 1e-12));
    }

    #[test]
    fn sharing_between_known_regions() {
        let layer: PolygonLayer = [
            (RegionId::new("A"), rect(0.0, 0.0, 1.0, 1.0)),
            (RegionId::new("B"), rect(1.0, 0.0, 2.0, 1.0)),
        ]
        .into_iter()
        .collect();
        let sharing = layer.boundary_sharing(&RegionId::new("A"), &RegionId::new("B"));
        assert!(sharing.is_ok_and(|s| (s.correlation() - 0.25).abs() < 1e-12));
    }

    #[test]
    fn missing_region_is_an_error() {
        let layer: PolygonLayer =
            std::iter::once((RegionId::new("A"), rect(0.0, 0.0, 1.0, 1.0))).collect();
        let result = layer.boundary_sharing(&RegionId::new("A"), &RegionId::new("Q"));
        assert!(matches!(result, Err(GeoError::MissingGeometry(id)) if id.as_str() == "Q"));
    }
}
