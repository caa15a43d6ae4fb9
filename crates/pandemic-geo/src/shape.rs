//! Region outlines and boundary-sharing measures.
//!
//! A region's boundary is every ring (exterior and holes) of every member
//! polygon. The shared boundary of two regions is the total length of the
//! collinear overlap between their boundary segments; touching at isolated
//! points contributes nothing.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{BoundingRect, EuclideanLength, Line, MultiPolygon, Rect};

/// A region polygon with its boundary pre-split into segments.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    segments: Vec<Line<f64>>,
    perimeter: f64,
    envelope: Option<Rect<f64>>,
}

impl RegionShape {
    /// Build a shape, computing its perimeter and envelope once.
    pub fn new(geometry: &MultiPolygon<f64>) -> Self {
        let rings = geometry
            .0
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()));

        let mut segments = Vec::new();
        let mut perimeter = 0.0;
        for ring in rings {
            perimeter += ring.euclidean_length();
            segments.extend(ring.lines().filter(|line| line.start != line.end));
        }
        let envelope = geometry.bounding_rect();

        Self {
            segments,
            perimeter,
            envelope,
        }
    }

    /// Total boundary length.
    pub const fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Length of the boundary this shape shares with `other`.
    pub fn shared_boundary_length(&self, other: &Self) -> f64 {
        let (Some(a), Some(b)) = (self.envelope, other.envelope) else {
            return 0.0;
        };
        if !rects_touch(&a, &b) {
            return 0.0;
        }

        let mut shared = 0.0;
        for mine in &self.segments {
            let my_rect = mine.bounding_rect();
            for theirs in &other.segments {
                if !rects_touch(&my_rect, &theirs.bounding_rect()) {
                    continue;
                }
                if let Some(LineIntersection::Collinear { intersection }) =
                    line_intersection(*mine, *theirs)
                {
                    shared += intersection.euclidean_length();
                }
            }
        }
        shared
    }
}

fn rects_touch(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x && a.min().y <= b.max().y && b.min().y <= a.max().y
}

/// Boundary lengths of one region pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySharing {
    /// Perimeter of the first region.
    pub perimeter_a: f64,
    /// Perimeter of the second region.
    pub perimeter_b: f64,
    /// Length of boundary common to both.
    pub shared: f64,
}

impl BoundarySharing {
    /// Measure the boundary shared by two shapes.
    pub fn between(a: &RegionShape, b: &RegionShape) -> Self {
        Self {
            perimeter_a: a.perimeter(),
            perimeter_b: b.perimeter(),
            shared: a.shared_boundary_length(b),
        }
    }

    /// Mean of the shared fraction of each perimeter.
    ///
    /// `(shared / perimeter_a + shared / perimeter_b) / 2`. Zero when nothing
    /// is shared or either perimeter is degenerate.
    pub fn correlation(&self) -> f64 {
        if self.shared <= 0.0 || self.perimeter_a <= 0.0 || self.perimeter_b <= 0.0 {
            return 0.0;
        }
        (self.shared / self.perimeter_a + self.shared / self.perimeter_b) / 2.0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use geo::{Coord, LineString, Polygon};

    use super::*;

    /// Axis-aligned rectangle as a single-polygon region.
    pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> RegionShape {
        let ring = LineString::new(vec![
            Coord { x: x0, y: y0 },
            Coord { x: x1, y: y0 },
            Coord { x: x1, y: y1 },
            Coord { x: x0, y: y1 },
            Coord { x: x0, y: y0 },
        ]);
        RegionShape::new(&MultiPolygon::new(vec![Polygon::new(ring, Vec::new())]))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn perimeter_of_unit_square() {
        assert!(close(rect(0.0, 0.0, 1.0, 1.0).perimeter(), 4.0));
    }

    #[test]
    fn perimeter_includes_holes() {
        let outer = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let hole = LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)]);
        let shape = RegionShape::new(&MultiPolygon::new(vec![Polygon::new(outer, vec![hole])]));
        assert!(close(shape.perimeter(), 20.0));
    }

    #[test]
    fn squares_sharing_a_full_side() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 2.0, 1.0);
        let sharing = BoundarySharing::between(&a, &b);
        assert!(close(sharing.shared, 1.0));
        assert!(close(sharing.correlation(), 0.25));
    }

    #[test]
    fn shared_edge_split_differently_on_each_side() {
        let a = rect(0.0, 0.0, 1.0, 2.0);
        // B's left edge is broken into two segments by an extra vertex.
        let ring = LineString::from(vec![
            (1.0, 0.0),
            (3.0, 0.0),
            (3.0, 2.0),
            (1.0, 2.0),
            (1.0, 1.5),
            (1.0, 0.0),
        ]);
        let b = RegionShape::new(&MultiPolygon::new(vec![Polygon::new(ring, Vec::new())]));
        assert!(close(a.shared_boundary_length(&b), 2.0));
        assert!(close(b.shared_boundary_length(&a), 2.0));
    }

    #[test]
    fn partial_overlap_is_asymmetric_in_fraction() {
        let small = rect(0.0, 0.0, 1.0, 1.0);
        let tall = rect(1.0, -1.0, 2.0, 3.0);
        let ab = BoundarySharing::between(&small, &tall);
        let ba = BoundarySharing::between(&tall, &small);
        assert!(close(ab.shared, 1.0));
        // (1/4 + 1/10) / 2
        assert!(close(ab.correlation(), 0.175));
        assert!(close(ab.correlation(), ba.correlation()));
    }

    #[test]
    fn corner_contact_shares_nothing() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 1.0, 2.0, 2.0);
        assert!(close(a.shared_boundary_length(&b), 0.0));
        assert!(close(BoundarySharing::between(&a, &b).correlation(), 0.0));
    }

    #[test]
    fn disjoint_regions_share_nothing() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(5.0, 5.0, 6.0, 6.0);
        assert!(close(a.shared_boundary_length(&b), 0.0));
    }

    #[test]
    fn identical_regions_correlate_fully() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let sharing = BoundarySharing::between(&a, &a);
        assert!(close(sharing.correlation(), 1.0));
    }

    #[test]
    fn degenerate_perimeter_yields_zero() {
        let sharing = BoundarySharing {
            perimeter_a: 0.0,
            perimeter_b: 4.0,
            shared: 1.0,
        };
        assert!(close(sharing.correlation(), 0.0));
    }
}
