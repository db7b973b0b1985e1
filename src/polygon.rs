//! Input polygons: one outer ring plus zero or more hole rings.
//!
//! A [`Polygon`] is a plain value supplied by the caller. Before any
//! decomposition work it is checked by [`Polygon::validate`], which rejects
//! rather than repairs:
//!
//! - rings with fewer than three vertices or non-finite coordinates
//! - consecutive duplicate vertices (a ring that repeats its first vertex at the end is rejected too)
//! - rings with zero area
//! - rings whose edges touch or cross each other
//! - holes that are not strictly inside the outer ring, or that touch or contain another hole
//!
//! Rings may use either winding; the mesh builder normalizes orientation.
//!
//! # Example
//!
//! ```
//! use boustro::polygon::Polygon;
//! use nalgebra::Point2;
//!
//! let outer = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 4.0),
//!     Point2::new(0.0, 4.0),
//! ];
//! let hole = vec![
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 3.0),
//!     Point2::new(3.0, 3.0),
//!     Point2::new(3.0, 1.0),
//! ];
//!
//! let polygon = Polygon::with_holes(outer, vec![hole]);
//! assert!(polygon.validate().is_ok());
//! assert!((polygon.area() - 12.0).abs() < 1e-12);
//! ```

use nalgebra::Point2;

use crate::error::{DecompError, InvalidReason, Result, RingRole};
use crate::predicates::{
    bounding_box, cross, point_in_ring, point_on_ring, segments_intersect, signed_area,
};

/// Rings whose area falls below this fraction of their squared bounding-box
/// diagonal are treated as zero-area.
const ZERO_AREA_RATIO: f64 = 1e-12;

/// A polygon with optional holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    /// The outer boundary, either winding.
    pub outer: Vec<Point2<f64>>,

    /// Hole boundaries, either winding.
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Polygon {
    /// Create a polygon without holes.
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Create a polygon with holes.
    pub fn with_holes(outer: Vec<Point2<f64>>, holes: Vec<Vec<Point2<f64>>>) -> Self {
        Self { outer, holes }
    }

    /// Create a polygon without holes from `(x, y)` pairs.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Add a hole ring.
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Builder-style variant of [`add_hole`](Self::add_hole).
    pub fn with_hole(mut self, hole: Vec<Point2<f64>>) -> Self {
        self.holes.push(hole);
        self
    }

    /// Number of rings (outer plus holes).
    pub fn num_rings(&self) -> usize {
        1 + self.holes.len()
    }

    /// Total number of vertices over all rings.
    pub fn num_vertices(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Iterate over `(role, ring)` pairs, outer ring first.
    pub fn rings(&self) -> impl Iterator<Item = (RingRole, &[Point2<f64>])> + '_ {
        std::iter::once((RingRole::Outer, self.outer.as_slice())).chain(
            self.holes
                .iter()
                .enumerate()
                .map(|(i, h)| (RingRole::Hole(i), h.as_slice())),
        )
    }

    /// Area enclosed by the outer ring minus the hole areas.
    pub fn area(&self) -> f64 {
        signed_area(&self.outer).abs()
            - self
                .holes
                .iter()
                .map(|h| signed_area(h).abs())
                .sum::<f64>()
    }

    /// Bounding box of the outer ring.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounding_box(&self.outer)
    }

    /// Check every structural requirement, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        for (role, ring) in self.rings() {
            validate_ring(ring, role)?;
        }

        for (i, hole) in self.holes.iter().enumerate() {
            if !hole_inside(&self.outer, hole) {
                return Err(DecompError::invalid_polygon(
                    RingRole::Hole(i),
                    InvalidReason::HoleNotInterior,
                ));
            }
        }

        for i in 0..self.holes.len() {
            for j in (i + 1)..self.holes.len() {
                if rings_overlap(&self.holes[i], &self.holes[j]) {
                    return Err(DecompError::invalid_polygon(
                        RingRole::Hole(j),
                        InvalidReason::HolesOverlap { other: i },
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check validity without reporting the reason.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Validate a single ring in isolation.
pub fn validate_ring(ring: &[Point2<f64>], role: RingRole) -> Result<()> {
    let fail = |reason| Err(DecompError::invalid_polygon(role, reason));
    let n = ring.len();

    if let Some(index) = ring.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return fail(InvalidReason::NonFinite { index });
    }
    if n < 3 {
        return fail(InvalidReason::TooFewVertices { count: n });
    }
    for i in 0..n {
        if ring[i] == ring[(i + 1) % n] {
            return fail(InvalidReason::DuplicateVertex { index: (i + 1) % n });
        }
    }

    let area = signed_area(ring).abs();
    let diagonal = bounding_box(ring)
        .map(|(min, max)| (max - min).norm())
        .unwrap_or(0.0);
    if area <= ZERO_AREA_RATIO * diagonal * diagonal {
        return fail(InvalidReason::ZeroArea);
    }

    if let Some((first, second)) = find_self_intersection(ring) {
        return fail(InvalidReason::SelfIntersection { first, second });
    }

    Ok(())
}

/// Find the first pair of ring edges that touch or cross.
///
/// Adjacent edges only count when they fold back onto each other.
pub fn find_self_intersection(ring: &[Point2<f64>]) -> Option<(usize, usize)> {
    let n = ring.len();
    for i in 0..n {
        let a1 = &ring[i];
        let a2 = &ring[(i + 1) % n];

        // Spike: the next edge doubles back along this one.
        let a3 = &ring[(i + 2) % n];
        if cross(a1, a2, a3) == 0.0 && (a2 - a1).dot(&(a3 - a2)) < 0.0 {
            return Some((i, (i + 1) % n));
        }

        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let b1 = &ring[j];
            let b2 = &ring[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                return Some((i, j));
            }
        }
    }
    None
}

fn edges_touch(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    let (na, nb) = (a.len(), b.len());
    (0..na).any(|i| {
        let a1 = &a[i];
        let a2 = &a[(i + 1) % na];
        (0..nb).any(|j| segments_intersect(a1, a2, &b[j], &b[(j + 1) % nb]))
    })
}

fn hole_inside(outer: &[Point2<f64>], hole: &[Point2<f64>]) -> bool {
    if edges_touch(outer, hole) {
        return false;
    }
    hole.iter()
        .all(|p| !point_on_ring(p, outer) && point_in_ring(p, outer))
}

fn rings_overlap(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    // Without edge contact, overlap means one ring contains the other.
    edges_touch(a, b) || point_in_ring(&a[0], b) || point_in_ring(&b[0], a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn square(min: f64, max: f64) -> Vec<Point2<f64>> {
        vec![p(min, min), p(max, min), p(max, max), p(min, max)]
    }

    fn expect_reason(polygon: &Polygon) -> (RingRole, InvalidReason) {
        match polygon.validate() {
            Err(DecompError::InvalidPolygon { ring, reason }) => (ring, reason),
            other => panic!("expected InvalidPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_square() {
        let poly = Polygon::new(square(0.0, 1.0));
        assert!(poly.is_valid());
        assert_eq!(poly.num_rings(), 1);
        assert_eq!(poly.num_vertices(), 4);
        assert!((poly.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_clockwise_accepted() {
        let mut ring = square(0.0, 1.0);
        ring.reverse();
        assert!(Polygon::new(ring).is_valid());
    }

    #[test]
    fn test_too_few_vertices() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(
            expect_reason(&poly),
            (RingRole::Outer, InvalidReason::TooFewVertices { count: 2 })
        );
    }

    #[test]
    fn test_closed_ring_rejected() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(
            expect_reason(&poly),
            (RingRole::Outer, InvalidReason::DuplicateVertex { index: 0 })
        );
    }

    #[test]
    fn test_duplicate_consecutive() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            expect_reason(&poly),
            (RingRole::Outer, InvalidReason::DuplicateVertex { index: 2 })
        );
    }

    #[test]
    fn test_zero_area() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(expect_reason(&poly).1, InvalidReason::ZeroArea);
    }

    #[test]
    fn test_non_finite() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]);
        assert_eq!(expect_reason(&poly).1, InvalidReason::NonFinite { index: 1 });
    }

    #[test]
    fn test_bowtie_rejected() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 2.0)]);
        assert_eq!(
            expect_reason(&poly).1,
            InvalidReason::SelfIntersection { first: 0, second: 2 }
        );
    }

    #[test]
    fn test_touching_vertex_rejected() {
        // Vertex 4 touches edge 1 (from (4, 0) to (4, 4)).
        let poly = Polygon::from_coords(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (2.0, 4.0),
            (4.0, 2.0),
            (0.0, 4.0),
        ]);
        assert!(matches!(
            expect_reason(&poly).1,
            InvalidReason::SelfIntersection { .. }
        ));
    }

    #[test]
    fn test_spike_rejected() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (4.0, 0.0), (2.0, 0.0), (2.0, 3.0)]);
        assert!(!poly.is_valid());
    }

    #[test]
    fn test_hole_inside() {
        let poly = Polygon::new(square(0.0, 4.0)).with_hole(square(1.0, 3.0));
        assert!(poly.is_valid());
        assert!((poly.area() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_hole_outside() {
        let poly = Polygon::new(square(0.0, 4.0)).with_hole(square(5.0, 6.0));
        assert_eq!(
            expect_reason(&poly),
            (RingRole::Hole(0), InvalidReason::HoleNotInterior)
        );
    }

    #[test]
    fn test_hole_touching_outer() {
        let poly = Polygon::new(square(0.0, 4.0)).with_hole(square(0.0, 2.0));
        assert_eq!(expect_reason(&poly).1, InvalidReason::HoleNotInterior);
    }

    #[test]
    fn test_nested_holes_rejected() {
        let poly = Polygon::with_holes(square(0.0, 10.0), vec![square(1.0, 9.0), square(3.0, 5.0)]);
        assert_eq!(
            expect_reason(&poly),
            (RingRole::Hole(1), InvalidReason::HolesOverlap { other: 0 })
        );
    }

    #[test]
    fn test_crossing_holes_rejected() {
        let poly = Polygon::with_holes(square(0.0, 10.0), vec![square(1.0, 4.0), square(3.0, 6.0)]);
        assert!(matches!(
            expect_reason(&poly).1,
            InvalidReason::HolesOverlap { other: 0 }
        ));
    }

    #[test]
    fn test_disjoint_holes() {
        let poly = Polygon::with_holes(square(0.0, 10.0), vec![square(1.0, 3.0), square(5.0, 8.0)]);
        assert!(poly.is_valid());
    }
}
