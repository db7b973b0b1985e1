//! Planar predicates shared by validation, cut visibility and cell checks.
//!
//! All tests are evaluated directly on `f64` coordinates with exact zero
//! comparisons. Inputs are validated beforehand so the predicates never see
//! non-finite values.

use std::f64::consts::TAU;

use nalgebra::{Point2, Vector2};

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `c` lies to the left of the directed line `a -> b`.
    CounterClockwise,
    /// `c` lies to the right of the directed line `a -> b`.
    Clockwise,
    /// The three points are collinear.
    Collinear,
}

/// Twice the signed area of the triangle `(o, a, b)`.
#[inline]
pub fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// z-component of the cross product of two vectors.
#[inline]
pub fn cross_vec(u: &Vector2<f64>, v: &Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Orientation of the triangle `(a, b, c)`.
#[inline]
pub fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Orientation {
    let det = cross(a, b, c);
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// True if `c` is strictly left of `a -> b`.
#[inline]
pub fn left(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    cross(a, b, c) > 0.0
}

/// True if `c` is left of or on the line through `a -> b`.
#[inline]
pub fn left_on(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    cross(a, b, c) >= 0.0
}

/// True if `p` lies on the closed segment `a-b`.
pub fn on_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> bool {
    cross(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// True if the closed segments `a1-a2` and `b1-b2` share at least one point.
///
/// Touching at an endpoint and collinear overlap both count.
pub fn segments_intersect(
    a1: &Point2<f64>,
    a2: &Point2<f64>,
    b1: &Point2<f64>,
    b2: &Point2<f64>,
) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    if segments_properly_intersect(a1, a2, b1, b2) {
        return true;
    }

    (d1 == Orientation::Collinear && on_segment(a1, b1, b2))
        || (d2 == Orientation::Collinear && on_segment(a2, b1, b2))
        || (d3 == Orientation::Collinear && on_segment(b1, a1, a2))
        || (d4 == Orientation::Collinear && on_segment(b2, a1, a2))
}

/// True if the segments cross at a single point interior to both.
pub fn segments_properly_intersect(
    a1: &Point2<f64>,
    a2: &Point2<f64>,
    b1: &Point2<f64>,
    b2: &Point2<f64>,
) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Signed area of a closed ring (shoelace formula). Positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Ray-casting point-in-ring test.
///
/// The result for points exactly on the boundary is unspecified; combine with
/// [`point_on_ring`] when the boundary matters.
pub fn point_in_ring(p: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &ring[i];
        let pj = &ring[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True if `p` lies on any edge of the ring.
pub fn point_on_ring(p: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    (0..n).any(|i| on_segment(p, &ring[i], &ring[(i + 1) % n]))
}

/// True if `p` is strictly inside the ring.
pub fn point_strictly_in_ring(p: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    !point_on_ring(p, ring) && point_in_ring(p, ring)
}

/// True if the direction from `v` toward `target` enters the interior wedge at `v`.
///
/// `prev` and `next` are the ring neighbors of `v`, with the interior on the
/// left of `prev -> v -> next`. Directions along either incident edge are
/// outside the cone.
pub fn in_cone(
    prev: &Point2<f64>,
    v: &Point2<f64>,
    next: &Point2<f64>,
    target: &Point2<f64>,
) -> bool {
    if left_on(v, next, prev) {
        left(v, target, prev) && left(target, v, next)
    } else {
        !(left_on(v, target, next) && left_on(target, v, prev))
    }
}

/// Counter-clockwise angle from `from` to `to`, in `[0, 2π)`.
pub fn ccw_angle(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    let angle = to.y.atan2(to.x) - from.y.atan2(from.x);
    if angle < 0.0 {
        angle + TAU
    } else if angle >= TAU {
        angle - TAU
    } else {
        angle
    }
}

/// Axis-aligned bounding box of a point set.
pub fn bounding_box<'a>(
    points: impl IntoIterator<Item = &'a Point2<f64>>,
) -> Option<(Point2<f64>, Point2<f64>)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut min = *first;
    let mut max = *first;
    for p in iter {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn square() -> Vec<Point2<f64>> {
        vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]
    }

    #[test]
    fn test_orient() {
        assert_eq!(orient(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orient(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, -1.0)), Orientation::Clockwise);
        assert_eq!(orient(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.0)), Orientation::Collinear);
    }

    #[test]
    fn test_segments_cross() {
        let (a, b) = (p(0.0, 0.0), p(2.0, 2.0));
        assert!(segments_properly_intersect(&a, &b, &p(0.0, 2.0), &p(2.0, 0.0)));
        assert!(segments_intersect(&a, &b, &p(0.0, 2.0), &p(2.0, 0.0)));
    }

    #[test]
    fn test_segments_touch_is_not_proper() {
        // T-junction: endpoint of one segment on the other.
        let (a1, a2) = (p(0.0, 0.0), p(2.0, 0.0));
        let (b1, b2) = (p(1.0, 0.0), p(1.0, 1.0));
        assert!(!segments_properly_intersect(&a1, &a2, &b1, &b2));
        assert!(segments_intersect(&a1, &a2, &b1, &b2));
    }

    #[test]
    fn test_segments_collinear_overlap() {
        assert!(segments_intersect(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0)));
        assert!(!segments_intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0), &p(3.0, 0.0)));
    }

    #[test]
    fn test_signed_area() {
        let sq = square();
        assert!((signed_area(&sq) - 4.0).abs() < 1e-12);
        let rev: Vec<_> = sq.iter().rev().cloned().collect();
        assert!((signed_area(&rev) + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_in_ring() {
        let sq = square();
        assert!(point_in_ring(&p(1.0, 1.0), &sq));
        assert!(!point_in_ring(&p(3.0, 1.0), &sq));
        assert!(point_on_ring(&p(2.0, 1.0), &sq));
        assert!(!point_strictly_in_ring(&p(2.0, 1.0), &sq));
        assert!(point_strictly_in_ring(&p(0.5, 1.5), &sq));
    }

    #[test]
    fn test_in_cone_convex() {
        // Corner (2, 0) of the counter-clockwise square.
        let (prev, v, next) = (p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0));
        assert!(in_cone(&prev, &v, &next, &p(0.0, 2.0)));
        assert!(!in_cone(&prev, &v, &next, &p(3.0, -1.0)));
        // Along an incident edge is not inside.
        assert!(!in_cone(&prev, &v, &next, &p(2.0, 5.0)));
    }

    #[test]
    fn test_in_cone_reflex() {
        // Reflex corner of an arrow notch at (2, 1).
        let (prev, v, next) = (p(0.0, 0.0), p(2.0, 1.0), p(4.0, 0.0));
        assert!(in_cone(&prev, &v, &next, &p(2.0, 4.0)));
        assert!(in_cone(&prev, &v, &next, &p(-1.0, 1.0)));
        assert!(!in_cone(&prev, &v, &next, &p(2.0, 0.0)));
    }

    #[test]
    fn test_ccw_angle() {
        let east = Vector2::new(1.0, 0.0);
        let north = Vector2::new(0.0, 1.0);
        let south = Vector2::new(0.0, -1.0);
        assert!((ccw_angle(&east, &north) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((ccw_angle(&east, &south) - 3.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(ccw_angle(&east, &east), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let pts = vec![p(1.0, 5.0), p(-2.0, 3.0), p(4.0, -1.0)];
        let (min, max) = bounding_box(&pts).unwrap();
        assert_eq!(min, p(-2.0, -1.0));
        assert_eq!(max, p(4.0, 5.0));
        assert!(bounding_box(&Vec::<Point2<f64>>::new()).is_none());
    }
}
