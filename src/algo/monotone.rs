//! Monotonicity tests for rings and polygons.
//!
//! A simple ring is monotone for an axis when it has exactly one local
//! maximum in sweep order: its boundary then splits into two chains that are
//! each monotone along the sweep direction, and every sweep line meets it at
//! most twice.

use nalgebra::Point2;

use super::axis::{is_above, Axis};
use super::severity::rings_gap_profile;
use crate::polygon::Polygon;

/// Number of vertices of a ring that come before both of their neighbors in
/// sweep order.
pub fn local_maxima(ring: &[Point2<f64>], axis: Axis) -> usize {
    let n = ring.len();
    let local: Vec<Point2<f64>> = ring.iter().map(|p| axis.local(p)).collect();
    (0..n)
        .filter(|&i| {
            let p = &local[i];
            is_above(p, &local[(i + n - 1) % n]) && is_above(p, &local[(i + 1) % n])
        })
        .count()
}

/// True if the simple ring is monotone for the axis.
///
/// # Example
/// ```
/// use boustro::algo::axis::Axis;
/// use boustro::algo::monotone::is_monotone;
/// use boustro::nalgebra::Point2;
///
/// let u: Vec<Point2<f64>> = [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (2.0, 3.0),
///                            (2.0, 1.0), (1.0, 1.0), (1.0, 3.0), (0.0, 3.0)]
///     .iter()
///     .map(|&(x, y)| Point2::new(x, y))
///     .collect();
/// assert!(!is_monotone(&u, Axis::Horizontal));
/// assert!(is_monotone(&u, Axis::Vertical));
/// ```
pub fn is_monotone(ring: &[Point2<f64>], axis: Axis) -> bool {
    ring.len() >= 3 && local_maxima(ring, axis) == 1
}

/// Axes for which the ring is monotone.
pub fn monotone_axes(ring: &[Point2<f64>]) -> Vec<Axis> {
    Axis::ALL
        .into_iter()
        .filter(|&axis| is_monotone(ring, axis))
        .collect()
}

/// Axes for which some sweep line meets the polygon boundary more than twice.
///
/// Holes always make both axes troublesome.
pub fn troublesome_axes(polygon: &Polygon) -> Vec<Axis> {
    let rings: Vec<Vec<Point2<f64>>> = polygon.rings().map(|(_, r)| r.to_vec()).collect();
    Axis::ALL
        .into_iter()
        .filter(|&axis| rings_gap_profile(&rings, axis, 0.0).is_troublesome())
        .collect()
}
