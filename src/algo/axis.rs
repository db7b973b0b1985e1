//! Sweep axes and the axis-local coordinate frame.
//!
//! Every axis-dependent stage works in a local frame `(cross, sweep)` obtained
//! from [`Axis::local`]. Sweep lines are the lines of constant `sweep`; cells
//! tagged with an axis meet each such line in at most two boundary points.
//!
//! | Axis         | local `x` (cross) | local `y` (sweep) |
//! |--------------|-------------------|-------------------|
//! | `Horizontal` | `x`               | `y`               |
//! | `Vertical`   | `-y`              | `x`               |
//!
//! The vertical frame is a quarter turn, so orientation signs and convexity
//! are the same in both frames.

use std::cmp::Ordering;
use std::fmt;

use nalgebra::Point2;

/// A sweep axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Horizontal sweep lines advancing along y.
    Horizontal,
    /// Vertical sweep lines advancing along x.
    Vertical,
}

impl Axis {
    /// Both axes, in precedence order.
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The other axis.
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Map a world point into the axis-local frame.
    #[inline]
    pub fn local(self, p: &Point2<f64>) -> Point2<f64> {
        match self {
            Axis::Horizontal => *p,
            Axis::Vertical => Point2::new(-p.y, p.x),
        }
    }

    /// Coordinate along the sweep direction.
    #[inline]
    pub fn sweep(self, p: &Point2<f64>) -> f64 {
        self.local(p).y
    }

    /// Coordinate across the sweep direction.
    #[inline]
    pub fn cross(self, p: &Point2<f64>) -> f64 {
        self.local(p).x
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// Strict sweep order on local points: larger sweep coordinate first, then
/// smaller cross coordinate.
///
/// `Ordering::Less` means `a` is processed before `b`.
#[inline]
pub fn sweep_cmp(a: &Point2<f64>, b: &Point2<f64>) -> Ordering {
    b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x))
}

/// True if local point `a` comes before `b` in sweep order.
#[inline]
pub fn is_above(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    sweep_cmp(a, b) == Ordering::Less
}
