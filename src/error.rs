//! Error types for boustro.
//!
//! This module defines all error types used throughout the library.

use std::fmt;

use thiserror::Error;

use crate::algo::axis::Axis;
use crate::algo::classify::VertexClass;

/// Result type alias using [`DecompError`].
pub type Result<T> = std::result::Result<T, DecompError>;

/// Identifies a ring of the input polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingRole {
    /// The outer boundary.
    Outer,
    /// The hole at this index in [`Polygon::holes`](crate::polygon::Polygon::holes).
    Hole(usize),
}

impl fmt::Display for RingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingRole::Outer => write!(f, "outer ring"),
            RingRole::Hole(i) => write!(f, "hole {}", i),
        }
    }
}

/// Why an input polygon was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidReason {
    /// The ring has fewer than three vertices.
    #[error("ring has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFinite {
        /// Vertex index within the ring.
        index: usize,
    },

    /// Two consecutive vertices coincide (including a closing duplicate of the first vertex).
    #[error("vertex {index} duplicates its predecessor")]
    DuplicateVertex {
        /// Vertex index within the ring.
        index: usize,
    },

    /// The ring encloses no area.
    #[error("ring has zero area")]
    ZeroArea,

    /// Two edges of the ring touch or cross.
    #[error("edges {first} and {second} intersect")]
    SelfIntersection {
        /// Index of the first edge (edge `i` runs from vertex `i` to `i + 1`).
        first: usize,
        /// Index of the second edge.
        second: usize,
    },

    /// The hole touches the outer ring or lies outside it.
    #[error("hole is not strictly inside the outer ring")]
    HoleNotInterior,

    /// The hole touches, crosses or contains another hole.
    #[error("hole overlaps hole {other}")]
    HolesOverlap {
        /// Index of the other hole.
        other: usize,
    },
}

/// The partition check that failed in the cell builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartitionViolation {
    /// A cut leaves its endpoint outside the polygon interior.
    #[error("cut {from}-{to} does not enter the interior at vertex {at}")]
    CutOutsideInterior {
        /// First cut endpoint.
        from: usize,
        /// Second cut endpoint.
        to: usize,
        /// The endpoint with no interior sector containing the cut.
        at: usize,
    },

    /// A cell ring repeats a vertex or has non-positive area.
    #[error("cell {cell} is not a simple positively oriented ring")]
    NonSimpleCell {
        /// Cell index.
        cell: usize,
    },

    /// The cell areas do not add up to the polygon area.
    #[error("cell areas sum to {cells}, polygon area is {polygon}")]
    AreaMismatch {
        /// Sum of the cell areas.
        cells: f64,
        /// Area of the polygon minus its holes.
        polygon: f64,
    },

    /// Two cells overlap.
    #[error("cells {first} and {second} overlap")]
    Overlap {
        /// First cell index.
        first: usize,
        /// Second cell index.
        second: usize,
    },

    /// A cell is not monotone for the sweep axis.
    #[error("cell {cell} is not monotone")]
    NotMonotone {
        /// Cell index.
        cell: usize,
    },

    /// More than one cut claims the same critical vertex.
    #[error("vertex {vertex} is resolved by more than one cut")]
    ResolvedTwice {
        /// The vertex index.
        vertex: usize,
    },

    /// Two cuts of the set cross or overlap.
    #[error("cuts {first} and {second} cross")]
    CutsCross {
        /// Position of the first cut in the set.
        first: usize,
        /// Position of the second cut in the set.
        second: usize,
    },
}

/// Errors that can occur during decomposition.
#[derive(Error, Debug, Clone)]
pub enum DecompError {
    /// The input polygon violates a structural requirement.
    #[error("invalid polygon: {ring}: {reason}")]
    InvalidPolygon {
        /// The offending ring.
        ring: RingRole,
        /// What is wrong with it.
        reason: InvalidReason,
    },

    /// A split or merge vertex found no qualifying active edge during the sweep.
    #[error("no cut resolves {class:?} vertex {vertex} on the {axis} axis")]
    UnresolvedCut {
        /// The sweep axis.
        axis: Axis,
        /// The vertex index.
        vertex: usize,
        /// The vertex classification.
        class: VertexClass,
    },

    /// The cells produced from a cut set do not partition the polygon.
    #[error("partition invariant violated on the {axis} axis: {violation}")]
    PartitionInvariant {
        /// The sweep axis.
        axis: Axis,
        /// The failed check.
        violation: PartitionViolation,
    },

    /// The mesh needs more elements than its index type can address.
    #[error("mesh needs {required} half-edges, the index type holds {capacity}")]
    IndexOverflow {
        /// Half-edges needed.
        required: usize,
        /// Largest arena the index type addresses.
        capacity: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl DecompError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        DecompError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an invalid polygon error.
    pub fn invalid_polygon(ring: RingRole, reason: InvalidReason) -> Self {
        DecompError::InvalidPolygon { ring, reason }
    }

    /// Returns true for failures caused by the input rather than by an internal inconsistency.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DecompError::InvalidPolygon { .. }
                | DecompError::IndexOverflow { .. }
                | DecompError::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_polygon() {
        let err = DecompError::invalid_polygon(RingRole::Hole(2), InvalidReason::ZeroArea);
        assert_eq!(err.to_string(), "invalid polygon: hole 2: ring has zero area");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_display_partition() {
        let err = DecompError::PartitionInvariant {
            axis: Axis::Vertical,
            violation: PartitionViolation::Overlap { first: 0, second: 3 },
        };
        assert_eq!(
            err.to_string(),
            "partition invariant violated on the vertical axis: cells 0 and 3 overlap"
        );
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_display_index_overflow() {
        let err = DecompError::IndexOverflow {
            required: 80000,
            capacity: 65535,
        };
        assert_eq!(
            err.to_string(),
            "mesh needs 80000 half-edges, the index type holds 65535"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_invalid_param() {
        let err = DecompError::invalid_param("weights.cells", -1.0, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter: weights.cells = -1 (must be non-negative)"
        );
    }
}
