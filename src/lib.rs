//! # Boustro
//!
//! Axis-monotone cell decomposition of polygons with holes, for boustrophedon
//! coverage planning.
//!
//! A coverage vehicle sweeps a field in parallel back-and-forth tracks. Each
//! track must cross a cell at most twice, so the field polygon is cut into
//! cells that are monotone for the track direction. Boustro evaluates both
//! the horizontal and the vertical sweep, picks cuts that stay close to the
//! sweep direction, and keeps the axis with the lower cost.
//!
//! ## Features
//!
//! - **Arena half-edge mesh**: typed indices over `u16`, `u32` or `u64`
//! - **Critical vertex classification** for either sweep axis
//! - **Severity-ranked cuts** with an explicit visibility test
//! - **Dual-axis arbitration** with configurable cost weights
//! - **Verified partitions**: area, overlap and monotonicity checks on the output
//! - **Batch processing** on the rayon pool
//!
//! ## Quick Start
//!
//! ```
//! use boustro::prelude::*;
//! use nalgebra::Point2;
//!
//! // A 6x6 field with a 2x2 pond in the middle.
//! let field = Polygon::from_coords(&[(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0)])
//!     .with_hole(vec![
//!         Point2::new(2.0, 2.0),
//!         Point2::new(2.0, 4.0),
//!         Point2::new(4.0, 4.0),
//!         Point2::new(4.0, 2.0),
//!     ]);
//!
//! let result = decompose(&field, &DecomposeOptions::default()).unwrap();
//!
//! assert_eq!(result.num_cells(), 2);
//! assert!((result.total_area() - 32.0).abs() < 1e-9);
//! for cell in &result.cells {
//!     assert!(cell.is_monotone());
//! }
//! ```
//!
//! ## Forcing an Axis
//!
//! ```
//! use boustro::prelude::*;
//!
//! // A triangle whose base is notched up to (2, 1).
//! let arrow = Polygon::from_coords(&[(0.0, 0.0), (2.0, 1.0), (4.0, 0.0), (2.0, 4.0)]);
//!
//! let free = decompose(&arrow, &DecomposeOptions::default()).unwrap();
//! assert_eq!(free.axis, Axis::Vertical);
//! assert_eq!(free.num_cells(), 1);
//!
//! let options = DecomposeOptions::default().with_axis(Axis::Horizontal);
//! let forced = decompose(&arrow, &options).unwrap();
//! assert_eq!(forced.num_cells(), 2);
//! assert_eq!(forced.cuts.pairs(), vec![(1, 3)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod polygon;
pub mod predicates;

pub use nalgebra;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use boustro::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::arbiter::{
        decompose, decompose_mesh, AxisCost, AxisPolicy, CostWeights, DecomposeOptions,
        Decomposition,
    };
    pub use crate::algo::axis::Axis;
    pub use crate::algo::batch::{decompose_batch, decompose_batch_with_progress, BatchReport};
    pub use crate::algo::cells::Cell;
    pub use crate::algo::classify::{classify, Classification, VertexClass};
    pub use crate::algo::cuts::{Cut, CutSet};
    pub use crate::algo::progress::Progress;
    pub use crate::error::{DecompError, Result};
    pub use crate::mesh::{build_polygon_mesh, MeshIndex, PolygonMesh, VertexId};
    pub use crate::polygon::Polygon;
}
