//! Decomposition algorithms.
//!
//! The pipeline runs once per sweep axis on a read-only [`PolygonMesh`]:
//!
//! - **Classification** ([`classify`]): Start, End, Split, Merge and Regular
//!   vertices in strict sweep order
//! - **Severity** ([`severity`]): how badly each Split/Merge vertex breaks
//!   monotonicity, plus the polygon-level gap profile
//! - **Cut selection** ([`cuts`], [`select`]): one sweep that commits the
//!   lowest-severity visible diagonal for every critical vertex
//! - **Arbitration** ([`arbiter`]): cost of each axis, the winner's cut set
//!   applied by the cell builder ([`cells`])
//!
//! [`batch`] runs many polygons on the rayon pool with [`Progress`] updates.
//!
//! [`PolygonMesh`]: crate::mesh::PolygonMesh

pub mod arbiter;
pub mod axis;
pub mod batch;
pub mod cells;
pub mod classify;
pub mod cuts;
pub mod monotone;
pub mod progress;
pub mod select;
pub mod severity;
pub mod sweep;

#[cfg(test)]
mod fixtures;

pub use arbiter::{decompose, decompose_mesh, AxisCost, DecomposeOptions, Decomposition};
pub use axis::Axis;
pub use batch::{decompose_batch, decompose_batch_with_progress, BatchReport};
pub use cells::Cell;
pub use classify::VertexClass;
pub use cuts::{Cut, CutSet};
pub use progress::Progress;
