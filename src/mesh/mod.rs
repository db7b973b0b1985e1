//! Polygon mesh data structures.
//!
//! This module provides the arena half-edge representation of a polygon with
//! holes that every decomposition stage works on.
//!
//! # Overview
//!
//! The primary type is [`PolygonMesh`]. Vertices, half-edges, faces and rings
//! are stored in flat vectors and refer to each other through typed indices,
//! so inserting cuts never needs shared mutable references.
//!
//! # Index Types
//!
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//! - [`RingId`] - Identifies an input ring (0 is the outer ring)
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`]),
//! so `u16`, `u32` or `u64` can be chosen based on polygon size. A polygon
//! with `n` vertices needs room for `4n` half-edges; the builder returns
//! [`DecompError::IndexOverflow`](crate::error::DecompError::IndexOverflow)
//! when the chosen type is too narrow.
//!
//! # Construction
//!
//! ```
//! use boustro::mesh::{build_polygon_mesh, PolygonMesh, VertexId};
//! use boustro::polygon::Polygon;
//!
//! let poly = Polygon::from_coords(&[(0.0, 0.0), (3.0, 0.0), (3.0, 1.0), (0.0, 1.0)]);
//! let mesh: PolygonMesh = build_polygon_mesh(&poly).unwrap();
//!
//! let v = VertexId::new(0);
//! assert_eq!(mesh.ring_next(v).index(), 1);
//! assert_eq!(mesh.ring_prev(v).index(), 3);
//! ```

mod builder;
mod halfedge;
mod index;

pub use builder::{build_polygon_mesh, to_polygon};
pub use halfedge::{
    EdgeKind, Face, HalfEdge, LoopHalfEdgeIter, PolygonMesh, Ring, Vertex, VertexHalfEdgeIter,
};
pub use index::{FaceId, HalfEdgeId, MeshIndex, RingId, VertexId};
