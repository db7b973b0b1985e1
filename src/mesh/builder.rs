//! Mesh construction from input polygons.
//!
//! The builder validates the polygon, normalizes ring orientation (outer ring
//! counter-clockwise, holes clockwise) and lays the rings out in the arena:
//! ring vertices are numbered contiguously, outer ring first, and the
//! half-edges of vertex `v` are stored at `2v` (interior) and `2v + 1`
//! (exterior twin).
//!
//! A polygon with `n` vertices has `2n` ring half-edges and at most `n` cuts,
//! two half-edges each, so the builder refuses polygons with `4n` above the
//! capacity of the index type.

use nalgebra::Point2;

use super::halfedge::{EdgeKind, Face, HalfEdge, PolygonMesh, Ring, Vertex};
use super::index::{FaceId, HalfEdgeId, MeshIndex, RingId, VertexId};
use crate::error::{DecompError, Result};
use crate::polygon::Polygon;
use crate::predicates::signed_area;

/// Build a half-edge mesh from a polygon with holes.
///
/// Orientation is normalized without changing each ring's first vertex, so
/// for a ring given with the expected winding, vertex ids follow the input
/// order exactly.
///
/// # Example
/// ```
/// use boustro::mesh::{build_polygon_mesh, PolygonMesh};
/// use boustro::polygon::Polygon;
///
/// let poly = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let mesh: PolygonMesh = build_polygon_mesh(&poly).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_faces(), 1);
/// assert!(mesh.is_valid());
/// ```
pub fn build_polygon_mesh<I: MeshIndex>(polygon: &Polygon) -> Result<PolygonMesh<I>> {
    let num_vertices = polygon.num_vertices();
    let required = 4 * num_vertices;
    if required > I::capacity() {
        return Err(DecompError::IndexOverflow {
            required,
            capacity: I::capacity(),
        });
    }
    polygon.validate()?;

    let mut mesh = PolygonMesh {
        vertices: Vec::with_capacity(num_vertices),
        halfedges: Vec::with_capacity(2 * num_vertices),
        faces: Vec::with_capacity(1),
        rings: Vec::with_capacity(polygon.num_rings()),
    };

    let mut face = Face::new(HalfEdgeId::new(0));

    for (ring_index, (role, points)) in polygon.rings().enumerate() {
        let is_hole = ring_index > 0;
        let ring = normalized_ring(points, is_hole);
        if (signed_area(points) > 0.0) == is_hole {
            log::debug!("reversed {} to normalize orientation", role);
        }

        let first = mesh.vertices.len();
        let ring_id = RingId::new(ring_index);
        let face_id = FaceId::new(0);
        let n = ring.len();

        for p in &ring {
            mesh.vertices.push(Vertex::new(*p, ring_id));
        }

        for k in 0..n {
            let v = first + k;
            let next = first + (k + 1) % n;
            let prev = first + (k + n - 1) % n;

            // Interior half-edge v -> next, turning left around the interior.
            let mut inner = HalfEdge::new(VertexId::new(v), EdgeKind::Ring);
            inner.twin = HalfEdgeId::new(2 * v + 1);
            inner.next = HalfEdgeId::new(2 * next);
            inner.prev = HalfEdgeId::new(2 * prev);
            inner.face = face_id;

            // Exterior twin next -> v, walking the ring backwards.
            let mut outer = HalfEdge::new(VertexId::new(next), EdgeKind::Ring);
            outer.twin = HalfEdgeId::new(2 * v);
            outer.next = HalfEdgeId::new(2 * prev + 1);
            outer.prev = HalfEdgeId::new(2 * next + 1);

            mesh.halfedges.push(inner);
            mesh.halfedges.push(outer);
            mesh.vertices[v].halfedge = HalfEdgeId::new(2 * v);
        }

        if is_hole {
            face.holes.push(HalfEdgeId::new(2 * first));
        }

        mesh.rings.push(Ring {
            first: VertexId::new(first),
            len: n,
            is_hole,
        });
    }

    mesh.faces.push(face);
    Ok(mesh)
}

/// Convert a mesh back to a polygon in its normalized orientation.
pub fn to_polygon<I: MeshIndex>(mesh: &PolygonMesh<I>) -> Polygon {
    let mut rings = mesh.ring_ids().map(|r| mesh.ring_positions(r));
    let outer = rings.next().unwrap_or_default();
    Polygon::with_holes(outer, rings.collect())
}

/// Copy a ring, reversing it around its first vertex if its winding is wrong.
fn normalized_ring(points: &[Point2<f64>], clockwise: bool) -> Vec<Point2<f64>> {
    let is_ccw = signed_area(points) > 0.0;
    if is_ccw != clockwise {
        return points.to_vec();
    }
    let mut ring = Vec::with_capacity(points.len());
    ring.push(points[0]);
    ring.extend(points[1..].iter().rev());
    ring
}
