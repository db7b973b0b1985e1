//! Half-edge representation of a polygon with holes.
//!
//! # Structure
//!
//! - Every ring edge is stored as two **half-edges**. The *interior* half-edge
//!   has the polygon interior on its left and belongs to a face; its twin runs
//!   the other way along the outside and has an invalid face (a *boundary*
//!   half-edge, following the usual convention for open meshes).
//! - After orientation normalization the outer ring is counter-clockwise and
//!   hole rings are clockwise, so interior half-edges always turn left around
//!   the region they bound.
//! - Each vertex stores its outgoing interior ring half-edge. Ring vertices are
//!   numbered contiguously, so ring neighbors are found without walking the
//!   connectivity, and they stay the same after cuts are inserted.
//! - A face is one closed cycle of interior half-edges. Before any cut is
//!   inserted the polygon interior is a single face whose outer cycle is the
//!   outer ring and whose inner cycles are the holes.
//!
//! Cuts are inserted with [`PolygonMesh::insert_diagonal`], which splices a
//! new half-edge pair into the angular sector that contains it at both
//! endpoints. [`PolygonMesh::rebuild_faces`] then recomputes the faces from the
//! interior cycles.

use nalgebra::Point2;

use super::index::{FaceId, HalfEdgeId, MeshIndex, RingId, VertexId};
use crate::predicates::{bounding_box, ccw_angle, signed_area};

/// A polygon vertex.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// Position in the plane.
    pub position: Point2<f64>,

    /// The outgoing interior half-edge along the vertex's ring.
    pub halfedge: HalfEdgeId<I>,

    /// The ring this vertex belongs to.
    pub ring: RingId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create an unconnected vertex.
    pub fn new(position: Point2<f64>, ring: RingId<I>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
            ring,
        }
    }
}

/// What a half-edge pair represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// An edge of one of the input rings.
    Ring,
    /// A diagonal inserted by the cell builder.
    Cut,
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge leaves.
    pub origin: VertexId<I>,

    /// The opposite half-edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the same face (or around the outside).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the same face.
    pub prev: HalfEdgeId<I>,

    /// The face on the left. Invalid on the outside of the polygon.
    pub face: FaceId<I>,

    /// Ring edge or inserted cut.
    pub kind: EdgeKind,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create an unconnected half-edge.
    pub fn new(origin: VertexId<I>, kind: EdgeKind) -> Self {
        Self {
            origin,
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            kind,
        }
    }

    /// Check if this half-edge lies on the outside of the polygon.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

/// A face of the subdivision.
#[derive(Debug, Clone, Default)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the outer cycle of the face.
    pub halfedge: HalfEdgeId<I>,

    /// One half-edge on each inner cycle (hole) of the face.
    pub holes: Vec<HalfEdgeId<I>>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a face bounded by a single cycle.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self {
            halfedge,
            holes: Vec::new(),
        }
    }
}

/// A boundary ring: a contiguous run of vertex ids.
#[derive(Debug, Clone, Copy)]
pub struct Ring<I: MeshIndex = u32> {
    /// First vertex of the ring.
    pub first: VertexId<I>,

    /// Number of vertices.
    pub len: usize,

    /// True for hole rings.
    pub is_hole: bool,
}

impl<I: MeshIndex> Ring<I> {
    /// Check if the vertex belongs to this ring.
    #[inline]
    pub fn contains(&self, v: VertexId<I>) -> bool {
        v.index() >= self.first.index() && v.index() < self.first.index() + self.len
    }
}

/// Half-edge mesh of a polygon with holes.
#[derive(Debug, Clone)]
pub struct PolygonMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
    pub(crate) rings: Vec<Ring<I>>,
}

impl<I: MeshIndex> Default for PolygonMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> PolygonMesh<I> {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            rings: Vec::new(),
        }
    }

    // ==================== Counts ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges (ring edges and cuts, both directions).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of rings, outer ring included.
    #[inline]
    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    /// Number of hole rings.
    #[inline]
    pub fn num_holes(&self) -> usize {
        self.rings.iter().filter(|r| r.is_hole).count()
    }

    // ==================== Element access ====================

    /// Get a vertex.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a half-edge.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    #[inline]
    fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a ring.
    #[inline]
    pub fn ring(&self, id: RingId<I>) -> &Ring<I> {
        &self.rings[id.index()]
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point2<f64> {
        &self.vertices[v.index()].position
    }

    // ==================== Half-edge navigation ====================

    /// The opposite half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedges[he.index()].twin
    }

    /// The next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedges[he.index()].next
    }

    /// The previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedges[he.index()].prev
    }

    /// The vertex a half-edge leaves.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedges[he.index()].origin
    }

    /// The vertex a half-edge points to.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// The face on the left of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedges[he.index()].face
    }

    /// Check if a half-edge lies outside the polygon.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedges[he.index()].is_boundary()
    }

    /// Check if a half-edge belongs to an inserted cut.
    #[inline]
    pub fn is_cut(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedges[he.index()].kind == EdgeKind::Cut
    }

    // ==================== Rings ====================

    /// The ring a vertex belongs to.
    #[inline]
    pub fn ring_of(&self, v: VertexId<I>) -> RingId<I> {
        self.vertices[v.index()].ring
    }

    /// The next vertex along the vertex's ring (interior on the left).
    pub fn ring_next(&self, v: VertexId<I>) -> VertexId<I> {
        let ring = self.ring(self.ring_of(v));
        let local = v.index() - ring.first.index();
        VertexId::new(ring.first.index() + (local + 1) % ring.len)
    }

    /// The previous vertex along the vertex's ring.
    pub fn ring_prev(&self, v: VertexId<I>) -> VertexId<I> {
        let ring = self.ring(self.ring_of(v));
        let local = v.index() - ring.first.index();
        VertexId::new(ring.first.index() + (local + ring.len - 1) % ring.len)
    }

    /// The interior ring half-edge from `v` to [`ring_next`](Self::ring_next)`(v)`.
    #[inline]
    pub fn ring_edge(&self, v: VertexId<I>) -> HalfEdgeId<I> {
        self.vertices[v.index()].halfedge
    }

    /// Iterate over the vertices of a ring in interior-left order.
    pub fn ring_vertices(&self, r: RingId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        let ring = self.ring(r);
        (ring.first.index()..ring.first.index() + ring.len).map(VertexId::new)
    }

    /// Positions of a ring's vertices.
    pub fn ring_positions(&self, r: RingId<I>) -> Vec<Point2<f64>> {
        self.ring_vertices(r).map(|v| *self.position(v)).collect()
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all ring IDs, outer ring first.
    pub fn ring_ids(&self) -> impl Iterator<Item = RingId<I>> + '_ {
        (0..self.rings.len()).map(RingId::new)
    }

    /// Iterate over the outgoing half-edges of a vertex (ring edges and cuts, both sides).
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over the cycle that starts at `he`.
    pub fn loop_halfedges(&self, he: HalfEdgeId<I>) -> LoopHalfEdgeIter<'_, I> {
        LoopHalfEdgeIter::new(self, he)
    }

    /// Iterate over the outer cycle of a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> LoopHalfEdgeIter<'_, I> {
        LoopHalfEdgeIter::new(self, self.face(f).halfedge)
    }

    /// Iterate over the vertices of a face's outer cycle.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    // ==================== Geometry ====================

    /// Signed area enclosed by the cycle through `he`.
    pub fn loop_signed_area(&self, he: HalfEdgeId<I>) -> f64 {
        let positions: Vec<Point2<f64>> = self
            .loop_halfedges(he)
            .map(|h| *self.position(self.origin(h)))
            .collect();
        signed_area(&positions)
    }

    /// Signed area of a face, inner cycles subtracted.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let face = self.face(f);
        self.loop_signed_area(face.halfedge)
            + face
                .holes
                .iter()
                .map(|&h| self.loop_signed_area(h))
                .sum::<f64>()
    }

    /// Area of the polygon: outer ring minus holes.
    pub fn area(&self) -> f64 {
        self.ring_ids()
            .map(|r| signed_area(&self.ring_positions(r)))
            .sum()
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounding_box(self.vertices.iter().map(|v| &v.position))
    }

    /// Length of the bounding-box diagonal, used to normalize distances.
    pub fn diagonal(&self) -> f64 {
        self.bounding_box()
            .map(|(min, max)| (max - min).norm())
            .unwrap_or(0.0)
    }

    // ==================== Cut insertion ====================

    /// Find the interior sector at `v` that contains the direction toward `target`.
    ///
    /// Returns the outgoing interior half-edge that opens the sector, or `None`
    /// if the direction runs along an existing edge or leaves the polygon.
    pub fn find_sector(&self, v: VertexId<I>, target: VertexId<I>) -> Option<HalfEdgeId<I>> {
        if v == target {
            return None;
        }
        let origin = *self.position(v);
        let dir = self.position(target) - origin;
        self.vertex_halfedges(v)
            .filter(|&he| !self.is_boundary_halfedge(he))
            .find(|&out| {
                let incoming = self.prev(out);
                let d_out = self.position(self.dest(out)) - origin;
                let d_back = self.position(self.origin(incoming)) - origin;
                let span = ccw_angle(&d_out, &d_back);
                let t = ccw_angle(&d_out, &dir);
                t > 0.0 && t < span
            })
    }

    /// Insert the diagonal `a-b` as a new pair of cut half-edges.
    ///
    /// Returns the half-edge from `a` to `b`, or `None` if the diagonal does
    /// not open into the interior at both ends or the index type has no room
    /// for two more half-edges. Face assignments are stale until
    /// [`rebuild_faces`](Self::rebuild_faces) is called.
    pub fn insert_diagonal(&mut self, a: VertexId<I>, b: VertexId<I>) -> Option<HalfEdgeId<I>> {
        if self.halfedges.len() + 2 > I::capacity() {
            return None;
        }
        let out_a = self.find_sector(a, b)?;
        let out_b = self.find_sector(b, a)?;
        let in_a = self.prev(out_a);
        let in_b = self.prev(out_b);
        let face = self.face_of(out_a);

        let ab = HalfEdgeId::new(self.halfedges.len());
        let ba = HalfEdgeId::new(self.halfedges.len() + 1);

        self.halfedges.push(HalfEdge {
            origin: a,
            twin: ba,
            next: out_b,
            prev: in_a,
            face,
            kind: EdgeKind::Cut,
        });
        self.halfedges.push(HalfEdge {
            origin: b,
            twin: ab,
            next: out_a,
            prev: in_b,
            face,
            kind: EdgeKind::Cut,
        });

        self.halfedge_mut(in_a).next = ab;
        self.halfedge_mut(out_b).prev = ab;
        self.halfedge_mut(in_b).next = ba;
        self.halfedge_mut(out_a).prev = ba;

        Some(ab)
    }

    /// Recompute faces as the cycles of interior half-edges.
    ///
    /// Each cycle becomes its own face, numbered in order of its lowest
    /// half-edge id, so face 0 always contains the first outer ring edge.
    pub fn rebuild_faces(&mut self) {
        self.faces.clear();
        let mut visited = vec![false; self.halfedges.len()];

        for i in 0..self.halfedges.len() {
            if visited[i] || self.halfedges[i].is_boundary() {
                continue;
            }
            let start = HalfEdgeId::new(i);
            let face = FaceId::new(self.faces.len());
            let mut he = start;
            loop {
                visited[he.index()] = true;
                self.halfedge_mut(he).face = face;
                he = self.next(he);
                if he == start {
                    break;
                }
            }
            self.faces.push(Face::new(start));
        }
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    pub fn is_valid(&self) -> bool {
        for (i, v) in self.vertices.iter().enumerate() {
            if !v.halfedge.is_valid() || self.origin(v.halfedge).index() != i {
                return false;
            }
            if self.is_boundary_halfedge(v.halfedge) {
                return false;
            }
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::new(i);
            if !he.twin.is_valid() || self.twin(he.twin) != id {
                return false;
            }
            if !he.next.is_valid() || self.prev(he.next) != id {
                return false;
            }
            if self.origin(he.next) != self.dest(id) {
                return false;
            }
            if !he.is_boundary() && self.is_boundary_halfedge(he.next) {
                return false;
            }
        }

        self.faces.iter().all(|f| f.halfedge.is_valid())
    }
}

/// Iterator over the outgoing half-edges of a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a PolygonMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a PolygonMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // twin(he) ends at v; the half-edge after it in its cycle leaves v again.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over one closed cycle of half-edges.
pub struct LoopHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a PolygonMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> LoopHalfEdgeIter<'a, I> {
    fn new(mesh: &'a PolygonMesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for LoopHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_polygon_mesh;
    use crate::polygon::Polygon;

    fn square_with_hole() -> PolygonMesh {
        let outer = Polygon::from_coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let poly = outer.with_hole(vec![
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(3.0, 3.0),
            Point2::new(3.0, 1.0),
        ]);
        build_polygon_mesh(&poly).unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = PolygonMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
        assert_eq!(mesh.diagonal(), 0.0);
    }

    #[test]
    fn test_ring_navigation() {
        let mesh = square_with_hole();
        assert_eq!(mesh.num_rings(), 2);
        assert_eq!(mesh.num_holes(), 1);

        let v0 = VertexId::new(0);
        assert_eq!(mesh.ring_next(v0).index(), 1);
        assert_eq!(mesh.ring_prev(v0).index(), 3);

        let h0 = VertexId::new(4);
        assert_eq!(mesh.ring_of(h0).index(), 1);
        assert_eq!(mesh.ring_next(h0).index(), 5);
        assert_eq!(mesh.ring_prev(h0).index(), 7);
        assert!(mesh.ring(RingId::new(1)).contains(VertexId::new(7)));
        assert!(!mesh.ring(RingId::new(1)).contains(VertexId::new(3)));

        let e = mesh.ring_edge(h0);
        assert_eq!(mesh.origin(e), h0);
        assert_eq!(mesh.dest(e).index(), 5);
    }

    #[test]
    fn test_vertex_halfedges_before_cuts() {
        let mesh = square_with_hole();
        for v in mesh.vertex_ids() {
            let out: Vec<_> = mesh.vertex_halfedges(v).collect();
            assert_eq!(out.len(), 2);
            assert_eq!(out.iter().filter(|&&he| mesh.is_boundary_halfedge(he)).count(), 1);
        }
    }

    #[test]
    fn test_area() {
        let mesh = square_with_hole();
        assert!((mesh.area() - 12.0).abs() < 1e-12);
        assert!((mesh.face_area(FaceId::new(0)) - 12.0).abs() < 1e-12);
        assert!((mesh.diagonal() - 32.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_insert_diagonal_splits_face() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let mut mesh: PolygonMesh = build_polygon_mesh(&poly).unwrap();

        let cut = mesh
            .insert_diagonal(VertexId::new(0), VertexId::new(2))
            .unwrap();
        assert!(mesh.is_cut(cut));
        mesh.rebuild_faces();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 2);

        for f in mesh.face_ids() {
            assert_eq!(mesh.face_vertices(f).count(), 3);
            assert!((mesh.face_area(f) - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_insert_diagonal_along_edge_fails() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let mut mesh: PolygonMesh = build_polygon_mesh(&poly).unwrap();
        assert!(mesh
            .insert_diagonal(VertexId::new(0), VertexId::new(1))
            .is_none());
        assert!(mesh
            .insert_diagonal(VertexId::new(0), VertexId::new(0))
            .is_none());
    }

    #[test]
    fn test_bridge_hole() {
        let mut mesh = square_with_hole();
        // Outer corner (0, 4) to hole corner (1, 3).
        mesh.insert_diagonal(VertexId::new(3), VertexId::new(5)).unwrap();
        mesh.rebuild_faces();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face_vertices(FaceId::new(0)).count(), 10);
        assert!((mesh.face_area(FaceId::new(0)) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_insert_diagonal_respects_index_width() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let mut mesh: PolygonMesh<u16> = build_polygon_mesh(&poly).unwrap();

        // Fill the arena up to one slot short of room for a cut.
        let filler = mesh.halfedges[0];
        let room = <u16 as MeshIndex>::capacity() - 1;
        mesh.halfedges.resize(room, filler);

        assert!(mesh
            .insert_diagonal(VertexId::new(0), VertexId::new(2))
            .is_none());
        assert_eq!(mesh.num_halfedges(), room);
    }
}
