//! Sweep-line status: the ring edges currently crossing the sweep line.
//!
//! Edges are kept left to right (by local cross coordinate) in a `BTreeMap`
//! keyed by their endpoints. Two active edges never cross, so comparing them
//! with an orientation test at the later of their upper endpoints gives an
//! order that stays fixed while both are active. No intersection coordinates
//! are ever computed for ordering.
//!
//! Left-boundary edges, which have the polygon interior on their right, carry
//! a *helper*: the lowest vertex seen so far in the region to their right.
//!
//! Every edge also keeps a *shadow*: of the vertices processed directly beside
//! it since it became active, the one closest in direction to the edge itself
//! as seen from its upper endpoint. A segment from a vertex directly beside
//! the edge up to the upper endpoint is a diagonal exactly when it passes on
//! the far side of the shadow, so visibility needs no scan of the boundary.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use nalgebra::Point2;

use super::axis::is_above;
use super::classify::Classification;
use crate::mesh::{HalfEdgeId, MeshIndex, PolygonMesh, VertexId};
use crate::predicates::cross;

/// The helper of a left-boundary edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Helper<I: MeshIndex = u32> {
    /// The helper vertex.
    pub vertex: VertexId<I>,
    /// True if the helper is a merge vertex still waiting for its cut.
    pub is_merge: bool,
}

/// A ring edge crossing the sweep line.
#[derive(Debug, Clone, Copy)]
pub struct ActiveEdge<I: MeshIndex = u32> {
    /// The interior half-edge of the ring edge.
    pub edge: HalfEdgeId<I>,
    /// Endpoint processed first.
    pub upper_vertex: VertexId<I>,
    /// Endpoint processed last.
    pub lower_vertex: VertexId<I>,
    /// Local position of the upper endpoint.
    pub upper: Point2<f64>,
    /// Local position of the lower endpoint.
    pub lower: Point2<f64>,
    /// True if the interior lies to the right of the edge.
    pub left_boundary: bool,
    /// Helper vertex; only left-boundary edges have one.
    pub helper: Option<Helper<I>>,
    /// Local position of the vertex that limits the view of the upper endpoint.
    pub shadow: Option<Point2<f64>>,
}

impl<I: MeshIndex> ActiveEdge<I> {
    /// Build the active edge for the interior half-edge `edge`.
    pub fn new(
        mesh: &PolygonMesh<I>,
        classification: &Classification<I>,
        edge: HalfEdgeId<I>,
    ) -> Self {
        let from = mesh.origin(edge);
        let to = mesh.dest(edge);
        let (upper_vertex, lower_vertex) = if classification.is_above(from, to) {
            (from, to)
        } else {
            (to, from)
        };
        Self {
            edge,
            upper_vertex,
            lower_vertex,
            upper: *classification.local(upper_vertex),
            lower: *classification.local(lower_vertex),
            // Walking downward with the interior on the left puts it on the right.
            left_boundary: upper_vertex == from,
            helper: None,
            shadow: None,
        }
    }

    /// The ordering key of this edge.
    pub fn key(&self) -> EdgeKey<I> {
        EdgeKey {
            edge: self.edge,
            upper: self.upper,
            lower: self.lower,
        }
    }

    /// True if the edge passes strictly left of the local point `p`.
    #[inline]
    pub fn is_left_of(&self, p: &Point2<f64>) -> bool {
        self.key().is_left_of(p)
    }

    /// Cross coordinate of the edge at sweep coordinate `y`.
    pub fn cross_at(&self, y: f64) -> f64 {
        let dy = self.lower.y - self.upper.y;
        if dy == 0.0 {
            return self.upper.x;
        }
        let t = ((y - self.upper.y) / dy).clamp(0.0, 1.0);
        self.upper.x + t * (self.lower.x - self.upper.x)
    }

    /// Record the local point `p` of a vertex processed directly beside the edge.
    pub fn cast_shadow(&mut self, p: &Point2<f64>) {
        let closer = match &self.shadow {
            None => true,
            Some(s) => {
                let turn = cross(&self.upper, s, p);
                if self.left_boundary {
                    turn < 0.0
                } else {
                    turn > 0.0
                }
            }
        };
        if closer {
            self.shadow = Some(*p);
        }
    }

    /// True if the segment from the local point `p`, directly beside the
    /// edge, to the upper endpoint passes clear of every recorded vertex.
    pub fn sees_upper(&self, p: &Point2<f64>) -> bool {
        match &self.shadow {
            None => true,
            Some(s) => {
                let turn = cross(&self.upper, p, s);
                if self.left_boundary {
                    turn > 0.0
                } else {
                    turn < 0.0
                }
            }
        }
    }
}

/// Position of an active edge in the status.
///
/// Keys only compare meaningfully while both edges cross the sweep line.
#[derive(Debug, Clone, Copy)]
pub struct EdgeKey<I: MeshIndex = u32> {
    edge: HalfEdgeId<I>,
    upper: Point2<f64>,
    lower: Point2<f64>,
}

impl<I: MeshIndex> EdgeKey<I> {
    /// The key of the ring edge with interior half-edge `edge`.
    pub fn of(
        mesh: &PolygonMesh<I>,
        classification: &Classification<I>,
        edge: HalfEdgeId<I>,
    ) -> Self {
        ActiveEdge::new(mesh, classification, edge).key()
    }

    /// A point on the sweep line, ordered after every edge passing left of it.
    fn at_point(p: Point2<f64>) -> Self {
        Self {
            edge: HalfEdgeId::invalid(),
            upper: p,
            lower: p,
        }
    }

    /// The keyed half-edge.
    #[inline]
    pub fn edge(&self) -> HalfEdgeId<I> {
        self.edge
    }

    #[inline]
    fn is_left_of(&self, p: &Point2<f64>) -> bool {
        cross(&self.upper, &self.lower, p) > 0.0
    }

    /// Order `self` against `earlier`, which became active no later than `self`.
    fn cmp_from_below(&self, earlier: &Self) -> Ordering {
        // Edges starting at the same vertex compare by their other endpoint.
        let p = if self.upper == earlier.upper {
            &self.lower
        } else {
            &self.upper
        };
        if earlier.is_left_of(p) {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }
}

impl<I: MeshIndex> PartialEq for EdgeKey<I> {
    fn eq(&self, other: &Self) -> bool {
        self.edge == other.edge
    }
}

impl<I: MeshIndex> Eq for EdgeKey<I> {}

impl<I: MeshIndex> PartialOrd for EdgeKey<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: MeshIndex> Ord for EdgeKey<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.edge == other.edge {
            Ordering::Equal
        } else if is_above(&self.upper, &other.upper) {
            other.cmp_from_below(self).reverse()
        } else {
            self.cmp_from_below(other)
        }
    }
}

/// Ordered set of active edges.
#[derive(Debug, Clone)]
pub struct SweepStatus<I: MeshIndex = u32> {
    edges: BTreeMap<EdgeKey<I>, ActiveEdge<I>>,
}

impl<I: MeshIndex> Default for SweepStatus<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> SweepStatus<I> {
    /// Create an empty status.
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Number of active edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if no edge is active.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Active edges, left to right.
    pub fn edges(&self) -> impl Iterator<Item = &ActiveEdge<I>> + '_ {
        self.edges.values()
    }

    /// Insert an edge at its upper endpoint and return its key.
    pub fn insert(&mut self, edge: ActiveEdge<I>) -> EdgeKey<I> {
        let key = edge.key();
        self.edges.insert(key, edge);
        key
    }

    /// Remove the edge with key `key`.
    pub fn remove(&mut self, key: &EdgeKey<I>) -> Option<ActiveEdge<I>> {
        self.edges.remove(key)
    }

    /// The edge directly left of the local point `p`.
    pub fn left_of(&self, p: &Point2<f64>) -> Option<&ActiveEdge<I>> {
        self.edges
            .range(..EdgeKey::at_point(*p))
            .next_back()
            .map(|(_, e)| e)
    }

    /// The edge directly right of the local point `p`.
    pub fn right_of(&self, p: &Point2<f64>) -> Option<&ActiveEdge<I>> {
        self.edges
            .range((Bound::Excluded(EdgeKey::at_point(*p)), Bound::Unbounded))
            .next()
            .map(|(_, e)| e)
    }

    /// Mutable access to the edge directly left of `p`.
    pub fn left_of_mut(&mut self, p: &Point2<f64>) -> Option<&mut ActiveEdge<I>> {
        self.edges
            .range_mut(..EdgeKey::at_point(*p))
            .next_back()
            .map(|(_, e)| e)
    }

    /// Mutable access to the edge directly right of `p`.
    pub fn right_of_mut(&mut self, p: &Point2<f64>) -> Option<&mut ActiveEdge<I>> {
        self.edges
            .range_mut((Bound::Excluded(EdgeKey::at_point(*p)), Bound::Unbounded))
            .next()
            .map(|(_, e)| e)
    }

    /// Record the vertex at `p` in the shadows of the two edges enclosing it.
    ///
    /// Only edges facing `p` across the interior are updated.
    pub fn cast_shadows(&mut self, p: &Point2<f64>) {
        if let Some(left) = self.left_of_mut(p).filter(|e| e.left_boundary) {
            left.cast_shadow(p);
        }
        if let Some(right) = self.right_of_mut(p).filter(|e| !e.left_boundary) {
            right.cast_shadow(p);
        }
    }
}

/// The ring edges at a vertex, split into those that end and those that start there.
#[derive(Debug, Clone, Copy)]
pub struct VertexEdges<I: MeshIndex = u32> {
    /// Edge arriving from the previous ring vertex.
    pub incoming: HalfEdgeId<I>,
    /// Edge leaving toward the next ring vertex.
    pub outgoing: HalfEdgeId<I>,
    /// True if the previous vertex is above (the incoming edge ends here).
    pub incoming_ends: bool,
    /// True if the next vertex is above (the outgoing edge ends here).
    pub outgoing_ends: bool,
}

impl<I: MeshIndex> VertexEdges<I> {
    /// Look up the two ring edges of `v`.
    pub fn of(mesh: &PolygonMesh<I>, classification: &Classification<I>, v: VertexId<I>) -> Self {
        let prev = mesh.ring_prev(v);
        let next = mesh.ring_next(v);
        Self {
            incoming: mesh.ring_edge(prev),
            outgoing: mesh.ring_edge(v),
            incoming_ends: is_above(classification.local(prev), classification.local(v)),
            outgoing_ends: is_above(classification.local(next), classification.local(v)),
        }
    }
}
