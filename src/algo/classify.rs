//! Critical vertex classification.
//!
//! For a sweep axis, every vertex is labelled by where its two ring neighbors
//! lie in sweep order and by the turn it makes (interior on the left):
//!
//! | neighbors   | convex  | reflex  |
//! |-------------|---------|---------|
//! | both below  | `Start` | `Split` |
//! | both above  | `End`   | `Merge` |
//! | one of each | `Regular` | `Regular` |
//!
//! Neighbors with an equal sweep coordinate are ordered by the cross
//! coordinate, so horizontal edges of rectilinear polygons still produce the
//! split and merge vertices they need. A vertex whose incident edges are
//! collinear is always `Regular`.
//!
//! A polygon is monotone for the axis exactly when no vertex is `Split` or
//! `Merge`.

use nalgebra::{Point2, Vector2};

use super::axis::{is_above, sweep_cmp, Axis};
use crate::mesh::{MeshIndex, PolygonMesh, VertexId};
use crate::predicates::cross_vec;

/// Classification of a vertex for one sweep axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexClass {
    /// Both neighbors below, convex.
    Start,
    /// Both neighbors above, convex.
    End,
    /// Both neighbors below, reflex.
    Split,
    /// Both neighbors above, reflex.
    Merge,
    /// One neighbor on each side.
    Regular,
}

impl VertexClass {
    /// Split and merge vertices break monotonicity.
    #[inline]
    pub fn is_critical(self) -> bool {
        matches!(self, VertexClass::Split | VertexClass::Merge)
    }
}

/// Classification of one vertex.
#[derive(Debug, Clone, Copy)]
pub struct CriticalVertexRecord<I: MeshIndex = u32> {
    /// The vertex.
    pub vertex: VertexId<I>,
    /// The axis the record belongs to.
    pub axis: Axis,
    /// The label.
    pub class: VertexClass,
    /// Local-frame direction of the edge arriving from the previous ring vertex.
    pub incoming: Vector2<f64>,
    /// Local-frame direction of the edge leaving toward the next ring vertex.
    pub outgoing: Vector2<f64>,
}

/// Per-axis classification of every vertex, with the sweep order.
#[derive(Debug, Clone)]
pub struct Classification<I: MeshIndex = u32> {
    axis: Axis,
    records: Vec<CriticalVertexRecord<I>>,
    local: Vec<Point2<f64>>,
    order: Vec<VertexId<I>>,
}

impl<I: MeshIndex> Classification<I> {
    /// The sweep axis.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Record for a vertex.
    #[inline]
    pub fn record(&self, v: VertexId<I>) -> &CriticalVertexRecord<I> {
        &self.records[v.index()]
    }

    /// Label of a vertex.
    #[inline]
    pub fn class_of(&self, v: VertexId<I>) -> VertexClass {
        self.records[v.index()].class
    }

    /// Local-frame position of a vertex.
    #[inline]
    pub fn local(&self, v: VertexId<I>) -> &Point2<f64> {
        &self.local[v.index()]
    }

    /// True if `a` comes before `b` in sweep order.
    #[inline]
    pub fn is_above(&self, a: VertexId<I>, b: VertexId<I>) -> bool {
        is_above(self.local(a), self.local(b))
    }

    /// All vertices in sweep order.
    #[inline]
    pub fn sweep_order(&self) -> &[VertexId<I>] {
        &self.order
    }

    /// All records, indexed by vertex.
    #[inline]
    pub fn records(&self) -> &[CriticalVertexRecord<I>] {
        &self.records
    }

    /// Split and merge vertices in sweep order.
    pub fn critical(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.order
            .iter()
            .copied()
            .filter(move |&v| self.class_of(v).is_critical())
    }

    /// Number of vertices with the given label.
    pub fn count(&self, class: VertexClass) -> usize {
        self.records.iter().filter(|r| r.class == class).count()
    }

    /// True if no vertex is a split or merge vertex.
    pub fn is_monotone(&self) -> bool {
        self.records.iter().all(|r| !r.class.is_critical())
    }
}

/// Label a single vertex from local positions of its neighbors.
pub fn classify_corner(prev: &Point2<f64>, v: &Point2<f64>, next: &Point2<f64>) -> VertexClass {
    let turn = cross_vec(&(v - prev), &(next - v));
    if turn == 0.0 {
        return VertexClass::Regular;
    }
    let convex = turn > 0.0;
    match (is_above(v, prev), is_above(v, next)) {
        (true, true) if convex => VertexClass::Start,
        (true, true) => VertexClass::Split,
        (false, false) if convex => VertexClass::End,
        (false, false) => VertexClass::Merge,
        _ => VertexClass::Regular,
    }
}

/// Classify every vertex of the mesh for one axis.
///
/// # Example
/// ```
/// use boustro::algo::axis::Axis;
/// use boustro::algo::classify::{classify, VertexClass};
/// use boustro::mesh::{build_polygon_mesh, PolygonMesh, VertexId};
/// use boustro::polygon::Polygon;
///
/// // Arrow with a notch cut into its base.
/// let poly = Polygon::from_coords(&[(0.0, 0.0), (2.0, 1.0), (4.0, 0.0), (2.0, 4.0)]);
/// let mesh: PolygonMesh = build_polygon_mesh(&poly).unwrap();
///
/// let classes = classify(&mesh, Axis::Horizontal);
/// assert_eq!(classes.class_of(VertexId::new(1)), VertexClass::Split);
/// assert_eq!(classes.class_of(VertexId::new(3)), VertexClass::Start);
/// assert!(!classes.is_monotone());
/// ```
pub fn classify<I: MeshIndex>(mesh: &PolygonMesh<I>, axis: Axis) -> Classification<I> {
    let local: Vec<Point2<f64>> = mesh
        .vertex_ids()
        .map(|v| axis.local(mesh.position(v)))
        .collect();

    let records = mesh
        .vertex_ids()
        .map(|v| {
            let p = &local[v.index()];
            let prev = &local[mesh.ring_prev(v).index()];
            let next = &local[mesh.ring_next(v).index()];
            CriticalVertexRecord {
                vertex: v,
                axis,
                class: classify_corner(prev, p, next),
                incoming: p - prev,
                outgoing: next - p,
            }
        })
        .collect();

    let mut order: Vec<VertexId<I>> = mesh.vertex_ids().collect();
    order.sort_by(|&a, &b| sweep_cmp(&local[a.index()], &local[b.index()]));

    Classification {
        axis,
        records,
        local,
        order,
    }
}

/// Classify every vertex for both axes.
pub fn classify_both<I: MeshIndex>(mesh: &PolygonMesh<I>) -> [Classification<I>; 2] {
    Axis::ALL.map(|axis| classify(mesh, axis))
}
