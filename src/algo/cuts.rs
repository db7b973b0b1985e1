//! Cuts, candidate sets and the candidate cut generator.
//!
//! A cut is a diagonal between two existing vertices. During the sweep the
//! generator proposes candidates for each critical vertex and keeps every
//! committed cut, so that later candidates can be checked against them.
//!
//! The helper of the edge directly left of a split vertex always yields a
//! valid diagonal. Other candidates (the upper endpoints of the neighboring
//! active edges) are only accepted after a visibility test against the shadow
//! of their edge, which takes constant time. [`CutGenerator::is_visible`] is
//! the exhaustive test against every ring edge and committed cut.

use super::axis::Axis;
use super::classify::Classification;
use super::severity::cut_severity;
use super::sweep::{ActiveEdge, Helper};
use crate::error::{DecompError, PartitionViolation, Result};
use crate::mesh::{MeshIndex, PolygonMesh, VertexId};
use crate::predicates::{cross, in_cone, segments_intersect};

/// Severities closer than this are equal when ranking candidates.
const RANK_EPSILON: f64 = 1e-12;

/// A diagonal between two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Cut<I: MeshIndex = u32> {
    /// The vertex being processed when the cut was proposed.
    pub from: VertexId<I>,
    /// The other endpoint.
    pub to: VertexId<I>,
    /// Sweep axis the cut belongs to.
    pub axis: Axis,
    /// Residual severity: cross-axis offset of the endpoints over the diagonal.
    pub severity: f64,
    /// Euclidean length.
    pub length: f64,
    /// True if the cut lies in the interior and crosses no edge or committed cut.
    pub valid: bool,
    /// Critical vertices this cut resolves.
    pub resolves: Vec<VertexId<I>>,
}

impl<I: MeshIndex> Cut<I> {
    /// Both endpoints.
    #[inline]
    pub fn endpoints(&self) -> (VertexId<I>, VertexId<I>) {
        (self.from, self.to)
    }

    /// True if `v` is an endpoint.
    #[inline]
    pub fn touches(&self, v: VertexId<I>) -> bool {
        self.from == v || self.to == v
    }

    /// True if both cuts join the same pair of vertices.
    pub fn same_endpoints(&self, other: &Cut<I>) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

/// Candidates evaluated for one critical event.
#[derive(Debug, Clone)]
pub struct CandidateSet<I: MeshIndex = u32> {
    /// The vertex being processed.
    pub vertex: VertexId<I>,
    /// Evaluated candidates; the first one is the helper diagonal.
    pub candidates: Vec<Cut<I>>,
    /// Position of the committed candidate.
    pub chosen: usize,
}

impl<I: MeshIndex> CandidateSet<I> {
    /// The committed candidate.
    pub fn chosen(&self) -> &Cut<I> {
        &self.candidates[self.chosen]
    }
}

/// The selected cuts for one axis.
#[derive(Debug, Clone)]
pub struct CutSet<I: MeshIndex = u32> {
    /// Sweep axis.
    pub axis: Axis,
    /// Committed cuts, in commit order.
    pub cuts: Vec<Cut<I>>,
    /// Candidate sets in commit order, one per cut.
    pub candidates: Vec<CandidateSet<I>>,
}

impl<I: MeshIndex> CutSet<I> {
    /// Number of cuts.
    #[inline]
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// True if the set holds no cut.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Iterate over the cuts.
    pub fn iter(&self) -> std::slice::Iter<'_, Cut<I>> {
        self.cuts.iter()
    }

    /// Sum of the residual severities.
    pub fn total_severity(&self) -> f64 {
        self.cuts.iter().map(|c| c.severity).sum()
    }

    /// Sum of the cut lengths.
    pub fn total_length(&self) -> f64 {
        self.cuts.iter().map(|c| c.length).sum()
    }

    /// Endpoint pairs, in commit order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.cuts
            .iter()
            .map(|c| (c.from.index(), c.to.index()))
            .collect()
    }

    /// First pair of cuts that cross, overlap or duplicate each other.
    pub fn find_crossing(&self, mesh: &PolygonMesh<I>) -> Option<(usize, usize)> {
        for i in 0..self.cuts.len() {
            for j in i + 1..self.cuts.len() {
                if cuts_conflict(mesh, &self.cuts[i], &self.cuts[j]) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// True if some pair of cuts conflicts.
    pub fn has_crossings(&self, mesh: &PolygonMesh<I>) -> bool {
        self.find_crossing(mesh).is_some()
    }

    /// Check that every split and merge vertex is resolved exactly once.
    pub fn verify_resolved(
        &self,
        mesh: &PolygonMesh<I>,
        classification: &Classification<I>,
    ) -> Result<()> {
        let axis = self.axis;
        let mut counts = vec![0usize; mesh.num_vertices()];
        for cut in &self.cuts {
            for v in &cut.resolves {
                counts[v.index()] += 1;
            }
        }

        for v in classification.critical() {
            match counts[v.index()] {
                0 => {
                    return Err(DecompError::UnresolvedCut {
                        axis,
                        vertex: v.index(),
                        class: classification.class_of(v),
                    })
                }
                1 => {}
                _ => {
                    return Err(DecompError::PartitionInvariant {
                        axis,
                        violation: PartitionViolation::ResolvedTwice { vertex: v.index() },
                    })
                }
            }
        }
        Ok(())
    }

    /// Check that no two cuts cross. Compares every pair of cuts.
    pub fn verify_non_crossing(&self, mesh: &PolygonMesh<I>) -> Result<()> {
        match self.find_crossing(mesh) {
            Some((first, second)) => Err(DecompError::PartitionInvariant {
                axis: self.axis,
                violation: PartitionViolation::CutsCross { first, second },
            }),
            None => Ok(()),
        }
    }

    /// Check that every split and merge vertex is resolved exactly once and
    /// that no two cuts cross.
    pub fn verify_feasible(
        &self,
        mesh: &PolygonMesh<I>,
        classification: &Classification<I>,
    ) -> Result<()> {
        self.verify_resolved(mesh, classification)?;
        self.verify_non_crossing(mesh)
    }
}

impl<'a, I: MeshIndex> IntoIterator for &'a CutSet<I> {
    type Item = &'a Cut<I>;
    type IntoIter = std::slice::Iter<'a, Cut<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cuts.iter()
    }
}

/// True if two cuts share a point other than a common endpoint, or coincide.
fn cuts_conflict<I: MeshIndex>(mesh: &PolygonMesh<I>, a: &Cut<I>, b: &Cut<I>) -> bool {
    if a.same_endpoints(b) {
        return true;
    }
    let shared = [a.from, a.to].into_iter().find(|&v| b.touches(v));
    match shared {
        Some(s) => {
            let p = mesh.position(s);
            let qa = mesh.position(if a.from == s { a.to } else { a.from });
            let qb = mesh.position(if b.from == s { b.to } else { b.from });
            // Sharing an endpoint only conflicts when the cuts leave it in the same direction.
            cross(p, qa, qb) == 0.0 && (qa - p).dot(&(qb - p)) > 0.0
        }
        None => segments_intersect(
            mesh.position(a.from),
            mesh.position(a.to),
            mesh.position(b.from),
            mesh.position(b.to),
        ),
    }
}

/// Proposes cuts for critical vertices and keeps the committed ones.
#[derive(Debug)]
pub struct CutGenerator<'a, I: MeshIndex = u32> {
    mesh: &'a PolygonMesh<I>,
    classification: &'a Classification<I>,
    diagonal: f64,
    committed: Vec<Cut<I>>,
    candidates: Vec<CandidateSet<I>>,
}

impl<'a, I: MeshIndex> CutGenerator<'a, I> {
    /// Create a generator for one axis.
    pub fn new(mesh: &'a PolygonMesh<I>, classification: &'a Classification<I>) -> Self {
        Self {
            mesh,
            classification,
            diagonal: mesh.diagonal(),
            committed: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Cuts committed so far.
    #[inline]
    pub fn committed(&self) -> &[Cut<I>] {
        &self.committed
    }

    /// Build a candidate from `from` to `to`.
    pub fn candidate(&self, from: VertexId<I>, to: VertexId<I>, valid: bool) -> Cut<I> {
        let a = self.classification.local(from);
        let b = self.classification.local(to);
        Cut {
            from,
            to,
            axis: self.classification.axis(),
            severity: cut_severity(a, b, self.diagonal),
            length: (b - a).norm(),
            valid,
            resolves: Vec::new(),
        }
    }

    /// True if the segment `a-b` is a diagonal of the polygon that does not
    /// conflict with a committed cut.
    ///
    /// Scans every ring edge and committed cut.
    pub fn is_visible(&self, a: VertexId<I>, b: VertexId<I>) -> bool {
        let mesh = self.mesh;
        if a == b || mesh.ring_next(a) == b || mesh.ring_prev(a) == b {
            return false;
        }
        if !self.enters(a, b) || !self.enters(b, a) {
            return false;
        }
        let pa = mesh.position(a);
        let pb = mesh.position(b);

        let blocked = mesh.vertex_ids().any(|u| {
            let w = mesh.ring_next(u);
            if u == a || u == b || w == a || w == b {
                return false;
            }
            segments_intersect(pa, pb, mesh.position(u), mesh.position(w))
        });
        if blocked {
            return false;
        }

        let tentative = self.candidate(a, b, true);
        !self.committed.iter().any(|c| cuts_conflict(mesh, &tentative, c))
    }

    /// True if the upper endpoint of `edge` is visible from `v`, which lies
    /// directly beside the edge on the sweep line.
    pub fn sees_upper(&self, v: VertexId<I>, edge: &ActiveEdge<I>) -> bool {
        let mesh = self.mesh;
        let target = edge.upper_vertex;
        if v == target || mesh.ring_next(v) == target || mesh.ring_prev(v) == target {
            return false;
        }
        edge.sees_upper(self.classification.local(v))
            && self.enters(v, target)
            && self.enters(target, v)
    }

    /// True if the direction from `v` toward `target` starts into the interior.
    fn enters(&self, v: VertexId<I>, target: VertexId<I>) -> bool {
        let mesh = self.mesh;
        in_cone(
            mesh.position(mesh.ring_prev(v)),
            mesh.position(v),
            mesh.position(mesh.ring_next(v)),
            mesh.position(target),
        )
    }

    /// Candidates for the split vertex `v`, helper diagonal first.
    ///
    /// `left` is the active edge directly left of `v` and `right` the one
    /// directly right. When the helper is a merge vertex it must be resolved
    /// by this cut, so it is the only candidate.
    pub fn split_candidates(
        &self,
        v: VertexId<I>,
        helper: Helper<I>,
        left: &ActiveEdge<I>,
        right: Option<&ActiveEdge<I>>,
    ) -> Vec<Cut<I>> {
        let mut cuts = vec![self.candidate(v, helper.vertex, true)];
        if helper.is_merge {
            return cuts;
        }

        for edge in std::iter::once(left).chain(right) {
            let target = edge.upper_vertex;
            if cuts.iter().any(|c| c.to == target) {
                continue;
            }
            let valid = self.sees_upper(v, edge);
            log::trace!(
                "{} axis: candidate {}-{} visible={}",
                self.classification.axis(),
                v,
                target,
                valid
            );
            cuts.push(self.candidate(v, target, valid));
        }
        cuts
    }

    /// Commit the best valid candidate and return a reference to it.
    ///
    /// Candidates are ranked by severity, then length; remaining ties keep the
    /// earlier candidate.
    pub fn commit_best(
        &mut self,
        mut candidates: Vec<Cut<I>>,
        resolves: Vec<VertexId<I>>,
    ) -> &Cut<I> {
        let mut chosen = 0;
        for (i, c) in candidates.iter().enumerate().skip(1) {
            if !c.valid {
                continue;
            }
            let best = &candidates[chosen];
            let better = c.severity < best.severity - RANK_EPSILON
                || ((c.severity - best.severity).abs() <= RANK_EPSILON
                    && c.length < best.length - RANK_EPSILON);
            if better {
                chosen = i;
            }
        }

        candidates[chosen].resolves = resolves;
        let cut = candidates[chosen].clone();
        log::trace!(
            "{} axis: cut {}-{} severity {:.4} resolves {:?}",
            cut.axis,
            cut.from,
            cut.to,
            cut.severity,
            cut.resolves
        );
        self.candidates.push(CandidateSet {
            vertex: cut.from,
            candidates,
            chosen,
        });
        self.committed.push(cut);
        &self.committed[self.committed.len() - 1]
    }

    /// Commit the cut from `v` to the merge vertex `merge`, which it resolves.
    pub fn resolve_merge(&mut self, v: VertexId<I>, merge: VertexId<I>) {
        let cut = self.candidate(v, merge, true);
        self.commit_best(vec![cut], vec![merge]);
    }

    /// Finish and return the cut set.
    pub fn finish(self) -> CutSet<I> {
        CutSet {
            axis: self.classification.axis(),
            cuts: self.committed,
            candidates: self.candidates,
        }
    }
}
