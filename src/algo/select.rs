//! Uniaxial feasible cut selection.
//!
//! A single sweep over the vertices in sweep order maintains the active edges
//! and their helpers, and commits one cut per unresolved critical vertex:
//!
//! - a split vertex is joined to a vertex above it, normally the helper of the
//!   edge directly to its left;
//! - a merge vertex becomes the helper of the edge to its left and is joined to
//!   the next vertex that replaces it as a helper, or that ends its edge.
//!
//! Only split vertices compare candidates. The cut of a merge vertex is fixed
//! by the vertex that next takes over its helper slot, since that is the
//! vertex whose cut keeps the faces below the merge monotone; a merge cut is
//! recorded as a one-candidate set.
//!
//! The resulting cut set makes every face monotone for the axis. The mesh is
//! not modified. Each vertex costs a constant number of status lookups, so a
//! sweep over `n` vertices runs in `O(n log n)`. Whether cuts cross is left
//! to [`CutSet::verify_non_crossing`], which the cell builder runs when
//! verification is enabled.
//!
//! # Example
//!
//! ```
//! use boustro::algo::axis::Axis;
//! use boustro::algo::classify::classify;
//! use boustro::algo::select::select_cuts;
//! use boustro::mesh::{build_polygon_mesh, PolygonMesh};
//! use boustro::polygon::Polygon;
//!
//! let poly = Polygon::from_coords(&[(0.0, 0.0), (2.0, 1.0), (4.0, 0.0), (2.0, 4.0)]);
//! let mesh: PolygonMesh = build_polygon_mesh(&poly).unwrap();
//! let classification = classify(&mesh, Axis::Horizontal);
//!
//! let cuts = select_cuts(&mesh, &classification).unwrap();
//! assert_eq!(cuts.pairs(), vec![(1, 3)]);
//! ```

use super::classify::{Classification, VertexClass};
use super::cuts::{CutGenerator, CutSet};
use super::sweep::{ActiveEdge, EdgeKey, Helper, SweepStatus, VertexEdges};
use crate::error::{DecompError, Result};
use crate::mesh::{MeshIndex, PolygonMesh, VertexId};

/// Select a feasible, non-crossing cut set for one axis.
pub fn select_cuts<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    classification: &Classification<I>,
) -> Result<CutSet<I>> {
    let axis = classification.axis();
    let mut status = SweepStatus::new();
    let mut generator = CutGenerator::new(mesh, classification);

    for &v in classification.sweep_order() {
        let class = classification.class_of(v);
        let edges = VertexEdges::of(mesh, classification, v);
        let p = *classification.local(v);
        let unresolved = || DecompError::UnresolvedCut {
            axis,
            vertex: v.index(),
            class,
        };

        // Edges ending here; a pending merge helper is resolved by a cut to v.
        for (ends, edge) in [
            (edges.incoming_ends, edges.incoming),
            (edges.outgoing_ends, edges.outgoing),
        ] {
            if !ends {
                continue;
            }
            let key = EdgeKey::of(mesh, classification, edge);
            let removed = status.remove(&key).ok_or_else(unresolved)?;
            if let Some(helper) = removed.helper.filter(|h| h.is_merge) {
                generator.resolve_merge(v, helper.vertex);
            }
        }

        // Vertices with interior to their left take over the helper of that edge.
        let right_chain =
            class == VertexClass::Regular && edges.outgoing_ends && !edges.incoming_ends;
        if class.is_critical() || right_chain {
            let left = status.left_of(&p).ok_or_else(unresolved)?;
            let helper = left.helper.ok_or_else(unresolved)?;

            if class == VertexClass::Split {
                let right = status.right_of(&p);
                let candidates = generator.split_candidates(v, helper, left, right);
                let mut resolves = Vec::with_capacity(2);
                if helper.is_merge {
                    resolves.push(helper.vertex);
                }
                resolves.push(v);
                generator.commit_best(candidates, resolves);
            } else if helper.is_merge {
                generator.resolve_merge(v, helper.vertex);
            }

            let left = status.left_of_mut(&p).ok_or_else(unresolved)?;
            left.helper = Some(Helper {
                vertex: v,
                is_merge: class == VertexClass::Merge,
            });
        }
        status.cast_shadows(&p);

        // Edges starting here; the left boundary one gets v as its helper.
        for (ends, edge) in [
            (edges.incoming_ends, edges.incoming),
            (edges.outgoing_ends, edges.outgoing),
        ] {
            if ends {
                continue;
            }
            let mut active = ActiveEdge::new(mesh, classification, edge);
            if active.left_boundary {
                active.helper = Some(Helper {
                    vertex: v,
                    is_merge: false,
                });
            }
            status.insert(active);
        }
    }

    let cuts = generator.finish();
    cuts.verify_resolved(mesh, classification)?;
    log::debug!(
        "{} axis: {} cuts, severity {:.4}, length {:.4}",
        axis,
        cuts.len(),
        cuts.total_severity(),
        cuts.total_length()
    );
    Ok(cuts)
}

/// Select cuts and return them as endpoint pairs, for callers that only need
/// the diagonals.
pub fn select_diagonals<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    classification: &Classification<I>,
) -> Result<Vec<(VertexId<I>, VertexId<I>)>> {
    Ok(select_cuts(mesh, classification)?
        .iter()
        .map(|c| c.endpoints())
        .collect())
}
