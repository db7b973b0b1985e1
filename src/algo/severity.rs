//! Severity of non-monotone features.
//!
//! Two measures are provided:
//!
//! - **Vertex severity**: for each split or merge vertex, the sweep line through
//!   it meets the nearest boundary edges on either side. The smaller of the two
//!   cross-axis distances, divided by the bounding-box diagonal, measures how
//!   deep the concavity reaches into the sweep. The residual severity of a
//!   particular cut is the cross-axis offset between its endpoints on the same
//!   scale ([`cut_severity`]); the cut generator ranks candidates by it.
//!
//! - **Gap profile**: a polygon-level scan that samples one line in every band
//!   between consecutive vertex coordinates and measures the exterior gaps that
//!   separate interior intervals on that line. A band whose sample line meets the
//!   boundary more than twice is *troublesome*.

use nalgebra::Point2;

use super::axis::Axis;
use super::classify::{Classification, VertexClass};
use super::sweep::{ActiveEdge, EdgeKey, SweepStatus, VertexEdges};
use crate::error::{DecompError, Result};
use crate::mesh::{MeshIndex, PolygonMesh, VertexId};

/// Severity of one split or merge vertex.
#[derive(Debug, Clone, Copy)]
pub struct VertexSeverity<I: MeshIndex = u32> {
    /// The vertex.
    pub vertex: VertexId<I>,
    /// Its classification.
    pub class: VertexClass,
    /// Normalized severity in `[0, 1]`.
    pub severity: f64,
    /// Nearest boundary point to the left on the sweep line (world coordinates).
    pub left: Point2<f64>,
    /// Nearest boundary point to the right on the sweep line (world coordinates).
    pub right: Point2<f64>,
}

impl<I: MeshIndex> VertexSeverity<I> {
    /// The closer of the two boundary points.
    pub fn nearest_boundary(&self, axis: Axis, at: &Point2<f64>) -> Point2<f64> {
        let c = axis.cross(at);
        if (c - axis.cross(&self.left)).abs() <= (axis.cross(&self.right) - c).abs() {
            self.left
        } else {
            self.right
        }
    }
}

/// Vertex severities for one axis.
#[derive(Debug, Clone)]
pub struct SeverityTable<I: MeshIndex = u32> {
    axis: Axis,
    diagonal: f64,
    entries: Vec<VertexSeverity<I>>,
    slots: Vec<Option<usize>>,
}

impl<I: MeshIndex> SeverityTable<I> {
    /// The sweep axis.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Bounding-box diagonal used for normalization.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.diagonal
    }

    /// Entries in sweep order.
    #[inline]
    pub fn entries(&self) -> &[VertexSeverity<I>] {
        &self.entries
    }

    /// Severity record of a vertex, if it is a split or merge vertex.
    pub fn get(&self, v: VertexId<I>) -> Option<&VertexSeverity<I>> {
        self.slots
            .get(v.index())
            .copied()
            .flatten()
            .map(|i| &self.entries[i])
    }

    /// Severity of a vertex, zero for non-critical vertices.
    pub fn severity_of(&self, v: VertexId<I>) -> f64 {
        self.get(v).map_or(0.0, |s| s.severity)
    }

    /// Sum of all vertex severities.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.severity).sum()
    }

    /// Largest vertex severity.
    pub fn max(&self) -> f64 {
        self.entries.iter().map(|e| e.severity).fold(0.0, f64::max)
    }
}

/// Residual severity of a cut between two local points.
#[inline]
pub fn cut_severity(a: &Point2<f64>, b: &Point2<f64>, diagonal: f64) -> f64 {
    if diagonal > 0.0 {
        (a.x - b.x).abs() / diagonal
    } else {
        0.0
    }
}

/// Compute the severity of every split and merge vertex for one axis.
///
/// Runs its own sweep over the ring edges; no helpers are tracked.
pub fn estimate_severity<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    classification: &Classification<I>,
) -> Result<SeverityTable<I>> {
    let axis = classification.axis();
    let diagonal = mesh.diagonal();
    let mut status = SweepStatus::new();
    let mut entries = Vec::new();
    let mut slots = vec![None; mesh.num_vertices()];

    for &v in classification.sweep_order() {
        let edges = VertexEdges::of(mesh, classification, v);
        if edges.incoming_ends {
            status.remove(&EdgeKey::of(mesh, classification, edges.incoming));
        }
        if edges.outgoing_ends {
            status.remove(&EdgeKey::of(mesh, classification, edges.outgoing));
        }

        let class = classification.class_of(v);
        if class.is_critical() {
            let p = classification.local(v);
            let unresolved = || DecompError::UnresolvedCut {
                axis,
                vertex: v.index(),
                class,
            };
            let left = status.left_of(p).ok_or_else(unresolved)?;
            let right = status.right_of(p).ok_or_else(unresolved)?;
            let lx = left.cross_at(p.y);
            let rx = right.cross_at(p.y);
            let gap = (p.x - lx).min(rx - p.x).max(0.0);

            slots[v.index()] = Some(entries.len());
            entries.push(VertexSeverity {
                vertex: v,
                class,
                severity: if diagonal > 0.0 { gap / diagonal } else { 0.0 },
                left: world(axis, lx, p.y),
                right: world(axis, rx, p.y),
            });
        }

        if !edges.incoming_ends {
            status.insert(ActiveEdge::new(mesh, classification, edges.incoming));
        }
        if !edges.outgoing_ends {
            status.insert(ActiveEdge::new(mesh, classification, edges.outgoing));
        }
    }

    Ok(SeverityTable {
        axis,
        diagonal,
        entries,
        slots,
    })
}

/// Map local `(cross, sweep)` coordinates back to world coordinates.
fn world(axis: Axis, cross: f64, sweep: f64) -> Point2<f64> {
    match axis {
        Axis::Horizontal => Point2::new(cross, sweep),
        Axis::Vertical => Point2::new(sweep, -cross),
    }
}

/// One band of a gap profile.
#[derive(Debug, Clone)]
pub struct GapBand {
    /// Lower sweep coordinate of the band.
    pub low: f64,
    /// Upper sweep coordinate of the band.
    pub high: f64,
    /// Boundary crossings of the sample line, sorted along the line.
    pub crossings: Vec<f64>,
    /// Exterior gaps between consecutive interior intervals.
    pub gaps: Vec<f64>,
    /// Polygon area inside the band.
    pub interior_area: f64,
}

impl GapBand {
    /// Sweep coordinate of the sample line.
    #[inline]
    pub fn position(&self) -> f64 {
        0.5 * (self.low + self.high)
    }

    /// Sum of the gaps in this band.
    pub fn total_gap(&self) -> f64 {
        self.gaps.iter().sum()
    }

    /// True if the sample line meets the boundary more than twice.
    #[inline]
    pub fn is_troublesome(&self) -> bool {
        self.crossings.len() > 2
    }
}

/// Gap profile of a polygon for one axis.
#[derive(Debug, Clone)]
pub struct GapProfile {
    /// The sweep axis.
    pub axis: Axis,
    /// Bands from the lowest to the highest sweep coordinate.
    pub bands: Vec<GapBand>,
}

impl GapProfile {
    /// Sum of all gaps.
    pub fn total_gap(&self) -> f64 {
        self.bands.iter().map(GapBand::total_gap).sum()
    }

    /// Widest single gap.
    pub fn max_gap(&self) -> f64 {
        self.bands
            .iter()
            .flat_map(|b| b.gaps.iter().copied())
            .fold(0.0, f64::max)
    }

    /// Number of troublesome bands.
    pub fn troublesome_bands(&self) -> usize {
        self.bands.iter().filter(|b| b.is_troublesome()).count()
    }

    /// Polygon area covered by troublesome bands.
    pub fn troublesome_area(&self) -> f64 {
        self.bands
            .iter()
            .filter(|b| b.is_troublesome())
            .map(|b| b.interior_area)
            .sum()
    }

    /// Largest number of crossings on any sample line.
    pub fn max_crossings(&self) -> usize {
        self.bands.iter().map(|b| b.crossings.len()).max().unwrap_or(0)
    }

    /// True if some band is troublesome.
    pub fn is_troublesome(&self) -> bool {
        self.bands.iter().any(GapBand::is_troublesome)
    }
}

/// Gap profile of the rings of a mesh.
pub fn gap_profile<I: MeshIndex>(mesh: &PolygonMesh<I>, axis: Axis, tolerance: f64) -> GapProfile {
    let rings: Vec<Vec<Point2<f64>>> = mesh.ring_ids().map(|r| mesh.ring_positions(r)).collect();
    rings_gap_profile(&rings, axis, tolerance)
}

/// Gap profile of a set of rings (outer ring and holes, any winding).
///
/// Band boundaries are the distinct vertex sweep coordinates, snapped to
/// multiples of `tolerance` when it is positive.
pub fn rings_gap_profile(rings: &[Vec<Point2<f64>>], axis: Axis, tolerance: f64) -> GapProfile {
    let local: Vec<Vec<Point2<f64>>> = rings
        .iter()
        .map(|r| r.iter().map(|p| axis.local(p)).collect())
        .collect();

    let mut levels: Vec<f64> = local
        .iter()
        .flatten()
        .map(|p| {
            if tolerance > 0.0 {
                (p.y / tolerance).round() * tolerance
            } else {
                p.y
            }
        })
        .collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();

    let bands = levels
        .windows(2)
        .map(|w| {
            let (low, high) = (w[0], w[1]);
            let y = 0.5 * (low + high);
            let mut crossings = Vec::new();
            for ring in &local {
                let n = ring.len();
                for i in 0..n {
                    let a = &ring[i];
                    let b = &ring[(i + 1) % n];
                    if (a.y > y) != (b.y > y) {
                        crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
                    }
                }
            }
            crossings.sort_by(f64::total_cmp);

            let gaps = crossings
                .chunks(2)
                .zip(crossings.chunks(2).skip(1))
                .map(|(prev, next)| next[0] - prev[prev.len() - 1])
                .collect();
            let width: f64 = crossings
                .chunks_exact(2)
                .map(|pair| pair[1] - pair[0])
                .sum();

            GapBand {
                low,
                high,
                crossings,
                gaps,
                interior_area: width * (high - low),
            }
        })
        .collect();

    GapProfile { axis, bands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::classify::classify;
    use crate::algo::fixtures;
    use crate::mesh::build_polygon_mesh;

    #[test]
    fn test_convex_has_no_entries() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::unit_square()).unwrap();
        let c = classify(&mesh, Axis::Horizontal);
        let table = estimate_severity(&mesh, &c).unwrap();
        assert!(table.entries().is_empty());
        assert_eq!(table.total(), 0.0);
    }

    #[test]
    fn test_comb_severities() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::comb()).unwrap();
        let c = classify(&mesh, Axis::Horizontal);
        let table = estimate_severity(&mesh, &c).unwrap();
        let diag = mesh.diagonal();

        // Deep notch apex (8, 4): walls at x = 0 and x = 12.
        let deep = table.get(VertexId::new(5)).unwrap();
        assert!((deep.severity - 4.0 / diag).abs() < 1e-12);
        assert_eq!(deep.left, Point2::new(0.0, 4.0));
        assert_eq!(deep.right, Point2::new(12.0, 4.0));

        // Shallow notch apex (3, 2): left wall at x = 0, deep notch side at x = 7.
        let shallow = table.get(VertexId::new(2)).unwrap();
        assert!((shallow.severity - 3.0 / diag).abs() < 1e-12);
        assert!((shallow.right.x - 7.0).abs() < 1e-12);

        assert!(deep.severity > shallow.severity);
        assert!((table.max() - deep.severity).abs() < 1e-15);
        assert_eq!(table.severity_of(VertexId::new(0)), 0.0);
        assert_eq!(deep.nearest_boundary(Axis::Horizontal, &Point2::new(8.0, 4.0)), deep.right);
    }

    #[test]
    fn test_hole_severity_vertical() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::square_with_hole()).unwrap();
        let c = classify(&mesh, Axis::Vertical);
        let table = estimate_severity(&mesh, &c).unwrap();
        assert_eq!(table.entries().len(), 2);
        for e in table.entries() {
            // Every hole corner is one unit from the nearest outer wall.
            assert!((e.severity - 1.0 / mesh.diagonal()).abs() < 1e-12);
            assert!(e.class.is_critical());
        }
    }

    #[test]
    fn test_cut_severity() {
        let a = Point2::new(1.0, 5.0);
        let b = Point2::new(4.0, 0.0);
        assert!((cut_severity(&a, &b, 6.0) - 0.5).abs() < 1e-12);
        assert_eq!(cut_severity(&a, &b, 0.0), 0.0);
    }

    #[test]
    fn test_gap_profile_square_hole() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::square_with_hole()).unwrap();
        let profile = gap_profile(&mesh, Axis::Horizontal, 0.0);

        assert_eq!(profile.bands.len(), 3);
        assert!(!profile.bands[0].is_troublesome());
        assert!(profile.bands[1].is_troublesome());
        assert!((profile.bands[1].position() - 2.0).abs() < 1e-12);
        assert_eq!(profile.bands[1].gaps, vec![2.0]);
        assert!((profile.total_gap() - 2.0).abs() < 1e-12);
        assert!((profile.max_gap() - 2.0).abs() < 1e-12);
        assert_eq!(profile.troublesome_bands(), 1);
        assert!((profile.troublesome_area() - 4.0).abs() < 1e-12);
        assert_eq!(profile.max_crossings(), 4);

        let area: f64 = profile.bands.iter().map(|b| b.interior_area).sum();
        assert!((area - mesh.area()).abs() < 1e-12);
    }

    #[test]
    fn test_gap_profile_arrow() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::arrow()).unwrap();
        assert!(gap_profile(&mesh, Axis::Horizontal, 0.0).is_troublesome());
        assert!(!gap_profile(&mesh, Axis::Vertical, 0.0).is_troublesome());
    }

    #[test]
    fn test_gap_profile_tolerance_merges_levels() {
        let rings = vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.01),
            Point2::new(0.0, 1.99),
        ]];
        assert_eq!(rings_gap_profile(&rings, Axis::Horizontal, 0.0).bands.len(), 2);
        assert_eq!(rings_gap_profile(&rings, Axis::Horizontal, 1.0).bands.len(), 1);
    }
}
