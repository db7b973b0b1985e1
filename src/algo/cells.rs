//! Cell extraction.
//!
//! The cell builder inserts every cut of a [`CutSet`] into its own copy of the
//! mesh, rebuilds the faces and emits each face as a [`Cell`]. Each cut either
//! splits a face in two or joins a hole to the face around it, so a feasible
//! cut set over a polygon with `h` holes yields `cuts + 1 - h` cells.
//!
//! Cells are the faces of the minimal cut set, not of a full boustrophedon
//! cut that extends every critical cut across the polygon. A square field
//! with one square hole therefore gives two cells (one cut above the hole
//! and one below), where the extended cut would give four.
//!
//! With verification enabled the cut set and the partition are checked:
//!
//! 1. No two cuts cross.
//! 2. Every cell is a simple ring with positive area.
//! 3. The cell areas sum to the polygon area.
//! 4. No two cells overlap.
//! 5. Every cell is monotone for the axis.
//!
//! A failed check is an internal inconsistency and is reported as
//! [`DecompError::PartitionInvariant`].

use nalgebra::Point2;

use super::axis::Axis;
use super::cuts::CutSet;
use super::monotone::is_monotone;
use crate::error::{DecompError, PartitionViolation, Result};
use crate::mesh::{MeshIndex, PolygonMesh, VertexId};
use crate::polygon::{find_self_intersection, Polygon};
use crate::predicates::{
    bounding_box, cross, point_in_ring, point_on_ring, point_strictly_in_ring,
    segments_properly_intersect, signed_area,
};

/// A monotone piece of the decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<I: MeshIndex = u32> {
    /// The axis the cell is monotone for.
    pub axis: Axis,
    /// Vertices counter-clockwise, starting at the smallest id.
    pub vertices: Vec<VertexId<I>>,
    /// Positions of `vertices`.
    pub ring: Vec<Point2<f64>>,
}

impl<I: MeshIndex> Cell<I> {
    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if the cell has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        signed_area(&self.ring)
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        bounding_box(&self.ring)
    }

    /// True if every sweep line of the cell's axis meets it at most twice.
    pub fn is_monotone(&self) -> bool {
        is_monotone(&self.ring, self.axis)
    }

    /// The cell as a standalone polygon.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.ring.clone())
    }
}

/// Apply a cut set and extract the cells.
///
/// `area_tolerance` is relative to the polygon area. Verification can be
/// skipped when the caller trusts the cut set.
pub fn build_cells<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    cuts: &CutSet<I>,
    area_tolerance: f64,
    verify: bool,
) -> Result<Vec<Cell<I>>> {
    let axis = cuts.axis;
    let fail = |violation| DecompError::PartitionInvariant { axis, violation };
    if verify {
        cuts.verify_non_crossing(mesh)?;
    }
    let required = mesh.num_halfedges() + 2 * cuts.len();
    if required > I::capacity() {
        return Err(DecompError::IndexOverflow {
            required,
            capacity: I::capacity(),
        });
    }

    let mut split = mesh.clone();
    for cut in cuts {
        let outside = |at: VertexId<I>| {
            fail(PartitionViolation::CutOutsideInterior {
                from: cut.from.index(),
                to: cut.to.index(),
                at: at.index(),
            })
        };
        if split.find_sector(cut.from, cut.to).is_none() {
            return Err(outside(cut.from));
        }
        if split.find_sector(cut.to, cut.from).is_none() {
            return Err(outside(cut.to));
        }
        split
            .insert_diagonal(cut.from, cut.to)
            .ok_or_else(|| outside(cut.from))?;
    }
    split.rebuild_faces();

    let cells: Vec<Cell<I>> = split
        .face_ids()
        .map(|f| {
            let mut vertices: Vec<VertexId<I>> = split.face_vertices(f).collect();
            if let Some(start) = (0..vertices.len()).min_by_key(|&i| vertices[i]) {
                vertices.rotate_left(start);
            }
            let ring = vertices.iter().map(|&v| *split.position(v)).collect();
            Cell {
                axis,
                vertices,
                ring,
            }
        })
        .collect();

    if verify {
        verify_partition(mesh, &cells, axis, area_tolerance)?;
    }
    log::debug!("{} axis: {} cells from {} cuts", axis, cells.len(), cuts.len());
    Ok(cells)
}

/// Check that the cells partition the polygon of `mesh`.
pub fn verify_partition<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    cells: &[Cell<I>],
    axis: Axis,
    area_tolerance: f64,
) -> Result<()> {
    let fail = |violation| Err(DecompError::PartitionInvariant { axis, violation });

    for (i, cell) in cells.iter().enumerate() {
        let mut ids = cell.vertices.clone();
        ids.sort_unstable();
        ids.dedup();
        if cell.len() < 3
            || ids.len() != cell.len()
            || cell.area() <= 0.0
            || find_self_intersection(&cell.ring).is_some()
        {
            return fail(PartitionViolation::NonSimpleCell { cell: i });
        }
    }

    let total: f64 = cells.iter().map(Cell::area).sum();
    let expected = mesh.area();
    if (total - expected).abs() > area_tolerance * expected.abs() {
        return fail(PartitionViolation::AreaMismatch {
            cells: total,
            polygon: expected,
        });
    }

    let samples: Vec<Option<Point2<f64>>> =
        cells.iter().map(|c| interior_point(&c.ring)).collect();
    let boxes: Vec<_> = cells.iter().map(Cell::bounding_box).collect();
    for i in 0..cells.len() {
        for j in i + 1..cells.len() {
            if !boxes_overlap(boxes[i], boxes[j]) {
                continue;
            }
            if rings_cross(&cells[i].ring, &cells[j].ring)
                || samples[i].is_some_and(|p| point_strictly_in_ring(&p, &cells[j].ring))
                || samples[j].is_some_and(|p| point_strictly_in_ring(&p, &cells[i].ring))
            {
                return fail(PartitionViolation::Overlap {
                    first: i,
                    second: j,
                });
            }
        }
    }

    if let Some(cell) = cells.iter().position(|c| !c.is_monotone()) {
        return fail(PartitionViolation::NotMonotone { cell });
    }
    Ok(())
}

fn boxes_overlap(
    a: Option<(Point2<f64>, Point2<f64>)>,
    b: Option<(Point2<f64>, Point2<f64>)>,
) -> bool {
    match (a, b) {
        (Some((amin, amax)), Some((bmin, bmax))) => {
            amin.x <= bmax.x && bmin.x <= amax.x && amin.y <= bmax.y && bmin.y <= amax.y
        }
        _ => false,
    }
}

fn rings_cross(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    let (na, nb) = (a.len(), b.len());
    (0..na).any(|i| {
        (0..nb).any(|j| {
            segments_properly_intersect(&a[i], &a[(i + 1) % na], &b[j], &b[(j + 1) % nb])
        })
    })
}

/// A point strictly inside a simple counter-clockwise ring: the centroid of
/// its first ear.
fn interior_point(ring: &[Point2<f64>]) -> Option<Point2<f64>> {
    let n = ring.len();
    (0..n).find_map(|i| {
        let prev = &ring[(i + n - 1) % n];
        let v = &ring[i];
        let next = &ring[(i + 1) % n];
        if cross(prev, v, next) <= 0.0 {
            return None;
        }
        let triangle = [*prev, *v, *next];
        let blocked = (0..n)
            .filter(|&k| k != i && k != (i + 1) % n && k != (i + n - 1) % n)
            .any(|k| point_in_ring(&ring[k], &triangle) || point_on_ring(&ring[k], &triangle));
        if blocked {
            return None;
        }
        Some(Point2::from((prev.coords + v.coords + next.coords) / 3.0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::classify::classify;
    use crate::algo::cuts::CutGenerator;
    use crate::algo::fixtures;
    use crate::algo::select::select_cuts;
    use crate::mesh::build_polygon_mesh;

    fn ids(cell: &Cell) -> Vec<usize> {
        cell.vertices.iter().map(|v| v.index()).collect()
    }

    fn cells_for(poly: &Polygon, axis: Axis) -> (PolygonMesh, Vec<Cell>) {
        let mesh: PolygonMesh = build_polygon_mesh(poly).unwrap();
        let c = classify(&mesh, axis);
        let cuts = select_cuts(&mesh, &c).unwrap();
        let cells = build_cells(&mesh, &cuts, 1e-9, true).unwrap();
        (mesh, cells)
    }

    #[test]
    fn test_no_cuts_single_cell() {
        let (_, cells) = cells_for(&fixtures::unit_square(), Axis::Horizontal);
        assert_eq!(cells.len(), 1);
        assert_eq!(ids(&cells[0]), vec![0, 1, 2, 3]);
        assert!((cells[0].area() - 1.0).abs() < 1e-12);
        assert!(cells[0].is_monotone());
    }

    #[test]
    fn test_comb_cells() {
        let (_, cells) = cells_for(&fixtures::comb(), Axis::Horizontal);
        let mut rings: Vec<Vec<usize>> = cells.iter().map(ids).collect();
        rings.sort();
        assert_eq!(
            rings,
            vec![
                vec![0, 1, 2, 10],
                vec![2, 3, 4, 5, 8, 9, 10],
                vec![5, 6, 7, 8],
            ]
        );
        let area: f64 = cells.iter().map(Cell::area).sum();
        assert!((area - fixtures::comb().area()).abs() < 1e-9);
    }

    #[test]
    fn test_square_hole_cells() {
        let (_, cells) = cells_for(&fixtures::square_with_hole(), Axis::Horizontal);
        assert_eq!(cells.len(), 2);
        let mut areas: Vec<f64> = cells.iter().map(Cell::area).collect();
        areas.sort_by(f64::total_cmp);
        assert!((areas[0] - 4.0).abs() < 1e-12);
        assert!((areas[1] - 8.0).abs() < 1e-12);
        for cell in &cells {
            assert!(cell.is_monotone());
            assert_eq!(cell.axis, Axis::Horizontal);
        }
    }

    #[test]
    fn test_cells_start_at_smallest_id() {
        let (_, cells) = cells_for(&fixtures::grid_of_holes(), Axis::Vertical);
        for cell in &cells {
            let min = cell.vertices.iter().min().copied();
            assert_eq!(cell.vertices.first().copied(), min);
            assert!(cell.area() > 0.0);
        }
    }

    #[test]
    fn test_rejects_cut_outside_interior() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::comb()).unwrap();
        let c = classify(&mesh, Axis::Horizontal);
        let generator = CutGenerator::new(&mesh, &c);
        // Runs along the bottom edge through the notch: leaves the interior at P4.
        let cuts = CutSet {
            axis: Axis::Horizontal,
            cuts: vec![generator.candidate(VertexId::new(4), VertexId::new(6), false)],
            candidates: Vec::new(),
        };
        let err = build_cells(&mesh, &cuts, 1e-9, true).unwrap_err();
        assert!(matches!(
            err,
            DecompError::PartitionInvariant {
                violation: PartitionViolation::CutOutsideInterior { at: 4, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_verification_rejects_crossing_cuts() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::unit_square()).unwrap();
        let c = classify(&mesh, Axis::Horizontal);
        let generator = CutGenerator::new(&mesh, &c);
        let cuts = CutSet {
            axis: Axis::Horizontal,
            cuts: vec![
                generator.candidate(VertexId::new(0), VertexId::new(2), true),
                generator.candidate(VertexId::new(1), VertexId::new(3), true),
            ],
            candidates: Vec::new(),
        };
        let err = build_cells(&mesh, &cuts, 1e-9, true).unwrap_err();
        assert!(matches!(
            err,
            DecompError::PartitionInvariant {
                violation: PartitionViolation::CutsCross { first: 0, second: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_verification_catches_non_monotone() {
        let mesh: PolygonMesh = build_polygon_mesh(&fixtures::arrow()).unwrap();
        let empty = CutSet {
            axis: Axis::Horizontal,
            cuts: Vec::new(),
            candidates: Vec::new(),
        };
        let err = build_cells(&mesh, &empty, 1e-9, true).unwrap_err();
        assert!(matches!(
            err,
            DecompError::PartitionInvariant {
                violation: PartitionViolation::NotMonotone { cell: 0 },
                ..
            }
        ));
        // Without verification the single face is returned as is.
        assert_eq!(build_cells(&mesh, &empty, 1e-9, false).unwrap().len(), 1);
    }

    #[test]
    fn test_overlap_detected() {
        let a = Cell::<u32> {
            axis: Axis::Horizontal,
            vertices: (0..4).map(VertexId::new).collect(),
            ring: fixtures::unit_square().outer,
        };
        let mut b = a.clone();
        b.ring = b.ring.iter().map(|p| Point2::new(p.x + 0.5, p.y + 0.5)).collect();
        assert!(rings_cross(&a.ring, &b.ring));
        assert!(interior_point(&a.ring).is_some());
    }

    #[test]
    fn test_interior_point_of_reflex_ring() {
        let u = fixtures::u_shape().outer;
        let p = interior_point(&u).unwrap();
        assert!(point_strictly_in_ring(&p, &u));
    }
}
