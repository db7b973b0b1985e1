//! Dual-axis arbitration and the decomposition entry points.
//!
//! Each axis is evaluated independently on the same read-only mesh:
//! classification, vertex severity, cut selection and a scalar cost. The
//! cheaper axis wins and its cut set is applied by the cell builder.
//!
//! # Cost
//!
//! For an axis with `c` cuts on a polygon with `h` holes:
//!
//! ```text
//! cells = c + 1 - h
//! cost  = w_cells * cells + w_severity * Σ cut severity + w_length * Σ cut length / diagonal
//! ```
//!
//! Costs within `tie_epsilon` of each other tie; ties go to fewer cells, then
//! to the shorter total cut length, then to [`Axis::Horizontal`].
//!
//! # Example
//!
//! ```
//! use boustro::algo::arbiter::{decompose, DecomposeOptions};
//! use boustro::algo::axis::Axis;
//! use boustro::polygon::Polygon;
//!
//! let square = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
//! let result = decompose(&square, &DecomposeOptions::default()).unwrap();
//!
//! assert_eq!(result.cells.len(), 1);
//! assert!(result.cuts.is_empty());
//! assert_eq!(result.axis, Axis::Horizontal);
//! ```

use std::cmp::Ordering;

use super::axis::Axis;
use super::cells::{build_cells, Cell};
use super::classify::{classify, Classification};
use super::cuts::CutSet;
use super::select::select_cuts;
use super::severity::{estimate_severity, SeverityTable};
use crate::error::{DecompError, Result};
use crate::mesh::{build_polygon_mesh, MeshIndex, PolygonMesh};
use crate::polygon::Polygon;

/// Weights of the per-axis cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    /// Weight of the cell count.
    pub cells: f64,
    /// Weight of the summed cut severity.
    pub severity: f64,
    /// Weight of the summed cut length, normalized by the bounding-box diagonal.
    pub cut_length: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            cells: 1.0,
            severity: 1.0,
            cut_length: 1.0,
        }
    }
}

/// Which sweep axes to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisPolicy {
    /// Evaluate both axes and keep the cheaper one.
    #[default]
    Both,
    /// Evaluate a single axis.
    Only(Axis),
}

/// Options for [`decompose`].
#[derive(Debug, Clone)]
pub struct DecomposeOptions {
    /// Cost weights.
    pub weights: CostWeights,

    /// Axes to evaluate.
    pub axes: AxisPolicy,

    /// Whether to evaluate the two axes in parallel (default: true).
    pub parallel: bool,

    /// Relative difference under which two costs tie.
    pub tie_epsilon: f64,

    /// Relative tolerance of the area check on the cells.
    pub area_tolerance: f64,

    /// Whether to verify the partition before returning (default: true).
    pub verify: bool,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            axes: AxisPolicy::Both,
            parallel: true,
            tie_epsilon: 1e-9,
            area_tolerance: 1e-9,
            verify: true,
        }
    }
}

impl DecomposeOptions {
    /// Set the cost weights.
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Force a single sweep axis.
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axes = AxisPolicy::Only(axis);
        self
    }

    /// Set the axis policy.
    pub fn with_axes(mut self, axes: AxisPolicy) -> Self {
        self.axes = axes;
        self
    }

    /// Enable or disable parallel axis evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the cost tie tolerance.
    pub fn with_tie_epsilon(mut self, tie_epsilon: f64) -> Self {
        self.tie_epsilon = tie_epsilon;
        self
    }

    /// Set the area tolerance.
    pub fn with_area_tolerance(mut self, area_tolerance: f64) -> Self {
        self.area_tolerance = area_tolerance;
        self
    }

    /// Enable or disable partition verification.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Reject negative or non-finite weights and non-positive tolerances.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("weights.cells", self.weights.cells),
            ("weights.severity", self.weights.severity),
            ("weights.cut_length", self.weights.cut_length),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(DecompError::invalid_param(
                    name,
                    value,
                    "must be finite and non-negative",
                ));
            }
        }
        for (name, value) in [
            ("tie_epsilon", self.tie_epsilon),
            ("area_tolerance", self.area_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DecompError::invalid_param(
                    name,
                    value,
                    "must be finite and positive",
                ));
            }
        }
        Ok(())
    }
}

/// Cost summary of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCost {
    /// The sweep axis.
    pub axis: Axis,
    /// Number of cells the cut set produces.
    pub cells: usize,
    /// Number of cuts.
    pub cuts: usize,
    /// Sum of the residual cut severities.
    pub severity: f64,
    /// Sum of the cut lengths.
    pub cut_length: f64,
    /// Weighted cost.
    pub value: f64,
}

impl AxisCost {
    /// Cost of a cut set on `mesh`.
    pub fn of<I: MeshIndex>(
        mesh: &PolygonMesh<I>,
        cuts: &CutSet<I>,
        weights: &CostWeights,
    ) -> Self {
        let cells = (cuts.len() + 1).saturating_sub(mesh.num_holes()).max(1);
        let severity = cuts.total_severity();
        let cut_length = cuts.total_length();
        let diagonal = mesh.diagonal();
        let relative_length = if diagonal > 0.0 {
            cut_length / diagonal
        } else {
            0.0
        };
        Self {
            axis: cuts.axis,
            cells,
            cuts: cuts.len(),
            severity,
            cut_length,
            value: weights.cells * cells as f64
                + weights.severity * severity
                + weights.cut_length * relative_length,
        }
    }

    /// Order two costs, cheaper first.
    pub fn compare(&self, other: &AxisCost, tie_epsilon: f64) -> Ordering {
        if !nearly_equal(self.value, other.value, tie_epsilon) {
            return self.value.total_cmp(&other.value);
        }
        self.cells
            .cmp(&other.cells)
            .then_with(|| {
                if nearly_equal(self.cut_length, other.cut_length, tie_epsilon) {
                    Ordering::Equal
                } else {
                    self.cut_length.total_cmp(&other.cut_length)
                }
            })
            .then_with(|| self.axis.cmp(&other.axis))
    }
}

fn nearly_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon * a.abs().max(b.abs()).max(1.0)
}

/// Everything computed for one axis.
#[derive(Debug, Clone)]
pub struct AxisPlan<I: MeshIndex = u32> {
    /// Vertex classification.
    pub classification: Classification<I>,
    /// Vertex severities.
    pub severity: SeverityTable<I>,
    /// Selected cuts.
    pub cuts: CutSet<I>,
    /// Cost summary.
    pub cost: AxisCost,
}

/// Classify, score and select cuts for one axis.
pub fn evaluate_axis<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    axis: Axis,
    weights: &CostWeights,
) -> Result<AxisPlan<I>> {
    let classification = classify(mesh, axis);
    let severity = estimate_severity(mesh, &classification)?;
    let cuts = select_cuts(mesh, &classification)?;
    let cost = AxisCost::of(mesh, &cuts, weights);
    log::debug!(
        "{} axis: {} critical vertices (severity {:.4}), {} cuts, {} cells, cost {:.6}",
        axis,
        severity.entries().len(),
        severity.total(),
        cost.cuts,
        cost.cells,
        cost.value
    );
    Ok(AxisPlan {
        classification,
        severity,
        cuts,
        cost,
    })
}

/// Evaluate the axes allowed by the options and return the winner and, when
/// both axes were evaluated, the runner-up.
pub fn arbitrate<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    options: &DecomposeOptions,
) -> Result<(AxisPlan<I>, Option<AxisPlan<I>>)> {
    let weights = &options.weights;
    match options.axes {
        AxisPolicy::Only(axis) => Ok((evaluate_axis(mesh, axis, weights)?, None)),
        AxisPolicy::Both => {
            let (horizontal, vertical) = if options.parallel {
                rayon::join(
                    || evaluate_axis(mesh, Axis::Horizontal, weights),
                    || evaluate_axis(mesh, Axis::Vertical, weights),
                )
            } else {
                (
                    evaluate_axis(mesh, Axis::Horizontal, weights),
                    evaluate_axis(mesh, Axis::Vertical, weights),
                )
            };
            let (horizontal, vertical) = (horizontal?, vertical?);

            let ordering = horizontal.cost.compare(&vertical.cost, options.tie_epsilon);
            let (winner, runner_up) = if ordering == Ordering::Greater {
                (vertical, horizontal)
            } else {
                (horizontal, vertical)
            };
            log::debug!(
                "chose {} axis (cost {:.6}) over {} axis (cost {:.6})",
                winner.cost.axis,
                winner.cost.value,
                runner_up.cost.axis,
                runner_up.cost.value
            );
            Ok((winner, Some(runner_up)))
        }
    }
}

/// Result of a decomposition.
#[derive(Debug, Clone)]
pub struct Decomposition<I: MeshIndex = u32> {
    /// The winning axis; every cell is monotone for it.
    pub axis: Axis,
    /// The cells, in face order.
    pub cells: Vec<Cell<I>>,
    /// The applied cut set.
    pub cuts: CutSet<I>,
    /// Cost of the winning axis.
    pub cost: AxisCost,
    /// Cost of the losing axis, when both were evaluated.
    pub runner_up: Option<AxisCost>,
}

impl<I: MeshIndex> Decomposition<I> {
    /// Number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Sum of the cell areas.
    pub fn total_area(&self) -> f64 {
        self.cells.iter().map(Cell::area).sum()
    }
}

/// Decompose a polygon into monotone cells.
pub fn decompose(polygon: &Polygon, options: &DecomposeOptions) -> Result<Decomposition> {
    options.validate()?;
    let mesh: PolygonMesh = build_polygon_mesh(polygon)?;
    decompose_mesh(&mesh, options)
}

/// Decompose an already built mesh. The mesh is not modified.
pub fn decompose_mesh<I: MeshIndex>(
    mesh: &PolygonMesh<I>,
    options: &DecomposeOptions,
) -> Result<Decomposition<I>> {
    options.validate()?;
    let (winner, runner_up) = arbitrate(mesh, options)?;
    let cells = build_cells(mesh, &winner.cuts, options.area_tolerance, options.verify)?;
    Ok(Decomposition {
        axis: winner.cost.axis,
        cells,
        cuts: winner.cuts,
        cost: winner.cost,
        runner_up: runner_up.map(|plan| plan.cost),
    })
}
