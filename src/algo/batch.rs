//! Batch decomposition of named polygons.
//!
//! Every polygon is decomposed independently on the rayon pool. A failure is
//! recorded with the index and name of its input and the batch carries on, so
//! one bad boundary never hides the results for the others.
//!
//! # Example
//!
//! ```
//! use boustro::algo::arbiter::DecomposeOptions;
//! use boustro::algo::batch::decompose_batch;
//! use boustro::polygon::Polygon;
//!
//! let items = vec![
//!     ("square", Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])),
//!     ("sliver", Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])),
//! ];
//!
//! let report = decompose_batch(&items, &DecomposeOptions::default()).unwrap();
//! assert_eq!(report.successes.len(), 1);
//! assert_eq!(report.failures[0].name, "sliver");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::arbiter::{decompose, DecomposeOptions, Decomposition};
use super::Progress;
use crate::error::{DecompError, Result};
use crate::polygon::Polygon;

/// A decomposed batch item.
#[derive(Debug, Clone)]
pub struct BatchSuccess {
    /// Position in the input.
    pub index: usize,
    /// Name of the input polygon.
    pub name: String,
    /// The decomposition.
    pub decomposition: Decomposition,
}

/// A batch item that failed.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Position in the input.
    pub index: usize,
    /// Name of the input polygon.
    pub name: String,
    /// Why it failed.
    pub error: DecompError,
}

/// Outcome of a batch, both lists in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Items that decomposed.
    pub successes: Vec<BatchSuccess>,
    /// Items that failed.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of processed items.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// True if the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if no item failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of cells over all successful items.
    pub fn total_cells(&self) -> usize {
        self.successes
            .iter()
            .map(|s| s.decomposition.num_cells())
            .sum()
    }
}

/// Decompose every polygon in `items`.
///
/// Returns an error only for invalid options; per-item failures are reported
/// in the [`BatchReport`].
pub fn decompose_batch<S>(
    items: &[(S, Polygon)],
    options: &DecomposeOptions,
) -> Result<BatchReport>
where
    S: AsRef<str> + Sync,
{
    decompose_batch_with_progress(items, options, &Progress::none())
}

/// Decompose every polygon in `items`, reporting each finished item.
pub fn decompose_batch_with_progress<S>(
    items: &[(S, Polygon)],
    options: &DecomposeOptions,
    progress: &Progress,
) -> Result<BatchReport>
where
    S: AsRef<str> + Sync,
{
    options.validate()?;
    let total = items.len();
    let done = AtomicUsize::new(0);

    let outcomes: Vec<(usize, &str, Result<Decomposition>)> = items
        .par_iter()
        .enumerate()
        .map(|(index, (name, polygon))| {
            let name: &str = name.as_ref();
            let outcome = decompose(polygon, options);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress.report(finished, total, name);
            (index, name, outcome)
        })
        .collect();

    let mut report = BatchReport::default();
    for (index, name, outcome) in outcomes {
        match outcome {
            Ok(decomposition) => report.successes.push(BatchSuccess {
                index,
                name: name.to_string(),
                decomposition,
            }),
            Err(error) => {
                log::warn!("{} (item {}) failed: {}", name, index, error);
                report.failures.push(BatchFailure {
                    index,
                    name: name.to_string(),
                    error,
                });
            }
        }
    }
    log::debug!(
        "batch of {}: {} decomposed, {} failed, {} cells",
        total,
        report.successes.len(),
        report.failures.len(),
        report.total_cells()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures;
    use std::sync::{Arc, Mutex};

    fn named() -> Vec<(String, Polygon)> {
        vec![
            ("square".to_string(), fixtures::unit_square()),
            (
                "bowtie".to_string(),
                Polygon::from_coords(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 2.0)]),
            ),
            ("comb".to_string(), fixtures::comb()),
            ("holes".to_string(), fixtures::grid_of_holes()),
        ]
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let _ = env_logger::builder().is_test(true).try_init();
        let report = decompose_batch(&named(), &DecomposeOptions::default()).unwrap();

        assert_eq!(report.len(), 4);
        assert!(!report.is_complete());
        let indices: Vec<usize> = report.successes.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);

        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!((failure.index, failure.name.as_str()), (1, "bowtie"));
        assert!(failure.error.is_input_error());
    }

    #[test]
    fn test_batch_progress() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |done, total, name| {
            sink.lock().unwrap().push((done, total, name.to_string()));
        });

        let items = named();
        let options = DecomposeOptions::default();
        let report = decompose_batch_with_progress(&items, &options, &progress).unwrap();
        assert_eq!(report.len(), items.len());

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        let counts: Vec<usize> = seen.iter().map(|(done, _, _)| *done).collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
        assert!(seen.iter().all(|(_, total, _)| *total == 4));
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let items = vec![("comb", fixtures::comb()), ("two", fixtures::two_holes())];
        let options = DecomposeOptions::default();
        let report = decompose_batch(&items, &options).unwrap();
        for success in &report.successes {
            let single = decompose(&items[success.index].1, &options).unwrap();
            assert_eq!(single.cells, success.decomposition.cells);
        }
        assert_eq!(
            report.total_cells(),
            report
                .successes
                .iter()
                .map(|s| s.decomposition.cells.len())
                .sum::<usize>()
        );
    }

    #[test]
    fn test_batch_rejects_bad_options() {
        let options = DecomposeOptions::default().with_tie_epsilon(-1.0);
        assert!(decompose_batch(&named(), &options).is_err());
        let empty: Vec<(&str, Polygon)> = Vec::new();
        assert!(decompose_batch(&empty, &DecomposeOptions::default())
            .unwrap()
            .is_empty());
    }
}
