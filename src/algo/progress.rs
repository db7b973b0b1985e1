//! Progress reporting for batch decomposition.
//!
//! A [`Progress`] wraps a callback that receives the number of finished
//! items, the total, and a short message. Callbacks may be invoked from
//! worker threads, so they must be `Send + Sync`.
//!
//! # Example
//!
//! ```
//! use boustro::algo::progress::Progress;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&calls);
//! let progress = Progress::new(move |_done, _total, _message| {
//!     seen.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! progress.report(1, 4, "field-7");
//! assert_eq!(calls.load(Ordering::Relaxed), 1);
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Number of finished steps
/// - `total`: Total number of steps
/// - `message`: Description of the step that just finished
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
