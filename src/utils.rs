//! Common utilities used across the crate.
//!
//! This module provides the parallelism flag threaded through training and
//! cross-validation, thread pool setup, and small statistical helpers.

use rayon::prelude::*;

// =============================================================================
// Statistical Utilities
// =============================================================================

/// Compute the quantile of a slice using a step function.
///
/// No interpolation: returns the value at the point where the cumulative
/// count first reaches `alpha * n`.
///
/// `scratch` is reused for the sort permutation and resized if needed.
/// Returns `f32::NAN` if `values` is empty.
#[inline]
pub fn quantile(values: &[f32], alpha: f32, scratch: &mut Vec<usize>) -> f32 {
    let n = values.len();
    if n == 0 {
        return f32::NAN;
    }
    if n == 1 {
        return values[0];
    }

    scratch.clear();
    scratch.extend(0..n);
    scratch.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let threshold = n as f32 * alpha;
    let mut cumulative = 0.0f32;
    for &idx in scratch.iter() {
        cumulative += 1.0;
        if cumulative >= threshold {
            return values[idx];
        }
    }

    values[scratch[n - 1]]
}

/// Arithmetic mean and population standard deviation of a slice.
///
/// Returns `(NaN, NaN)` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed through training and cross-validation.
/// When parallel, components may use `rayon` parallel iterators; otherwise
/// they must iterate sequentially.
///
/// The thread pool itself is set up at the API boundary via `n_threads`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the rayon pool has multiple threads)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map over `iter`, in parallel when allowed. Output order always matches input order.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        <I as IntoParallelIterator>::Iter: IndexedParallelIterator,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use the global rayon pool)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use a dedicated pool with exactly `n` threads
///
/// If a dedicated pool cannot be created the closure runs on the global pool.
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel if n_threads == 0 => f(Parallelism::Parallel),
        Parallelism::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(err) => {
                    tracing::warn!(n_threads, %err, "falling back to the global thread pool");
                    f(Parallelism::Parallel)
                }
            }
        }
    }
}
