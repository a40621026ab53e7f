//! K-fold partitioning of row indices.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::CvError;

/// How rows are assigned to folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldStrategy {
    /// Consecutive chunks of rows in their original order.
    #[default]
    Contiguous,
    /// Rows are permuted with a seeded RNG before chunking.
    Shuffled { seed: u64 },
}

/// A partition of `0..n_rows` into `k` disjoint folds.
///
/// Fold sizes are `n / k`, with the first `n % k` folds taking one extra row.
/// Validation indices within a fold are sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPlan {
    /// Row indices grouped by fold.
    order: Vec<usize>,
    /// `k + 1` offsets into `order`.
    bounds: Vec<usize>,
}

impl FoldPlan {
    /// Compute the fold plan for `n_rows` rows.
    ///
    /// # Errors
    ///
    /// [`CvError::InvalidConfiguration`] if `k < 2` or `k > n_rows`.
    pub fn new(n_rows: usize, k: usize, strategy: FoldStrategy) -> Result<Self, CvError> {
        if k < 2 {
            return Err(CvError::InvalidConfiguration(format!(
                "k must be at least 2, got {k}"
            )));
        }
        if k > n_rows {
            return Err(CvError::InvalidConfiguration(format!(
                "k = {k} exceeds the number of rows ({n_rows})"
            )));
        }

        let mut order: Vec<usize> = (0..n_rows).collect();
        if let FoldStrategy::Shuffled { seed } = strategy {
            order.shuffle(&mut StdRng::seed_from_u64(seed));
        }

        let base = n_rows / k;
        let extra = n_rows % k;
        let mut bounds = Vec::with_capacity(k + 1);
        bounds.push(0);
        for fold in 0..k {
            let size = base + usize::from(fold < extra);
            let start = bounds[fold];
            bounds.push(start + size);
            order[start..start + size].sort_unstable();
        }

        Ok(Self { order, bounds })
    }

    /// Number of folds.
    #[inline]
    pub fn k(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Number of rows covered by the plan.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.order.len()
    }

    /// Row indices held out in `fold`.
    ///
    /// # Panics
    ///
    /// Panics if `fold >= k`.
    pub fn validation_indices(&self, fold: usize) -> &[usize] {
        &self.order[self.bounds[fold]..self.bounds[fold + 1]]
    }

    /// Row indices used for training in `fold`, ascending.
    pub fn training_indices(&self, fold: usize) -> Vec<usize> {
        let mut held_out = vec![false; self.n_rows()];
        for &row in self.validation_indices(fold) {
            held_out[row] = true;
        }
        (0..self.n_rows()).filter(|&row| !held_out[row]).collect()
    }

    /// Size of each fold, in fold order.
    pub fn fold_sizes(&self) -> Vec<usize> {
        self.bounds.windows(2).map(|w| w[1] - w[0]).collect()
    }
}
