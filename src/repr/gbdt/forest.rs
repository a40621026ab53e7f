//! Canonical forest representation (collection of trees).

use ndarray::{ArrayView2, ArrayViewMut1, Zip};

use super::{SampleAccessor, Tree, TreeValidationError};
use crate::utils::Parallelism;

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("base score must be finite")]
    NonFiniteBaseScore,

    #[error("tree {tree_idx} is invalid: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
}

/// Single-output forest of additive regression trees.
///
/// The prediction for a sample is `base_score + Σ tree(sample)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f32,
}

impl Forest {
    /// Create an empty forest with the given base score.
    pub fn new(base_score: f32) -> Self {
        Self {
            trees: Vec::new(),
            base_score,
        }
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Initial prediction before any tree is applied.
    #[inline]
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    /// Get a reference to a specific tree.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= n_trees()`.
    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    /// Iterate over trees.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Validate structural invariants of every tree.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        if !self.base_score.is_finite() {
            return Err(ForestValidationError::NonFiniteBaseScore);
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;
        }
        Ok(())
    }

    /// Predict for a single row of features.
    pub fn predict_row<S: SampleAccessor + ?Sized>(&self, sample: &S) -> f32 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict_row(sample))
    }

    /// Predict a sample-major feature matrix `[n_rows, n_features]` into `output`.
    ///
    /// # Panics
    ///
    /// Panics if `output.len() != features.nrows()`.
    pub fn predict_into(
        &self,
        features: ArrayView2<f32>,
        mut output: ArrayViewMut1<f32>,
        parallelism: Parallelism,
    ) {
        assert_eq!(
            output.len(),
            features.nrows(),
            "output buffer must have one slot per row"
        );
        let zip = Zip::from(&mut output).and(features.rows());
        if parallelism.is_parallel() {
            zip.par_for_each(|out, row| *out = self.predict_row(&row));
        } else {
            zip.for_each(|out, row| *out = self.predict_row(&row));
        }
    }
}
