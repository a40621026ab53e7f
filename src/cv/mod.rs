//! K-fold cross-validation.
//!
//! A [`FoldPlan`] partitions row indices into `k` disjoint folds. For each
//! fold, the [`CrossValidator`] fits a [`Learner`] on the other `k - 1`
//! folds, scores the held-out fold, and records the metric in fold order.
//!
//! ```text
//! rows:   0 1 | 2 3 | 4 5 | 6 7 | 8 9      (n = 10, k = 5, contiguous)
//! fold 0: [valid] [----------- train -----------]
//! fold 4: [----------- train -----------] [valid]
//! ```
//!
//! Folds are independent and may run in parallel; metrics and retained
//! models are always reported in fold order.

mod ensemble;
mod folds;
mod learner;
mod validator;

use crate::training::TrainError;

pub use ensemble::FoldEnsemble;
pub use folds::{FoldPlan, FoldStrategy};
pub use learner::{GBDTLearner, Learner, Predict};
pub use validator::{
    cross_validate, CrossValidation, CrossValidator, CrossValidatorBuilder, FoldResult,
    ModelRetention,
};

/// Errors raised by cross-validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CvError {
    /// Rejected before any training: bad `k` or unusable dataset.
    #[error("invalid cross-validation configuration: {0}")]
    InvalidConfiguration(String),

    /// Training failed on a fold.
    #[error("training failed on fold {fold}: {source}")]
    TrainingFailure {
        fold: usize,
        #[source]
        source: TrainError,
    },
}
