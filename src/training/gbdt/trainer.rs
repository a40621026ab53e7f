//! GBDT Trainer for gradient boosting.
//!
//! Orchestrates objective computation, tree growing, and prediction updates.
//! Use [`GBDTTrainer::train`] to train a forest from a dense feature matrix.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::model::gbdt::ConfigError;
use crate::repr::gbdt::Forest;
use crate::training::logger::TrainingLogger;
use crate::training::metrics::MetricFn;
use crate::training::objectives::ObjectiveFn;
use crate::training::sampling::{ColSampler, RowSampler};
use crate::training::{Gradients, Verbosity};
use crate::utils::Parallelism;

use super::grower::{GrowerParams, TreeGrower};
use super::split::GainParams;

// =============================================================================
// TrainError
// =============================================================================

/// Errors raised before or during training.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature matrix has {rows} rows but {targets} targets were given")]
    ShapeMismatch { rows: usize, targets: usize },

    #[error("non-finite feature value at row {row}, column {column}")]
    NonFiniteFeature { row: usize, column: usize },

    #[error("non-finite target at row {row}")]
    NonFiniteTarget { row: usize },
}

// =============================================================================
// GBDTParams
// =============================================================================

/// Parameters for GBDT training.
#[derive(Clone, Debug)]
pub struct GBDTParams {
    // --- Boosting parameters ---
    /// Number of boosting rounds (trees to train).
    pub n_trees: u32,
    /// Learning rate (shrinkage).
    pub learning_rate: f32,

    // --- Tree structure ---
    /// Maximum tree depth.
    pub max_depth: u32,

    // --- Regularization (encapsulated in GainParams) ---
    /// Gain computation parameters (regularization, min child weight, etc.).
    pub gain: GainParams,

    // --- Sampling ---
    /// Fraction of rows sampled per round.
    pub subsample: f32,
    /// Fraction of features sampled per tree.
    pub colsample_bytree: f32,

    // --- Logging ---
    /// Verbosity level for training output.
    pub verbosity: Verbosity,

    // --- Reproducibility ---
    /// Random seed.
    pub seed: u64,
}

impl Default for GBDTParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            learning_rate: 0.3,
            max_depth: 6,
            gain: GainParams::default(),
            subsample: 1.0,
            colsample_bytree: 1.0,
            verbosity: Verbosity::default(),
            seed: 42,
        }
    }
}

impl GBDTParams {
    /// Convert to GrowerParams for tree grower.
    fn to_grower_params(&self) -> GrowerParams {
        GrowerParams {
            gain: self.gain.clone(),
            learning_rate: self.learning_rate,
            max_depth: self.max_depth,
        }
    }
}

// =============================================================================
// GBDTTrainer
// =============================================================================

/// GBDT Trainer.
pub struct GBDTTrainer<O: ObjectiveFn, M: MetricFn> {
    /// Objective function.
    objective: O,
    /// Metric reported on the training set each round.
    metric: M,
    /// Training parameters.
    params: GBDTParams,
}

impl<O: ObjectiveFn, M: MetricFn> GBDTTrainer<O, M> {
    /// Create a new GBDT trainer.
    pub fn new(objective: O, metric: M, params: GBDTParams) -> Self {
        Self {
            objective,
            metric,
            params,
        }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &GBDTParams {
        &self.params
    }

    /// Get reference to objective.
    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Get reference to metric.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Train a forest.
    ///
    /// **Note:** This method does NOT create a thread pool. The caller must set up
    /// parallelism via `rayon::ThreadPool::install()` if desired.
    ///
    /// # Arguments
    ///
    /// * `features` - Sample-major feature matrix `[n_rows, n_features]`
    /// * `targets` - Target values, one per row
    /// * `parallelism` - Sequential or Parallel iteration hint
    pub fn train(
        &self,
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
        parallelism: Parallelism,
    ) -> Result<Forest, TrainError> {
        check_inputs(features, targets)?;
        let (n_rows, n_features) = features.dim();

        let grower = TreeGrower::new(self.params.to_grower_params(), parallelism);
        let mut row_sampler = RowSampler::new(n_rows, self.params.subsample, self.params.seed);
        let mut col_sampler =
            ColSampler::new(n_features, self.params.colsample_bytree, self.params.seed);

        let base_score = self.objective.compute_base_score(targets);
        let mut forest = Forest::new(base_score);
        let mut predictions = Array1::from_elem(n_rows, base_score);
        let mut gradients = Gradients::new(n_rows);

        let mut logger = TrainingLogger::new(self.params.verbosity);
        logger.start_training(self.params.n_trees as usize);
        if n_rows < 2 * self.params.gain.min_samples_leaf.max(1) as usize {
            logger.warn("too few rows to split; every tree will be a single leaf");
        }

        for round in 0..self.params.n_trees as usize {
            self.objective.compute_gradients_into(
                predictions.view(),
                targets,
                gradients.pairs_mut(),
            );

            let rows = row_sampler.sample();
            let allowed = col_sampler.sample_tree();
            let tree = grower.grow(features, &gradients, rows, &allowed);
            logger.log_tree(round, tree.n_nodes(), tree.depth());

            // Every row gets the new tree's output, sampled or not.
            for (pred, row) in predictions.iter_mut().zip(features.rows()) {
                *pred += tree.predict_row(&row);
            }
            forest.push_tree(tree);

            if logger.verbosity() >= Verbosity::Info {
                let value = self.metric.compute(predictions.view(), targets);
                logger.log_round(round, self.metric.name(), value);
            }
        }

        logger.finish_training();
        Ok(forest)
    }
}

/// Reject empty, misshapen, or non-finite training data.
fn check_inputs(features: ArrayView2<f32>, targets: ArrayView1<f32>) -> Result<(), TrainError> {
    let n_rows = features.nrows();
    if n_rows == 0 {
        return Err(TrainError::EmptyTrainingSet);
    }
    if targets.len() != n_rows {
        return Err(TrainError::ShapeMismatch {
            rows: n_rows,
            targets: targets.len(),
        });
    }
    for (row, values) in features.rows().into_iter().enumerate() {
        if let Some(column) = values.iter().position(|v| !v.is_finite()) {
            return Err(TrainError::NonFiniteFeature { row, column });
        }
    }
    if let Some(row) = targets.iter().position(|t| !t.is_finite()) {
        return Err(TrainError::NonFiniteTarget { row });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::metrics::Rmse;
    use crate::training::objectives::SquaredLoss;
    use ndarray::{arr1, arr2};

    fn make_test_data() -> (ndarray::Array2<f32>, Array1<f32>) {
        // 8 rows, 2 features
        let features = arr2(&[
            [0.0f32, 1.0],
            [1.0, 2.0],
            [2.0, 0.0],
            [3.0, 1.0],
            [0.0, 2.0],
            [1.0, 0.0],
            [2.0, 1.0],
            [3.0, 2.0],
        ]);
        let targets = arr1(&[1.0f32, 2.0, 3.0, 4.0, 1.5, 2.5, 3.5, 4.5]);
        (features, targets)
    }

    fn train(params: GBDTParams) -> Result<Forest, TrainError> {
        let (features, targets) = make_test_data();
        GBDTTrainer::new(SquaredLoss, Rmse, params).train(
            features.view(),
            targets.view(),
            Parallelism::Sequential,
        )
    }

    #[test]
    fn params_default() {
        let params = GBDTParams::default();

        assert_eq!(params.n_trees, 100);
        assert!((params.learning_rate - 0.3).abs() < 1e-6);
        assert_eq!(params.max_depth, 6);
        assert!((params.gain.reg_lambda - 1.0).abs() < 1e-6);
    }

    #[test]
    fn train_single_tree() {
        let forest = train(GBDTParams {
            n_trees: 1,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(forest.n_trees(), 1);
        assert!((forest.base_score() - 2.75).abs() < 1e-6);
    }

    #[test]
    fn more_rounds_reduce_training_error() {
        let (features, targets) = make_test_data();
        let rmse_after = |n_trees| {
            let forest = train(GBDTParams {
                n_trees,
                learning_rate: 0.3,
                gain: GainParams {
                    min_child_weight: 0.0,
                    ..Default::default()
                },
                ..Default::default()
            })
            .unwrap();
            let preds: Array1<f32> = features.rows().into_iter().map(|r| forest.predict_row(&r)).collect();
            Rmse.compute(preds.view(), targets.view())
        };

        assert!(rmse_after(20) < rmse_after(1));
    }

    #[test]
    fn train_with_regularization() {
        let forest = train(GBDTParams {
            n_trees: 5,
            gain: GainParams {
                reg_lambda: 10.0,
                min_gain: 0.5,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

        assert_eq!(forest.n_trees(), 5);
    }

    #[test]
    fn train_with_sampling_is_deterministic() {
        let params = GBDTParams {
            n_trees: 5,
            subsample: 0.5,
            colsample_bytree: 0.5,
            seed: 11,
            ..Default::default()
        };
        assert_eq!(train(params.clone()).unwrap(), train(params).unwrap());
    }

    #[test]
    fn train_rejects_bad_inputs() {
        let trainer = GBDTTrainer::new(SquaredLoss, Rmse, GBDTParams::default());
        let features = arr2(&[[1.0f32], [2.0]]);

        let err = trainer
            .train(features.view(), arr1(&[1.0f32]).view(), Parallelism::Sequential)
            .unwrap_err();
        assert_eq!(err, TrainError::ShapeMismatch { rows: 2, targets: 1 });

        let empty = ndarray::Array2::<f32>::zeros((0, 1));
        let err = trainer
            .train(empty.view(), arr1(&[] as &[f32]).view(), Parallelism::Sequential)
            .unwrap_err();
        assert_eq!(err, TrainError::EmptyTrainingSet);

        let nan = arr2(&[[1.0f32], [f32::NAN]]);
        let err = trainer
            .train(nan.view(), arr1(&[1.0f32, 2.0]).view(), Parallelism::Sequential)
            .unwrap_err();
        assert_eq!(err, TrainError::NonFiniteFeature { row: 1, column: 0 });

        let err = trainer
            .train(features.view(), arr1(&[f32::INFINITY, 2.0]).view(), Parallelism::Sequential)
            .unwrap_err();
        assert_eq!(err, TrainError::NonFiniteTarget { row: 0 });
    }

    #[test]
    fn training_populates_gains_and_covers() {
        let forest = train(GBDTParams {
            n_trees: 3,
            max_depth: 3,
            ..Default::default()
        })
        .unwrap();

        for tree in forest.trees() {
            let gains = tree.gains().expect("gains should be present");
            let covers = tree.covers().expect("covers should be present");

            assert_eq!(gains.len(), tree.n_nodes());
            assert_eq!(covers.len(), tree.n_nodes());

            for (node_idx, (&gain, &cover)) in gains.iter().zip(covers).enumerate() {
                assert!(cover >= 0.0);
                if tree.is_leaf(node_idx as u32) {
                    assert_eq!(gain, 0.0);
                } else {
                    assert!(gain > 0.0);
                }
            }
        }
    }
}
