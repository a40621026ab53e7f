//! The cross-validation driver.

use bon::Builder;
use ndarray::Axis;
use serde::{Deserialize, Serialize};

use super::{CvError, FoldEnsemble, FoldPlan, FoldStrategy, GBDTLearner, Learner, Predict};
use crate::data::Dataset;
use crate::model::{GBDTConfig, GBDTModel};
use crate::training::{Metric, MetricFn};
use crate::utils::{mean_and_std, run_with_threads, Parallelism};

/// Which fold models are kept after their metric is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRetention {
    /// Keep only the last fold's model.
    #[default]
    Last,
    /// Keep every fold's model.
    All,
    /// Keep no models; report metrics only.
    None,
}

impl ModelRetention {
    fn keeps(self, fold: usize, k: usize) -> bool {
        match self {
            ModelRetention::Last => fold + 1 == k,
            ModelRetention::All => true,
            ModelRetention::None => false,
        }
    }
}

/// Outcome of one fold.
#[derive(Debug, Clone)]
pub struct FoldResult<M> {
    /// Fold index, starting at 0.
    pub fold: usize,
    /// Number of rows the fold's model was trained on.
    pub train_size: usize,
    /// Rows held out for this fold.
    pub validation_indices: Vec<usize>,
    /// Held-out metric value.
    pub metric: f64,
    /// The fitted model, if retained.
    pub model: Option<M>,
}

/// Per-fold results of a cross-validation run, in fold order.
#[derive(Debug, Clone)]
pub struct CrossValidation<M> {
    folds: Vec<FoldResult<M>>,
    metric: Metric,
}

impl<M> CrossValidation<M> {
    /// Number of folds.
    pub fn k(&self) -> usize {
        self.folds.len()
    }

    /// Metric used to score the folds.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Per-fold metric values in fold order.
    pub fn metrics(&self) -> Vec<f64> {
        self.folds.iter().map(|f| f.metric).collect()
    }

    /// Mean of the per-fold metrics.
    pub fn mean(&self) -> f64 {
        mean_and_std(&self.metrics()).0
    }

    /// Population standard deviation of the per-fold metrics.
    pub fn std_dev(&self) -> f64 {
        mean_and_std(&self.metrics()).1
    }

    /// Per-fold results in fold order.
    pub fn folds(&self) -> &[FoldResult<M>] {
        &self.folds
    }

    /// Model of the highest-index fold that retained one.
    ///
    /// Under [`ModelRetention::Last`] this is the model trained on the
    /// complement of the final fold.
    pub fn final_model(&self) -> Option<&M> {
        self.folds.iter().rev().find_map(|f| f.model.as_ref())
    }

    /// Owned counterpart of [`final_model`](Self::final_model).
    pub fn into_final_model(self) -> Option<M> {
        self.folds.into_iter().rev().find_map(|f| f.model)
    }

    /// All retained models in fold order.
    pub fn into_models(self) -> Vec<M> {
        self.folds.into_iter().filter_map(|f| f.model).collect()
    }

    /// Averaging ensemble of every fold's model.
    ///
    /// Returns `None` unless every fold retained its model
    /// (see [`ModelRetention::All`]).
    pub fn into_ensemble(self) -> Option<FoldEnsemble<M>> {
        if self.folds.iter().any(|f| f.model.is_none()) {
            return None;
        }
        FoldEnsemble::new(self.into_models())
    }
}

/// Configurable k-fold cross-validator.
///
/// # Example
///
/// ```
/// use foldboost::cv::{CrossValidator, ModelRetention};
/// use foldboost::data::Dataset;
/// use foldboost::model::GBDTConfig;
///
/// let rows: Vec<[f32; 2]> = (0..12).map(|i| [2.0 * i as f32, i as f32]).collect();
/// let data = Dataset::from_rows(&rows).unwrap();
/// let config = GBDTConfig::builder().n_trees(10).build().unwrap();
///
/// let cv = CrossValidator::builder()
///     .k(3)
///     .retention(ModelRetention::All)
///     .build()
///     .validate_gbdt(&data, &config)
///     .unwrap();
///
/// assert_eq!(cv.metrics().len(), 3);
/// assert!(cv.into_ensemble().is_some());
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(derive(Clone, Debug))]
pub struct CrossValidator {
    /// Number of folds. Default: 5.
    #[builder(default = 5)]
    k: usize,
    /// Row-to-fold assignment. Default: contiguous.
    #[builder(default)]
    strategy: FoldStrategy,
    /// Which models to keep. Default: last fold only.
    #[builder(default)]
    retention: ModelRetention,
    /// Held-out metric. Default: RMSE.
    #[builder(default)]
    metric: Metric,
    /// Thread count: 0 = auto, 1 = sequential folds, >1 = dedicated pool. Default: 1.
    #[builder(default = 1)]
    n_threads: usize,
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CrossValidator {
    /// Configured number of folds.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Row-to-fold assignment strategy.
    pub fn strategy(&self) -> FoldStrategy {
        self.strategy
    }

    /// Model retention policy.
    pub fn retention(&self) -> ModelRetention {
        self.retention
    }

    /// Cross-validate a gradient boosted tree model with `config`.
    pub fn validate_gbdt(
        &self,
        data: &Dataset,
        config: &GBDTConfig,
    ) -> Result<CrossValidation<GBDTModel>, CvError> {
        self.run(data, &GBDTLearner::new(config.clone()))
    }

    /// Cross-validate an arbitrary learner.
    ///
    /// # Errors
    ///
    /// - [`CvError::InvalidConfiguration`] before any training if the dataset
    ///   is empty, has no features, or `k` is out of range.
    /// - [`CvError::TrainingFailure`] for the lowest-index fold whose fit failed.
    pub fn run<L: Learner>(
        &self,
        data: &Dataset,
        learner: &L,
    ) -> Result<CrossValidation<L::Model>, CvError> {
        if data.is_empty() {
            return Err(CvError::InvalidConfiguration("dataset has no rows".into()));
        }
        if data.n_features() == 0 {
            return Err(CvError::InvalidConfiguration(
                "dataset has no feature columns".into(),
            ));
        }
        let plan = FoldPlan::new(data.n_rows(), self.k, self.strategy)?;

        let span = tracing::info_span!("cross_validate", k = self.k, n_rows = data.n_rows());
        let _enter = span.enter();

        let folds = run_with_threads(self.n_threads, |parallelism| {
            let run_fold = |fold| self.run_fold(data, &plan, learner, fold, parallelism);
            if parallelism.is_parallel() {
                parallelism
                    .maybe_par_map(0..plan.k(), run_fold)
                    .into_iter()
                    .collect::<Result<Vec<_>, _>>()
            } else {
                (0..plan.k()).map(run_fold).collect::<Result<Vec<_>, _>>()
            }
        })?;

        let result = CrossValidation {
            folds,
            metric: self.metric,
        };
        tracing::info!(
            metric = self.metric.name(),
            mean = result.mean(),
            std_dev = result.std_dev(),
            "cross-validation finished"
        );
        Ok(result)
    }

    fn run_fold<L: Learner>(
        &self,
        data: &Dataset,
        plan: &FoldPlan,
        learner: &L,
        fold: usize,
        parallelism: Parallelism,
    ) -> Result<FoldResult<L::Model>, CvError> {
        let train_idx = plan.training_indices(fold);
        let valid_idx = plan.validation_indices(fold);

        let features = data.features();
        let targets = data.targets();
        let train_x = features.select(Axis(0), &train_idx);
        let train_y = targets.select(Axis(0), &train_idx);
        let valid_x = features.select(Axis(0), valid_idx);
        let valid_y = targets.select(Axis(0), valid_idx);

        let model = learner
            .fit(train_x.view(), train_y.view(), parallelism)
            .map_err(|source| CvError::TrainingFailure { fold, source })?;
        let predictions = model.predict_batch(valid_x.view(), parallelism);
        let metric = self.metric.compute(predictions.view(), valid_y.view());

        tracing::info!(
            fold,
            train_rows = train_idx.len(),
            validation_rows = valid_idx.len(),
            metric = self.metric.name(),
            value = metric,
            "fold finished"
        );

        Ok(FoldResult {
            fold,
            train_size: train_idx.len(),
            validation_indices: valid_idx.to_vec(),
            metric,
            model: self.retention.keeps(fold, plan.k()).then_some(model),
        })
    }
}

/// Cross-validate a gradient boosted tree regressor with contiguous folds,
/// RMSE scoring, and last-fold model retention.
///
/// # Example
///
/// ```
/// use foldboost::cv::cross_validate;
/// use foldboost::data::Dataset;
/// use foldboost::model::GBDTConfig;
///
/// let rows: Vec<[f32; 2]> = (0..10).map(|i| [2.0 * i as f32, i as f32]).collect();
/// let data = Dataset::from_rows(&rows).unwrap();
/// let config = GBDTConfig::builder().n_trees(20).build().unwrap();
///
/// let cv = cross_validate(&data, 5, &config).unwrap();
/// assert_eq!(cv.metrics().len(), 5);
/// assert!(cv.final_model().is_some());
/// ```
pub fn cross_validate(
    data: &Dataset,
    k: usize,
    config: &GBDTConfig,
) -> Result<CrossValidation<GBDTModel>, CvError> {
    CrossValidator::builder().k(k).build().validate_gbdt(data, config)
}
