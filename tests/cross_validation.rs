//! Cross-validation integration tests.
//!
//! Focused on fold semantics, retention, and failure behavior of the
//! gradient boosted tree learner.

mod common;

use common::{linear_ramp, small_config, synthetic_regression, unconstrained_config};
use foldboost::cv::{
    cross_validate, CrossValidator, CvError, FoldStrategy, ModelRetention, Predict,
};
use foldboost::data::Dataset;
use foldboost::model::GBDTConfig;
use foldboost::training::TrainError;
use foldboost::Parallelism;
use ndarray::{Array1, Array2};
use rstest::rstest;

#[test]
fn ramp_five_folds() {
    let data = linear_ramp(10);
    let cv = cross_validate(&data, 5, &small_config(100)).unwrap();

    let metrics = cv.metrics();
    assert_eq!(metrics.len(), 5);
    assert!(metrics.iter().all(|m| m.is_finite() && *m >= 0.0));

    // Held-out rows inside the training range land next to a neighbor.
    for fold in 1..4 {
        assert!(metrics[fold] < 3.0, "fold {fold}: {}", metrics[fold]);
    }
    // Edge folds are bounded by the nearest training target.
    assert!(metrics[0] < 4.0, "fold 0: {}", metrics[0]);
    assert!(metrics[4] < 4.0, "fold 4: {}", metrics[4]);

    for (fold, result) in cv.folds().iter().enumerate() {
        assert_eq!(result.fold, fold);
        assert_eq!(result.train_size, 8);
        assert_eq!(result.validation_indices, vec![2 * fold, 2 * fold + 1]);
    }
}

#[test]
fn final_model_is_last_fold() {
    let data = linear_ramp(10);
    let config = small_config(20);
    let cv = cross_validate(&data, 5, &config).unwrap();

    assert_eq!(cv.folds().iter().filter(|f| f.model.is_some()).count(), 1);
    let model = cv.final_model().unwrap();
    assert_eq!(model.meta().n_train_rows, 8);

    // Same model as training directly on the complement of the last fold.
    let train = data.select_rows(&(0..8).collect::<Vec<_>>()).unwrap();
    let direct = foldboost::GBDTModel::train(train.features(), train.targets(), config, 1).unwrap();
    assert_eq!(model.forest(), direct.forest());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(11)]
fn invalid_k_is_rejected(#[case] k: usize) {
    let err = cross_validate(&linear_ramp(10), k, &small_config(5)).unwrap_err();
    assert!(matches!(err, CvError::InvalidConfiguration(_)), "k = {k}: {err}");
}

#[test]
fn empty_dataset_is_rejected() {
    let data = Dataset::new(Array2::zeros((0, 1)), Array1::zeros(0)).unwrap();
    let err = cross_validate(&data, 2, &small_config(5)).unwrap_err();
    assert!(matches!(err, CvError::InvalidConfiguration(_)));
}

#[test]
fn featureless_dataset_is_rejected() {
    let data = Dataset::new(Array2::zeros((4, 0)), Array1::zeros(4)).unwrap();
    let err = cross_validate(&data, 2, &small_config(5)).unwrap_err();
    assert!(matches!(err, CvError::InvalidConfiguration(_)));
}

#[test]
fn leave_one_out() {
    let data = linear_ramp(6);
    let cv = cross_validate(&data, 6, &unconstrained_config(10)).unwrap();

    assert_eq!(cv.k(), 6);
    for (fold, result) in cv.folds().iter().enumerate() {
        assert_eq!(result.validation_indices, vec![fold]);
        assert_eq!(result.train_size, 5);
        assert!(result.metric.is_finite());
    }
}

#[test]
fn uneven_folds() {
    let data = linear_ramp(11);
    let cv = cross_validate(&data, 3, &small_config(5)).unwrap();

    let sizes: Vec<usize> = cv.folds().iter().map(|f| f.validation_indices.len()).collect();
    assert_eq!(sizes, vec![4, 4, 3]);
    let train_sizes: Vec<usize> = cv.folds().iter().map(|f| f.train_size).collect();
    assert_eq!(train_sizes, vec![7, 7, 8]);
}

#[test]
fn deterministic_with_sampling() {
    let data = synthetic_regression(60, 4, 11);
    let config = GBDTConfig::builder()
        .n_trees(15)
        .sampling(foldboost::model::gbdt::SamplingParams {
            subsample: 0.7,
            colsample_bytree: 0.5,
        })
        .seed(7)
        .build()
        .unwrap();
    let validator = CrossValidator::builder()
        .k(4)
        .strategy(FoldStrategy::Shuffled { seed: 5 })
        .build();

    let a = validator.validate_gbdt(&data, &config).unwrap();
    let b = validator.validate_gbdt(&data, &config).unwrap();

    assert_eq!(a.metrics(), b.metrics());
    assert_eq!(a.final_model(), b.final_model());
}

#[test]
fn shuffled_ramp_is_learnable() {
    let data = linear_ramp(40);
    let cv = CrossValidator::builder()
        .k(5)
        .strategy(FoldStrategy::Shuffled { seed: 1 })
        .build()
        .validate_gbdt(&data, &small_config(100))
        .unwrap();

    // A constant predictor scores about 23 here.
    assert!(cv.mean() < 8.0, "mean RMSE {}", cv.mean());
    assert!(cv.std_dev().is_finite());
}

#[test]
fn parallel_folds_match_sequential() {
    let data = synthetic_regression(48, 3, 2);
    let config = small_config(10);
    let run = |n_threads| {
        CrossValidator::builder()
            .k(4)
            .retention(ModelRetention::All)
            .n_threads(n_threads)
            .build()
            .validate_gbdt(&data, &config)
            .unwrap()
    };

    let seq = run(1);
    let par = run(4);
    assert_eq!(seq.metrics(), par.metrics());
    assert_eq!(seq.into_models(), par.into_models());
}

#[test]
fn ensemble_averages_fold_models() {
    let data = synthetic_regression(30, 2, 3);
    let cv = CrossValidator::builder()
        .k(3)
        .retention(ModelRetention::All)
        .build()
        .validate_gbdt(&data, &small_config(10))
        .unwrap();

    let models = cv.clone().into_models();
    let ensemble = cv.into_ensemble().unwrap();
    assert_eq!(ensemble.n_models(), 3);

    let features = data.features();
    let averaged = ensemble.predict_batch(features, Parallelism::Sequential);
    let mut expected = Array1::<f32>::zeros(data.n_rows());
    for model in &models {
        expected += &model.predict(features, 1);
    }
    expected /= 3.0;
    common::assert_predictions_eq(averaged.view(), expected.view(), 1e-5, "ensemble");
}

#[test]
fn retention_none_keeps_metrics_only() {
    let cv = CrossValidator::builder()
        .k(5)
        .retention(ModelRetention::None)
        .build()
        .validate_gbdt(&linear_ramp(10), &small_config(5))
        .unwrap();

    assert_eq!(cv.metrics().len(), 5);
    assert!(cv.final_model().is_none());
    assert!(cv.into_ensemble().is_none());
}

#[test]
fn invalid_hyperparameters_fail_first_fold() {
    let mut config = GBDTConfig::default();
    config.learning_rate = -1.0;

    let err = cross_validate(&linear_ramp(10), 5, &config).unwrap_err();
    match err {
        CvError::TrainingFailure { fold, source } => {
            assert_eq!(fold, 0);
            assert!(matches!(source, TrainError::InvalidConfig(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_finite_feature_fails_lowest_fold() {
    // Row 2 is NaN and is the first training row of fold 0.
    let mut features = Array2::from_shape_fn((10, 1), |(i, _)| i as f32);
    features[[2, 0]] = f32::NAN;
    let targets = Array1::from_shape_fn(10, |i| 2.0 * i as f32);
    let data = Dataset::new(features, targets).unwrap();

    for n_threads in [1, 3] {
        let err = CrossValidator::builder()
            .k(5)
            .n_threads(n_threads)
            .build()
            .validate_gbdt(&data, &small_config(5))
            .unwrap_err();
        match err {
            CvError::TrainingFailure { fold, source } => {
                assert_eq!(fold, 0, "n_threads = {n_threads}");
                assert_eq!(source, TrainError::NonFiniteFeature { row: 0, column: 0 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
