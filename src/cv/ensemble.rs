//! Averaging ensemble over per-fold models.

use ndarray::{Array1, ArrayView2};

use super::Predict;
use crate::utils::Parallelism;

/// Ensemble that predicts the mean of its fold models' predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldEnsemble<M> {
    models: Vec<M>,
}

impl<M> FoldEnsemble<M> {
    /// Build an ensemble; returns `None` when `models` is empty.
    pub fn new(models: Vec<M>) -> Option<Self> {
        (!models.is_empty()).then_some(Self { models })
    }

    #[inline]
    pub fn n_models(&self) -> usize {
        self.models.len()
    }

    pub fn models(&self) -> &[M] {
        &self.models
    }

    pub fn into_models(self) -> Vec<M> {
        self.models
    }
}

impl<M: Predict> Predict for FoldEnsemble<M> {
    fn predict_batch(&self, features: ArrayView2<f32>, parallelism: Parallelism) -> Array1<f32> {
        let mut sum = Array1::<f32>::zeros(features.nrows());
        for model in &self.models {
            sum += &model.predict_batch(features, parallelism);
        }
        sum / self.models.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    struct Constant(f32);

    impl Predict for Constant {
        fn predict_batch(&self, features: ArrayView2<f32>, _: Parallelism) -> Array1<f32> {
            Array1::from_elem(features.nrows(), self.0)
        }
    }

    #[test]
    fn averages_members() {
        let ensemble = FoldEnsemble::new(vec![Constant(1.0), Constant(2.0), Constant(6.0)]).unwrap();
        let features = arr2(&[[0.0f32], [1.0]]);

        let preds = ensemble.predict_batch(features.view(), Parallelism::Sequential);

        assert_eq!(preds.to_vec(), vec![3.0, 3.0]);
        assert_eq!(ensemble.n_models(), 3);
    }

    #[test]
    fn empty_is_none() {
        assert!(FoldEnsemble::<Constant>::new(Vec::new()).is_none());
    }
}
