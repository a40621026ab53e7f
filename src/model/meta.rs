//! Model metadata.
//!
//! Shared metadata types for model introspection.

use serde::{Deserialize, Serialize};

use crate::training::Objective;

/// Metadata stored alongside a trained model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Feature names (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Number of features the model was trained on.
    pub n_features: usize,
    /// Objective the model was trained with.
    #[serde(default)]
    pub objective: Objective,
    /// Number of training rows.
    #[serde(default)]
    pub n_train_rows: usize,
}

impl ModelMeta {
    /// Create metadata for a regression model.
    pub fn for_regression(n_features: usize) -> Self {
        Self {
            n_features,
            ..Default::default()
        }
    }

    /// Attach feature names.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regression_defaults() {
        let meta = ModelMeta::for_regression(3);
        assert_eq!(meta.n_features, 3);
        assert_eq!(meta.objective, Objective::SquaredError);
        assert!(meta.feature_names.is_none());
    }

    #[test]
    fn feature_names_are_optional_in_json() {
        let json = serde_json::to_string(&ModelMeta::for_regression(2)).unwrap();
        assert!(!json.contains("feature_names"));

        let meta: ModelMeta = serde_json::from_str(r#"{"n_features": 2}"#).unwrap();
        assert_eq!(meta, ModelMeta::for_regression(2));
    }
}
