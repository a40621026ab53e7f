//! Schema types for model serialization.
//!
//! These types provide a stable serialization format independent of runtime types.
//! Schema types are separate from runtime types for:
//! - Forward/backward compatibility (schema can evolve independently)
//! - Validation during deserialization

use serde::{Deserialize, Serialize};

use crate::model::GBDTConfig;

/// Current schema version written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Model metadata schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetaSchema {
    /// Number of features.
    pub num_features: usize,
    /// Number of rows the model was trained on.
    #[serde(default)]
    pub num_train_rows: usize,
    /// Objective name.
    pub objective: String,
    /// Feature names (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

/// Tree schema (SoA layout).
///
/// Split fields of leaf nodes are zero and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Split feature index for each node.
    pub split_indices: Vec<u32>,
    /// Split threshold for each node.
    pub thresholds: Vec<f32>,
    /// Left child index for each node.
    pub children_left: Vec<u32>,
    /// Right child index for each node.
    pub children_right: Vec<u32>,
    /// Default direction (true = left) for each node.
    pub default_left: Vec<bool>,
    /// Leaf flag for each node.
    pub is_leaf: Vec<bool>,
    /// Leaf value for each node (0 for split nodes).
    pub leaf_values: Vec<f32>,
    /// Optional split gains for each node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gains: Option<Vec<f32>>,
    /// Optional hessian covers for each node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covers: Option<Vec<f32>>,
}

/// Top-level persisted GBDT model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GBDTModelSchema {
    /// Schema version, checked on load.
    pub format_version: u32,
    /// Model metadata.
    pub meta: ModelMetaSchema,
    /// Training configuration.
    pub config: GBDTConfig,
    /// Initial prediction.
    pub base_score: f32,
    /// Trees in boosting order.
    pub trees: Vec<TreeSchema>,
}

/// Minimal view used to check the version before parsing the full document.
#[derive(Debug, Deserialize)]
pub(crate) struct VersionProbe {
    pub format_version: u32,
}
