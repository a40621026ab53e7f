//! Conversion between runtime types and schema types.
//!
//! Runtime to schema is infallible. Schema to runtime validates the tree
//! structure and metadata, since the input comes from disk.

use super::schema::{GBDTModelSchema, ModelMetaSchema, TreeSchema, FORMAT_VERSION};
use super::PersistError;
use crate::model::{GBDTModel, ModelMeta};
use crate::repr::gbdt::{Forest, ForestValidationError, Tree};
use crate::training::Objective;

// =============================================================================
// Runtime -> Schema
// =============================================================================

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        let arrays = tree.arrays();
        Self {
            split_indices: arrays.split_indices.to_vec(),
            thresholds: arrays.split_thresholds.to_vec(),
            children_left: arrays.left_children.to_vec(),
            children_right: arrays.right_children.to_vec(),
            default_left: arrays.default_left.to_vec(),
            is_leaf: arrays.is_leaf.to_vec(),
            leaf_values: arrays.leaf_values.to_vec(),
            gains: tree.gains().map(<[f32]>::to_vec),
            covers: tree.covers().map(<[f32]>::to_vec),
        }
    }
}

impl From<&ModelMeta> for ModelMetaSchema {
    fn from(meta: &ModelMeta) -> Self {
        Self {
            num_features: meta.n_features,
            num_train_rows: meta.n_train_rows,
            objective: meta.objective.to_string(),
            feature_names: meta.feature_names.clone(),
        }
    }
}

impl From<&GBDTModel> for GBDTModelSchema {
    fn from(model: &GBDTModel) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            meta: model.meta().into(),
            config: model.config().clone(),
            base_score: model.forest().base_score(),
            trees: model.forest().trees().map(TreeSchema::from).collect(),
        }
    }
}

// =============================================================================
// Schema -> Runtime
// =============================================================================

impl From<TreeSchema> for Tree {
    fn from(schema: TreeSchema) -> Self {
        let mut tree = Tree::new(
            schema.split_indices,
            schema.thresholds,
            schema.children_left,
            schema.children_right,
            schema.default_left,
            schema.is_leaf,
            schema.leaf_values,
        );
        if let Some(gains) = schema.gains {
            tree = tree.with_gains(gains);
        }
        if let Some(covers) = schema.covers {
            tree = tree.with_covers(covers);
        }
        tree
    }
}

impl TryFrom<ModelMetaSchema> for ModelMeta {
    type Error = PersistError;

    fn try_from(schema: ModelMetaSchema) -> Result<Self, Self::Error> {
        let objective: Objective = schema.objective.parse()?;
        if let Some(names) = &schema.feature_names
            && names.len() != schema.num_features
        {
            return Err(PersistError::Validation(format!(
                "{} feature names for {} features",
                names.len(),
                schema.num_features
            )));
        }
        Ok(Self {
            feature_names: schema.feature_names,
            n_features: schema.num_features,
            objective,
            n_train_rows: schema.num_train_rows,
        })
    }
}

impl TryFrom<GBDTModelSchema> for GBDTModel {
    type Error = PersistError;

    fn try_from(schema: GBDTModelSchema) -> Result<Self, Self::Error> {
        if schema.format_version != FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: schema.format_version,
                supported: FORMAT_VERSION,
            });
        }

        let meta = ModelMeta::try_from(schema.meta)?;
        schema.config.validate()?;

        let mut forest = Forest::new(schema.base_score);
        for tree in schema.trees {
            forest.push_tree(tree.into());
        }
        forest.validate().map_err(|e| match e {
            ForestValidationError::InvalidTree { tree_idx, error } => {
                PersistError::InvalidTree { tree_idx, error }
            }
            other => PersistError::Validation(other.to_string()),
        })?;

        Ok(GBDTModel::from_parts(forest, meta, schema.config))
    }
}
