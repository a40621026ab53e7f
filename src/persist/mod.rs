//! Model persistence.
//!
//! Models are stored as versioned JSON documents:
//!
//! ```text
//! { "format_version": 1, "meta": {..}, "config": {..}, "base_score": 0.5, "trees": [..] }
//! ```
//!
//! The version is checked before the rest of the document is parsed, so a
//! file from an incompatible release fails with
//! [`PersistError::UnsupportedVersion`] rather than a field error.
//!
//! # Example
//!
//! ```no_run
//! use foldboost::model::GBDTModel;
//!
//! # fn demo(model: &GBDTModel) -> Result<(), foldboost::persist::PersistError> {
//! model.save_json("model/foldboost-model.json")?;
//! let loaded = GBDTModel::load_json("model/foldboost-model.json")?;
//! # Ok(())
//! # }
//! ```

mod convert;
pub mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::model::gbdt::ConfigError;
use crate::model::GBDTModel;
use crate::repr::gbdt::TreeValidationError;
use crate::training::UnknownObjective;

pub use schema::{GBDTModelSchema, FORMAT_VERSION};
use schema::VersionProbe;

/// Errors raised while saving or loading a model.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("tree {tree_idx} is invalid: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },

    #[error("invalid stored configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Objective(#[from] UnknownObjective),

    #[error("invalid model: {0}")]
    Validation(String),
}

impl GBDTModel {
    /// Serialize the model as JSON into `writer`.
    pub fn to_json_writer<W: Write>(&self, writer: W) -> Result<(), PersistError> {
        let schema = GBDTModelSchema::from(self);
        serde_json::to_writer_pretty(writer, &schema)?;
        Ok(())
    }

    /// Serialize the model to a JSON string.
    pub fn to_json_string(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(&GBDTModelSchema::from(self))?)
    }

    /// Read a model from a JSON `reader`.
    pub fn from_json_reader<R: Read>(mut reader: R) -> Result<Self, PersistError> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json_str(&buf)
    }

    /// Parse a model from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, PersistError> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.format_version != FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: probe.format_version,
                supported: FORMAT_VERSION,
            });
        }
        let schema: GBDTModelSchema = serde_json::from_str(json)?;
        GBDTModel::try_from(schema)
    }

    /// Write the model to `path`, creating parent directories as needed.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let io_err = |source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.to_json_writer(&mut writer)?;
        writer.flush().map_err(io_err)?;

        tracing::debug!(path = %path.display(), n_trees = self.forest().n_trees(), "saved model");
        Ok(())
    }

    /// Load a model previously written with [`save_json`](Self::save_json).
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json_reader(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), n_trees = model.forest().n_trees(), "loaded model");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gbdt::{RegularizationParams, TreeParams};
    use crate::model::GBDTConfig;
    use ndarray::{arr1, arr2};

    fn trained() -> GBDTModel {
        let features = arr2(&[[0.0f32, 1.0], [1.0, 0.0], [2.0, 1.0], [3.0, 0.0]]);
        let targets = arr1(&[1.0f32, 2.0, 3.0, 4.0]);
        let config = GBDTConfig::builder()
            .n_trees(3)
            .tree(TreeParams::depth_wise(2))
            .regularization(RegularizationParams {
                min_child_weight: 0.0,
                ..Default::default()
            })
            .build()
            .unwrap();
        GBDTModel::train(features.view(), targets.view(), config, 1).unwrap()
    }

    #[test]
    fn string_round_trip() {
        let model = trained().with_feature_names(vec!["a".into(), "b".into()]);
        let json = model.to_json_string().unwrap();
        assert!(json.contains("\"format_version\": 1"));

        let loaded = GBDTModel::from_json_str(&json).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn unsupported_version() {
        let mut json: serde_json::Value =
            serde_json::from_str(&trained().to_json_string().unwrap()).unwrap();
        json["format_version"] = serde_json::json!(99);

        let err = GBDTModel::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion {
                found: 99,
                supported: FORMAT_VERSION
            }
        ));
    }

    #[test]
    fn corrupt_tree_is_rejected() {
        let mut json: serde_json::Value =
            serde_json::from_str(&trained().to_json_string().unwrap()).unwrap();
        json["trees"][0]["leaf_values"] = serde_json::json!([]);

        let err = GBDTModel::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(err, PersistError::InvalidTree { tree_idx: 0, .. }));
    }

    #[test]
    fn unknown_objective_is_rejected() {
        let mut json: serde_json::Value =
            serde_json::from_str(&trained().to_json_string().unwrap()).unwrap();
        json["meta"]["objective"] = serde_json::json!("binary:hinge");

        let err = GBDTModel::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(err, PersistError::Objective(_)));
    }

    #[test]
    fn garbage_is_json_error() {
        assert!(matches!(
            GBDTModel::from_json_str("not json"),
            Err(PersistError::Json(_))
        ));
    }
}
