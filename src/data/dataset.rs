//! User-facing dataset abstraction.
//!
//! This is the canonical entry point for training and cross-validation.
//! Features are stored sample-major (`[n_rows, n_features]`), targets are
//! single-output (length = n_rows).

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};

/// Dataset conversion/validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("number of targets ({targets}) does not match number of rows ({rows})")]
    TargetLenMismatch { rows: usize, targets: usize },

    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("table needs a target column and at least one feature column, got {n_cols} column(s)")]
    TooFewColumns { n_cols: usize },

    #[error("expected {expected} feature names, got {got}")]
    FeatureNamesLenMismatch { expected: usize, got: usize },

    #[error("row index {index} is out of range for {n_rows} rows")]
    RowOutOfRange { index: usize, n_rows: usize },
}

/// A labeled numeric dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f32>,
    targets: Array1<f32>,
    feature_names: Option<Vec<String>>,
}

impl Dataset {
    /// Create a dataset from a sample-major feature matrix and a target vector.
    pub fn new(features: Array2<f32>, targets: Array1<f32>) -> Result<Self, DatasetError> {
        if features.nrows() != targets.len() {
            return Err(DatasetError::TargetLenMismatch {
                rows: features.nrows(),
                targets: targets.len(),
            });
        }
        Ok(Self {
            features: features.as_standard_layout().into_owned(),
            targets,
            feature_names: None,
        })
    }

    /// Create a dataset from a table whose column 0 is the target.
    ///
    /// The remaining columns become features in their original order.
    pub fn from_table(table: ArrayView2<f32>) -> Result<Self, DatasetError> {
        let n_cols = table.ncols();
        if n_cols < 2 {
            return Err(DatasetError::TooFewColumns { n_cols });
        }
        let targets = table.column(0).to_owned();
        let features = table.slice(s![.., 1..]).to_owned();
        Self::new(features, targets)
    }

    /// Create a dataset from rows of `[target, feature_0, feature_1, ...]`.
    ///
    /// Every row must have the same number of columns as the first row.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, DatasetError> {
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut flat = Vec::with_capacity(rows.len() * n_cols);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n_cols {
                return Err(DatasetError::RaggedRow {
                    row,
                    expected: n_cols,
                    got: values.len(),
                });
            }
            flat.extend_from_slice(values);
        }
        let table = Array2::from_shape_vec((rows.len(), n_cols), flat)
            .map_err(|_| DatasetError::TooFewColumns { n_cols })?;
        Self::from_table(table.view())
    }

    /// Attach feature names (one per feature column).
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self, DatasetError> {
        if names.len() != self.n_features() {
            return Err(DatasetError::FeatureNamesLenMismatch {
                expected: self.n_features(),
                got: names.len(),
            });
        }
        self.feature_names = Some(names);
        Ok(self)
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns (target excluded).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Returns true if the dataset has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Feature matrix `[n_rows, n_features]`.
    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// Target vector.
    #[inline]
    pub fn targets(&self) -> ArrayView1<'_, f32> {
        self.targets.view()
    }

    /// Feature names, if known.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Copy the given rows (in the given order) into a new dataset.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self, DatasetError> {
        let n_rows = self.n_rows();
        if let Some(&index) = indices.iter().find(|&&i| i >= n_rows) {
            return Err(DatasetError::RowOutOfRange { index, n_rows });
        }
        Ok(Self {
            features: self.features.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        })
    }
}
