//! Delimited-text loading.
//!
//! Reads tables whose first column is the target and whose remaining columns
//! are numeric features. Files are header-less by default.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use ndarray::Array2;

use super::{Dataset, DatasetError};

/// Errors that can occur when loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    NonNumeric {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("input contains no data rows")]
    Empty,

    #[error("header has {got} column(s), data rows have {expected}")]
    HeaderMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Options for reading delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Whether the first record is a header. Header names of the feature
    /// columns become the dataset's feature names. Default: `false`.
    pub has_header: bool,
    /// Field delimiter. Default: `b','`.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: false,
            delimiter: b',',
        }
    }
}

impl CsvOptions {
    /// Header-less comma-separated input.
    pub fn headerless() -> Self {
        Self::default()
    }

    /// Input whose first record is a header.
    pub fn with_header(mut self) -> Self {
        self.has_header = true;
        self
    }

    /// Use a different field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Load a labeled dataset from a file (target in column 0).
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_csv(BufReader::new(file), options)?;
    tracing::debug!(
        path = %path.display(),
        n_rows = dataset.n_rows(),
        n_features = dataset.n_features(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Read a labeled dataset (target in column 0) from any reader.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Dataset, LoadError> {
    let (table, header) = read_table(reader, options)?;
    let dataset = Dataset::from_table(table.view())?;
    match header {
        Some(mut names) => {
            names.remove(0);
            Ok(dataset.with_feature_names(names)?)
        }
        None => Ok(dataset),
    }
}

/// Load an unlabeled feature matrix (every column is a feature).
///
/// Used for batch prediction input.
pub fn load_features_csv(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<Array2<f32>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_features_csv(BufReader::new(file), options)
}

/// Read an unlabeled feature matrix from any reader.
pub fn read_features_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Array2<f32>, LoadError> {
    read_table(reader, options).map(|(table, _)| table)
}

/// Parse every record into a dense row-major table.
fn read_table<R: Read>(
    reader: R,
    options: &CsvOptions,
) -> Result<(Array2<f32>, Option<Vec<String>>), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = if options.has_header {
        Some(reader.headers()?.iter().map(str::to_string).collect::<Vec<_>>())
    } else {
        None
    };

    let mut values = Vec::new();
    let mut n_cols = None;
    let mut n_rows = 0usize;

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let expected = *n_cols.get_or_insert(record.len());
        if record.len() != expected {
            return Err(DatasetError::RaggedRow {
                row: n_rows,
                expected,
                got: record.len(),
            }
            .into());
        }

        for (column, field) in record.iter().enumerate() {
            let value = field.parse::<f32>().map_err(|_| LoadError::NonNumeric {
                line,
                column,
                value: field.to_string(),
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    let n_cols = n_cols.ok_or(LoadError::Empty)?;
    match &header {
        Some(names) if names.len() != n_cols => {
            return Err(LoadError::HeaderMismatch {
                expected: n_cols,
                got: names.len(),
            });
        }
        _ => {}
    }
    let table = Array2::from_shape_vec((n_rows, n_cols), values)
        .map_err(|_| LoadError::Empty)?;
    Ok((table, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn reads_headerless_csv() {
        let input = "3.5,1,0,0\n4.0,0,1,0\n1.5,0,0,1\n";
        let ds = read_csv(input.as_bytes(), &CsvOptions::default()).unwrap();

        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_features(), 3);
        assert_eq!(ds.targets(), arr1(&[3.5f32, 4.0, 1.5]));
        assert!(ds.feature_names().is_none());
    }

    #[test]
    fn header_becomes_feature_names() {
        let input = "rating,tempo,energy\n4.0,120,0.8\n2.0,90,0.3\n";
        let ds = read_csv(input.as_bytes(), &CsvOptions::default().with_header()).unwrap();

        assert_eq!(ds.n_rows(), 2);
        assert_eq!(
            ds.feature_names().unwrap(),
            &["tempo".to_string(), "energy".to_string()]
        );
    }

    #[test]
    fn custom_delimiter() {
        let input = "1\t2\n3\t4\n";
        let ds = read_csv(input.as_bytes(), &CsvOptions::default().with_delimiter(b'\t')).unwrap();
        assert_eq!(ds.features(), arr2(&[[2.0f32], [4.0]]));
    }

    #[test]
    fn non_numeric_field_is_reported() {
        let input = "1.0,2.0\n3.0,rock\n";
        let err = read_csv(input.as_bytes(), &CsvOptions::default()).unwrap_err();
        match err {
            LoadError::NonNumeric { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
                assert_eq!(value, "rock");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let input = "1.0,2.0,3.0\n3.0,4.0\n";
        let err = read_csv(input.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Dataset(DatasetError::RaggedRow { row: 1, expected: 3, got: 2 })
        ));
    }

    #[test]
    fn header_width_must_match_rows() {
        let input = "rating,tempo\n4.0,120,0.8\n2.0,90,0.3\n";
        let options = CsvOptions::default().with_header();

        let err = read_csv(input.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, LoadError::HeaderMismatch { expected: 3, got: 2 }));

        let err = read_features_csv(input.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, LoadError::HeaderMismatch { expected: 3, got: 2 }));
    }

    #[test]
    fn empty_input() {
        let err = read_csv("".as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn features_only_table() {
        let input = "1,2\n3,4\n5,6\n";
        let table = read_features_csv(input.as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(table, arr2(&[[1.0f32, 2.0], [3.0, 4.0], [5.0, 6.0]]));
    }

    #[test]
    fn missing_file() {
        let err = load_csv("/nonexistent/train.csv", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
