//! Tabular data handling.
//!
//! - [`Dataset`]: in-memory table with a single numeric target and
//!   sample-major numeric features
//! - [`io`]: delimited-text loading

mod dataset;
pub mod io;

pub use dataset::{Dataset, DatasetError};
pub use io::{CsvOptions, LoadError};
