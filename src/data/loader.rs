//! CSV Data Loader Module
//! Reads the booking dataset with Polars and checks it against the expected schema.

use crate::data::schema::{self, is_numeric_dtype};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every variant means the dataset is unavailable and the session cannot start.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset not found or unreadable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset is missing required column `{0}`")]
    MissingColumn(String),
    #[error("Column `{column}` must be numeric, found {dtype}")]
    NonNumericColumn { column: String, dtype: String },
}

/// Handles CSV file loading with Polars for high performance.
pub struct DataLoader;

impl DataLoader {
    /// Load the booking CSV and validate the columns the dashboard relies on.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        // Polars reports a missing file as a generic compute error; check up front
        std::fs::metadata(file_path).map_err(|source| LoaderError::Unreadable {
            path: file_path.to_path_buf(),
            source,
        })?;

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::validate_schema(&df)?;

        tracing::info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "Dataset loaded"
        );
        Ok(df)
    }

    /// Check required columns exist and numeric ones carry a numeric dtype.
    pub fn validate_schema(df: &DataFrame) -> Result<(), LoaderError> {
        for (name, must_be_numeric) in schema::required_columns() {
            let column = df
                .column(name)
                .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;

            if must_be_numeric && !is_numeric_dtype(column.dtype()) {
                return Err(LoaderError::NonNumericColumn {
                    column: name.to_string(),
                    dtype: column.dtype().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Get list of column names.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get list of numeric column names, in table order.
    pub fn get_numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unreadable() {
        let err = DataLoader::load_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Unreadable { .. }), "got {err:?}");
    }

    #[test]
    fn schema_check_reports_missing_column() {
        let df = df!("is_canceled" => &[0i64, 1]).unwrap();
        let err = DataLoader::validate_schema(&df).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "country"));
    }

    #[test]
    fn numeric_columns_skip_strings() {
        let df = df!(
            "country" => &["PRT", "ESP"],
            "is_canceled" => &[0i64, 1],
            "adr" => &[10.5f64, 20.0],
        )
        .unwrap();
        assert_eq!(DataLoader::get_numeric_columns(&df), vec!["is_canceled", "adr"]);
    }
}
