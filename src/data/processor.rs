//! Data Processor Module
//! Handles data cleaning and column extraction for the aggregators.

use crate::data::schema::{COUNTRY, IS_CANCELED, UNKNOWN_COUNTRY};
use polars::prelude::*;

/// Cancellation status of a single booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NotCanceled,
    Canceled,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::NotCanceled => "Not Cancel",
            Status::Canceled => "Cancel",
        }
    }
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Replace missing country codes with the `Unknown` sentinel.
    ///
    /// Every other column passes through untouched, so the row count and the
    /// column set are preserved. A table without a country column is returned as is.
    pub fn clean(raw: &DataFrame) -> Result<DataFrame, PolarsError> {
        let Ok(country) = raw.column(COUNTRY) else {
            return Ok(raw.clone());
        };

        // Nothing to fill: dtype and values stay as loaded
        let missing = country.null_count();
        if missing == 0 {
            return Ok(raw.clone());
        }

        let cleaned = raw
            .clone()
            .lazy()
            .with_column(
                col(COUNTRY)
                    .cast(DataType::String)
                    .fill_null(lit(UNKNOWN_COUNTRY)),
            )
            .collect()?;

        tracing::debug!(filled = missing, "Filled missing country values");
        Ok(cleaned)
    }

    /// Cancellation status per row; anything other than 0 or 1 maps to `None`.
    pub fn statuses(df: &DataFrame) -> Result<Vec<Option<Status>>, PolarsError> {
        let values = Self::numeric_values(df, IS_CANCELED)?;
        Ok(values
            .into_iter()
            .map(|v| match v {
                Some(x) if x == 1.0 => Some(Status::Canceled),
                Some(x) if x == 0.0 => Some(Status::NotCanceled),
                _ => None,
            })
            .collect())
    }

    /// Column values cast to f64, NaN treated as missing.
    pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, PolarsError> {
        let series = df.column(column)?;
        let value_f64 = series.cast(&DataType::Float64)?;
        let value_ca = value_f64.as_materialized_series().f64()?;

        Ok(value_ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Column values rendered as strings, for grouping.
    pub fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, PolarsError> {
        let series = df.column(column)?;
        let as_str = series.cast(&DataType::String)?;
        let str_ca = as_str.as_materialized_series().str()?;

        Ok(str_ca
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "country" => &[Some("PRT"), None, Some("PRT"), Some("ESP"), None],
            "is_canceled" => &[1i64, 0, 1, 0, 1],
            "lead_time" => &[10i64, 20, 30, 40, 50],
        )
        .unwrap()
    }

    #[test]
    fn clean_fills_missing_country() {
        let cleaned = DataProcessor::clean(&sample()).unwrap();
        let countries = DataProcessor::string_values(&cleaned, "country").unwrap();
        let countries: Vec<_> = countries.into_iter().map(Option::unwrap).collect();
        assert_eq!(countries, vec!["PRT", "Unknown", "PRT", "ESP", "Unknown"]);
        assert_eq!(cleaned.height(), 5);
        assert_eq!(cleaned.get_column_names(), sample().get_column_names());
        assert_eq!(cleaned.column("country").unwrap().null_count(), 0);
    }

    #[test]
    fn clean_is_noop_on_complete_country() {
        let raw = df!(
            "country" => &["PRT", "ESP", "GBR"],
            "is_canceled" => &[1i64, 0, 0],
        )
        .unwrap();
        let cleaned = DataProcessor::clean(&raw).unwrap();
        assert!(cleaned.equals_missing(&raw));
    }

    #[test]
    fn clean_keeps_non_string_country_without_nulls() {
        let raw = df!(
            "country" => &[620i64, 724, 826],
            "is_canceled" => &[1i64, 0, 0],
        )
        .unwrap();
        let cleaned = DataProcessor::clean(&raw).unwrap();
        assert_eq!(cleaned.column("country").unwrap().dtype(), &DataType::Int64);
        assert!(cleaned.equals_missing(&raw));
    }

    #[test]
    fn clean_leaves_other_columns_alone() {
        let raw = df!(
            "country" => &[None, Some("PRT")],
            "agent" => &[None, Some(9i64)],
        )
        .unwrap();
        let cleaned = DataProcessor::clean(&raw).unwrap();
        assert_eq!(cleaned.column("agent").unwrap().null_count(), 1);
    }

    #[test]
    fn clean_without_country_column_passes_through() {
        let raw = df!("is_canceled" => &[1i64, 0]).unwrap();
        let cleaned = DataProcessor::clean(&raw).unwrap();
        assert!(cleaned.equals_missing(&raw));
    }

    #[test]
    fn statuses_ignore_out_of_range_values() {
        let df = df!("is_canceled" => &[Some(0i64), Some(1), Some(2), None]).unwrap();
        let statuses = DataProcessor::statuses(&df).unwrap();
        assert_eq!(
            statuses,
            vec![Some(Status::NotCanceled), Some(Status::Canceled), None, None]
        );
    }
}
