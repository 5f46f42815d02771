//! Pearson correlation matrix over every numeric column.

use crate::data::{DataLoader, DataProcessor};
use crate::stats::{AggregateError, StatsCalculator};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

/// Square matrix indexed by `columns` in both dimensions.
///
/// Entries are in [-1, 1]; NaN marks a pair without enough variance or
/// overlapping observations.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Smallest and largest defined entry, diagonal included; `(-1, 1)` if none is defined.
    pub fn value_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .values
            .iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo > hi {
            (-1.0, 1.0)
        } else {
            (lo, hi)
        }
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.values[i][j])
    }
}

pub struct CorrelationAggregator;

impl CorrelationAggregator {
    pub fn aggregate(df: &DataFrame) -> Result<CorrelationMatrix, AggregateError> {
        let columns = DataLoader::get_numeric_columns(df);
        if columns.len() < 2 {
            return Err(AggregateError::InsufficientData(format!(
                "correlation needs at least 2 numeric columns, found {}",
                columns.len()
            )));
        }
        if df.height() < 2 {
            return Err(AggregateError::InsufficientData(format!(
                "correlation needs at least 2 rows, found {}",
                df.height()
            )));
        }

        let data: Vec<Vec<Option<f64>>> = columns
            .par_iter()
            .map(|name| DataProcessor::numeric_values(df, name))
            .collect::<Result<_, _>>()?;

        let n = columns.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        // Pairwise-complete observations, one pair per task
        let coefficients: Vec<f64> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let (x, y): (Vec<f64>, Vec<f64>) = data[i]
                    .iter()
                    .zip(&data[j])
                    .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                    .unzip();
                StatsCalculator::pearson(&x, &y)
            })
            .collect();

        let mut values = vec![vec![0.0; n]; n];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        for (&(i, j), &r) in pairs.iter().zip(&coefficients) {
            values[i][j] = r;
            values[j][i] = r;
        }

        tracing::debug!(columns = n, "Correlation matrix computed");
        Ok(CorrelationMatrix { columns, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookings() -> DataFrame {
        df!(
            "is_canceled" => &[0i64, 1, 1, 0, 1],
            "lead_time" => &[5i64, 120, 90, 10, 200],
            "adr" => &[Some(80.0f64), Some(60.0), None, Some(95.5), Some(55.0)],
            "country" => &["PRT", "GBR", "PRT", "ESP", "FRA"],
        )
        .unwrap()
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let matrix = CorrelationAggregator::aggregate(&bookings()).unwrap();
        assert_eq!(matrix.columns, vec!["is_canceled", "lead_time", "adr"]);

        for i in 0..matrix.len() {
            assert!((matrix.values[i][i] - 1.0).abs() < 1e-12);
            for j in 0..matrix.len() {
                let (a, b) = (matrix.values[i][j], matrix.values[j][i]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
                assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
            }
        }
    }

    #[test]
    fn related_columns_correlate_positively() {
        let matrix = CorrelationAggregator::aggregate(&bookings()).unwrap();
        assert!(matrix.get("is_canceled", "lead_time").unwrap() > 0.8);
        assert!(matrix.get("lead_time", "adr").unwrap() < 0.0);
        assert!(matrix.get("country", "adr").is_none());
    }

    #[test]
    fn single_numeric_column_is_insufficient() {
        let df = df!("is_canceled" => &[0i64, 1], "country" => &["PRT", "ESP"]).unwrap();
        let err = CorrelationAggregator::aggregate(&df).unwrap_err();
        assert!(matches!(err, AggregateError::InsufficientData(_)));
    }

    #[test]
    fn single_row_is_insufficient() {
        let df = df!("is_canceled" => &[0i64], "lead_time" => &[3i64]).unwrap();
        let err = CorrelationAggregator::aggregate(&df).unwrap_err();
        assert!(matches!(err, AggregateError::InsufficientData(_)));
    }

    #[test]
    fn value_range_covers_observed_entries() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".into(), "b".into(), "c".into()],
            values: vec![
                vec![1.0, 0.2, f64::NAN],
                vec![0.2, 1.0, -0.4],
                vec![f64::NAN, -0.4, 1.0],
            ],
        };
        assert_eq!(matrix.value_range(), (-0.4, 1.0));

        let empty = CorrelationMatrix { columns: vec![], values: vec![] };
        assert_eq!(empty.value_range(), (-1.0, 1.0));
    }
}
