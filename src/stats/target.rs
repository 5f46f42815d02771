//! Target distribution: how many bookings were canceled.

use crate::data::{DataProcessor, Status};
use crate::stats::AggregateError;
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSummary {
    pub total: usize,
    pub not_canceled: usize,
    pub canceled: usize,
    /// Percentage of all rows with `is_canceled = 1`.
    pub cancel_rate: f64,
    pub check_in_rate: f64,
}

pub struct TargetAggregator;

impl TargetAggregator {
    pub fn aggregate(df: &DataFrame) -> Result<TargetSummary, AggregateError> {
        let total = df.height();
        if total == 0 {
            return Err(AggregateError::InsufficientData(
                "cancellation rate is undefined for an empty table".to_string(),
            ));
        }

        let statuses = DataProcessor::statuses(df)?;
        let canceled = statuses
            .iter()
            .filter(|s| **s == Some(Status::Canceled))
            .count();
        let not_canceled = statuses
            .iter()
            .filter(|s| **s == Some(Status::NotCanceled))
            .count();

        let cancel_rate = canceled as f64 / total as f64 * 100.0;

        Ok(TargetSummary {
            total,
            not_canceled,
            canceled,
            cancel_rate,
            check_in_rate: 100.0 - cancel_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_counts_canceled_rows() {
        let df = df!("is_canceled" => &[1i64, 0, 1, 0, 1]).unwrap();
        let summary = TargetAggregator::aggregate(&df).unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.canceled, 3);
        assert_eq!(summary.not_canceled, 2);
        assert!((summary.cancel_rate - 60.0).abs() < 1e-9);
        assert!((summary.check_in_rate - 40.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_is_insufficient() {
        let df = df!("is_canceled" => Vec::<i64>::new()).unwrap();
        let err = TargetAggregator::aggregate(&df).unwrap_err();
        assert!(matches!(err, AggregateError::InsufficientData(_)));
    }

    #[test]
    fn rate_stays_within_bounds() {
        for flags in [vec![0i64; 7], vec![1i64; 7], vec![0, 1, 1, 0, 0, 0, 1]] {
            let df = df!("is_canceled" => flags).unwrap();
            let rate = TargetAggregator::aggregate(&df).unwrap().cancel_rate;
            assert!((0.0..=100.0).contains(&rate));
        }
    }
}
