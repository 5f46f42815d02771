//! Distribution of a numeric feature split by cancellation status.
//! Feeds the grouped histogram and the box plot.

use crate::data::schema::{ColumnKind, NumericFeature};
use crate::data::{DataProcessor, Status};
use crate::stats::{AggregateError, BoxSummary, StatsCalculator};
use polars::prelude::*;
use serde::Serialize;

/// Upper bound on histogram buckets.
pub const DEFAULT_BUCKETS: usize = 30;

/// Half-open bucket `[lower, upper)`; the last bucket also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub not_canceled: usize,
    pub canceled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericDistribution {
    pub feature: NumericFeature,
    pub buckets: Vec<HistogramBucket>,
    pub not_canceled: Option<BoxSummary>,
    pub canceled: Option<BoxSummary>,
}

pub struct NumericAggregator;

impl NumericAggregator {
    /// Aggregate `column`, which must be one of the allowed numeric features.
    pub fn aggregate(
        df: &DataFrame,
        column: &str,
        max_buckets: usize,
    ) -> Result<NumericDistribution, AggregateError> {
        let feature: NumericFeature =
            column
                .parse()
                .map_err(|_| AggregateError::InvalidColumn {
                    column: column.to_string(),
                    expected: ColumnKind::Numeric,
                })?;

        let values = DataProcessor::numeric_values(df, feature.column())?;
        let statuses = DataProcessor::statuses(df)?;

        let pairs: Vec<(f64, Status)> = values
            .into_iter()
            .zip(statuses)
            .filter_map(|(v, s)| Some((v?, s?)))
            .collect();

        if pairs.is_empty() {
            return Err(AggregateError::InsufficientData(format!(
                "no labelled values for {}",
                feature
            )));
        }

        let group = |status: Status| -> Vec<f64> {
            pairs
                .iter()
                .filter(|(_, s)| *s == status)
                .map(|(v, _)| *v)
                .collect()
        };

        Ok(NumericDistribution {
            feature,
            buckets: Self::histogram(&pairs, max_buckets),
            not_canceled: StatsCalculator::box_summary(&group(Status::NotCanceled)),
            canceled: StatsCalculator::box_summary(&group(Status::Canceled)),
        })
    }

    /// Shared bucket edges for both statuses.
    ///
    /// Integer data spanning no more than `max_buckets` distinct values gets one
    /// unit-wide bucket per integer, otherwise `max_buckets` equal-width buckets.
    fn histogram(pairs: &[(f64, Status)], max_buckets: usize) -> Vec<HistogramBucket> {
        let max_buckets = max_buckets.max(1);
        let (min, max) = pairs.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (v, _)| {
            (lo.min(*v), hi.max(*v))
        });

        let integral = pairs.iter().all(|(v, _)| v.fract() == 0.0);
        let (count, width) = if integral && (max - min) < max_buckets as f64 {
            ((max - min) as usize + 1, 1.0)
        } else if max == min {
            (1, 0.0)
        } else {
            (max_buckets, (max - min) / max_buckets as f64)
        };

        let mut buckets: Vec<HistogramBucket> = (0..count)
            .map(|i| HistogramBucket {
                lower: min + i as f64 * width,
                upper: min + (i + 1) as f64 * width,
                not_canceled: 0,
                canceled: 0,
            })
            .collect();

        for (v, status) in pairs {
            let idx = if width > 0.0 {
                (((v - min) / width).floor() as usize).min(count - 1)
            } else {
                0
            };
            match status {
                Status::NotCanceled => buckets[idx].not_canceled += 1,
                Status::Canceled => buckets[idx].canceled += 1,
            }
        }

        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookings() -> DataFrame {
        df!(
            "is_canceled" => &[0i64, 0, 1, 1, 1, 0],
            "booking_changes" => &[Some(0i64), Some(1), Some(0), Some(0), None, Some(3)],
            "market_segment" => &["Direct", "Online TA", "Online TA", "Groups", "Groups", "Direct"],
        )
        .unwrap()
    }

    #[test]
    fn integer_feature_gets_unit_buckets() {
        let dist = NumericAggregator::aggregate(&bookings(), "booking_changes", DEFAULT_BUCKETS).unwrap();
        assert_eq!(dist.feature, NumericFeature::BookingChanges);
        assert_eq!(dist.buckets.len(), 4);
        assert_eq!(dist.buckets[0].lower, 0.0);
        assert_eq!(dist.buckets[0].not_canceled, 1);
        assert_eq!(dist.buckets[0].canceled, 2);
        assert_eq!(dist.buckets[3].not_canceled, 1);

        let total: usize = dist.buckets.iter().map(|b| b.canceled + b.not_canceled).sum();
        assert_eq!(total, 5, "null value must be skipped");
    }

    #[test]
    fn box_summaries_split_by_status() {
        let dist = NumericAggregator::aggregate(&bookings(), "booking_changes", DEFAULT_BUCKETS).unwrap();
        let kept = dist.not_canceled.unwrap();
        assert_eq!(kept.count, 3);
        assert_eq!(kept.median, 1.0);
        let canceled = dist.canceled.unwrap();
        assert_eq!(canceled.count, 2);
        assert_eq!(canceled.q3, 0.0);
    }

    #[test]
    fn wide_range_uses_equal_width_buckets() {
        let df = df!(
            "is_canceled" => &[0i64, 1, 0, 1],
            "days_in_waiting_list" => &[0i64, 50, 100, 391],
        )
        .unwrap();
        let dist = NumericAggregator::aggregate(&df, "days_in_waiting_list", 10).unwrap();
        assert_eq!(dist.buckets.len(), 10);
        assert_eq!(dist.buckets[9].canceled, 1, "maximum lands in the last bucket");
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = NumericAggregator::aggregate(&bookings(), "market_segment", DEFAULT_BUCKETS).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::InvalidColumn { expected: ColumnKind::Numeric, .. }
        ));
    }

    #[test]
    fn empty_table_is_insufficient() {
        let df = df!(
            "is_canceled" => Vec::<i64>::new(),
            "booking_changes" => Vec::<i64>::new(),
        )
        .unwrap();
        let err = NumericAggregator::aggregate(&df, "booking_changes", DEFAULT_BUCKETS).unwrap_err();
        assert!(matches!(err, AggregateError::InsufficientData(_)));
    }
}
