//! Stats module - descriptive statistics and per-chart aggregators

mod calculator;
mod categorical;
mod correlation;
mod country;
mod numeric;
mod overview;
mod target;

pub use calculator::{BoxSummary, DescriptiveStats, StatsCalculator};
pub use categorical::{CategoricalAggregator, CategoryBreakdown, CategoryShare};
pub use correlation::{CorrelationAggregator, CorrelationMatrix};
pub use country::{CountryAggregator, CountryCancellation, DEFAULT_TOP_COUNTRIES};
pub use numeric::{HistogramBucket, NumericAggregator, NumericDistribution, DEFAULT_BUCKETS};
pub use overview::{ColumnDescription, ColumnType, DataOverview, OverviewBuilder};
pub use target::{TargetAggregator, TargetSummary};

use crate::data::schema::ColumnKind;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures local to a single aggregator; they never take down other views.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("`{column}` is not one of the allowed {expected} features")]
    InvalidColumn { column: String, expected: ColumnKind },
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}
