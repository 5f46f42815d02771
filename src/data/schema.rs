//! Dataset Schema Module
//! Column names of the booking dataset and the feature selectors offered by the dashboard.

use polars::prelude::DataType;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Target column: 1 when the booking was canceled, 0 otherwise.
pub const IS_CANCELED: &str = "is_canceled";
/// Guest country code, may be missing in the raw file.
pub const COUNTRY: &str = "country";
/// Value substituted for a missing country.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Kind of column a selector expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Numeric features that can be plotted against cancellation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericFeature {
    DaysInWaitingList,
    TotalOfSpecialRequests,
    BookingChanges,
    PreviousCancellations,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 4] = [
        NumericFeature::DaysInWaitingList,
        NumericFeature::TotalOfSpecialRequests,
        NumericFeature::BookingChanges,
        NumericFeature::PreviousCancellations,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            NumericFeature::DaysInWaitingList => "days_in_waiting_list",
            NumericFeature::TotalOfSpecialRequests => "total_of_special_requests",
            NumericFeature::BookingChanges => "booking_changes",
            NumericFeature::PreviousCancellations => "previous_cancellations",
        }
    }
}

impl Default for NumericFeature {
    fn default() -> Self {
        NumericFeature::DaysInWaitingList
    }
}

impl fmt::Display for NumericFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for NumericFeature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or(UnknownFeature(ColumnKind::Numeric))
    }
}

/// Categorical features whose per-category cancellation ratio is charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoricalFeature {
    MarketSegment,
    DepositType,
    CustomerType,
    RequiredCarParkingSpaces,
}

impl CategoricalFeature {
    pub const ALL: [CategoricalFeature; 4] = [
        CategoricalFeature::MarketSegment,
        CategoricalFeature::DepositType,
        CategoricalFeature::CustomerType,
        CategoricalFeature::RequiredCarParkingSpaces,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            CategoricalFeature::MarketSegment => "market_segment",
            CategoricalFeature::DepositType => "deposit_type",
            CategoricalFeature::CustomerType => "customer_type",
            CategoricalFeature::RequiredCarParkingSpaces => "required_car_parking_spaces",
        }
    }
}

impl Default for CategoricalFeature {
    fn default() -> Self {
        CategoricalFeature::MarketSegment
    }
}

impl fmt::Display for CategoricalFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for CategoricalFeature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or(UnknownFeature(ColumnKind::Categorical))
    }
}

/// A column name outside the allowed set for the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownFeature(pub ColumnKind);

/// Columns the loader requires, with whether they must be numeric-typed.
pub fn required_columns() -> Vec<(&'static str, bool)> {
    let mut cols = vec![(IS_CANCELED, true), (COUNTRY, false)];
    cols.extend(NumericFeature::ALL.iter().map(|f| (f.column(), true)));
    cols.extend(CategoricalFeature::ALL.iter().map(|f| (f.column(), false)));
    cols
}

/// Integer and floating point dtypes count as numeric.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_allowed_numeric_columns() {
        for feature in NumericFeature::ALL {
            assert_eq!(feature.column().parse::<NumericFeature>(), Ok(feature));
        }
    }

    #[test]
    fn rejects_categorical_name_as_numeric() {
        assert_eq!(
            "market_segment".parse::<NumericFeature>(),
            Err(UnknownFeature(ColumnKind::Numeric))
        );
        assert_eq!(
            "adr".parse::<CategoricalFeature>(),
            Err(UnknownFeature(ColumnKind::Categorical))
        );
    }

    #[test]
    fn required_columns_cover_every_selector() {
        let cols = required_columns();
        assert_eq!(cols.len(), 10);
        assert!(cols.contains(&("required_car_parking_spaces", false)));
        assert!(cols.contains(&(IS_CANCELED, true)));
    }
}
