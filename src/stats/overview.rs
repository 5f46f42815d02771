//! Data overview: size, preview rows, describe table and column types.

use crate::data::{DataLoader, DataProcessor, Dataset};
use crate::stats::{AggregateError, DescriptiveStats, StatsCalculator};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescription {
    pub column: String,
    pub stats: DescriptiveStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnType {
    pub column: String,
    pub dtype: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataOverview {
    /// Row count of the file as loaded, before cleaning.
    pub raw_rows: usize,
    pub feature_count: usize,
    pub preview_columns: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
    pub describe: Vec<ColumnDescription>,
    pub dtypes: Vec<ColumnType>,
}

pub struct OverviewBuilder;

impl OverviewBuilder {
    pub fn build(dataset: &Dataset, preview_rows: usize) -> Result<DataOverview, AggregateError> {
        let df = &dataset.cleaned;
        let head = df.head(Some(preview_rows));
        let preview_columns = DataLoader::get_columns(&head);

        let cells: Vec<Vec<String>> = preview_columns
            .iter()
            .map(|name| {
                DataProcessor::string_values(&head, name).map(|values| {
                    values
                        .into_iter()
                        .map(|v| v.unwrap_or_else(|| "null".to_string()))
                        .collect()
                })
            })
            .collect::<Result<_, _>>()?;

        let preview_rows = (0..head.height())
            .map(|row| cells.iter().map(|column| column[row].clone()).collect())
            .collect();

        let describe = DataLoader::get_numeric_columns(df)
            .par_iter()
            .map(|name| -> Result<ColumnDescription, AggregateError> {
                let values: Vec<f64> = DataProcessor::numeric_values(df, name)?
                    .into_iter()
                    .flatten()
                    .collect();
                Ok(ColumnDescription {
                    column: name.clone(),
                    stats: StatsCalculator::compute_descriptive_stats(&values),
                })
            })
            .collect::<Result<Vec<_>, AggregateError>>()?;

        let dtypes = df
            .get_columns()
            .iter()
            .map(|col| ColumnType {
                column: col.name().to_string(),
                dtype: col.dtype().to_string(),
            })
            .collect();

        Ok(DataOverview {
            raw_rows: dataset.raw.height(),
            feature_count: df.width(),
            preview_columns,
            preview_rows,
            describe,
            dtypes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn overview_summarises_cleaned_table() {
        let raw = df!(
            "country" => &[Some("PRT"), None, Some("ESP")],
            "is_canceled" => &[1i64, 0, 1],
            "lead_time" => &[Some(10i64), None, Some(30)],
        )
        .unwrap();
        let dataset = Dataset::from_raw("bookings.csv", raw).unwrap();
        let overview = OverviewBuilder::build(&dataset, 2).unwrap();

        assert_eq!(overview.raw_rows, 3);
        assert_eq!(overview.feature_count, 3);
        assert_eq!(overview.preview_rows.len(), 2);
        assert_eq!(overview.preview_rows[1], vec!["Unknown", "0", "null"]);

        let lead = overview
            .describe
            .iter()
            .find(|d| d.column == "lead_time")
            .unwrap();
        assert_eq!(lead.stats.count, 2);
        assert_eq!(lead.stats.mean, 20.0);
        assert_eq!(overview.describe.len(), 2);

        assert_eq!(overview.dtypes[0].column, "country");
        assert_eq!(overview.dtypes[0].dtype, DataType::String.to_string());
    }
}
