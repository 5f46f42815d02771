//! Per-category cancellation ratio.
//!
//! Percentages are conditional on the category: canceled and not canceled
//! shares of one category always add up to 100.

use crate::data::schema::{CategoricalFeature, ColumnKind};
use crate::data::{DataProcessor, Status};
use crate::stats::AggregateError;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub not_canceled: usize,
    pub canceled: usize,
    pub canceled_pct: f64,
    pub not_canceled_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub feature: CategoricalFeature,
    pub categories: Vec<CategoryShare>,
}

pub struct CategoricalAggregator;

impl CategoricalAggregator {
    /// Aggregate `column`, which must be one of the allowed categorical features.
    ///
    /// Categories keep their first-appearance order, except when every label is
    /// numeric (e.g. parking spaces), in which case they sort by value.
    pub fn aggregate(df: &DataFrame, column: &str) -> Result<CategoryBreakdown, AggregateError> {
        let feature: CategoricalFeature =
            column
                .parse()
                .map_err(|_| AggregateError::InvalidColumn {
                    column: column.to_string(),
                    expected: ColumnKind::Categorical,
                })?;

        let labels = DataProcessor::string_values(df, feature.column())?;
        let statuses = DataProcessor::statuses(df)?;

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for (label, status) in labels.into_iter().zip(statuses) {
            let (Some(label), Some(status)) = (label, status) else {
                continue;
            };
            let entry = counts.entry(label.clone()).or_insert_with(|| {
                order.push(label);
                (0, 0)
            });
            match status {
                Status::NotCanceled => entry.0 += 1,
                Status::Canceled => entry.1 += 1,
            }
        }

        if order.is_empty() {
            return Err(AggregateError::InsufficientData(format!(
                "no labelled rows for {}",
                feature
            )));
        }

        let numeric_keys: Option<Vec<f64>> =
            order.iter().map(|c| c.parse::<f64>().ok()).collect();
        if let Some(keys) = numeric_keys {
            let mut keyed: Vec<(f64, String)> = keys.into_iter().zip(order).collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            order = keyed.into_iter().map(|(_, c)| c).collect();
        }

        let categories = order
            .into_iter()
            .map(|category| {
                let (not_canceled, canceled) = counts[&category];
                let canceled_pct = canceled as f64 / (canceled + not_canceled) as f64 * 100.0;
                CategoryShare {
                    category,
                    not_canceled,
                    canceled,
                    canceled_pct,
                    not_canceled_pct: 100.0 - canceled_pct,
                }
            })
            .collect();

        Ok(CategoryBreakdown {
            feature,
            categories,
        })
    }
}
