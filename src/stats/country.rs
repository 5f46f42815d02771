//! Cancellation percentage among the most frequent guest countries.

use crate::data::schema::COUNTRY;
use crate::data::{DataProcessor, Status};
use crate::stats::AggregateError;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_TOP_COUNTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryCancellation {
    pub country: String,
    pub bookings: usize,
    pub cancel_pct: f64,
}

#[derive(Default)]
struct Tally {
    bookings: usize,
    labelled: usize,
    canceled: usize,
}

pub struct CountryAggregator;

impl CountryAggregator {
    /// Top `top_n` countries by booking count, sorted by cancellation percentage.
    ///
    /// Countries with equal booking counts are ranked by first appearance in
    /// the table. Equal percentages keep that frequency ranking.
    pub fn aggregate(
        df: &DataFrame,
        top_n: usize,
    ) -> Result<Vec<CountryCancellation>, AggregateError> {
        let countries = DataProcessor::string_values(df, COUNTRY)?;
        let statuses = DataProcessor::statuses(df)?;

        let mut order: Vec<String> = Vec::new();
        let mut tallies: HashMap<String, Tally> = HashMap::new();

        for (country, status) in countries.into_iter().zip(statuses) {
            let Some(country) = country else {
                continue;
            };
            let tally = tallies.entry(country.clone()).or_insert_with(|| {
                order.push(country);
                Tally::default()
            });
            tally.bookings += 1;
            if let Some(status) = status {
                tally.labelled += 1;
                if status == Status::Canceled {
                    tally.canceled += 1;
                }
            }
        }

        // Stable sort keeps first-appearance order among equal counts
        order.sort_by(|a, b| tallies[b].bookings.cmp(&tallies[a].bookings));
        order.truncate(top_n);

        let mut result: Vec<CountryCancellation> = order
            .into_iter()
            .map(|country| {
                let tally = &tallies[&country];
                let cancel_pct = if tally.labelled == 0 {
                    f64::NAN
                } else {
                    tally.canceled as f64 / tally.labelled as f64 * 100.0
                };
                CountryCancellation {
                    country,
                    bookings: tally.bookings,
                    cancel_pct,
                }
            })
            .collect();

        // Undefined percentages sink to the end
        let key = |p: f64| if p.is_nan() { f64::NEG_INFINITY } else { p };
        result.sort_by(|a, b| key(b.cancel_pct).total_cmp(&key(a.cancel_pct)));

        tracing::debug!(countries = result.len(), "Country aggregation done");
        Ok(result)
    }
}
