//! Dashboard configuration and application constants.

use crate::stats::{DEFAULT_BUCKETS, DEFAULT_TOP_COUNTRIES};
use serde::Serialize;
use std::path::PathBuf;

pub const APP_NAME: &str = "Hotel Booking Demand Dashboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dataset read when no path is given, relative to the working directory.
pub const DEFAULT_DATASET: &str = "data_hotel_booking_demand.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings shared by the GUI and the headless export.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    pub top_countries: usize,
    pub histogram_buckets: usize,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            top_countries: DEFAULT_TOP_COUNTRIES,
            histogram_buckets: DEFAULT_BUCKETS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}
