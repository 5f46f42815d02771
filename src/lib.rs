//! Hotel Booking Demand Dashboard
//!
//! Loads the hotel booking dataset, derives chart-ready aggregates about
//! cancellations and presents them in a native GUI or as a headless export.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod gui;
pub mod logging;
pub mod stats;
