//! Hotel Booking Demand Dashboard - cancellation analysis over a static CSV dataset
//!
//! Starts the native dashboard, or with `--export` writes every chart and a
//! JSON summary to a directory without opening a window.

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use hotel_insight::config::{DashboardConfig, APP_NAME, DEFAULT_DATASET};
use hotel_insight::dashboard::Dashboard;
use hotel_insight::data::DatasetCache;
use hotel_insight::gui::{DashboardApp, Session};
use hotel_insight::stats::{DEFAULT_BUCKETS, DEFAULT_TOP_COUNTRIES};
use hotel_insight::{export, logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hotel_insight", version, about = APP_NAME)]
struct Cli {
    /// Hotel booking CSV to analyse
    #[arg(default_value = DEFAULT_DATASET)]
    path: PathBuf,

    /// Write charts and summary.json to this directory instead of opening the GUI
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Number of countries in the country view
    #[arg(long, default_value_t = DEFAULT_TOP_COUNTRIES)]
    top_countries: usize,

    /// Upper bound on histogram buckets
    #[arg(long, default_value_t = DEFAULT_BUCKETS)]
    bins: usize,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let config = DashboardConfig {
        dataset_path: cli.path.clone(),
        top_countries: cli.top_countries.max(1),
        histogram_buckets: cli.bins.max(1),
        ..DashboardConfig::default()
    };
    tracing::info!(?config, "Starting");

    let mut cache = DatasetCache::new();
    let loaded = cache.get_or_load(&config.dataset_path);

    if let Some(out_dir) = cli.export {
        let dataset = loaded.with_context(|| {
            format!("Dataset unavailable: {}", config.dataset_path.display())
        })?;
        let dashboard = Dashboard::new(dataset, config);
        let summary = export::write_summary(&dashboard, &out_dir)
            .with_context(|| format!("Failed to write summary to {}", out_dir.display()))?;
        let charts = export::render_charts(&dashboard, &out_dir)
            .with_context(|| format!("Failed to render charts to {}", out_dir.display()))?;
        println!("Wrote {} and {} charts", summary.display(), charts.len());
        return Ok(());
    }

    let session = match loaded {
        Ok(dataset) => Session::Ready(Dashboard::new(dataset, config.clone())),
        Err(e) => {
            tracing::error!(path = %config.dataset_path.display(), error = %e, "Dataset unavailable");
            Session::Failed {
                path: config.dataset_path.clone(),
                message: e.to_string(),
            }
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title(APP_NAME),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, cache, config, session)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))
}
