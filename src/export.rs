//! Headless export: every analysis view as a PNG chart plus a JSON summary.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::config::{DashboardConfig, APP_VERSION};
use crate::dashboard::{AnalysisTab, Dashboard, ViewModel, ViewRequest};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Serialize)]
struct ViewEntry {
    name: String,
    view: ViewModel,
}

#[derive(Serialize)]
struct Summary<'a> {
    version: &'static str,
    dataset: String,
    config: &'a DashboardConfig,
    overview: ViewModel,
    views: Vec<ViewEntry>,
}

/// File stem for the chart of one tab.
pub fn view_name(tab: &AnalysisTab) -> String {
    match tab {
        AnalysisTab::Target => "target".to_string(),
        AnalysisTab::Numeric(f) => format!("numeric_{}", f.column()),
        AnalysisTab::Categorical(f) => format!("categorical_{}", f.column()),
        AnalysisTab::Country => "country".to_string(),
        AnalysisTab::Correlation => "correlation".to_string(),
    }
}

/// Write `summary.json` with the overview and every analysis view model.
pub fn write_summary(dashboard: &Dashboard, out_dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(out_dir)?;

    let views = AnalysisTab::all()
        .into_iter()
        .map(|tab| ViewEntry {
            name: view_name(&tab),
            view: dashboard.respond(&ViewRequest::Analysis(tab)),
        })
        .collect();

    let summary = Summary {
        version: APP_VERSION,
        dataset: dashboard.dataset().path.display().to_string(),
        config: dashboard.config(),
        overview: dashboard.respond(&ViewRequest::DataOverview),
        views,
    };

    let path = out_dir.join(SUMMARY_FILE);
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, &summary)?;
    tracing::info!(path = %path.display(), "Summary written");
    Ok(path)
}

/// Render a PNG per analysis view. Placeholder views are skipped.
pub fn render_charts(dashboard: &Dashboard, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    for tab in AnalysisTab::all() {
        let name = view_name(&tab);
        let view = dashboard.respond(&ViewRequest::Analysis(tab));

        let rendered = match &view {
            ViewModel::Target(summary) => {
                let path = out_dir.join(format!("{name}.png"));
                StaticChartRenderer::render_target(summary, &path)?;
                vec![path]
            }
            ViewModel::Numeric(dist) => {
                let hist = out_dir.join(format!("{name}_histogram.png"));
                let boxplot = out_dir.join(format!("{name}_boxplot.png"));
                StaticChartRenderer::render_histogram(dist, &hist)?;
                StaticChartRenderer::render_boxplot(dist, &boxplot)?;
                vec![hist, boxplot]
            }
            ViewModel::Categorical(breakdown) => {
                let path = out_dir.join(format!("{name}.png"));
                StaticChartRenderer::render_category_ratio(breakdown, &path)?;
                vec![path]
            }
            ViewModel::Country(countries) => {
                let path = out_dir.join(format!("{name}.png"));
                StaticChartRenderer::render_countries(countries, &path)?;
                vec![path]
            }
            ViewModel::Correlation(matrix) => {
                let path = out_dir.join(format!("{name}.png"));
                StaticChartRenderer::render_heatmap(matrix, &path)?;
                vec![path]
            }
            ViewModel::Placeholder { message } => {
                tracing::warn!(view = %name, %message, "Skipping chart");
                Vec::new()
            }
            ViewModel::BusinessUnderstanding | ViewModel::DataOverview(_) => Vec::new(),
        };

        written.extend(rendered);
    }

    tracing::info!(charts = written.len(), dir = %out_dir.display(), "Charts rendered");
    Ok(written)
}
