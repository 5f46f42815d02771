//! Hotel Booking Dashboard Main Application
//! Main window with navigation panel and section viewer.

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::DatasetCache;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{RichText, SidePanel};
use std::path::{Path, PathBuf};

/// What the central panel currently shows.
pub enum Session {
    Ready(Dashboard),
    /// Loading the dataset failed; nothing but the error can be shown.
    Failed { path: PathBuf, message: String },
}

/// Main application window.
pub struct DashboardApp {
    cache: DatasetCache,
    config: DashboardConfig,
    session: Session,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        cache: DatasetCache,
        config: DashboardConfig,
        session: Session,
    ) -> Self {
        let mut control_panel = ControlPanel::new();
        match &session {
            Session::Ready(dashboard) => {
                let dataset = dashboard.dataset();
                control_panel.set_dataset(dataset.path.clone(), dataset.raw.height());
            }
            Session::Failed { path, .. } => {
                control_panel.dataset_path = Some(path.clone());
                control_panel.set_status("Error: dataset unavailable");
            }
        }

        Self {
            cache,
            config,
            session,
            control_panel,
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Ask for a CSV file and load it through the cache.
    ///
    /// Loading runs inside the frame that handled the click; a failure keeps
    /// the current session.
    fn handle_open_dataset(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.cache.get_or_load(&path) {
            Ok(dataset) => {
                tracing::info!(path = %dataset.path.display(), "Dataset opened");
                self.control_panel
                    .set_dataset(dataset.path.clone(), dataset.raw.height());
                self.control_panel.set_status("Dataset loaded");
                self.config.dataset_path = dataset.path.clone();
                self.chart_viewer.clear();
                self.session = Session::Ready(Dashboard::new(dataset, self.config.clone()));
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to open dataset");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn draw_failure(ui: &mut egui::Ui, path: &Path, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.label(
                RichText::new("Dataset unavailable")
                    .size(24.0)
                    .color(egui::Color32::from_rgb(220, 53, 69)),
            );
            ui.add_space(10.0);
            ui.label(format!("Could not load {}", path.display()));
            ui.label(RichText::new(message).monospace());
            ui.add_space(10.0);
            ui.label("Use \"Open dataset...\" to pick another file.");
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("control_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::OpenDataset => self.handle_open_dataset(),
                        ControlPanelAction::SectionChanged => {
                            tracing::debug!(section = ?self.control_panel.section, "Section changed");
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| match &self.session {
            Session::Ready(dashboard) => {
                self.chart_viewer
                    .show(ui, dashboard, self.control_panel.section)
            }
            Session::Failed { path, message } => Self::draw_failure(ui, path, message),
        });
    }
}
