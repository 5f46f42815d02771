//! Control Panel Widget
//! Left side panel with section navigation and the dataset source.

use crate::charts::{color32, palette};
use crate::config::APP_NAME;
use crate::dashboard::Section;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side control panel with navigation and file selection.
pub struct ControlPanel {
    pub section: Section,
    pub dataset_path: Option<PathBuf>,
    pub row_count: Option<usize>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            section: Section::default(),
            dataset_path: None,
            row_count: None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dataset(&mut self, path: PathBuf, rows: usize) {
        self.dataset_path = Some(path);
        self.row_count = Some(rows);
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Navigation")
                    .size(22.0)
                    .color(color32(palette::BROWN)),
            );
            ui.label(RichText::new(APP_NAME).size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Sections =====
        for section in Section::ALL {
            let selected = self.section == section;
            let (fill, text) = if selected {
                (color32((0xA6, 0x7B, 0x5B)), Color32::WHITE)
            } else {
                (color32(palette::SAND), color32((0x62, 0x42, 0x35)))
            };

            let button = egui::Button::new(RichText::new(section.title()).size(15.0).color(text))
                .fill(fill)
                .rounding(8.0)
                .min_size(egui::vec2(ui.available_width(), 34.0));
            if ui.add(button).clicked() && !selected {
                self.section = section;
                action = ControlPanelAction::SectionChanged;
            }
            ui.add_space(4.0);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let path_text = self
                    .dataset_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No dataset".to_string());
                ui.label(RichText::new(path_text).size(12.0));

                if let Some(rows) = self.row_count {
                    ui.label(
                        RichText::new(format!("{} rows", rows))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }

                ui.add_space(5.0);
                if ui.button("Open dataset...").clicked() {
                    action = ControlPanelAction::OpenDataset;
                }
            });

        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SectionChanged,
    OpenDataset,
}
