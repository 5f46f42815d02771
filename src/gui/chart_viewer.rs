//! Chart Viewer Widget
//! Central panel drawing the selected section and, for the analysis section, its tabs.
//! The view model of the last request is kept and only recomputed when the request changes.

use crate::charts::{color32, palette, ChartPlotter};
use crate::dashboard::{AnalysisTab, Dashboard, Section, ViewModel, ViewRequest};
use crate::data::schema::{CategoricalFeature, NumericFeature};
use crate::stats::{CategoryBreakdown, CorrelationMatrix, CountryCancellation, DataOverview, NumericDistribution, TargetSummary};
use egui::{ComboBox, Grid, RichText, ScrollArea};

const TAB_COUNT: usize = 5;

const BUSINESS_PROBLEM: &str = "A hotel in Portugal faces a high number of booking cancellations. \
Many guests book a room and cancel before the arrival date. The hotel loses potential revenue, \
struggles to maximise occupancy, and operational planning such as room allocation and staff \
scheduling is disrupted.\n\nManagement therefore wants to know early whether a booking is likely \
to be canceled. Country of origin, deposit type, room type, parking needs and special requests \
are known for every guest.";

const PROBLEM_STATEMENT: &str = "Cancellations cause losses because a canceled room often cannot be \
resold in the time left. Reservation handling is inefficient when every booking gets the same \
priority without knowing which ones carry a high cancellation risk. This uncertainty makes \
occupancy planning and a sound overbooking strategy hard.\n\nWhen staff, room preparation and \
capacity are planned for every reservation regardless of risk, much of that effort is wasted \
when guests do not arrive, lowering efficiency and adding cost.";

const GOALS: &str = "Build a model that predicts and identifies likely cancellations so hotel \
management can reduce losses, plan occupancy more accurately and support sales strategy decisions.";

/// Central view with tab selection and memoized view model.
#[derive(Default)]
pub struct ChartViewer {
    tab: usize,
    numeric: NumericFeature,
    categorical: CategoricalFeature,
    last: Option<(ViewRequest, ViewModel)>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the memoized view, e.g. after a new dataset was opened.
    pub fn clear(&mut self) {
        self.last = None;
    }

    fn current_tab(&self) -> AnalysisTab {
        self.tab_at(self.tab)
    }

    fn tab_at(&self, index: usize) -> AnalysisTab {
        match index {
            0 => AnalysisTab::Target,
            1 => AnalysisTab::Numeric(self.numeric),
            2 => AnalysisTab::Categorical(self.categorical),
            3 => AnalysisTab::Country,
            _ => AnalysisTab::Correlation,
        }
    }

    fn request(&self, section: Section) -> ViewRequest {
        match section {
            Section::BusinessUnderstanding => ViewRequest::BusinessUnderstanding,
            Section::DataOverview => ViewRequest::DataOverview,
            Section::ExploratoryAnalysis => ViewRequest::Analysis(self.current_tab()),
        }
    }

    /// Answer the request for the current selection, reusing the last answer if unchanged.
    fn view(&mut self, dashboard: &Dashboard, section: Section) -> &ViewModel {
        let request = self.request(section);
        if self.last.as_ref().is_some_and(|(last, _)| *last != request) {
            self.last = None;
        }
        let (_, view) = self
            .last
            .get_or_insert_with(|| (request, dashboard.respond(&request)));
        view
    }

    pub fn show(&mut self, ui: &mut egui::Ui, dashboard: &Dashboard, section: Section) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match section {
                Section::BusinessUnderstanding => Self::draw_business(ui),
                Section::DataOverview => {
                    ui.heading("Data Overview");
                    ui.add_space(8.0);
                    match self.view(dashboard, section) {
                        ViewModel::DataOverview(overview) => Self::draw_overview(ui, overview),
                        other => Self::draw_fallback(ui, other),
                    }
                }
                Section::ExploratoryAnalysis => {
                    ui.heading("Exploratory Data Analysis");
                    ui.add_space(8.0);
                    self.draw_tab_bar(ui);
                    ui.separator();
                    ui.add_space(8.0);
                    self.draw_selectors(ui);
                    let view = self.view(dashboard, section);
                    Self::draw_analysis(ui, view);
                }
            });
    }

    fn draw_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for i in 0..TAB_COUNT {
                let title = self.tab_at(i).title();
                ui.selectable_value(&mut self.tab, i, RichText::new(title).size(14.0));
            }
        });
    }

    fn draw_selectors(&mut self, ui: &mut egui::Ui) {
        match self.current_tab() {
            AnalysisTab::Numeric(_) => {
                ui.horizontal(|ui| {
                    ui.label("Numeric feature:");
                    ComboBox::from_id_salt("numeric_feature")
                        .width(220.0)
                        .selected_text(self.numeric.column())
                        .show_ui(ui, |ui| {
                            for feature in NumericFeature::ALL {
                                ui.selectable_value(&mut self.numeric, feature, feature.column());
                            }
                        });
                });
                ui.add_space(8.0);
            }
            AnalysisTab::Categorical(_) => {
                ui.horizontal(|ui| {
                    ui.label("Categorical feature:");
                    ComboBox::from_id_salt("categorical_feature")
                        .width(220.0)
                        .selected_text(self.categorical.column())
                        .show_ui(ui, |ui| {
                            for feature in CategoricalFeature::ALL {
                                ui.selectable_value(&mut self.categorical, feature, feature.column());
                            }
                        });
                });
                ui.add_space(8.0);
            }
            _ => {}
        }
    }

    fn draw_business(ui: &mut egui::Ui) {
        ui.heading("Hotel Booking Demand Prediction");
        ui.add_space(10.0);
        for (title, body) in [
            ("Business Problem", BUSINESS_PROBLEM),
            ("Problem Statement", PROBLEM_STATEMENT),
            ("Goals", GOALS),
        ] {
            ui.label(RichText::new(title).size(17.0).strong());
            ui.add_space(4.0);
            ui.label(body);
            ui.add_space(14.0);
        }
    }

    fn draw_overview(ui: &mut egui::Ui, overview: &DataOverview) {
        ui.horizontal(|ui| {
            ChartPlotter::draw_metric(ui, "Total Raw Rows", overview.raw_rows.to_string());
            ChartPlotter::draw_metric(ui, "Total Features", overview.feature_count.to_string());
        });

        ui.add_space(12.0);
        ui.label(RichText::new("Dataset Preview").size(16.0).strong());
        ScrollArea::horizontal().id_salt("preview").show(ui, |ui| {
            Grid::new("preview_grid").striped(true).show(ui, |ui| {
                for column in &overview.preview_columns {
                    ui.label(RichText::new(column).strong());
                }
                ui.end_row();
                for row in &overview.preview_rows {
                    for cell in row {
                        ui.label(cell.as_str());
                    }
                    ui.end_row();
                }
            });
        });

        ui.add_space(12.0);
        ui.label(RichText::new("Descriptive Statistics").size(16.0).strong());
        ScrollArea::horizontal().id_salt("describe").show(ui, |ui| {
            Grid::new("describe_grid").striped(true).show(ui, |ui| {
                for header in ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for desc in &overview.describe {
                    let s = &desc.stats;
                    ui.label(RichText::new(&desc.column).strong());
                    ui.label(s.count.to_string());
                    for v in [s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max] {
                        ui.label(format!("{:.3}", v));
                    }
                    ui.end_row();
                }
            });
        });

        ui.add_space(12.0);
        ui.label(RichText::new("Data Types").size(16.0).strong());
        Grid::new("dtype_grid").striped(true).show(ui, |ui| {
            ui.label(RichText::new("Column").strong());
            ui.label(RichText::new("Data Type").strong());
            ui.end_row();
            for ct in &overview.dtypes {
                ui.label(ct.column.as_str());
                ui.label(ct.dtype.as_str());
                ui.end_row();
            }
        });
    }

    fn draw_analysis(ui: &mut egui::Ui, view: &ViewModel) {
        match view {
            ViewModel::Target(summary) => Self::draw_target(ui, summary),
            ViewModel::Numeric(dist) => Self::draw_numeric(ui, dist),
            ViewModel::Categorical(breakdown) => Self::draw_categorical(ui, breakdown),
            ViewModel::Country(countries) => Self::draw_country(ui, countries),
            ViewModel::Correlation(matrix) => Self::draw_correlation(ui, matrix),
            other => Self::draw_fallback(ui, other),
        }
    }

    fn draw_target(ui: &mut egui::Ui, summary: &TargetSummary) {
        ui.label(RichText::new("Target Class Distribution (is_canceled)").size(16.0).strong());
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ChartPlotter::draw_metric(ui, "Total Bookings", summary.total.to_string());
            ChartPlotter::draw_metric(ui, "Cancel Percentage", format!("{:.2}%", summary.cancel_rate));
            ChartPlotter::draw_metric(ui, "Check-In Percentage", format!("{:.2}%", summary.check_in_rate));
        });
        ui.add_space(10.0);
        ChartPlotter::draw_target_bars(ui, summary);
    }

    fn draw_numeric(ui: &mut egui::Ui, dist: &NumericDistribution) {
        ui.label(RichText::new("Numeric Features against Cancellation").size(16.0).strong());
        ui.add_space(6.0);
        ui.columns(2, |columns| {
            columns[0].label(RichText::new(format!("Distribution of {}", dist.feature)).strong());
            ChartPlotter::draw_histogram(&mut columns[0], dist);
            columns[1].label(RichText::new(format!("Boxplot of {}", dist.feature)).strong());
            ChartPlotter::draw_boxplot(&mut columns[1], dist);
        });
    }

    fn draw_categorical(ui: &mut egui::Ui, breakdown: &CategoryBreakdown) {
        ui.label(
            RichText::new(format!("Cancel Ratio by {}", breakdown.feature))
                .size(16.0)
                .strong(),
        );
        ui.add_space(6.0);
        ChartPlotter::draw_category_ratio(ui, breakdown);
    }

    fn draw_country(ui: &mut egui::Ui, countries: &[CountryCancellation]) {
        ui.label(RichText::new("Top Countries by Booking Count").size(16.0).strong());
        ui.add_space(6.0);
        ChartPlotter::draw_country_bars(ui, countries);
        if let Some(top) = countries.first() {
            ui.add_space(6.0);
            ui.label(format!(
                "{} has the highest cancellation rate among the top {} countries ({:.1}%).",
                top.country,
                countries.len(),
                top.cancel_pct
            ));
        }
    }

    fn draw_correlation(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        ui.label(RichText::new("Correlation Heatmap").size(16.0).strong());
        ui.add_space(6.0);
        ChartPlotter::draw_heatmap(ui, matrix);
    }

    fn draw_fallback(ui: &mut egui::Ui, view: &ViewModel) {
        let message = match view {
            ViewModel::Placeholder { message } => message.as_str(),
            _ => "Nothing to show for this view",
        };
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(message)
                    .size(15.0)
                    .color(color32(palette::BROWN)),
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::Dataset;
    use polars::prelude::*;
    use std::sync::Arc;

    fn dashboard() -> Dashboard {
        let raw = df!(
            "is_canceled" => &[1i64, 0, 1],
            "country" => &[Some("PRT"), None, Some("ESP")],
        )
        .unwrap();
        let dataset = Dataset::from_raw("bookings.csv", raw).unwrap();
        Dashboard::new(Arc::new(dataset), DashboardConfig::default())
    }

    #[test]
    fn view_is_reused_until_request_changes() {
        let dashboard = dashboard();
        let mut viewer = ChartViewer::new();

        let first: *const ViewModel = viewer.view(&dashboard, Section::ExploratoryAnalysis);
        let second: *const ViewModel = viewer.view(&dashboard, Section::ExploratoryAnalysis);
        assert_eq!(first, second);
        assert!(matches!(
            viewer.last,
            Some((ViewRequest::Analysis(AnalysisTab::Target), ViewModel::Target(_)))
        ));

        viewer.tab = 3;
        assert!(matches!(
            viewer.view(&dashboard, Section::ExploratoryAnalysis),
            ViewModel::Country(_)
        ));

        viewer.clear();
        assert!(viewer.last.is_none());
    }

    #[test]
    fn tabs_map_to_requests_with_selected_columns() {
        let mut viewer = ChartViewer::new();
        viewer.tab = 1;
        viewer.numeric = NumericFeature::BookingChanges;
        assert_eq!(
            viewer.request(Section::ExploratoryAnalysis),
            ViewRequest::Analysis(AnalysisTab::Numeric(NumericFeature::BookingChanges))
        );
        viewer.tab = 4;
        assert_eq!(
            viewer.request(Section::ExploratoryAnalysis),
            ViewRequest::Analysis(AnalysisTab::Correlation)
        );
        assert_eq!(viewer.request(Section::DataOverview), ViewRequest::DataOverview);
    }
}
