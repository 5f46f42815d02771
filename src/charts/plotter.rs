//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::palette::{self, Rgb};
use crate::data::Status;
use crate::stats::{
    BoxSummary, CategoryBreakdown, CorrelationMatrix, CountryCancellation, NumericDistribution,
    TargetSummary,
};
use egui::{Align2, Color32, FontId, RichText, Sense, Stroke};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, HLine, Legend, LineStyle, Plot};

const PLOT_HEIGHT: f32 = 320.0;
const HEATMAP_CELL: f32 = 56.0;
const HEATMAP_LABEL_WIDTH: f32 = 190.0;

pub fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Formatter showing `labels[i]` at integer position `i` and nothing elsewhere.
fn category_formatter(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar chart of booking counts per cancellation status.
    pub fn draw_target_bars(ui: &mut egui::Ui, summary: &TargetSummary) {
        let labels = vec!["Not Cancel (0)".to_string(), "Cancel (1)".to_string()];
        let bars = vec![
            Bar::new(0.0, summary.not_canceled as f64)
                .name(&labels[0])
                .fill(color32(palette::status_color(Status::NotCanceled)))
                .width(0.6),
            Bar::new(1.0, summary.canceled as f64)
                .name(&labels[1])
                .fill(color32(palette::status_color(Status::Canceled)))
                .width(0.6),
        ];

        Plot::new("target_bars")
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Status")
            .y_axis_label("Bookings")
            .x_axis_formatter(category_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Bookings"));
            });
    }

    /// Histogram with the two statuses side by side inside each bucket.
    pub fn draw_histogram(ui: &mut egui::Ui, dist: &NumericDistribution) {
        let bucket_width = dist
            .buckets
            .first()
            .map(|b| b.upper - b.lower)
            .filter(|w| *w > 0.0)
            .unwrap_or(1.0);
        let bar_width = bucket_width * 0.45;

        let mut not_canceled = Vec::with_capacity(dist.buckets.len());
        let mut canceled = Vec::with_capacity(dist.buckets.len());
        for bucket in &dist.buckets {
            let center = bucket.lower + bucket_width / 2.0;
            not_canceled.push(
                Bar::new(center - bar_width / 2.0, bucket.not_canceled as f64).width(bar_width),
            );
            canceled.push(Bar::new(center + bar_width / 2.0, bucket.canceled as f64).width(bar_width));
        }

        Plot::new(format!("histogram_{}", dist.feature))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(dist.feature.column())
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(not_canceled)
                        .name(Status::NotCanceled.label())
                        .color(color32(palette::status_color(Status::NotCanceled))),
                );
                plot_ui.bar_chart(
                    BarChart::new(canceled)
                        .name(Status::Canceled.label())
                        .color(color32(palette::status_color(Status::Canceled))),
                );
            });
    }

    /// Box plot of the feature per cancellation status.
    pub fn draw_boxplot(ui: &mut egui::Ui, dist: &NumericDistribution) {
        let groups: [(Status, &Option<BoxSummary>); 2] = [
            (Status::NotCanceled, &dist.not_canceled),
            (Status::Canceled, &dist.canceled),
        ];
        let labels: Vec<String> = groups.iter().map(|(s, _)| s.label().to_string()).collect();

        Plot::new(format!("boxplot_{}", dist.feature))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("is_canceled")
            .y_axis_label(dist.feature.column())
            .x_axis_formatter(category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, (status, summary)) in groups.iter().enumerate() {
                    let Some(summary) = summary else {
                        continue;
                    };
                    let color = color32(palette::status_color(*status));
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            summary.lower_whisker,
                            summary.q1,
                            summary.median,
                            summary.q3,
                            summary.upper_whisker,
                        ),
                    )
                    .name(status.label())
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(status.label()));
                }
            });
    }

    /// Stacked percentage bars per category with a 50 % reference line.
    pub fn draw_category_ratio(ui: &mut egui::Ui, breakdown: &CategoryBreakdown) {
        let labels: Vec<String> = breakdown
            .categories
            .iter()
            .map(|c| c.category.clone())
            .collect();

        let not_canceled = BarChart::new(
            breakdown
                .categories
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    Bar::new(i as f64, c.not_canceled_pct)
                        .name(format!("{:.1}%", c.not_canceled_pct))
                        .width(0.6)
                })
                .collect(),
        )
        .name(Status::NotCanceled.label())
        .color(color32(palette::status_color(Status::NotCanceled)));

        let canceled = BarChart::new(
            breakdown
                .categories
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    Bar::new(i as f64, c.canceled_pct)
                        .name(format!("{:.1}%", c.canceled_pct))
                        .width(0.6)
                })
                .collect(),
        )
        .name(Status::Canceled.label())
        .color(color32(palette::status_color(Status::Canceled)))
        .stack_on(&[&not_canceled]);

        Plot::new(format!("category_{}", breakdown.feature))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .include_y(0.0)
            .include_y(100.0)
            .x_axis_label(breakdown.feature.column())
            .y_axis_label("Percentage (%)")
            .x_axis_formatter(category_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(not_canceled);
                plot_ui.bar_chart(canceled);
                plot_ui.hline(
                    HLine::new(50.0)
                        .color(Color32::BLACK)
                        .style(LineStyle::Dashed { length: 8.0 }),
                );
            });
    }

    /// Cancellation percentage for the most frequent countries.
    pub fn draw_country_bars(ui: &mut egui::Ui, countries: &[CountryCancellation]) {
        let max_pct = countries
            .iter()
            .map(|c| c.cancel_pct)
            .filter(|p| !p.is_nan())
            .fold(0.0, f64::max);
        let labels: Vec<String> = countries.iter().map(|c| c.country.clone()).collect();

        let bars = countries
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.cancel_pct)
                    .name(format!("{} ({} bookings)", c.country, c.bookings))
                    .fill(color32(palette::country_color(c.cancel_pct, max_pct)))
                    .width(0.7)
            })
            .collect();

        Plot::new("country_bars")
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("country")
            .y_axis_label("Percent Cancel")
            .x_axis_formatter(category_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Percent Cancel"));
            });
    }

    /// Annotated correlation heatmap painted cell by cell.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        let n = matrix.len();
        let range = matrix.value_range();
        let size = egui::vec2(
            HEATMAP_LABEL_WIDTH + n as f32 * HEATMAP_CELL,
            n as f32 * HEATMAP_CELL + HEATMAP_LABEL_WIDTH,
        );

        egui::ScrollArea::both().show(ui, |ui| {
            let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
            let painter = ui.painter_at(rect);
            let origin = rect.min + egui::vec2(HEATMAP_LABEL_WIDTH, 0.0);
            let text_color = ui.visuals().text_color();

            for (i, row) in matrix.values.iter().enumerate() {
                painter.text(
                    origin + egui::vec2(-6.0, (i as f32 + 0.5) * HEATMAP_CELL),
                    Align2::RIGHT_CENTER,
                    &matrix.columns[i],
                    FontId::proportional(12.0),
                    text_color,
                );

                for (j, &value) in row.iter().enumerate() {
                    let cell = egui::Rect::from_min_size(
                        origin + egui::vec2(j as f32 * HEATMAP_CELL, i as f32 * HEATMAP_CELL),
                        egui::vec2(HEATMAP_CELL, HEATMAP_CELL),
                    );
                    let fill = palette::heat_color(value, range);
                    painter.rect_filled(cell.shrink(0.5), 0.0, color32(fill));

                    let label = if value.is_nan() {
                        "-".to_string()
                    } else {
                        format!("{:.2}", value)
                    };
                    painter.text(
                        cell.center(),
                        Align2::CENTER_CENTER,
                        label,
                        FontId::proportional(11.0),
                        color32(palette::text_color_on(fill)),
                    );
                }
            }

            // Column labels under the grid, truncated to the cell width
            for (j, name) in matrix.columns.iter().enumerate() {
                let pos = origin
                    + egui::vec2((j as f32 + 0.5) * HEATMAP_CELL, n as f32 * HEATMAP_CELL + 6.0);
                let short: String = name.chars().take(9).collect();
                painter.text(
                    pos,
                    Align2::CENTER_TOP,
                    short,
                    FontId::proportional(10.0),
                    text_color,
                );
            }
        });
    }

    /// Metric card, the label above a large value.
    pub fn draw_metric(ui: &mut egui::Ui, label: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(180.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(24.0).strong());
                });
            });
    }
}
