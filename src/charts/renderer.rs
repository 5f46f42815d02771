//! Static Chart Renderer
//! Draws the analysis charts to PNG files with plotters, for headless export.
//!
//! Layout of every image: centered title, plot area with axis labels, legend
//! in the upper right where the chart has more than one series.

use crate::charts::palette::{self, Rgb};
use crate::data::Status;
use crate::stats::{
    BoxSummary, CategoryBreakdown, CorrelationMatrix, CountryCancellation, NumericDistribution,
    TargetSummary,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const HEATMAP_SIZE: u32 = 1100;
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Draw(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// One bar per category; `colors[i]` fills bar `i`.
struct BarSeries {
    name: String,
    values: Vec<f64>,
    colors: Vec<RGBColor>,
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_target(summary: &TargetSummary, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        let series = [BarSeries {
            name: "Bookings".to_string(),
            values: vec![summary.not_canceled as f64, summary.canceled as f64],
            colors: vec![
                rgb(palette::status_color(Status::NotCanceled)),
                rgb(palette::status_color(Status::Canceled)),
            ],
        }];
        let labels = ["Not Cancel (0)".to_string(), "Cancel (1)".to_string()];
        Self::draw_bars(&root, "Booking Count by Status", &labels, &series, false, "Bookings", None)?;
        root.present()?;
        Ok(())
    }

    pub fn render_category_ratio(breakdown: &CategoryBreakdown, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        let labels: Vec<String> = breakdown.categories.iter().map(|c| c.category.clone()).collect();
        let n = labels.len();
        let series = [
            BarSeries {
                name: Status::NotCanceled.label().to_string(),
                values: breakdown.categories.iter().map(|c| c.not_canceled_pct).collect(),
                colors: vec![rgb(palette::status_color(Status::NotCanceled)); n],
            },
            BarSeries {
                name: Status::Canceled.label().to_string(),
                values: breakdown.categories.iter().map(|c| c.canceled_pct).collect(),
                colors: vec![rgb(palette::status_color(Status::Canceled)); n],
            },
        ];
        let title = format!("Cancel Ratio by {}", breakdown.feature);
        Self::draw_bars(&root, &title, &labels, &series, true, "Percentage (%)", Some(50.0))?;
        root.present()?;
        Ok(())
    }

    pub fn render_countries(countries: &[CountryCancellation], path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        let max_pct = countries
            .iter()
            .map(|c| c.cancel_pct)
            .filter(|p| !p.is_nan())
            .fold(0.0, f64::max);
        let series = [BarSeries {
            name: "Percent Cancel".to_string(),
            values: countries.iter().map(|c| c.cancel_pct).collect(),
            colors: countries
                .iter()
                .map(|c| rgb(palette::country_color(c.cancel_pct, max_pct)))
                .collect(),
        }];
        let labels: Vec<String> = countries.iter().map(|c| c.country.clone()).collect();
        Self::draw_bars(
            &root,
            "Cancel Percentage in Top Countries",
            &labels,
            &series,
            false,
            "Percent Cancel",
            None,
        )?;
        root.present()?;
        Ok(())
    }

    pub fn render_histogram(dist: &NumericDistribution, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let bucket_width = dist
            .buckets
            .first()
            .map(|b| b.upper - b.lower)
            .filter(|w| *w > 0.0)
            .unwrap_or(1.0);
        let x_min = dist.buckets.first().map(|b| b.lower).unwrap_or(0.0);
        let x_max = x_min + bucket_width * dist.buckets.len().max(1) as f64;
        let y_max = dist
            .buckets
            .iter()
            .map(|b| b.canceled.max(b.not_canceled))
            .max()
            .unwrap_or(0) as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Distribution of {}", dist.feature), (FONT, 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..(y_max * 1.1).max(1.0))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(dist.feature.column())
            .y_desc("Count")
            .label_style((FONT, 13))
            .draw()?;

        let half = bucket_width / 2.0;
        for (offset, status) in [(0.0, Status::NotCanceled), (half, Status::Canceled)] {
            let color = rgb(palette::status_color(status));
            chart
                .draw_series(dist.buckets.iter().map(|b| {
                    let count = match status {
                        Status::NotCanceled => b.not_canceled,
                        Status::Canceled => b.canceled,
                    } as f64;
                    let left = b.lower + offset;
                    Rectangle::new([(left, 0.0), (left + half * 0.95, count)], color.filled())
                }))?
                .label(status.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        Self::draw_legend(&mut chart)?;
        root.present()?;
        Ok(())
    }

    pub fn render_boxplot(dist: &NumericDistribution, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let groups: [(Status, &Option<BoxSummary>); 2] = [
            (Status::NotCanceled, &dist.not_canceled),
            (Status::Canceled, &dist.canceled),
        ];
        let (y_min, y_max) = groups
            .iter()
            .filter_map(|(_, s)| s.as_ref())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.lower_whisker), hi.max(s.upper_whisker))
            });
        let (y_min, y_max) = Self::padded_range(y_min, y_max);

        let labels: Vec<String> = groups.iter().map(|(s, _)| s.label().to_string()).collect();
        let formatter = Self::category_formatter(&labels);

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Boxplot of {}", dist.feature), (FONT, 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..1.5f64, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(3)
            .x_label_formatter(&formatter)
            .x_desc("is_canceled")
            .y_desc(dist.feature.column())
            .label_style((FONT, 13))
            .draw()?;

        for (i, (status, summary)) in groups.iter().enumerate() {
            let Some(s) = summary else {
                continue;
            };
            let color = rgb(palette::status_color(*status));
            let x = i as f64;
            let (l, r) = (x - 0.25, x + 0.25);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(l, s.q1), (r, s.q3)],
                color.mix(0.4).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(l, s.q1), (r, s.q3)],
                color.stroke_width(2),
            )))?;

            let lines = [
                vec![(l, s.median), (r, s.median)],
                vec![(x, s.q3), (x, s.upper_whisker)],
                vec![(x, s.q1), (x, s.lower_whisker)],
                vec![(x - 0.1, s.upper_whisker), (x + 0.1, s.upper_whisker)],
                vec![(x - 0.1, s.lower_whisker), (x + 0.1, s.lower_whisker)],
            ];
            chart.draw_series(
                lines
                    .into_iter()
                    .map(|points| PathElement::new(points, color.stroke_width(2))),
            )?;
        }

        root.present()?;
        Ok(())
    }

    pub fn render_heatmap(matrix: &CorrelationMatrix, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (HEATMAP_SIZE, HEATMAP_SIZE)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = matrix.len();
        let range = matrix.value_range();
        let top = n as f64 - 0.5;
        let labels = matrix.columns.clone();
        let x_formatter = Self::category_formatter(&labels);
        // Row 0 is drawn at the top
        let reversed: Vec<String> = labels.iter().rev().cloned().collect();
        let y_formatter = Self::category_formatter(&reversed);

        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Heatmap", (FONT, 24))
            .margin(20)
            .x_label_area_size(160)
            .y_label_area_size(200)
            .build_cartesian_2d(-0.5f64..top, -0.5f64..top)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n + 1)
            .y_labels(n + 1)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
            .label_style((FONT, 12))
            .draw()?;

        let cells = matrix.values.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &r)| (i, j, r))
        });

        for (i, j, r) in cells {
            let x = j as f64;
            let y = (n - 1 - i) as f64;
            let fill = palette::heat_color(r, range);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                rgb(fill).filled(),
            )))?;

            let text = if r.is_nan() { "-".to_string() } else { format!("{:.2}", r) };
            let style = (FONT, 11)
                .into_font()
                .color(&rgb(palette::text_color_on(fill)))
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(std::iter::once(Text::new(text, (x, y), style)))?;
        }

        root.present()?;
        Ok(())
    }

    /// Vertical bar chart over categories, grouped side by side or stacked.
    fn draw_bars(
        root: &DrawingArea<BitMapBackend, Shift>,
        title: &str,
        labels: &[String],
        series: &[BarSeries],
        stacked: bool,
        y_desc: &str,
        reference_line: Option<f64>,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE)?;

        let n = labels.len().max(1);
        let y_max = if stacked {
            (0..n)
                .map(|i| series.iter().filter_map(|s| s.values.get(i)).sum::<f64>())
                .fold(0.0, f64::max)
        } else {
            series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .filter(|v| !v.is_nan())
                .fold(0.0, f64::max)
        };
        let formatter = Self::category_formatter(labels);

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(y_max * 1.1).max(1.0))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n + 1)
            .x_label_formatter(&formatter)
            .y_desc(y_desc)
            .label_style((FONT, 13))
            .draw()?;

        let width = if stacked { 0.7 } else { 0.8 / series.len().max(1) as f64 };
        let mut base = vec![0.0; n];

        for (k, s) in series.iter().enumerate() {
            let mut bars = Vec::with_capacity(s.values.len());
            for (i, &v) in s.values.iter().enumerate() {
                if v.is_nan() {
                    continue;
                }
                let color = s.colors.get(i).copied().unwrap_or(BLACK);
                let (left, bottom) = if stacked {
                    (i as f64 - width / 2.0, base[i])
                } else {
                    (i as f64 - 0.4 + k as f64 * width, 0.0)
                };
                bars.push(Rectangle::new(
                    [(left, bottom), (left + width, bottom + v)],
                    color.filled(),
                ));
                if stacked {
                    base[i] += v;
                }
            }

            let legend_color = s.colors.first().copied().unwrap_or(BLACK);
            chart
                .draw_series(bars)?
                .label(s.name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], legend_color.filled())
                });
        }

        if let Some(y) = reference_line {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(-0.5, y), (n as f64 - 0.5, y)],
                BLACK.stroke_width(1),
            )))?;
        }

        if series.len() > 1 {
            Self::draw_legend(&mut chart)?;
        }
        Ok(())
    }

    fn draw_legend<'a, DB: DrawingBackend + 'a>(
        chart: &mut ChartContext<'a, DB, Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 13))
            .draw()
    }

    /// Label integer positions with `labels[i]`, leave everything else blank.
    fn category_formatter(labels: &[String]) -> impl Fn(&f64) -> String + '_ {
        move |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        }
    }

    fn padded_range(min: f64, max: f64) -> (f64, f64) {
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        let pad = ((max - min) * 0.1).max(0.5);
        (min - pad, max + pad)
    }
}
