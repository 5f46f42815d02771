//! Charts module - Chart rendering

pub mod palette;
mod plotter;
mod renderer;

pub use plotter::{color32, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};
