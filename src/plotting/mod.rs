//! Chart rendering for the dashboard: the date window model behind the range
//! selector and slider, chart styling, and the bar and line charts.

mod chart;
mod styles;
mod window;


pub use chart::{render_chart, ChartKind, PlotCache, RenderedChart};
pub use styles::{ChartStyle, ChartTheme};
pub use window::{DateWindow, RangePreset, RangeSlider};
