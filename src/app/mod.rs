mod state;
mod ui;

pub use state::{App, AppWrapper, ChartPanel, IDLE_PROMPT};
pub use ui::draw_ui;
