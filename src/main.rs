//! Ticket Dashboard
//!
//! A GUI application charting support tickets logged and resolved per day
//! from spreadsheet exports. Files given on the command line are loaded at
//! startup.

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

use ticketdash::app::{App, AppWrapper};
use ticketdash::config::DashboardConfig;

#[cfg(feature = "dev")]
const DEFAULT_LOG_LEVEL: &str = "debug";
#[cfg(not(feature = "dev"))]
const DEFAULT_LOG_LEVEL: &str = "info";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL))
        .init();

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        log::error!("{}; using default settings", e);
        DashboardConfig::default()
    });

    let mut app = App::new(config);
    for path in std::env::args().skip(1) {
        if let Err(e) = app.add_path(&path) {
            app.upload_failed(&e);
        }
    }

    // Initialize the Tokio runtime
    let rt = Runtime::new().context("failed to start the Tokio runtime")?;
    rt.block_on(async {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 900.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("Ticket Data Analysis"),
            ..Default::default()
        };

        let app = Arc::new(Mutex::new(app));
        eframe::run_native(
            "Ticket Data Analysis",
            options,
            Box::new(|_cc| Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)),
        )
        .map_err(|e| anyhow!("error running application: {}", e))
    })
}
