use eframe::App as EApp;
use egui::TextureHandle;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::pipeline::{build_dashboard, read_path, IngestCache};
use crate::plotting::{ChartKind, ChartStyle, ChartTheme, DateWindow, PlotCache, RangePreset, RangeSlider};
use crate::types::{DashboardData, TicketTable, UploadFingerprint, UploadedFile};

/// Shown while nothing has been uploaded
pub const IDLE_PROMPT: &str = "Please upload one or more Excel files to analyze.";

/// One chart on the page with its own range selector and slider
pub struct ChartPanel {
    pub kind: ChartKind,
    pub slider: Option<RangeSlider>,
    pub texture: Option<TextureHandle>,
    pub update_needed: bool,
}

impl ChartPanel {
    fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            slider: None,
            texture: None,
            update_needed: false,
        }
    }

    pub fn window(&self) -> Option<DateWindow> {
        self.slider.as_ref().map(|s| s.window())
    }

    pub fn apply_preset(&mut self, preset: RangePreset) {
        if let Some(slider) = self.slider.as_mut() {
            slider.apply_preset(preset);
            self.update_needed = true;
        }
    }

    fn reset(&mut self) {
        self.slider = None;
        self.texture = None;
        self.update_needed = false;
    }
}

/// Main application state
pub struct App {
    pub config: DashboardConfig,
    pub uploads: Vec<UploadedFile>,
    pub path_input: String,
    pub data: Option<DashboardData>,
    pub charts: Vec<ChartPanel>,
    pub ingest_cache: IngestCache,
    pub plot_cache: PlotCache,
    pub chart_style: ChartStyle,
    pub chart_theme: ChartTheme,
    /// Set whenever the upload set changes; the UI starts a run on the next frame
    pub needs_analysis: bool,
    pub is_analyzing: bool,
    pub last_analysis_time: Option<f64>,
    pub error_message: Option<String>,
    /// Last file that could not be added; shown beside the upload list
    pub upload_error: Option<String>,
    analysis_started: Option<Instant>,
}

impl App {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            ingest_cache: IngestCache::new(config.ingest_cache_capacity),
            plot_cache: PlotCache::default(),
            chart_style: ChartStyle::with_size(config.chart_width, config.chart_height),
            chart_theme: ChartTheme::default(),
            config,
            uploads: Vec::new(),
            path_input: String::new(),
            data: None,
            charts: vec![ChartPanel::new(ChartKind::Bar), ChartPanel::new(ChartKind::Line)],
            needs_analysis: false,
            is_analyzing: false,
            last_analysis_time: None,
            error_message: None,
            upload_error: None,
            analysis_started: None,
        }
    }

    /// Add an upload to the end of the set
    pub fn add_upload(&mut self, file: UploadedFile) {
        log::info!("Added upload {} ({} bytes)", file.name, file.bytes.len());
        self.uploads.push(file);
        self.upload_error = None;
        self.needs_analysis = true;
    }

    /// Read a file from disk and add it as an upload
    pub fn add_path(&mut self, path: &str) -> Result<()> {
        let file = read_path(std::path::Path::new(path.trim()))?;
        self.add_upload(file);
        Ok(())
    }

    pub fn remove_upload(&mut self, index: usize) {
        if index < self.uploads.len() {
            let removed = self.uploads.remove(index);
            log::info!("Removed upload {}", removed.name);
            self.needs_analysis = true;
        }
    }

    pub fn clear_uploads(&mut self) {
        self.uploads.clear();
        self.upload_error = None;
        self.needs_analysis = true;
    }

    pub fn fingerprint(&self) -> UploadFingerprint {
        UploadFingerprint::of(&self.uploads)
    }

    /// Drop all results and go back to the upload prompt
    pub fn reset(&mut self) {
        self.data = None;
        self.error_message = None;
        for chart in &mut self.charts {
            chart.reset();
        }
    }

    /// Note that a load of the current upload set is starting
    pub fn begin_analysis(&mut self) {
        self.needs_analysis = false;
        self.is_analyzing = true;
        self.analysis_started = Some(Instant::now());
    }

    /// Take the outcome of loading the upload set identified by
    /// `fingerprint`. The parsed table is cached either way; results for an
    /// upload set that has since changed are not shown.
    pub fn finish_load(&mut self, fingerprint: UploadFingerprint, result: Result<TicketTable>) {
        self.is_analyzing = false;
        let current = fingerprint == self.fingerprint();

        match result {
            Ok(table) => {
                let table = Arc::new(table);
                self.ingest_cache.store(fingerprint, Arc::clone(&table));
                if current {
                    self.apply_table(&table);
                }
            }
            Err(e) if current => self.set_error(&e),
            Err(e) => log::debug!("Ignoring failure for a superseded upload set: {}", e),
        }
    }

    /// Run status resolution and counting over a loaded table and show it
    pub fn apply_table(&mut self, table: &TicketTable) {
        match build_dashboard(table, &self.config) {
            Ok(data) => self.update_with_result(data),
            Err(e) => self.set_error(&e),
        }
        if let Some(started) = self.analysis_started.take() {
            self.last_analysis_time = Some(started.elapsed().as_secs_f64());
        }
    }

    /// Update the app state with new pipeline results
    pub fn update_with_result(&mut self, data: DashboardData) {
        let extent = data
            .date_extent()
            .map(|(start, end)| DateWindow::new(start, end));

        for chart in &mut self.charts {
            chart.slider = match (chart.slider, extent) {
                (Some(mut slider), Some(extent)) => {
                    slider.rebase(extent);
                    Some(slider)
                }
                (None, Some(extent)) => Some(RangeSlider::new(extent)),
                (_, None) => None,
            };
            chart.texture = None;
            chart.update_needed = true;
        }

        self.error_message = None;
        self.data = Some(data);
    }

    /// Record a file that could not be added. The current upload set and its
    /// charts are left as they are.
    pub fn upload_failed(&mut self, error: &DashboardError) {
        log::warn!("{}", error);
        self.upload_error = Some(error.to_string());
    }

    /// Show an error in place of the charts
    pub fn set_error(&mut self, error: &DashboardError) {
        log::error!("{}", error);
        self.reset();
        self.error_message = Some(error.to_string());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx, Arc::clone(&self.app));
        } else {
            log::error!("Failed to acquire app lock in update");
        }
    }
}
