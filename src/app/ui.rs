use egui::{Color32, Context, RichText};
use std::sync::{Arc, Mutex};

use super::state::{ChartPanel, IDLE_PROMPT};
use super::App;
use crate::pipeline::{load_uploads_async, read_path};
use crate::plotting::{ChartKind, RangePreset};
use crate::types::UploadedFile;

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    collect_dropped_files(app, ctx);

    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Uploads");
        ui.separator();

        ui.label("Path to an Excel file (.xls, .xlsx):");
        ui.text_edit_singleline(&mut app.path_input);
        ui.horizontal(|ui| {
            if ui.button("Add").clicked() && !app.path_input.trim().is_empty() {
                let path = std::mem::take(&mut app.path_input);
                if let Err(e) = app.add_path(&path) {
                    app.upload_failed(&e);
                }
            }
            if ui.button("Clear").clicked() {
                app.clear_uploads();
            }
        });
        ui.label("Or drop files onto the window.");
        if let Some(message) = &app.upload_error {
            ui.label(RichText::new(message).color(Color32::LIGHT_RED));
        }

        ui.separator();
        let mut removed = None;
        for (index, file) in app.uploads.iter().enumerate() {
            ui.horizontal(|ui| {
                if ui.small_button("x").clicked() {
                    removed = Some(index);
                }
                ui.label(file.name.as_str());
            });
        }
        if let Some(index) = removed {
            app.remove_upload(index);
        }

        if let Some(data) = &app.data {
            ui.separator();
            ui.label(format!("Rows after duplicate removal: {}", data.ingested_rows));
            ui.label(format!("Rows after status resolution: {}", data.resolved_rows));
            ui.label(format!("Tickets logged: {}", data.logged.total()));
            ui.label(format!("Tickets resolved: {}", data.resolved.total()));
            if let Some(secs) = app.last_analysis_time {
                ui.label(format!("Last run: {:.2}s", secs));
            }
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Ticket Data Analysis");
        ui.separator();

        if app.is_analyzing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Analyzing... Please wait.");
            });
        }

        if let Some(message) = &app.error_message {
            ui.label(RichText::new(message).color(Color32::LIGHT_RED));
            return;
        }

        if app.uploads.is_empty() {
            ui.label(IDLE_PROMPT);
            return;
        }
        if app.data.is_none() {
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for chart in &mut app.charts {
                draw_chart_panel(ui, chart);
                ui.add_space(12.0);
            }
        });
    });

    if app.needs_analysis && !app.is_analyzing {
        start_analysis(app, ctx, app_arc);
    }

    refresh_textures(app, ctx);
}

fn draw_chart_panel(ui: &mut egui::Ui, chart: &mut ChartPanel) {
    ui.heading(chart.kind.heading());

    ui.horizontal(|ui| {
        for preset in RangePreset::PRESETS {
            if ui.button(preset.label()).clicked() {
                chart.apply_preset(preset);
            }
        }
    });

    match &chart.texture {
        Some(texture) => {
            ui.image(texture);
        }
        None if chart.slider.is_none() => {
            ui.label("No dated tickets to show.");
        }
        None => {}
    }

    let Some(slider) = chart.slider.as_mut() else {
        return;
    };
    let extent_start = slider.extent().start;
    let format_offset = move |offset: f64| {
        (extent_start + chrono::Duration::days(offset.round() as i64))
            .format("%Y-%m-%d")
            .to_string()
    };

    let (mut start, mut end) = slider.offsets();
    let max = slider.max_offset();
    let id = match chart.kind {
        ChartKind::Bar => "bar",
        ChartKind::Line => "line",
    };
    let start_changed = ui
        .push_id((id, "from"), |ui| {
            ui.add(
                egui::Slider::new(&mut start, 0..=max)
                    .text("From")
                    .custom_formatter(|n, _| format_offset(n)),
            )
            .changed()
        })
        .inner;
    let end_changed = ui
        .push_id((id, "to"), |ui| {
            ui.add(
                egui::Slider::new(&mut end, 0..=max)
                    .text("To")
                    .custom_formatter(|n, _| format_offset(n)),
            )
            .changed()
        })
        .inner;

    if start_changed {
        slider.set_start_offset(start);
    }
    if end_changed {
        slider.set_end_offset(end);
    }
    if start_changed || end_changed {
        chart.update_needed = true;
    }
}

fn collect_dropped_files(app: &mut App, ctx: &Context) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    for file in dropped {
        if let Some(bytes) = file.bytes {
            let name = if file.name.is_empty() {
                "upload".to_string()
            } else {
                file.name
            };
            app.add_upload(UploadedFile::new(name, bytes));
        } else if let Some(path) = file.path {
            match read_path(&path) {
                Ok(upload) => app.add_upload(upload),
                Err(e) => app.upload_failed(&e),
            }
        }
    }
}

/// Start a pipeline run for the current upload set. A cached parse is used
/// directly; otherwise the files are parsed on the blocking pool.
fn start_analysis(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    app.reset();
    if app.uploads.is_empty() {
        app.needs_analysis = false;
        return;
    }

    app.begin_analysis();
    let fingerprint = app.fingerprint();
    if let Some(table) = app.ingest_cache.get(&fingerprint) {
        log::debug!("Reusing parsed uploads {:016x}", fingerprint.digest());
        app.is_analyzing = false;
        app.apply_table(&table);
        return;
    }

    let files = app.uploads.clone();
    let sheet = app.config.sheet_name.clone();
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let result = load_uploads_async(files, sheet).await;
        match app_arc.lock() {
            Ok(mut app) => app.finish_load(fingerprint, result),
            Err(_) => log::error!("Failed to acquire app lock after loading uploads"),
        }
        ctx.request_repaint();
    });
}

fn refresh_textures(app: &mut App, ctx: &Context) {
    let Some(data) = app.data.as_ref() else {
        return;
    };

    for chart in &mut app.charts {
        if !chart.update_needed {
            continue;
        }
        chart.update_needed = false;

        let Some(window) = chart.window() else {
            continue;
        };
        match app.plot_cache.get_or_render(
            chart.kind,
            data,
            window,
            &app.chart_style,
            &app.chart_theme,
        ) {
            Ok(image) => {
                let size = [image.width as usize, image.height as usize];
                let texture = ctx.load_texture(
                    format!("{:?}_chart", chart.kind),
                    egui::ColorImage::from_rgb(size, &image.pixels),
                    egui::TextureOptions::LINEAR,
                );
                chart.texture = Some(texture);
            }
            Err(e) => {
                log::error!("Plotting error: {}", e);
            }
        }
    }
}
