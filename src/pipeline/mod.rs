//! The ticket pipeline: load uploads, resolve each ticket's status history,
//! bucket timestamps by day and count.

mod cache;
pub mod dates;
pub mod ingest;
mod status;

pub use cache::IngestCache;
pub use ingest::{load_uploads, load_uploads_async, read_path, read_upload};
pub use status::resolve_statuses;

use chrono::NaiveDate;
use std::time::Instant;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::types::{DashboardData, TicketTable, UploadedFile};
use crate::utils::count_per_day;

/// Run the whole pipeline over an upload set, reusing the parsed table when
/// the same files were loaded before.
pub fn run_pipeline(
    files: &[UploadedFile],
    config: &DashboardConfig,
    cache: &mut IngestCache,
) -> Result<DashboardData> {
    let table = cache.get_or_load(files, |files| load_uploads(files, &config.sheet_name))?;
    build_dashboard(&table, config)
}

/// Run status resolution and date bucketing over a unified table.
///
/// A non-empty `Date/Time Logged` value that does not parse fails the run.
/// `Date Resolved` values that are missing or do not parse only leave the
/// row out of the resolved series.
pub fn build_dashboard(table: &TicketTable, config: &DashboardConfig) -> Result<DashboardData> {
    let start_time = Instant::now();
    let columns = &config.columns;

    let resolved = resolve_statuses(
        table,
        &columns.reference,
        &columns.status,
        &config.status_priority,
    )?;

    let logged_col = column(&resolved, &columns.logged)?;
    let resolved_col = column(&resolved, &columns.resolved)?;
    let reference_col = column(&resolved, &columns.reference)?;

    let mut rows: Vec<(Option<NaiveDate>, Option<NaiveDate>)> = Vec::with_capacity(resolved.len());
    for row in resolved.rows() {
        let logged = dates::parse_date(&row[logged_col], &config.date_formats).map_err(
            |_| DashboardError::InvalidTimestamp {
                column: columns.logged.clone(),
                reference: row[reference_col].to_string(),
                value: row[logged_col].to_string(),
            },
        )?;
        let resolved_on = dates::parse_date(&row[resolved_col], &config.date_formats)
            .ok()
            .flatten();
        rows.push((logged, resolved_on));
    }

    let logged = count_per_day(rows.iter().map(|(logged, _)| *logged));
    let resolved_series = count_per_day(rows.iter().map(|(_, resolved_on)| *resolved_on));

    log::info!(
        "Pipeline finished in {:.2}s: {} rows in, {} kept, {} logged days, {} resolved days",
        start_time.elapsed().as_secs_f64(),
        table.len(),
        resolved.len(),
        logged.points().len(),
        resolved_series.points().len()
    );

    Ok(DashboardData {
        logged,
        resolved: resolved_series,
        ingested_rows: table.len(),
        resolved_rows: resolved.len(),
    })
}

fn column(table: &TicketTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| DashboardError::MissingColumn {
            column: name.to_string(),
        })
}
