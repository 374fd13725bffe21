use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;
use tokio::task::spawn_blocking;

use crate::error::{DashboardError, Result};
use crate::types::{CellValue, TicketTable, UploadedFile};

/// Extensions accepted as uploads
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

/// Read an upload from disk.
pub fn read_path(path: &Path) -> Result<UploadedFile> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(name, bytes))
}

/// Parse the named sheet of one upload into a table. The first row is the
/// header; fully blank rows are skipped.
pub fn read_upload(file: &UploadedFile, sheet: &str) -> Result<TicketTable> {
    let supported = file
        .extension()
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
    if !supported {
        return Err(DashboardError::UnsupportedFile {
            file: file.name.clone(),
        });
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(file.bytes.clone())).map_err(
        |source| DashboardError::Workbook {
            file: file.name.clone(),
            source,
        },
    )?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(DashboardError::MissingSheet {
            file: file.name.clone(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| DashboardError::Workbook {
            file: file.name.clone(),
            source,
        })?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| DashboardError::MissingHeader {
            file: file.name.clone(),
        })?;
    let columns = header_names(header);

    let body: Vec<Vec<CellValue>> = rows
        .map(|cells| cells.iter().map(to_cell).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    log::debug!(
        "{}: read {} rows, {} columns from sheet '{}'",
        file.name,
        body.len(),
        columns.len(),
        sheet
    );

    Ok(TicketTable::new(columns, body))
}

/// Read every upload, stack the rows in upload order and drop rows that are
/// identical across all columns. Any unreadable file aborts the load.
pub fn load_uploads(files: &[UploadedFile], sheet: &str) -> Result<TicketTable> {
    let tables = files
        .iter()
        .map(|file| read_upload(file, sheet))
        .collect::<Result<Vec<_>>>()?;

    let mut table = TicketTable::concat(tables);
    let stacked = table.len();
    let removed = table.drop_duplicates();
    log::debug!(
        "Loaded {} files: {} rows, {} duplicates removed",
        files.len(),
        stacked,
        removed
    );
    Ok(table)
}

/// Run [`load_uploads`] on the blocking pool
pub async fn load_uploads_async(files: Vec<UploadedFile>, sheet: String) -> Result<TicketTable> {
    spawn_blocking(move || load_uploads(&files, &sheet))
        .await
        .map_err(|e| DashboardError::Task(e.to_string()))?
}

/// Header names as the dataframe readers produce them: blank cells become
/// `Unnamed: <index>` and repeats get a `.1`, `.2`, ... suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (index, cell) in header.iter().enumerate() {
        let base = match to_cell(cell) {
            CellValue::Empty => format!("Unnamed: {}", index),
            value => value.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }
    names
}

fn to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if !dt.is_duration() => CellValue::DateTime(value),
            _ => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}
