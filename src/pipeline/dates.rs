use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::types::CellValue;

/// A cell holds a value that is not a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unparsable;

/// Parse a timestamp cell.
///
/// Returns `Ok(None)` for an empty cell and `Err(Unparsable)` for a value
/// that is present but not a timestamp. Numbers are spreadsheet serial dates
/// (days since 1899-12-30, fraction = time of day).
pub fn parse_timestamp(
    cell: &CellValue,
    formats: &[String],
) -> Result<Option<NaiveDateTime>, Unparsable> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::DateTime(dt) => Ok(Some(*dt)),
        CellValue::Number(serial) => from_serial(*serial).map(Some).ok_or(Unparsable),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_text(trimmed, formats).map(Some).ok_or(Unparsable)
        }
        CellValue::Bool(_) | CellValue::Error(_) => Err(Unparsable),
    }
}

/// Calendar date of a timestamp cell, time of day discarded.
pub fn parse_date(cell: &CellValue, formats: &[String]) -> Result<Option<NaiveDate>, Unparsable> {
    parse_timestamp(cell, formats).map(|dt| dt.map(|dt| dt.date()))
}

fn parse_text(s: &str, formats: &[String]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(s, format).ok().or_else(|| {
            NaiveDate::parse_from_str(s, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}

fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    // Serials before 1900-03-01 are shifted by the 1900 leap-year bug; the
    // exports this reads never go back that far.
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
