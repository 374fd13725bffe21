//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing uploaded ticket exports, the unified ticket table and the
//! per-day count series handed to the charts.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single cell of an uploaded sheet.
///
/// Numbers compare by bit pattern so that `CellValue` can be hashed, which the
/// duplicate-row removal and the per-reference grouping rely on.
#[derive(Debug, Clone)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// A spreadsheet error cell such as `#N/A`
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => true,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::Error(a), CellValue::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Empty => {}
            CellValue::Text(s) | CellValue::Error(s) => s.hash(state),
            CellValue::Number(n) => n.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order used to sort reference groups: values of the same kind compare
/// naturally, different kinds by variant.
impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn rank(value: &CellValue) -> u8 {
            match value {
                CellValue::Number(_) => 0,
                CellValue::Bool(_) => 1,
                CellValue::DateTime(_) => 2,
                CellValue::Text(_) => 3,
                CellValue::Error(_) => 4,
                CellValue::Empty => 5,
            }
        }

        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Error(a), CellValue::Error(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) | CellValue::Error(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

/// The unified table of ticket rows built from every uploaded file.
///
/// Rows are stored positionally against `columns`; every row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TicketTable {
    /// Create a table from a header and rows. Short rows are padded with
    /// empty cells and long rows are truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Stack tables in order. The resulting columns are the union of all
    /// input columns in first-seen order; cells for columns a table lacks
    /// are left empty.
    pub fn concat(tables: Vec<TicketTable>) -> TicketTable {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let total_rows = tables.iter().map(|t| t.rows.len()).sum();
        let mut rows = Vec::with_capacity(total_rows);
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .map(|c| columns.iter().position(|u| u == c).unwrap_or_default())
                .collect();
            for row in table.rows {
                let mut unified = vec![CellValue::Empty; columns.len()];
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    unified[target] = cell;
                }
                rows.push(unified);
            }
        }

        TicketTable { columns, rows }
    }

    /// Remove rows identical across every column, keeping the first
    /// occurrence. Returns the number of rows removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = std::collections::HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Keep only the rows at the given positions, in the order given.
    pub fn select_rows(&self, indices: &[usize]) -> TicketTable {
        TicketTable {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

/// One uploaded spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadedFile {
    /// Display name, normally the file name including its extension
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// A key used for caching ingestion results based on the uploaded file set.
///
/// Two upload sets share a fingerprint when they contain the same files
/// (name and content) in the same order. Equality also compares the list of
/// file names and sizes, so two sets whose content digests collide still get
/// distinct keys unless their manifests match too.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct UploadFingerprint {
    pub(crate) digest: u64,
    pub(crate) manifest: Vec<(String, usize)>,
}

impl UploadFingerprint {
    pub fn of(files: &[UploadedFile]) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        files.len().hash(&mut hasher);
        for file in files {
            file.name.hash(&mut hasher);
            file.bytes.len().hash(&mut hasher);
            file.bytes.hash(&mut hasher);
        }
        Self {
            digest: hasher.finish(),
            manifest: files
                .iter()
                .map(|f| (f.name.clone(), f.bytes.len()))
                .collect(),
        }
    }

    /// Content digest, for logging
    pub fn digest(&self) -> u64 {
        self.digest
    }
}

/// Tickets counted per calendar day, ascending by date, one entry per date.
/// Dates with no tickets are absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CountSeries {
    points: Vec<(NaiveDate, usize)>,
}

impl CountSeries {
    /// Count occurrences of each date.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for date in dates {
            *counts.entry(date).or_insert(0) += 1;
        }
        Self {
            points: counts.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[(NaiveDate, usize)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.points.iter().map(|(_, count)| count).sum()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(date, _)| *date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(date, _)| *date)
    }

    /// Points with `start <= date <= end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> &[(NaiveDate, usize)] {
        let lo = self.points.partition_point(|(d, _)| *d < start);
        let hi = self.points.partition_point(|(d, _)| *d <= end);
        if lo >= hi {
            &[]
        } else {
            &self.points[lo..hi]
        }
    }

    /// Count on a given date, zero if absent.
    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.points
            .binary_search_by_key(&date, |(d, _)| *d)
            .map(|i| self.points[i].1)
            .unwrap_or(0)
    }
}

/// The result of running the ticket pipeline over an upload set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    /// Tickets logged per day
    pub logged: CountSeries,
    /// Tickets resolved per day
    pub resolved: CountSeries,
    /// Rows in the unified table after duplicate removal
    pub ingested_rows: usize,
    /// Rows kept by status resolution
    pub resolved_rows: usize,
}

impl DashboardData {
    /// Earliest and latest date across both series.
    pub fn date_extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        let firsts = [self.logged.first_date(), self.resolved.first_date()];
        let lasts = [self.logged.last_date(), self.resolved.last_date()];
        let start = firsts.into_iter().flatten().min()?;
        let end = lasts.into_iter().flatten().max()?;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_concat_unions_columns() {
        let a = TicketTable::new(
            vec!["Reference".into(), "Status".into()],
            vec![vec![text("T1"), text("OPEN")]],
        );
        let b = TicketTable::new(
            vec!["Status".into(), "Owner".into()],
            vec![vec![text("CLOSED"), text("amy")]],
        );

        let table = TicketTable::concat(vec![a, b]);
        assert_eq!(table.columns(), &["Reference", "Status", "Owner"]);
        assert_eq!(table.rows()[0], vec![text("T1"), text("OPEN"), CellValue::Empty]);
        assert_eq!(table.rows()[1], vec![CellValue::Empty, text("CLOSED"), text("amy")]);
    }

    #[test]
    fn test_drop_duplicates_keeps_first() {
        let mut table = TicketTable::new(
            vec!["Reference".into(), "Status".into()],
            vec![
                vec![text("T1"), text("OPEN")],
                vec![text("T1"), CellValue::Empty],
                vec![text("T1"), text("OPEN")],
                vec![text("T1"), CellValue::Empty],
            ],
        );

        assert_eq!(table.drop_duplicates(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], vec![text("T1"), CellValue::Empty]);
        assert_eq!(table.drop_duplicates(), 0);
    }

    #[test]
    fn test_number_and_text_cells_differ() {
        assert_ne!(CellValue::Number(1001.0), text("1001"));
        assert_eq!(CellValue::Number(1001.0), CellValue::Number(1001.0));
    }

    #[test]
    fn test_count_series_sorted_and_unique() {
        let series = CountSeries::from_dates(vec![
            date(2024, 1, 3),
            date(2024, 1, 1),
            date(2024, 1, 3),
        ]);
        assert_eq!(
            series.points(),
            &[(date(2024, 1, 1), 1), (date(2024, 1, 3), 2)]
        );
        assert_eq!(series.total(), 3);
        assert_eq!(series.count_on(date(2024, 1, 2)), 0);
        assert_eq!(series.between(date(2024, 1, 2), date(2024, 1, 9)).len(), 1);
        assert!(series.between(date(2024, 2, 1), date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_fingerprint_depends_on_content_and_order() {
        let a = UploadedFile::new("a.xlsx", vec![1u8, 2, 3]);
        let b = UploadedFile::new("b.xlsx", vec![4u8]);
        let changed = UploadedFile::new("a.xlsx", vec![1u8, 2, 4]);

        assert_eq!(
            UploadFingerprint::of(&[a.clone(), b.clone()]),
            UploadFingerprint::of(&[a.clone(), b.clone()])
        );
        assert_ne!(
            UploadFingerprint::of(&[a.clone(), b.clone()]),
            UploadFingerprint::of(&[b.clone(), a.clone()])
        );
        assert_ne!(UploadFingerprint::of(&[a]), UploadFingerprint::of(&[changed]));
    }

    #[test]
    fn test_fingerprint_equal_digest_different_manifest() {
        let a = UploadFingerprint::of(&[UploadedFile::new("a.xlsx", vec![1u8])]);
        let colliding = UploadFingerprint {
            digest: a.digest(),
            manifest: vec![("other.xlsx".to_string(), 40)],
        };
        assert_ne!(a, colliding);
    }

    #[test]
    fn test_date_extent_spans_both_series() {
        let data = DashboardData {
            logged: CountSeries::from_dates(vec![date(2024, 1, 5), date(2024, 1, 9)]),
            resolved: CountSeries::from_dates(vec![date(2024, 1, 2)]),
            ..Default::default()
        };
        assert_eq!(data.date_extent(), Some((date(2024, 1, 2), date(2024, 1, 9))));
        assert_eq!(DashboardData::default().date_extent(), None);
    }
}
