use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use ticketdash::UploadedFile;

/// A cell written into a fixture workbook
#[allow(dead_code)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    /// A native spreadsheet date-time, given as `yyyy-mm-dd hh:mm:ss`
    DateTime(&'a str),
    Blank,
}

pub const HEADER: [&str; 5] = [
    "Reference",
    "Status",
    "Date/Time Logged",
    "Date Resolved",
    "Summary",
];

/// Build an in-memory `.xlsx` with one sheet holding `header` and `rows`.
pub fn workbook(sheet: &str, header: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();

    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, col, *s).unwrap();
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, col, *n).unwrap();
                }
                Cell::DateTime(s) => {
                    let datetime = ExcelDateTime::parse_from_str(s).unwrap();
                    worksheet
                        .write_datetime_with_format(r, col, &datetime, &date_format)
                        .unwrap();
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// A standard ticket export upload on the `-` sheet
pub fn ticket_upload(name: &str, rows: &[Vec<Cell>]) -> UploadedFile {
    UploadedFile::new(name, workbook("-", &HEADER, rows))
}

/// One ticket row: reference, status, logged, resolved, summary
pub fn ticket<'a>(
    reference: &'a str,
    status: &'a str,
    logged: &'a str,
    resolved: Option<&'a str>,
) -> Vec<Cell<'a>> {
    vec![
        Cell::Text(reference),
        Cell::Text(status),
        Cell::Text(logged),
        resolved.map(Cell::Text).unwrap_or(Cell::Blank),
        Cell::Text("printer on fire"),
    ]
}
