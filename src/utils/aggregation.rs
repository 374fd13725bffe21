use chrono::NaiveDate;

use crate::types::CountSeries;

/// Count tickets per calendar day. `None` entries (missing or unparsable
/// dates) are not counted.
pub fn count_per_day(dates: impl IntoIterator<Item = Option<NaiveDate>>) -> CountSeries {
    CountSeries::from_dates(dates.into_iter().flatten())
}

/// Line the two series up for side-by-side drawing: one entry per date in
/// `[start, end]` that appears in either series, with zero where a series
/// has no entry for that date.
pub fn align_series(
    logged: &CountSeries,
    resolved: &CountSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(NaiveDate, usize, usize)> {
    let mut a = logged.between(start, end).iter().peekable();
    let mut b = resolved.between(start, end).iter().peekable();
    let mut aligned = Vec::new();

    loop {
        let entry = match (a.peek(), b.peek()) {
            (Some(&&(da, ca)), Some(&&(db, cb))) => {
                if da == db {
                    a.next();
                    b.next();
                    (da, ca, cb)
                } else if da < db {
                    a.next();
                    (da, ca, 0)
                } else {
                    b.next();
                    (db, 0, cb)
                }
            }
            (Some(&&(da, ca)), None) => {
                a.next();
                (da, ca, 0)
            }
            (None, Some(&&(db, cb))) => {
                b.next();
                (db, 0, cb)
            }
            (None, None) => break,
        };
        aligned.push(entry);
    }

    aligned
}
