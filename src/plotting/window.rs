use chrono::{Datelike, Months, NaiveDate};

/// Preset date windows offered above each chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangePreset {
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    All,
}

impl RangePreset {
    pub const PRESETS: [RangePreset; 6] = [
        RangePreset::OneMonth,
        RangePreset::ThreeMonths,
        RangePreset::SixMonths,
        RangePreset::YearToDate,
        RangePreset::OneYear,
        RangePreset::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::OneMonth => "1m",
            RangePreset::ThreeMonths => "3m",
            RangePreset::SixMonths => "6m",
            RangePreset::YearToDate => "YTD",
            RangePreset::OneYear => "1y",
            RangePreset::All => "all",
        }
    }

    /// Window this preset selects over data spanning `extent`. Backward
    /// presets count calendar months back from the last date; YTD starts on
    /// January 1st of the last date's year. The result never leaves `extent`.
    pub fn window(&self, extent: DateWindow) -> DateWindow {
        let end = extent.end;
        let back = |months: u32| end.checked_sub_months(Months::new(months));
        let start = match self {
            RangePreset::OneMonth => back(1),
            RangePreset::ThreeMonths => back(3),
            RangePreset::SixMonths => back(6),
            RangePreset::OneYear => back(12),
            RangePreset::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1),
            RangePreset::All => Some(extent.start),
        }
        .unwrap_or(extent.start);

        DateWindow::new(start.max(extent.start), end)
    }
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Build a window, swapping the bounds if given in reverse
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// State of the range slider under a chart: the full data extent and the
/// currently visible window within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSlider {
    extent: DateWindow,
    window: DateWindow,
}

impl RangeSlider {
    /// A slider over `extent` showing everything
    pub fn new(extent: DateWindow) -> Self {
        Self {
            extent,
            window: extent,
        }
    }

    pub fn extent(&self) -> DateWindow {
        self.extent
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Largest offset a handle can take, in days from the extent start
    pub fn max_offset(&self) -> i64 {
        self.extent.days() - 1
    }

    /// Handle positions as day offsets from the extent start
    pub fn offsets(&self) -> (i64, i64) {
        (
            (self.window.start - self.extent.start).num_days(),
            (self.window.end - self.extent.start).num_days(),
        )
    }

    /// Move the start handle. It is clamped to the extent and never passes
    /// the end handle.
    pub fn set_start_offset(&mut self, offset: i64) {
        let (_, end) = self.offsets();
        self.window.start = self.date_at(offset.clamp(0, end));
    }

    /// Move the end handle. It is clamped to the extent and never passes
    /// the start handle.
    pub fn set_end_offset(&mut self, offset: i64) {
        let (start, _) = self.offsets();
        self.window.end = self.date_at(offset.clamp(start, self.max_offset()));
    }

    pub fn apply_preset(&mut self, preset: RangePreset) {
        self.window = preset.window(self.extent);
    }

    /// Keep the current window when the data changes, clamped to the new
    /// extent. Falls back to the whole extent if the windows do not overlap.
    pub fn rebase(&mut self, extent: DateWindow) {
        let start = self.window.start.max(extent.start);
        let end = self.window.end.min(extent.end);
        self.extent = extent;
        self.window = if start <= end {
            DateWindow::new(start, end)
        } else {
            extent
        };
    }

    fn date_at(&self, offset: i64) -> NaiveDate {
        self.extent.start + chrono::Duration::days(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn extent() -> DateWindow {
        DateWindow::new(date(2023, 3, 15), date(2024, 5, 31))
    }

    #[test]
    fn test_backward_presets() {
        assert_eq!(
            RangePreset::OneMonth.window(extent()),
            DateWindow::new(date(2024, 4, 30), date(2024, 5, 31))
        );
        assert_eq!(
            RangePreset::ThreeMonths.window(extent()).start,
            date(2024, 2, 29)
        );
        assert_eq!(RangePreset::SixMonths.window(extent()).start, date(2023, 11, 30));
        assert_eq!(RangePreset::OneYear.window(extent()).start, date(2023, 5, 31));
    }

    #[test]
    fn test_year_to_date() {
        assert_eq!(
            RangePreset::YearToDate.window(extent()),
            DateWindow::new(date(2024, 1, 1), date(2024, 5, 31))
        );
    }

    #[test]
    fn test_presets_clamped_to_extent() {
        let short = DateWindow::new(date(2024, 5, 20), date(2024, 5, 31));
        for preset in RangePreset::PRESETS {
            assert_eq!(preset.window(short), short, "{}", preset.label());
        }
        assert_eq!(RangePreset::All.window(extent()), extent());
    }

    #[test]
    fn test_window_normalizes_bounds() {
        let window = DateWindow::new(date(2024, 1, 10), date(2024, 1, 1));
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.days(), 10);
        assert!(window.contains(date(2024, 1, 10)));
        assert!(!window.contains(date(2024, 1, 11)));
    }

    #[test]
    fn test_slider_handles_cannot_cross() {
        let mut slider = RangeSlider::new(DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)));
        assert_eq!(slider.offsets(), (0, 30));

        slider.set_start_offset(10);
        slider.set_end_offset(5);
        assert_eq!(slider.offsets(), (10, 10));

        slider.set_end_offset(100);
        slider.set_start_offset(-4);
        assert_eq!(slider.window(), DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_slider_preset_and_rebase() {
        let mut slider = RangeSlider::new(extent());
        slider.apply_preset(RangePreset::OneMonth);
        assert_eq!(slider.window().start, date(2024, 4, 30));

        slider.rebase(DateWindow::new(date(2024, 5, 1), date(2024, 8, 1)));
        assert_eq!(slider.window(), DateWindow::new(date(2024, 5, 1), date(2024, 5, 31)));

        slider.rebase(DateWindow::new(date(2025, 1, 1), date(2025, 2, 1)));
        assert_eq!(slider.window(), slider.extent());
    }
}
