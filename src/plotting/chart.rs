use chrono::NaiveDate;
use lru::LruCache;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::styles::{ChartStyle, ChartTheme};
use super::window::DateWindow;
use crate::error::DashboardError;
use crate::types::DashboardData;
use crate::utils::align_series;

type PlotError = Box<dyn Error + Send + Sync>;

type TicketChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const BAR_WIDTH: f64 = 0.4;

/// The two charts the dashboard shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Logged and resolved counts as side-by-side bars per day
    Bar,
    /// Logged and resolved counts as two lines
    Line,
}

impl ChartKind {
    pub fn heading(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Number of Tickets and Tickets Resolved per Day",
            ChartKind::Line => "Number of Tickets Logged and Resolved per Day",
        }
    }
}

/// An RGB image of a rendered chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB bytes, three per pixel
    pub pixels: Vec<u8>,
}

/// Render one chart of `data` restricted to `window`.
pub fn render_chart(
    kind: ChartKind,
    data: &DashboardData,
    window: DateWindow,
    style: &ChartStyle,
    theme: &ChartTheme,
) -> Result<RenderedChart, DashboardError> {
    let mut pixels = vec![0u8; style.width as usize * style.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (style.width, style.height))
            .into_drawing_area();
        draw_chart(kind, data, window, style, theme, &root)
            .and_then(|_| root.present().map_err(|e| e.into()))
            .map_err(|e| DashboardError::Plot(e.to_string()))?;
    }

    Ok(RenderedChart {
        width: style.width,
        height: style.height,
        pixels,
    })
}

fn draw_chart(
    kind: ChartKind,
    data: &DashboardData,
    window: DateWindow,
    style: &ChartStyle,
    theme: &ChartTheme,
    root_area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), PlotError> {
    root_area.fill(&theme.background_color)?;

    let aligned = align_series(&data.logged, &data.resolved, window.start, window.end);
    let max_count = aligned
        .iter()
        .map(|(_, logged, resolved)| (*logged).max(*resolved))
        .max()
        .unwrap_or(0);
    let y_max = (max_count as f64 * 1.1).max(1.0);
    let x_max = (window.days() - 1) as f64;

    let mut chart = ChartBuilder::on(root_area)
        .caption(
            kind.title(),
            ("sans-serif", style.caption_size)
                .into_font()
                .color(&theme.text_color),
        )
        .margin(style.margin)
        .x_label_area_size(style.label_area_size + 40)
        .y_label_area_size(style.label_area_size)
        .build_cartesian_2d(-0.5..(x_max + 0.5), 0.0..y_max)?;

    let start = window.start;
    let x_label_formatter = move |x: &f64| {
        let offset = x.round();
        if (x - offset).abs() > 0.01 || offset < 0.0 || offset > x_max {
            return String::new();
        }
        (start + chrono::Duration::days(offset as i64))
            .format("%Y-%m-%d")
            .to_string()
    };
    let y_label_formatter = |y: &f64| {
        if y.fract().abs() < 1e-9 {
            format!("{:.0}", y)
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc("Date")
        .y_desc("Ticket Count")
        .x_labels(window.days().clamp(1, 10) as usize)
        .y_labels(8)
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter)
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color)
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        )
        .draw()?;

    match kind {
        ChartKind::Bar => draw_bars(&mut chart, &aligned, start, theme)?,
        ChartKind::Line => draw_lines(&mut chart, data, window, style, theme)?,
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(theme.background_color.mix(0.8))
        .border_style(theme.axis_color)
        .label_font(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .draw()?;

    Ok(())
}

fn day_offset(start: NaiveDate, date: NaiveDate) -> f64 {
    (date - start).num_days() as f64
}

fn draw_bars(
    chart: &mut TicketChart,
    aligned: &[(NaiveDate, usize, usize)],
    start: NaiveDate,
    theme: &ChartTheme,
) -> Result<(), PlotError> {
    let logged_color = theme.logged_color;
    let resolved_color = theme.resolved_color;

    chart
        .draw_series(aligned.iter().map(|(date, logged, _)| {
            let x = day_offset(start, *date);
            Rectangle::new(
                [(x - BAR_WIDTH, 0.0), (x, *logged as f64)],
                logged_color.filled(),
            )
        }))?
        .label("Logged Tickets")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], logged_color.filled()));

    chart
        .draw_series(aligned.iter().map(|(date, _, resolved)| {
            let x = day_offset(start, *date);
            Rectangle::new(
                [(x, 0.0), (x + BAR_WIDTH, *resolved as f64)],
                resolved_color.filled(),
            )
        }))?
        .label("Resolved Tickets")
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 5), (x + 20, y + 5)], resolved_color.filled())
        });

    Ok(())
}

fn draw_lines(
    chart: &mut TicketChart,
    data: &DashboardData,
    window: DateWindow,
    style: &ChartStyle,
    theme: &ChartTheme,
) -> Result<(), PlotError> {
    let series = [
        ("Logged Tickets", &data.logged, theme.logged_color),
        ("Resolved Tickets", &data.resolved, theme.resolved_color),
    ];

    for (label, counts, color) in series {
        let points: Vec<(f64, f64)> = counts
            .between(window.start, window.end)
            .iter()
            .map(|(date, count)| (day_offset(window.start, *date), *count as f64))
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(style.line_width)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
struct PlotCacheKey {
    kind: ChartKind,
    window: DateWindow,
    style: ChartStyle,
    data_hash: u64,
}

impl PlotCacheKey {
    fn new(kind: ChartKind, data: &DashboardData, window: DateWindow, style: &ChartStyle) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        data.logged.hash(&mut hasher);
        data.resolved.hash(&mut hasher);

        Self {
            kind,
            window,
            style: *style,
            data_hash: hasher.finish(),
        }
    }
}

/// Rendered charts kept so that redrawing an unchanged chart is free
pub struct PlotCache {
    cache: LruCache<PlotCacheKey, Arc<RenderedChart>>,
}

impl PlotCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Return the cached image for these inputs, rendering it on a miss
    pub fn get_or_render(
        &mut self,
        kind: ChartKind,
        data: &DashboardData,
        window: DateWindow,
        style: &ChartStyle,
        theme: &ChartTheme,
    ) -> Result<Arc<RenderedChart>, DashboardError> {
        let key = PlotCacheKey::new(kind, data, window, style);
        if let Some(chart) = self.cache.get(&key) {
            return Ok(Arc::clone(chart));
        }

        let chart = Arc::new(render_chart(kind, data, window, style, theme)?);
        self.cache.put(key, Arc::clone(&chart));
        Ok(chart)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for PlotCache {
    fn default() -> Self {
        Self::new(10)
    }
}
