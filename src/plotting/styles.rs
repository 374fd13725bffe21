use plotters::style::RGBAColor;

/// Chart theme configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    pub logged_color: RGBAColor,
    pub resolved_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            // Light sky blue and coral
            logged_color: RGBAColor(135, 206, 250, 0.9),
            resolved_color: RGBAColor(250, 128, 114, 0.9),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub line_width: u32,
    pub font_size: u32,
    pub caption_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
}

impl ChartStyle {
    /// Default style at the given image size
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 420,
            line_width: 2,
            font_size: 15,
            caption_size: 24,
            margin: 10,
            label_area_size: 50,
        }
    }
}
