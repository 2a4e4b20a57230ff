//! Chart rendering models

use crate::utils::ChartError;

/// Output format for a rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    Png,
    Svg,
    /// Animated: the curve is drawn in left to right
    Gif,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Gif => "gif",
        }
    }
}

/// A plotted axis: visible range and tick spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    /// Number of tick labels between `min` and `max` inclusive
    pub fn tick_count(&self) -> usize {
        if self.step <= 0.0 || self.max <= self.min {
            return 2;
        }
        ((self.max - self.min) / self.step).round() as usize + 1
    }
}

/// Text annotation placed at chart coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseLabel {
    pub text: String,
    pub t: f64,
    pub price: f64,
}

impl PhaseLabel {
    pub fn new(text: &str, t: f64, price: f64) -> Self {
        PhaseLabel { text: text.to_string(), t, price }
    }
}

/// RGB line colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColor(pub u8, pub u8, pub u8);

impl LineColor {
    pub const RED: LineColor = LineColor(255, 0, 0);

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self, ChartError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidArgument(format!(
                "Invalid colour '{}'. Use #rrggbb",
                hex
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| ChartError::InvalidArgument(format!("Invalid colour '{}': {}", hex, e)))
        };
        Ok(LineColor(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Animation settings for GIF output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub frames: usize,
    pub frame_delay_ms: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Animation {
            frames: 30,
            frame_delay_ms: 66,
        }
    }
}

/// Everything the renderer needs besides the series itself
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_axis: AxisRange,
    pub y_axis: AxisRange,
    pub x_label: String,
    pub y_label: String,
    pub color: LineColor,
    pub stroke_width: u32,
    pub smoothing: bool,
    pub show_labels: bool,
    pub labels: Vec<PhaseLabel>,
    pub animation: Animation,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            width: 1024,
            height: 768,
            title: "Pump and Dump Schema".to_string(),
            x_axis: AxisRange { min: 0.0, max: 10.0, step: 1.0 },
            y_axis: AxisRange { min: 0.0, max: 100.0, step: 10.0 },
            x_label: "t".to_string(),
            y_label: "$".to_string(),
            color: LineColor::RED,
            stroke_width: 2,
            smoothing: true,
            show_labels: true,
            labels: vec![
                PhaseLabel::new("Insiders Pump", 0.7, 30.0),
                PhaseLabel::new("Others Pump", 1.7, 70.0),
                PhaseLabel::new("Dump", 4.75, 90.0),
            ],
            animation: Animation::default(),
        }
    }
}
