//! Data models for pump-chart
//!
//! Sampled series and the options that control how they are charted.

pub mod chart;
pub mod series;

pub use chart::{AxisRange, ChartOptions, ImageFormat, LineColor};
pub use series::{Phase, PricePoint, PriceSeries, SeriesStats};
