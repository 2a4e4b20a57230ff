use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::models::{AxisRange, ChartOptions, ImageFormat, PriceSeries};
use crate::utils::ChartError;

/// Interpolated points inserted per sample interval when smoothing
const SMOOTHING_SUBDIVISIONS: usize = 4;

/// Upper bound of the price axis
///
/// Grows to the next tick above the series maximum so noise overshoot is not
/// clipped; never shrinks below the configured maximum.
pub fn y_upper_bound(axis: &AxisRange, series_max: f64) -> f64 {
    if series_max <= axis.max {
        return axis.max;
    }
    if axis.step <= 0.0 {
        return series_max;
    }
    let steps = ((series_max - axis.min) / axis.step).ceil();
    axis.min + steps * axis.step
}

/// Catmull-Rom interpolation through `points`
///
/// Every input point is kept; interpolated prices are clamped at zero.
pub fn smooth_path(points: &[(f64, f64)], subdivisions: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || subdivisions < 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut out = Vec::with_capacity(last * subdivisions + 1);

    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        out.push(p1);
        for s in 1..subdivisions {
            let u = s as f64 / subdivisions as f64;
            out.push(catmull_rom(p0, p1, p2, p3, u));
        }
    }
    out.push(points[last]);

    out
}

fn catmull_rom(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), u: f64) -> (f64, f64) {
    let u2 = u * u;
    let u3 = u2 * u;
    let blend = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (c - a) * u
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * u2
            + (3.0 * b - a - 3.0 * c + d) * u3)
    };
    (
        blend(p0.0, p1.0, p2.0, p3.0),
        blend(p0.1, p1.1, p2.1, p3.1).max(0.0),
    )
}

/// Time axis widened to cover `[t_min, t_max]`
///
/// Each side moves out by whole ticks; the axis never shrinks.
pub fn fit_x_axis(axis: &AxisRange, t_min: f64, t_max: f64) -> AxisRange {
    let widen = |gap: f64| {
        if gap <= 0.0 {
            0.0
        } else if axis.step > 0.0 {
            (gap / axis.step).ceil() * axis.step
        } else {
            gap
        }
    };
    AxisRange {
        min: axis.min - widen(axis.min - t_min),
        max: axis.max + widen(t_max - axis.max),
        step: axis.step,
    }
}

/// How many path points are visible in animation frame `frame` (0-based)
pub fn reveal_len(total: usize, frame: usize, frames: usize) -> usize {
    if frames == 0 || total == 0 {
        return total;
    }
    let shown = (total * (frame + 1)).div_ceil(frames);
    shown.clamp(total.min(2), total)
}

/// Visible point count and label visibility for each animation frame
pub fn frame_plan(total: usize, frames: usize, show_labels: bool) -> Vec<(usize, bool)> {
    (0..frames)
        .map(|frame| {
            let last_frame = frame + 1 == frames;
            (reveal_len(total, frame, frames), last_frame && show_labels)
        })
        .collect()
}

/// Path and axes ready for drawing
struct PlotFrame {
    path: Vec<(f64, f64)>,
    x_axis: AxisRange,
    y_axis: AxisRange,
}

/// Draw axes, the visible part of the curve and optionally the phase labels
fn draw_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plot: &PlotFrame,
    visible: usize,
    opts: &ChartOptions,
    show_labels: bool,
) -> Result<(), ChartError> {
    root.fill(&WHITE)
        .map_err(|e| ChartError::Drawing(format!("Failed to fill canvas: {}", e)))?;

    let (x_axis, y_axis) = (plot.x_axis, plot.y_axis);

    let mut chart = ChartBuilder::on(root)
        .caption(&opts.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_axis.min..x_axis.max, y_axis.min..y_axis.max)
        .map_err(|e| ChartError::Drawing(format!("Failed to build chart: {}", e)))?;

    chart
        .configure_mesh()
        .x_labels(x_axis.tick_count())
        .y_labels(y_axis.tick_count())
        .x_desc(opts.x_label.as_str())
        .y_desc(opts.y_label.as_str())
        .draw()
        .map_err(|e| ChartError::Drawing(format!("Failed to draw mesh: {}", e)))?;

    let color = RGBColor(opts.color.0, opts.color.1, opts.color.2);
    chart
        .draw_series(LineSeries::new(
            plot.path[..visible].iter().copied(),
            color.stroke_width(opts.stroke_width),
        ))
        .map_err(|e| ChartError::Drawing(format!("Failed to draw curve: {}", e)))?;

    if show_labels {
        chart
            .draw_series(opts.labels.iter().map(|label| {
                Text::new(
                    label.text.clone(),
                    (label.t, label.price),
                    ("sans-serif", 20.0).into_font(),
                )
            }))
            .map_err(|e| ChartError::Drawing(format!("Failed to draw labels: {}", e)))?;
    }

    Ok(())
}

/// Plot-ready path and axes for a series
fn prepare(series: &PriceSeries, opts: &ChartOptions) -> Result<PlotFrame, ChartError> {
    if series.len() < 2 {
        return Err(ChartError::NotEnoughData(series.len()));
    }

    let coords = series.coords();
    let path = if opts.smoothing {
        smooth_path(&coords, SMOOTHING_SUBDIVISIONS)
    } else {
        coords
    };

    let series_max = series.max_price().unwrap_or(opts.y_axis.max);
    let y_axis = AxisRange {
        max: y_upper_bound(&opts.y_axis, series_max),
        ..opts.y_axis
    };

    let t_min = series.points.first().map_or(opts.x_axis.min, |p| p.t);
    let t_max = series.points.last().map_or(opts.x_axis.max, |p| p.t);
    let x_axis = fit_x_axis(&opts.x_axis, t_min, t_max);

    debug!(
        "Chart path has {} points, time axis [{}, {}], price axis up to {}",
        path.len(),
        x_axis.min,
        x_axis.max,
        y_axis.max
    );

    Ok(PlotFrame { path, x_axis, y_axis })
}

/// Render the full chart as an SVG document
pub fn render_svg(series: &PriceSeries, opts: &ChartOptions) -> Result<String, ChartError> {
    let plot = prepare(series, opts)?;
    let mut svg = String::new();

    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        draw_frame(&root, &plot, plot.path.len(), opts, opts.show_labels)?;
        root.present()
            .map_err(|e| ChartError::Drawing(format!("Failed to render chart: {}", e)))?;
    }

    Ok(svg)
}

/// Render the full chart as a PNG file
pub fn render_png(series: &PriceSeries, opts: &ChartOptions, output: &Path) -> Result<(), ChartError> {
    let plot = prepare(series, opts)?;

    let root = BitMapBackend::new(output, (opts.width, opts.height)).into_drawing_area();
    draw_frame(&root, &plot, plot.path.len(), opts, opts.show_labels)?;
    root.present()
        .map_err(|e| ChartError::Drawing(format!("Failed to render chart: {}", e)))?;

    Ok(())
}

/// Render an animated GIF that draws the curve in from left to right
///
/// Labels appear on the last frame only.
pub fn render_gif(series: &PriceSeries, opts: &ChartOptions, output: &Path) -> Result<(), ChartError> {
    let frames = opts.animation.frames;
    if frames == 0 {
        return Err(ChartError::InvalidArgument("frame count must be at least 1".to_string()));
    }
    let plot = prepare(series, opts)?;

    let root = BitMapBackend::gif(output, (opts.width, opts.height), opts.animation.frame_delay_ms)
        .map_err(|e| ChartError::Drawing(format!("Failed to create GIF encoder: {}", e)))?
        .into_drawing_area();

    for (frame, (visible, show_labels)) in frame_plan(plot.path.len(), frames, opts.show_labels)
        .into_iter()
        .enumerate()
    {
        draw_frame(&root, &plot, visible, opts, show_labels)?;
        root.present()
            .map_err(|e| ChartError::Drawing(format!("Failed to render frame {}: {}", frame, e)))?;
    }
    debug!("Encoded {} frames", frames);

    Ok(())
}

/// Render `series` in `format` to `output`, returning the file size in bytes
pub fn render_chart(
    series: &PriceSeries,
    opts: &ChartOptions,
    format: ImageFormat,
    output: &Path,
) -> Result<u64, ChartError> {
    info!(
        "🎨 Rendering {}x{} {} chart to {}",
        opts.width,
        opts.height,
        format.extension(),
        output.display()
    );

    match format {
        ImageFormat::Png => render_png(series, opts, output)?,
        ImageFormat::Gif => render_gif(series, opts, output)?,
        ImageFormat::Svg => fs::write(output, render_svg(series, opts)?)?,
    }

    let size = fs::metadata(output)?.len();
    info!("✓ Chart written: {} ({} bytes)", output.display(), size);
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurveConfig;
    use crate::models::PricePoint;
    use crate::services::series_service::generate_series;
    use chrono::Utc;

    fn tiny_series(n: usize) -> PriceSeries {
        PriceSeries {
            generated_at: Utc::now(),
            seed: None,
            pivot: 5.0,
            points: (0..n).map(|i| PricePoint { t: i as f64, price: 10.0 }).collect(),
        }
    }

    #[test]
    fn test_y_upper_bound() {
        let axis = AxisRange { min: 0.0, max: 100.0, step: 10.0 };
        assert_eq!(y_upper_bound(&axis, 80.0), 100.0);
        assert_eq!(y_upper_bound(&axis, 100.0), 100.0);
        assert_eq!(y_upper_bound(&axis, 103.2), 110.0);
        assert_eq!(y_upper_bound(&axis, 120.0), 120.0);
    }

    #[test]
    fn test_smooth_path_keeps_samples() {
        let points = vec![(0.0, 0.0), (1.0, 10.0), (2.0, 0.0), (3.0, 5.0)];
        let smooth = smooth_path(&points, 4);
        assert_eq!(smooth.len(), 3 * 4 + 1);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(smooth[i * 4], *p);
        }
        assert!(smooth.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_smooth_path_never_negative() {
        // Overshoot between a spike and a zero run would dip below zero
        let points = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 90.0), (3.0, 0.0), (4.0, 0.0)];
        let smooth = smooth_path(&points, 8);
        assert!(smooth.iter().all(|p| p.1 >= 0.0));
    }

    #[test]
    fn test_smooth_path_short_input_unchanged() {
        let points = vec![(0.0, 1.0), (1.0, 2.0)];
        assert_eq!(smooth_path(&points, 4), points);
        assert_eq!(smooth_path(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)], 1).len(), 3);
    }

    #[test]
    fn test_reveal_len() {
        assert_eq!(reveal_len(100, 0, 10), 10);
        assert_eq!(reveal_len(100, 4, 10), 50);
        assert_eq!(reveal_len(100, 9, 10), 100);
        assert_eq!(reveal_len(5, 0, 30), 2);
        assert_eq!(reveal_len(7, 0, 1), 7);
        assert_eq!(reveal_len(1, 0, 3), 1);
    }

    #[test]
    fn test_too_few_points_rejected() {
        let opts = ChartOptions::default();
        let err = render_svg(&tiny_series(1), &opts).unwrap_err();
        assert!(matches!(err, ChartError::NotEnoughData(1)));
    }

    #[test]
    fn test_zero_frames_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = ChartOptions::default();
        opts.animation.frames = 0;
        let err = render_gif(&tiny_series(5), &opts, &dir.path().join("out.gif")).unwrap_err();
        assert!(matches!(err, ChartError::InvalidArgument(_)));
    }

    #[test]
    fn test_prepare_grows_axis_for_overshoot() {
        let series = generate_series(&CurveConfig::default(), Some(3));
        let opts = ChartOptions {
            smoothing: false,
            ..ChartOptions::default()
        };
        let plot = prepare(&series, &opts).unwrap();
        assert_eq!(plot.path.len(), series.len());
        assert!(plot.y_axis.max >= series.max_price().unwrap());
        assert_eq!(plot.y_axis.max % 10.0, 0.0);
        assert_eq!(plot.x_axis, opts.x_axis);
    }

    #[test]
    fn test_prepare_widens_time_axis_to_domain() {
        let config = CurveConfig {
            domain_start: -2.5,
            domain_end: 20.0,
            step: 0.1,
            ..CurveConfig::default()
        };
        let series = generate_series(&config, Some(3));
        let plot = prepare(&series, &ChartOptions::default()).unwrap();
        assert_eq!(plot.x_axis.min, -3.0);
        assert_eq!(plot.x_axis.max, 20.0);
        assert!(plot
            .path
            .iter()
            .all(|&(t, _)| t >= plot.x_axis.min && t <= plot.x_axis.max));
    }

    #[test]
    fn test_fit_x_axis() {
        let axis = AxisRange { min: 0.0, max: 10.0, step: 1.0 };
        assert_eq!(fit_x_axis(&axis, 0.0, 9.5), axis);
        assert_eq!(fit_x_axis(&axis, 1.0, 4.0), axis);
        let wide = fit_x_axis(&axis, -0.2, 12.3);
        assert_eq!((wide.min, wide.max, wide.step), (-1.0, 13.0, 1.0));
    }

    #[test]
    fn test_frame_plan_labels_on_last_frame_only() {
        let plan = frame_plan(100, 4, true);
        assert_eq!(plan, vec![(25, false), (50, false), (75, false), (100, true)]);
        assert!(plan.windows(2).all(|w| w[0].0 <= w[1].0));

        let hidden = frame_plan(100, 4, false);
        assert!(hidden.iter().all(|&(_, labels)| !labels));
        assert_eq!(frame_plan(10, 1, true), vec![(10, true)]);
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn test_render_svg_contains_labels() {
        let series = generate_series(&CurveConfig::default(), Some(1));
        let svg = render_svg(&series, &ChartOptions::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Insiders Pump"));
        assert!(svg.contains("Pump and Dump Schema"));
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn test_render_gif_writes_animation() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("chart.gif");
        let series = generate_series(&CurveConfig::default(), Some(1));
        let mut opts = ChartOptions {
            width: 320,
            height: 240,
            ..ChartOptions::default()
        };
        opts.animation.frames = 3;
        let size = render_chart(&series, &opts, ImageFormat::Gif, &output).unwrap();
        assert!(size > 0);

        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn test_render_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("chart.png");
        let series = generate_series(&CurveConfig::default(), Some(1));
        let size = render_chart(&series, &ChartOptions::default(), ImageFormat::Png, &output).unwrap();
        assert!(size > 0);
    }
}
