use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::CurveConfig;
use crate::models::{ChartOptions, ImageFormat, LineColor};
use crate::services::{chart_service, series_service};
use crate::utils::ChartError;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output file (default: pump_and_dump_<millis>.<format>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "png")]
    pub format: ImageFormat,

    #[arg(long, default_value = "1024")]
    pub width: u32,

    #[arg(long, default_value = "768")]
    pub height: u32,

    /// Seed for reproducible jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Plot the raw samples without interpolation
    #[arg(long)]
    pub no_smoothing: bool,

    /// Hide the phase annotations
    #[arg(long)]
    pub no_labels: bool,

    /// Line colour as #rrggbb
    #[arg(long, default_value = "#ff0000")]
    pub color: String,

    /// Frames in the animation (GIF only)
    #[arg(long, default_value = "30")]
    pub frames: usize,

    /// Delay between animation frames in milliseconds (GIF only)
    #[arg(long, default_value = "66")]
    pub frame_delay: u32,
}

impl RenderArgs {
    pub fn chart_options(&self) -> Result<ChartOptions, ChartError> {
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::InvalidArgument(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.format == ImageFormat::Gif && self.frames == 0 {
            return Err(ChartError::InvalidArgument("--frames must be at least 1".to_string()));
        }

        let mut opts = ChartOptions {
            width: self.width,
            height: self.height,
            color: LineColor::from_hex(&self.color)?,
            smoothing: !self.no_smoothing,
            show_labels: !self.no_labels,
            ..ChartOptions::default()
        };
        opts.animation.frames = self.frames;
        opts.animation.frame_delay_ms = self.frame_delay;
        Ok(opts)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "pump_and_dump_{}.{}",
                chrono::Utc::now().timestamp_millis(),
                self.format.extension()
            ))
        })
    }
}

pub fn execute(config: &CurveConfig, args: RenderArgs) -> Result<(), ChartError> {
    info!("🎨 Render command called: {:?}", args);

    let opts = args.chart_options()?;
    let output = args.output_path();

    let series = series_service::generate_series(config, args.seed);
    let size = chart_service::render_chart(&series, &opts, args.format, &output)?;

    println!("{} ({} bytes)", output.display(), size);
    Ok(())
}
