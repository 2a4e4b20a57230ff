use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::CurveConfig;
use crate::services::export_service::{self, SampleFormat};
use crate::services::series_service;
use crate::utils::ChartError;

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "csv")]
    pub format: SampleFormat,

    /// Seed for reproducible jitter
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(config: &CurveConfig, args: SampleArgs) -> Result<(), ChartError> {
    info!("📊 Sample command called: {:?}", args);

    let series = series_service::generate_series(config, args.seed);

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            export_service::export_series(&series, args.format, BufWriter::new(file))?;
            info!("✓ Samples written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            export_service::export_series(&series, args.format, stdout.lock())?;
        }
    }

    Ok(())
}
