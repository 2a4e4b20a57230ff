use clap::Args;
use tracing::info;

use crate::config::CurveConfig;
use crate::services::{export_service, series_service};
use crate::utils::ChartError;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Seed for reproducible jitter
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Statistics table for one freshly sampled series, plus the seed if any
pub fn report(config: &CurveConfig, args: &SummaryArgs) -> Result<String, ChartError> {
    let series = series_service::generate_series(config, args.seed);
    let stats = series
        .stats()
        .ok_or(ChartError::NotEnoughData(series.len()))?;

    let mut output = export_service::stats_table(&stats);
    if let Some(seed) = series.seed {
        output.push_str(&format!("seed: {}\n", seed));
    }
    Ok(output)
}

pub fn execute(config: &CurveConfig, args: SummaryArgs) -> Result<(), ChartError> {
    info!("🧮 Summary command called: {:?}", args);

    print!("{}", report(config, &args)?);
    Ok(())
}
