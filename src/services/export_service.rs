use std::io::Write;

use clap::ValueEnum;
use tracing::info;

use crate::models::{PriceSeries, SeriesStats};
use crate::utils::{ChartError, Table};

/// Raw sample export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleFormat {
    Csv,
    Json,
}

/// Write the series as `t,price` rows
pub fn write_csv<W: Write>(series: &PriceSeries, writer: W) -> Result<(), ChartError> {
    let mut csv = csv::Writer::from_writer(writer);
    for point in &series.points {
        csv.serialize(point)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the whole series, metadata included, as pretty JSON
pub fn write_json<W: Write>(series: &PriceSeries, mut writer: W) -> Result<(), ChartError> {
    serde_json::to_writer_pretty(&mut writer, series)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn export_series<W: Write>(
    series: &PriceSeries,
    format: SampleFormat,
    writer: W,
) -> Result<(), ChartError> {
    match format {
        SampleFormat::Csv => write_csv(series, writer)?,
        SampleFormat::Json => write_json(series, writer)?,
    }
    info!("📤 Exported {} samples as {:?}", series.len(), format);
    Ok(())
}

/// Statistics table for the terminal
pub fn stats_table(stats: &SeriesStats) -> String {
    let fmt_opt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string());

    let mut table = Table::new(vec!["Metric", "Value"]);
    table.add_row(vec!["Samples".to_string(), stats.count.to_string()]);
    table.add_row(vec!["Peak price".to_string(), format!("{:.2}", stats.peak.price)]);
    table.add_row(vec!["Peak at t".to_string(), format!("{:.2}", stats.peak.t)]);
    table.add_row(vec!["Minimum price".to_string(), format!("{:.2}", stats.min_price)]);
    table.add_row(vec!["Mean price".to_string(), format!("{:.2}", stats.mean_price)]);
    table.add_row(vec!["Mean (pump)".to_string(), fmt_opt(stats.pump_mean)]);
    table.add_row(vec!["Mean (dump)".to_string(), fmt_opt(stats.dump_mean)]);
    table.render()
}
