use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod models;
mod services;
mod utils;

#[derive(Parser, Debug)]
#[command(author, version, about = "Synthetic pump-and-dump price chart generator")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so sample output on stdout stays clean
    let filter = match "pump_chart=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("📉 pump-chart v{}", env!("CARGO_PKG_VERSION"));

    let config = match config::CurveConfig::from_env() {
        Ok(c) => {
            debug!("Curve configuration: {:?}", c);
            c
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    if commands::handle_command(cli.command, &config) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
