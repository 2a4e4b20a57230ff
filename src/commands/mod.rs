pub mod render;
pub mod sample;
pub mod summary;

use clap::Subcommand;
use tracing::error;

use crate::config::CurveConfig;
use crate::utils::{extract_clean_error, ChartError};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the price chart as PNG, SVG or an animated GIF
    Render(render::RenderArgs),
    /// Write the sampled series as CSV or JSON
    Sample(sample::SampleArgs),
    /// Print summary statistics of one sampled series
    Summary(summary::SummaryArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Render(_) => "render",
            Command::Sample(_) => "sample",
            Command::Summary(_) => "summary",
        }
    }
}

/// Run one subcommand; returns `false` if it failed
pub fn handle_command(command: Command, config: &CurveConfig) -> bool {
    let name = command.name();

    let result: Result<(), ChartError> = match command {
        Command::Render(args) => render::execute(config, args),
        Command::Sample(args) => sample::execute(config, args),
        Command::Summary(args) => summary::execute(config, args),
    };

    if let Err(e) = result {
        let error_msg = e.to_string();
        error!("❌ Error executing command {}: {}", name, error_msg);

        let user_message = match &e {
            ChartError::Io(_) | ChartError::Drawing(_) => {
                format!("❌ {} failed: {}", name, extract_clean_error(&error_msg))
            }
            _ => format!("❌ {}", error_msg),
        };
        eprintln!("{}", user_message);
        return false;
    }

    true
}
