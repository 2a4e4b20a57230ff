use thiserror::Error;

/// Errors raised around the curve: configuration, rendering and export
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not enough price data to generate chart ({0} point(s), minimum 2 required)")]
    NotEnoughData(usize),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Extract the innermost message from a nested error string
///
/// Backend errors come wrapped in several "context: cause" layers, e.g.
/// "Drawing failed: Failed to fill canvas: Drawing backend error: No such file or directory"
///
/// Returns only the last segment:
/// "No such file or directory"
pub fn extract_clean_error(error_msg: &str) -> String {
    if let Some(last_colon) = error_msg.rfind(": ") {
        let tail = error_msg[last_colon + 2..].trim();
        if !tail.is_empty() {
            return tail.to_string();
        }
    }
    error_msg.to_string()
}
