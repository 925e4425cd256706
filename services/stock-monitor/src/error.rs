//! Error types for the stock monitor

/// Errors that can occur in the stock monitor
#[derive(Debug, thiserror::Error)]
pub enum StockMonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notifier error: {0}")]
    Notifier(String),
}

/// Result type alias for stock monitor operations
pub type Result<T> = std::result::Result<T, StockMonitorError>;
