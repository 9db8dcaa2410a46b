use thiserror::Error;

/// Errors raised while setting up or running the dashboard process.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
