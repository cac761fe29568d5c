use thiserror::Error;

/// Main error type for the feed tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Round data errors
    #[error("Invalid round data: {0}")]
    InvalidRound(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    /// Upstream failures the poller recovers from by backing off and retrying.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TrackerError::Http(_) | TrackerError::UpstreamStatus(_) | TrackerError::Json(_)
        )
    }
}
