use thiserror::Error;

/// Main error type for the tracker
#[derive(Error, Debug)]
pub enum TrackError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors: transport failures, timeouts, non-2xx statuses,
    // undecodable response bodies
    #[error("Network error: {0}")]
    Network(String),

    // Lookup errors: the API answered but the asset id is not in it
    #[error("Cryptocurrency not found: {0}")]
    NotFound(String),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Interactive shell errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Transport failures classify as Network, with timeouts called out.
impl From<reqwest::Error> for TrackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TrackError::Network(format!("request timed out: {err}"))
        } else {
            TrackError::Network(err.to_string())
        }
    }
}

/// Result type alias for TrackError
pub type Result<T> = std::result::Result<T, TrackError>;
