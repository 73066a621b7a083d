//! Error types for configuration loading.

use thiserror::Error;

/// Configuration error type.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or a value of the wrong type
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An ignored-URL or ignored-word pattern is not a valid regex
    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Why it failed to compile.
        #[source]
        source: regex::Error,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, ConfigError>;
