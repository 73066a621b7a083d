//! Error types for the profiler.

use std::path::PathBuf;

use thiserror::Error;

/// Profiler error type.
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// The interface handed to `wrap` has nothing to time.
    #[error("Invalid target: interface `{interface}` declares no profiled methods")]
    InvalidTarget {
        /// Name of the rejected interface.
        interface: &'static str,
    },

    /// The report destination could not be opened, written or flushed.
    #[error("Failed to write profile report to {}: {source}", path.display())]
    ReportWrite {
        /// Report destination.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// I/O error while writing to a caller-owned sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`ProfilerError`].
pub type Result<T> = std::result::Result<T, ProfilerError>;
