//! Error types for the disk usage agent

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the disk usage agent
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Probe target does not exist under the repo root
    #[error("target path not found: {0}")]
    TargetNotFound(PathBuf),

    /// I/O failure while walking a probe target
    #[error("failed to measure {target}: {source}")]
    Probe {
        target: String,
        #[source]
        source: walkdir::Error,
    },

    /// Duration parse error
    #[error("failed to parse duration {input:?}: {reason}")]
    DurationParse { input: String, reason: String },

    /// Bind address parse error
    #[error("invalid metrics endpoint {0:?}")]
    InvalidEndpoint(String),

    /// Metrics registration error
    #[error("metrics registration failed: {0}")]
    Metrics(#[from] prometheus::Error),
}
