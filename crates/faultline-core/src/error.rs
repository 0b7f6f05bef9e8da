//! Error types for faultline
//!
//! Describing errors is a total operation almost everywhere; these variants
//! cover the few places that can genuinely fail (depth guards, host input,
//! manifest reads).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for faultline
#[derive(Error, Debug)]
pub enum FaultlineError {
    /// A cause chain is deeper than the configured limit
    #[error("Cause chain exceeds maximum depth of {max_depth}")]
    CauseDepthExceeded { max_depth: usize },

    /// A capture document could not be turned into an error instance
    #[error("Invalid capture: {0}")]
    InvalidCapture(String),

    /// A runtime descriptor is not of the form `name@version`
    #[error("Invalid runtime descriptor: {0}")]
    InvalidRuntime(String),

    /// A package manifest exists but could not be read
    #[error("Failed to read package manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FaultlineError>;
