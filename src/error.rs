//! Error Types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a kernel or loading its inputs.
///
/// Kernel operations themselves never fail; malformed arguments are clamped.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
