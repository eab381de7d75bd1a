//! Error types shared by every filter.
//!
//! Out-of-range numeric parameters are never errors (they are clamped).
//! Errors are reserved for degenerate input, unknown algorithm names and
//! failures inside the band executor.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("unknown {kind} name: {name:?}")]
    UnknownName { kind: &'static str, name: String },

    #[error("worker for band {band} (rows {start}..{end}) failed: {message}")]
    WorkerPanicked {
        band: usize,
        start: usize,
        end: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, RasterError>;
