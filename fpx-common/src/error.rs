//! Common error types for FPX

use thiserror::Error;

use crate::tags::DecodeError;

/// Common result type for FPX operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a session
///
/// Every variant is fatal at startup. Once a [`crate::Session`] exists,
/// queries against it never fail: an empty selection is an empty result.
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset missing, unreadable or structurally invalid
    #[error("Load error: {0}")]
    Load(String),

    /// A `tags` cell could not be parsed into a label list
    #[error("Decode error at row {row}: {source}")]
    Decode {
        /// 1-based data row (header excluded)
        row: usize,
        #[source]
        source: DecodeError,
    },

    /// CSV reader error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
