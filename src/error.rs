//! Error types for sparkgrid operations.
//!
//! The marking and drawing path never fails; errors only surface at the
//! configuration edge and when a host addresses a column that does not exist.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sparkgrid operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading a configuration file that exists.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },

    /// A chart width that is neither a unit count nor a percentage.
    #[error("invalid dimension: {0:?}")]
    InvalidDimension(String),

    /// A column with this id is already attached.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    /// No column with this id is attached.
    #[error("unknown column id: {0}")]
    UnknownColumn(String),
}
