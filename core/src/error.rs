//! Error types for index file operations.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Result type for index file operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors that can occur while reading or writing key and segment files.
///
/// Malformed file contents are not errors: short or ragged files are truncated to their
/// largest consistent prefix and reported through `tracing`.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The file could not be opened for reading, or a temporary file could not be created
    /// in the destination directory.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// The path which failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing or replacing the destination file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An I/O error occurred after the file was opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The number of records cannot be represented by the count field.
    #[error("count {count} does not fit in a {width}-byte count field")]
    CountOverflow {
        /// The record count that was to be written.
        count: usize,
        /// The key width in bytes.
        width: usize,
    },
}
