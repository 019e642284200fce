//! Error types for the generator core.

use thiserror::Error;

/// Errors raised while building the pattern registry.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A pattern line carries more than one separator, or a separator with
    /// nothing on one side.
    #[error("line {line}: '{pattern}' doesn't contain a valid name")]
    MalformedPattern { line: usize, pattern: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
