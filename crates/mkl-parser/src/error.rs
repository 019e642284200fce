//! Parser error types for mkl-parser.

use std::path::PathBuf;

/// Errors raised while loading C headers. Syntax problems are diagnostics,
/// not errors.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("failed to read header {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
