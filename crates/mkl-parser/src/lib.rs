//! # mkl-parser
//!
//! C header front end for `gen-mkl-rs`, built on ast-grep's tree-sitter-c
//! grammar. [`CHeader`] implements [`mkl_core::DeclarationSource`]: it turns
//! the declarations of a header (and the local headers it includes) into the
//! front-end independent model the extractor consumes.

mod convert;
pub mod error;
pub mod header;
mod macros;
pub mod parser;

pub use error::ParserError;
pub use header::CHeader;
pub use parser::{AstTree, parse_source};
