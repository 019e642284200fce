//! # mkl-core
//!
//! Core of `gen-mkl-rs`: selects functions from a C numerical-library header
//! by name pattern and turns their prototypes into descriptors a template can
//! render as Rust bindings.
//!
//! Pipeline: [`PatternRegistry`] → [`extract_all`] over a [`DeclarationSource`]
//! → [`BindingModel`].

pub mod aggregate;
pub mod decl;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod registry;
pub mod type_map;

pub use aggregate::BindingModel;
pub use decl::{Declaration, DeclarationSource, Diagnostic};
pub use descriptor::{FunctionDescriptor, Parameter, Precision};
pub use error::CoreError;
pub use extract::{Skip, extract_all, extract_declaration};
pub use registry::{FuncMatch, PatternRegistry};
pub use type_map::{MappedType, map_type, return_declare};
