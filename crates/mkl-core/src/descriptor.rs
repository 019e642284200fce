//! Extracted function descriptors.

/// Floating-point precision variant of a numerical routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
    /// Single precision (`s`/`S` infix).
    F32,
    /// Double precision (`d`/`D` infix).
    F64,
}

impl Precision {
    /// Rust element type of the variant.
    #[must_use]
    pub const fn element_type(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// One parameter of a matched C function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Declared name, or `p<index>` when the prototype omits it.
    pub name: String,
    /// C type spelling reconstructed from specifiers and declarator shape.
    pub c_type: String,
    /// Rust spelling produced by [`crate::type_map::map_type`].
    pub rust_type: String,
    /// Primitive mappings need no `use` entry.
    pub exclude_from_imports: bool,
}

/// A C function whose name resolved in the pattern registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub raw_name: String,
    pub precision: Precision,
    pub canonical_name: String,
    pub return_type: String,
    pub params: Vec<Parameter>,
}

impl FunctionDescriptor {
    /// `name: Type` pairs in declaration order.
    #[must_use]
    pub fn rust_params(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.rust_type))
            .collect()
    }

    /// Argument names in declaration order, for forwarding calls.
    #[must_use]
    pub fn call_params(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).collect()
    }

    /// Rust return clause (`-> i32`), empty for `void`.
    #[must_use]
    pub fn return_declare(&self) -> String {
        crate::type_map::return_declare(&self.return_type)
    }
}
