//! C type spelling to Rust type spelling.
//!
//! The floating-point element type maps to `Self` so one trait covers both
//! precisions. Anything outside the fixed table passes through, minus a
//! leading `const`, and is expected to be exported by the provider crate.

/// Result of mapping a C type spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub rust_type: String,
    /// `true` for primitive mappings that need no `use` entry.
    pub exclude_from_imports: bool,
}

impl MappedType {
    fn primitive(rust_type: &str) -> Self {
        Self {
            rust_type: rust_type.to_string(),
            exclude_from_imports: true,
        }
    }

    fn imported(rust_type: &str) -> Self {
        Self {
            rust_type: rust_type.to_string(),
            exclude_from_imports: false,
        }
    }
}

/// Exact-match table of known C spellings.
fn lookup(c_type: &str) -> Option<&'static str> {
    let rust = match c_type {
        "size_t" => "usize",
        "int32_t" | "int" | "const int" | "const int32_t" => "i32",
        "int64_t" => "i64",
        "const double *" | "const float *" | "const float[]" | "const double[]" => "*const Self",
        "double *" | "float *" | "float[]" | "double[]" => "*mut Self",
        "double" | "float" | "const double" | "const float" => "Self",
        "char" => "i8",
        "int *" => "*mut i32",
        _ => return None,
    };
    Some(rust)
}

/// Map a parameter's C type spelling. Total: unknown spellings pass through.
#[must_use]
pub fn map_type(c_type: &str) -> MappedType {
    if let Some(rust) = lookup(c_type) {
        return MappedType::primitive(rust);
    }

    if let Some(stripped) = c_type.strip_prefix("const ") {
        return MappedType::imported(stripped);
    }

    MappedType::imported(c_type)
}

/// Rust return clause for a C return type spelling.
#[must_use]
pub fn return_declare(c_type: &str) -> String {
    match c_type {
        "void" => String::new(),
        "int32_t" | "int" => "-> i32".to_string(),
        "float" | "double" => "-> Self".to_string(),
        "size_t" => "-> usize".to_string(),
        other => format!("-> {}", map_type(other).rust_type),
    }
}
