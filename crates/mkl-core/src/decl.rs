//! Front-end independent model of C declarations.
//!
//! A C parser feeds the extractor through [`DeclarationSource`]. The types
//! follow C's split between declaration specifiers (the base type and its
//! qualifiers) and declarators (the name plus its pointer, array, and
//! function shape).

use std::fmt;
use std::path::PathBuf;

/// One declaration specifier with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
    /// `static`, `extern`, `register`, ...
    StorageClass(String),
    /// `const`, `volatile`, `restrict`, `_Atomic`.
    TypeQualifier(String),
    /// Base type text: `double`, `unsigned long`, `MKL_INT`, `struct foo`.
    TypeSpecifier(String),
    /// `inline`, `_Noreturn`.
    Function(String),
    /// `_Alignas(...)`.
    Alignment(String),
    /// `__attribute__((...))`, `__declspec(...)`, `[[...]]`.
    Attribute(String),
}

/// One level of declarator shape, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derived {
    /// `*` with the qualifiers written after it.
    Pointer(Vec<String>),
    /// `[]` or `[N]`.
    Array,
    /// A parameter list.
    Function(FunctionDeclarator),
    /// A shape the front end could not express; carries the node kind.
    Unsupported(String),
}

/// A declared name together with its shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarator {
    /// `None` for abstract declarators (`const double *` with no name).
    pub name: Option<String>,
    pub derived: Vec<Derived>,
}

impl Declarator {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            derived: Vec::new(),
        }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            name: None,
            derived: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, derived: Derived) -> Self {
        self.derived.push(derived);
        self
    }
}

/// The parameter list of a function declarator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDeclarator {
    pub parameters: Vec<ParameterDeclaration>,
    /// Trailing `...`.
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDeclaration {
    pub specifiers: Vec<Specifier>,
    pub declarator: Option<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitDeclarator {
    pub declarator: Declarator,
    /// `= ...` present.
    pub has_initializer: bool,
}

/// A top-level declaration: specifiers shared by one or more declarators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub specifiers: Vec<Specifier>,
    pub declarators: Vec<InitDeclarator>,
    /// 1-based source line, for logging.
    pub line: usize,
}

/// A problem reported by the C front end. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file.display(), self.line, self.message)
    }
}

/// Capability a C front end provides to the extractor.
pub trait DeclarationSource {
    /// Top-level declarations in source order.
    fn declarations(&self) -> Vec<Declaration>;

    /// Problems found while parsing.
    fn diagnostics(&self) -> Vec<Diagnostic>;
}

impl DeclarationSource for Vec<Declaration> {
    fn declarations(&self) -> Vec<Declaration> {
        self.clone()
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }
}
