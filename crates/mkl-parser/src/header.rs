//! Header loading: parse a C header and the local headers it includes.
//!
//! There is no preprocessor. Declarations inside `extern "C"` blocks and
//! conditional blocks (`#ifdef`, `#if`, `#else`, ...) are all visited, in
//! source order, and an `#include` is expanded in place when the file can be
//! found next to the including header or in an include directory.
//!
//! Before parsing, empty object-like macros (`NOTHROW`) are blanked and
//! `_Mkl_Api(...)` declarations are rewritten as plain prototypes. Macros
//! learned from one file stay in effect for the files loaded after it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ast_grep_core::Node;
use mkl_core::decl::{Declaration, DeclarationSource, Diagnostic};

use crate::convert::{convert_declaration, convert_function_definition};
use crate::error::ParserError;
use crate::macros::MacroTable;
use crate::parser::parse_source;

/// Node kinds whose children are walked as if they were top level.
/// `ERROR` is included: well-formed declarations inside a recovered region
/// are still usable.
const CONTAINER_KINDS: &[&str] = &[
    "translation_unit",
    "ERROR",
    "linkage_specification",
    "declaration_list",
    "preproc_if",
    "preproc_ifdef",
    "preproc_else",
    "preproc_elif",
    "preproc_elifdef",
];

/// Longest source excerpt quoted in a diagnostic.
const EXCERPT_LEN: usize = 40;

/// Parsed declarations of a header and everything it pulled in.
#[derive(Debug, Clone, Default)]
pub struct CHeader {
    declarations: Vec<Declaration>,
    diagnostics: Vec<Diagnostic>,
    files: Vec<PathBuf>,
}

impl CHeader {
    /// Parse a header file, following includes.
    ///
    /// The header's own directory is searched after `include_dirs`.
    ///
    /// # Errors
    /// Returns [`ParserError::Io`] if the header or a resolved include cannot be read.
    pub fn parse_file(path: &Path, include_dirs: &[PathBuf]) -> Result<Self, ParserError> {
        let mut dirs = include_dirs.to_vec();
        if let Some(parent) = path.parent() {
            dirs.push(parent.to_path_buf());
        }

        let mut loader = Loader::new(dirs);
        loader.load_file(path)?;

        let header = loader.header;
        tracing::info!(
            header = %path.display(),
            files = header.files.len(),
            declarations = header.declarations.len(),
            diagnostics = header.diagnostics.len(),
            "parsed header"
        );
        Ok(header)
    }

    /// Parse header text without following includes.
    #[must_use]
    pub fn parse_str(source: &str, path: &Path) -> Self {
        let mut loader = Loader::new(Vec::new());
        if let Err(error) = loader.visit_source(source, path, false) {
            tracing::warn!(%error, "failed to parse header text");
        }
        loader.header
    }

    /// Every file that contributed declarations, in load order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl DeclarationSource for CHeader {
    fn declarations(&self) -> Vec<Declaration> {
        self.declarations.clone()
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }
}

struct Loader {
    include_dirs: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
    macros: MacroTable,
    header: CHeader,
}

impl Loader {
    fn new(include_dirs: Vec<PathBuf>) -> Self {
        Self {
            include_dirs,
            visited: HashSet::new(),
            macros: MacroTable::default(),
            header: CHeader::default(),
        }
    }

    fn load_file(&mut self, path: &Path) -> Result<(), ParserError> {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !self.visited.insert(key) {
            return Ok(());
        }

        let source = fs::read_to_string(path).map_err(|source| ParserError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(file = %path.display(), "parsing header file");
        self.visit_source(&source, path, true)
    }

    fn visit_source(
        &mut self,
        source: &str,
        path: &Path,
        follow_includes: bool,
    ) -> Result<(), ParserError> {
        self.header.files.push(path.to_path_buf());

        let tree = parse_source(source);
        self.macros.learn(&tree.root());
        let tree = match self.macros.expand(source) {
            Some(expanded) => {
                tracing::debug!(file = %path.display(), "expanded header macros");
                parse_source(&expanded)
            }
            None => tree,
        };
        let root = tree.root();
        self.collect_diagnostics(&root, path);

        // Explicit stack, children pushed in reverse to keep source order.
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let kind = node.kind();
            match kind.as_ref() {
                "declaration" => self.header.declarations.push(convert_declaration(&node)),
                "function_definition" => self
                    .header
                    .declarations
                    .push(convert_function_definition(&node)),
                "preproc_include" if follow_includes => self.follow_include(&node, path)?,
                k if CONTAINER_KINDS.contains(&k) => {
                    let children: Vec<_> = node.children().collect();
                    stack.extend(children.into_iter().rev());
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn follow_include<D: ast_grep_core::Doc>(
        &mut self,
        node: &Node<D>,
        including: &Path,
    ) -> Result<(), ParserError> {
        let Some(target) = node.field("path") else {
            return Ok(());
        };
        let quoted = target.kind().as_ref() == "string_literal";
        let text = target.text();
        let name = text.trim_matches(|c| c == '"' || c == '<' || c == '>');

        match self.resolve(name, including, quoted) {
            Some(resolved) => self.load_file(&resolved),
            None => {
                tracing::debug!(
                    include = name,
                    from = %including.display(),
                    "include not found, skipping"
                );
                Ok(())
            }
        }
    }

    /// `"x.h"` looks next to the including file first; `<x.h>` only in
    /// include directories.
    fn resolve(&self, name: &str, including: &Path, quoted: bool) -> Option<PathBuf> {
        let local = including
            .parent()
            .filter(|_| quoted)
            .map(|dir| dir.join(name));
        local
            .into_iter()
            .chain(self.include_dirs.iter().map(|dir| dir.join(name)))
            .find(|candidate| candidate.is_file())
    }

    fn collect_diagnostics<D: ast_grep_core::Doc>(&mut self, root: &Node<D>, path: &Path) {
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            if node.kind().as_ref() == "ERROR" {
                let excerpt: String = node
                    .text()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .chars()
                    .take(EXCERPT_LEN)
                    .collect();
                self.header.diagnostics.push(Diagnostic {
                    file: path.to_path_buf(),
                    line: node.start_pos().line() + 1,
                    message: format!("syntax error near `{excerpt}`"),
                });
                continue;
            }
            stack.extend(node.children());
        }
    }
}
