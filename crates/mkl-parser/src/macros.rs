//! Macro pre-pass applied to header text before it is parsed.
//!
//! There is no preprocessor, so two macro shapes that hide MKL prototypes
//! from the C grammar are expanded textually:
//!
//! - object-like macros defined with an empty body (`#define NOTHROW`) are
//!   blanked wherever they appear outside a directive,
//! - `_Mkl_Api(ret,name,(args))`, and its `_mkl_api`/`_MKL_API` spellings,
//!   become `ret name(args);`.
//!
//! Newlines are kept, so nodes of the expanded text report the line they
//! had in the file.

use std::collections::HashSet;

use ast_grep_core::Node;

/// Function-like macros MKL declares its VML/VSL routines through.
const API_MACROS: &[&str] = &["_Mkl_Api", "_mkl_api", "_MKL_API"];

#[derive(Debug, Default)]
pub(crate) struct MacroTable {
    empty: HashSet<String>,
}

impl MacroTable {
    /// Record every object-like macro under `root` whose body is empty.
    ///
    /// Conditional branches are not evaluated: a name defined empty in any
    /// branch (the C side of `#ifdef __cplusplus`) counts as empty.
    pub(crate) fn learn<D: ast_grep_core::Doc>(&mut self, root: &Node<D>) {
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            if node.kind().as_ref() != "preproc_def" {
                stack.extend(node.children());
                continue;
            }
            let Some(name) = node.field("name") else {
                continue;
            };
            let has_body = node
                .field("value")
                .is_some_and(|value| !value.text().trim().is_empty());
            if !has_body && self.empty.insert(name.text().to_string()) {
                tracing::debug!(name = %name.text(), "empty macro");
            }
        }
    }

    /// Expanded text, or `None` when nothing in `source` needed expanding.
    pub(crate) fn expand(&self, source: &str) -> Option<String> {
        let mut out = String::with_capacity(source.len());
        let mut changed = false;
        let mut rest = source;
        let mut line_start = true;

        while let Some(c) = rest.chars().next() {
            if line_start && c == '#' {
                let len = directive_len(rest);
                out.push_str(&rest[..len]);
                rest = &rest[len..];
                continue;
            }

            if c.is_ascii_alphanumeric() || c == '_' {
                let len = rest.find(|ch: char| !is_ident_char(ch)).unwrap_or(rest.len());
                let token = &rest[..len];
                rest = &rest[len..];
                line_start = false;

                if API_MACROS.contains(&token) {
                    if let Some((decl, consumed)) = rewrite_api_call(rest) {
                        let decl = self.expand(&decl).unwrap_or(decl);
                        out.push_str(&decl);
                        rest = &rest[consumed..];
                        changed = true;
                        continue;
                    }
                }
                if !c.is_ascii_digit() && self.empty.contains(token) {
                    out.push_str(&" ".repeat(len));
                    changed = true;
                } else {
                    out.push_str(token);
                }
                continue;
            }

            out.push(c);
            rest = &rest[c.len_utf8()..];
            line_start = c == '\n' || (line_start && (c == ' ' || c == '\t'));
        }

        changed.then_some(out)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Length of the directive at the start of `text`, through its final
/// newline. Backslash-continued lines belong to the directive.
fn directive_len(text: &str) -> usize {
    let mut end = 0;
    while let Some(pos) = text[end..].find('\n') {
        let line = text[end..end + pos].trim_end_matches('\r');
        end += pos + 1;
        if !line.ends_with('\\') {
            return end;
        }
    }
    text.len()
}

/// Rewrite the argument list following an API macro name.
///
/// Returns the declaration and how many bytes of `text` it replaces; a
/// trailing `;` is absorbed. Missing newlines are appended so the text
/// after the call keeps its line.
fn rewrite_api_call(text: &str) -> Option<(String, usize)> {
    let open = text.len() - text.trim_start().len();
    let (args, close) = split_arguments(&text[open..])?;
    let [ret, name, params] = args.as_slice() else {
        return None;
    };
    let params = params.trim();
    if !(params.starts_with('(') && params.ends_with(')')) {
        return None;
    }

    let mut consumed = open + close;
    let after = &text[consumed..];
    let gap = after.len() - after.trim_start().len();
    if after[gap..].starts_with(';') {
        consumed += gap + 1;
    }

    let mut decl = format!("{} {}{params};", ret.trim(), name.trim());
    let missing = text[..consumed]
        .matches('\n')
        .count()
        .saturating_sub(decl.matches('\n').count());
    decl.push_str(&"\n".repeat(missing));
    Some((decl, consumed))
}

/// Split `(a, b, (c, d))` at top-level commas. Returns the arguments and
/// the offset just past the closing parenthesis.
fn split_arguments(text: &str) -> Option<(Vec<&str>, usize)> {
    if !text.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    let mut start = 1;
    let mut args = Vec::new();
    for (idx, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    args.push(&text[start..idx]);
                    return Some((args, idx + 1));
                }
            }
            ',' if depth == 1 => {
                args.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    None
}
