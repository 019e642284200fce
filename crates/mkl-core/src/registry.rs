//! Desired-function pattern registry.
//!
//! A pattern list has one entry per line. `cblas_*gemm` expands to
//! `cblas_dgemm` (64-bit) and `cblas_sgemm` (32-bit); `#` does the same with
//! the upper-case `D`/`S` infixes. The canonical name drops the separator
//! (`cblas_gemm`). Lines starting with `//` are comments.

use std::collections::HashMap;
use std::io::Read;

use crate::descriptor::Precision;
use crate::error::CoreError;

/// Separator expanding to lower-case precision infixes.
pub const LOWER_SEPARATOR: char = '*';
/// Separator expanding to upper-case precision infixes.
pub const UPPER_SEPARATOR: char = '#';

const COMMENT_PREFIX: &str = "//";

/// Outcome of looking a declared name up in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncMatch {
    pub is_32: bool,
    pub is_64: bool,
    pub canonical_name: String,
}

impl FuncMatch {
    const fn none() -> Self {
        Self {
            is_32: false,
            is_64: false,
            canonical_name: String::new(),
        }
    }

    /// Precision of the match, `None` when neither table knew the name.
    #[must_use]
    pub const fn precision(&self) -> Option<Precision> {
        if self.is_32 {
            Some(Precision::F32)
        } else if self.is_64 {
            Some(Precision::F64)
        } else {
            None
        }
    }
}

/// Expanded names of a single pattern line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Expansion {
    canonical: String,
    name_64: String,
    name_32: String,
}

/// Name lookup tables built once from the pattern list.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    for_f64: HashMap<String, String>,
    for_f32: HashMap<String, String>,
    desired: Vec<String>,
}

impl PatternRegistry {
    /// Build the registry from the text of a pattern list.
    ///
    /// Lines are trimmed of surrounding spaces; blank lines are ignored.
    ///
    /// # Errors
    /// Returns [`CoreError::MalformedPattern`] for a line with more than one
    /// separator or with an empty segment around its separator.
    pub fn load(source: &str) -> Result<Self, CoreError> {
        let mut registry = Self::default();

        for (idx, raw_line) in source.split('\n').enumerate() {
            let line = raw_line.trim_matches(|c| c == ' ' || c == '\r');
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            let expansion = expand(line).ok_or_else(|| CoreError::MalformedPattern {
                line: idx + 1,
                pattern: line.to_string(),
            })?;

            registry.desired.push(line.to_string());
            registry.for_f64.insert(expansion.name_64, expansion.canonical.clone());
            registry.for_f32.insert(expansion.name_32, expansion.canonical);
        }

        tracing::debug!(patterns = registry.desired.len(), "loaded pattern registry");
        Ok(registry)
    }

    /// Read a pattern list from any reader (a file or standard input).
    ///
    /// # Errors
    /// Returns [`CoreError::Io`] when reading fails, or the errors of [`Self::load`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CoreError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::load(&content)
    }

    /// Look up a declared C function name.
    ///
    /// The 32-bit table is consulted first, so a name that is both one
    /// pattern's 32-bit expansion and another's 64-bit expansion resolves as
    /// 32-bit.
    #[must_use]
    pub fn find_func(&self, raw_name: &str) -> FuncMatch {
        if let Some(canonical) = self.for_f32.get(raw_name) {
            return FuncMatch {
                is_32: true,
                is_64: false,
                canonical_name: canonical.clone(),
            };
        }
        if let Some(canonical) = self.for_f64.get(raw_name) {
            return FuncMatch {
                is_32: false,
                is_64: true,
                canonical_name: canonical.clone(),
            };
        }
        FuncMatch::none()
    }

    /// Pattern lines in input order, as written by the user.
    #[must_use]
    pub fn desired_func_list(&self) -> &[String] {
        &self.desired
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.desired.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.desired.is_empty()
    }
}

/// Expand one trimmed pattern line.
///
/// Literal names have no separator and expand to empty keys, so they are
/// recorded but never match a declaration.
fn expand(line: &str) -> Option<Expansion> {
    let separators = line
        .chars()
        .filter(|&c| c == LOWER_SEPARATOR || c == UPPER_SEPARATOR)
        .count();
    if separators > 1 {
        return None;
    }

    if line.contains(LOWER_SEPARATOR) {
        split_name(line, LOWER_SEPARATOR, "d", "s")
    } else if line.contains(UPPER_SEPARATOR) {
        split_name(line, UPPER_SEPARATOR, "D", "S")
    } else {
        Some(Expansion {
            canonical: String::new(),
            name_64: String::new(),
            name_32: String::new(),
        })
    }
}

fn split_name(line: &str, sep: char, infix_64: &str, infix_32: &str) -> Option<Expansion> {
    let fixes: Vec<&str> = line.split(sep).collect();
    let [prefix, suffix] = fixes.as_slice() else {
        return None;
    };
    if prefix.is_empty() || suffix.is_empty() {
        return None;
    }
    Some(Expansion {
        canonical: format!("{prefix}{suffix}"),
        name_64: format!("{prefix}{infix_64}{suffix}"),
        name_32: format!("{prefix}{infix_32}{suffix}"),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn hit(is_32: bool, name: &str) -> FuncMatch {
        FuncMatch {
            is_32,
            is_64: !is_32,
            canonical_name: name.to_string(),
        }
    }

    #[rstest]
    #[case("cblas_*gemm", "cblas_dgemm", "cblas_sgemm", "cblas_gemm")]
    #[case("v*Mul", "vdMul", "vsMul", "vMul")]
    #[case("LAPACKE_#gesv", "LAPACKE_Dgesv", "LAPACKE_Sgesv", "LAPACKE_gesv")]
    #[case("  cblas_*axpy  ", "cblas_daxpy", "cblas_saxpy", "cblas_axpy")]
    fn expands_both_variants(
        #[case] pattern: &str,
        #[case] name_64: &str,
        #[case] name_32: &str,
        #[case] canonical: &str,
    ) {
        let registry = PatternRegistry::load(pattern).expect("pattern should load");
        assert_eq!(registry.find_func(name_64), hit(false, canonical));
        assert_eq!(registry.find_func(name_32), hit(true, canonical));
    }

    #[test]
    fn unknown_name_is_no_match() {
        let registry = PatternRegistry::load("cblas_*gemm\n").expect("load");
        let found = registry.find_func("cblas_cgemm");
        assert_eq!(found, FuncMatch::none());
        assert_eq!(found.precision(), None);
    }

    #[test]
    fn literal_pattern_never_matches_itself() {
        let registry = PatternRegistry::load("mkl_malloc\n").expect("load");
        assert_eq!(registry.find_func("mkl_malloc"), FuncMatch::none());
        assert_eq!(registry.desired_func_list(), ["mkl_malloc"]);
    }

    #[test]
    fn literal_pattern_matches_when_another_pattern_expands_to_it() {
        let registry = PatternRegistry::load("vdMul\nv*Mul\n").expect("load");
        assert_eq!(registry.find_func("vdMul"), hit(false, "vMul"));
    }

    #[test]
    fn blank_lines_are_skipped_and_order_kept() {
        let source = "\n  cblas_*gemm\n\n   \nv*Mul\n";
        let registry = PatternRegistry::load(source).expect("load");
        assert_eq!(registry.desired_func_list(), ["cblas_*gemm", "v*Mul"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn thirty_two_bit_wins_on_collision() {
        // "ad*x" expands to 32-bit "adsx"; "a*sx" expands to 64-bit "adsx".
        for source in ["ad*x\na*sx\n", "a*sx\nad*x\n"] {
            let registry = PatternRegistry::load(source).expect("load");
            assert_eq!(registry.find_func("adsx"), hit(true, "adx"));
        }
    }

    #[test]
    fn comment_lines_are_not_patterns() {
        let registry = PatternRegistry::load("// level 3\ncblas_*gemm\n").expect("load");
        assert_eq!(registry.desired_func_list(), ["cblas_*gemm"]);
    }

    #[rstest]
    #[case("cblas_**gemm")]
    #[case("a*b*c")]
    #[case("*gemm")]
    #[case("cblas_*")]
    #[case("*")]
    #[case("LAPACKE_##gesv")]
    #[case("#")]
    #[case("v*Mul#")]
    fn malformed_patterns_fail(#[case] pattern: &str) {
        let err = PatternRegistry::load(pattern).expect_err("pattern should be rejected");
        assert!(
            matches!(err, CoreError::MalformedPattern { line: 1, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn malformed_error_reports_line_number() {
        let err = PatternRegistry::load("cblas_*gemm\n\nv**Mul\n").expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "line 3: 'v**Mul' doesn't contain a valid name"
        );
    }

    #[test]
    fn reads_from_reader() {
        let registry =
            PatternRegistry::from_reader("cblas_*dot\n".as_bytes()).expect("reader should load");
        assert_eq!(registry.find_func("cblas_sdot"), hit(true, "cblas_dot"));
    }
}
