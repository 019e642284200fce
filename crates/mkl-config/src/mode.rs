//! Output mode selection.

use serde::{Deserialize, Serialize};

/// What the generator writes. Exactly one mode per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Rust trait plus `f32`/`f64` impls calling the raw functions.
    #[default]
    Rust,
    /// C header re-declaring the selected prototypes.
    CHeader,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_rust() {
        assert_eq!(OutputMode::default(), OutputMode::Rust);
    }

    #[test]
    fn c_header_is_spelled_kebab_case() {
        let mode: OutputMode = figment::Figment::from(figment::providers::Serialized::default(
            "mode", "c-header",
        ))
        .extract_inner("mode")
        .expect("mode should deserialize");
        assert_eq!(mode, OutputMode::CHeader);
    }
}
