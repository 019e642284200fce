//! # mkl-render
//!
//! Renders a [`BindingModel`] through minijinja templates: Rust bindings
//! (a trait over `Self` plus `f32`/`f64` impls) or a C header restating the
//! selected prototypes.

mod context;
mod error;

pub use context::{FuncView, TemplateContext, VariantView};
pub use error::RenderError;

use minijinja::Environment;
use mkl_config::{GeneratorConfig, OutputMode};
use mkl_core::BindingModel;

const RUST_TEMPLATE: &str = "bindings.rs.j2";
const HEADER_TEMPLATE: &str = "header.h.j2";

/// Template environment with both output templates loaded.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// # Errors
    /// Returns [`RenderError::Template`] if an embedded template fails to compile.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_template(RUST_TEMPLATE, include_str!("../templates/bindings.rs.j2"))?;
        env.add_template(HEADER_TEMPLATE, include_str!("../templates/header.h.j2"))?;
        Ok(Self { env })
    }

    /// Render the model in the configured output mode.
    ///
    /// # Errors
    /// Returns [`RenderError::Template`] when rendering fails.
    pub fn render(
        &self,
        model: &BindingModel,
        config: &GeneratorConfig,
    ) -> Result<String, RenderError> {
        let name = match config.mode {
            OutputMode::Rust => RUST_TEMPLATE,
            OutputMode::CHeader => HEADER_TEMPLATE,
        };
        let ctx = TemplateContext::new(model, config);
        let rendered = self.env.get_template(name)?.render(&ctx)?;
        tracing::debug!(template = name, bytes = rendered.len(), "rendered output");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use mkl_core::{FunctionDescriptor, Parameter, Precision};
    use pretty_assertions::assert_eq;

    use super::*;

    fn param(name: &str, c_type: &str, rust_type: &str, exclude: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            c_type: c_type.to_string(),
            rust_type: rust_type.to_string(),
            exclude_from_imports: exclude,
        }
    }

    fn dot(raw: &str, precision: Precision, elem: &str) -> FunctionDescriptor {
        FunctionDescriptor {
            raw_name: raw.to_string(),
            precision,
            canonical_name: "cblas_dot".to_string(),
            return_type: elem.to_string(),
            params: vec![
                param("N", "const MKL_INT", "MKL_INT", false),
                param("X", &format!("const {elem} *"), "*const Self", true),
            ],
        }
    }

    fn model() -> BindingModel {
        BindingModel::new(
            vec![
                dot("cblas_sdot", Precision::F32, "float"),
                dot("cblas_ddot", Precision::F64, "double"),
            ],
            vec!["cblas_*dot".to_string()],
        )
    }

    fn render(mode: OutputMode) -> String {
        let config = GeneratorConfig {
            mode,
            provider_crate: "mkl_sys".to_string(),
            ..GeneratorConfig::default()
        };
        Renderer::new()
            .expect("templates compile")
            .render(&model(), &config)
            .expect("render succeeds")
    }

    #[test]
    fn rust_output_has_use_line_and_trait() {
        let out = render(OutputMode::Rust);
        assert!(out.contains("use mkl_sys::{MKL_INT, cblas_ddot, cblas_sdot};\n"), "{out}");
        assert!(out.contains("pub trait MKLRoutines: Sized {\n"), "{out}");
        assert!(
            out.contains("    unsafe fn cblas_dot(N: MKL_INT, X: *const Self) -> Self;\n"),
            "{out}"
        );
        assert!(out.contains("//   cblas_*dot\n"), "{out}");
    }

    #[test]
    fn rust_output_implements_both_precisions() {
        let out = render(OutputMode::Rust);
        assert!(out.contains("impl MKLRoutines for f32 {"), "{out}");
        assert!(out.contains("impl MKLRoutines for f64 {"), "{out}");
        assert!(out.contains("unsafe { cblas_sdot(N, X) }"), "{out}");
        assert!(out.contains("unsafe { cblas_ddot(N, X) }"), "{out}");
        assert!(!out.contains("{%"), "unrendered tag in {out}");
    }

    #[test]
    fn header_output_declares_prototypes() {
        let out = render(OutputMode::CHeader);
        assert!(out.starts_with("/* Code generated by gen-mkl-rs. DO NOT EDIT. */\n"));
        assert!(out.contains("#ifndef MKLROUTINES_H\n"), "{out}");
        assert!(
            out.contains("float cblas_sdot(const MKL_INT N, const float *X);\n"),
            "{out}"
        );
        assert!(
            out.contains("double cblas_ddot(const MKL_INT N, const double *X);\n"),
            "{out}"
        );
        assert!(!out.contains("impl MKLRoutines"), "{out}");
    }

    #[test]
    fn rendering_is_reproducible() {
        assert_eq!(render(OutputMode::Rust), render(OutputMode::Rust));
        assert_eq!(render(OutputMode::CHeader), render(OutputMode::CHeader));
    }
}
