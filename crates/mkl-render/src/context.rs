//! Template context built from a [`BindingModel`].

use mkl_config::GeneratorConfig;
use mkl_core::{BindingModel, FunctionDescriptor, Parameter, Precision};
use serde::Serialize;

/// One function as templates see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncView {
    pub raw_name: String,
    pub canonical_name: String,
    pub return_type: String,
    /// ` -> i32`, or empty for `void`.
    pub return_suffix: String,
    /// `name: RustType` pairs.
    pub params: Vec<String>,
    pub call_params: Vec<String>,
    /// Full C prototype without the trailing `;`.
    pub c_declaration: String,
}

impl From<&FunctionDescriptor> for FuncView {
    fn from(func: &FunctionDescriptor) -> Self {
        let return_declare = func.return_declare();
        let return_suffix = if return_declare.is_empty() {
            String::new()
        } else {
            format!(" {return_declare}")
        };
        Self {
            raw_name: func.raw_name.clone(),
            canonical_name: func.canonical_name.clone(),
            return_type: func.return_type.clone(),
            return_suffix,
            params: func.rust_params(),
            call_params: func.call_params(),
            c_declaration: c_declaration(func),
        }
    }
}

/// Functions of one precision.
#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub element_type: &'static str,
    pub funcs: Vec<FuncView>,
}

/// Everything the templates may reference.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    pub trait_name: String,
    pub use_line: String,
    pub include_guard: String,
    pub desired_func_list: Vec<String>,
    pub trait_funcs: Vec<FuncView>,
    /// 32-bit first, then 64-bit.
    pub variants: Vec<VariantView>,
}

impl TemplateContext {
    #[must_use]
    pub fn new(model: &BindingModel, config: &GeneratorConfig) -> Self {
        let views = |funcs: Vec<&FunctionDescriptor>| -> Vec<FuncView> {
            funcs.into_iter().map(FuncView::from).collect()
        };
        Self {
            trait_name: config.trait_name.clone(),
            use_line: model.use_line(&config.provider_crate),
            include_guard: format!("{}_H", config.trait_name.to_ascii_uppercase()),
            desired_func_list: model.desired_func_list().to_vec(),
            trait_funcs: views(model.trait_funcs()),
            variants: vec![
                VariantView {
                    element_type: Precision::F32.element_type(),
                    funcs: views(model.f32_funcs()),
                },
                VariantView {
                    element_type: Precision::F64.element_type(),
                    funcs: views(model.f64_funcs()),
                },
            ],
        }
    }
}

/// Join a C type spelling and a name: `double *x`, `const double a[]`, `int n`.
fn c_param(param: &Parameter) -> String {
    if let Some(base) = param.c_type.strip_suffix("[]") {
        format!("{base} {}[]", param.name)
    } else if param.c_type.ends_with('*') {
        format!("{}{}", param.c_type, param.name)
    } else {
        format!("{} {}", param.c_type, param.name)
    }
}

fn c_declaration(func: &FunctionDescriptor) -> String {
    let params = if func.params.is_empty() {
        "void".to_string()
    } else {
        func.params.iter().map(c_param).collect::<Vec<_>>().join(", ")
    };
    let separator = if func.return_type.ends_with('*') { "" } else { " " };
    format!(
        "{}{separator}{}({params})",
        func.return_type, func.raw_name
    )
}
