//! Descriptor aggregation for template consumption.

use std::collections::BTreeSet;

use crate::descriptor::{FunctionDescriptor, Precision};
use crate::extract::by_precision;

/// Separator between entries of the `use` list.
pub const USE_SEPARATOR: &str = ", ";

/// Extracted descriptors plus everything a template needs besides them.
#[derive(Debug, Clone, Default)]
pub struct BindingModel {
    funcs: Vec<FunctionDescriptor>,
    desired_func_list: Vec<String>,
}

impl BindingModel {
    #[must_use]
    pub const fn new(funcs: Vec<FunctionDescriptor>, desired_func_list: Vec<String>) -> Self {
        Self {
            funcs,
            desired_func_list,
        }
    }

    /// All descriptors in extraction order.
    #[must_use]
    pub fn funcs(&self) -> &[FunctionDescriptor] {
        &self.funcs
    }

    /// Pattern lines as the user wrote them.
    #[must_use]
    pub fn desired_func_list(&self) -> &[String] {
        &self.desired_func_list
    }

    #[must_use]
    pub fn f32_funcs(&self) -> Vec<&FunctionDescriptor> {
        by_precision(&self.funcs, Precision::F32).collect()
    }

    #[must_use]
    pub fn f64_funcs(&self) -> Vec<&FunctionDescriptor> {
        by_precision(&self.funcs, Precision::F64).collect()
    }

    /// Functions declared on the trait. Both precisions share one canonical
    /// signature over `Self`, so the 32-bit list is used.
    #[must_use]
    pub fn trait_funcs(&self) -> Vec<&FunctionDescriptor> {
        self.f32_funcs()
    }

    /// Sorted, deduplicated symbols to import: every raw function name and
    /// every mapped parameter type not excluded from imports.
    #[must_use]
    pub fn use_items(&self) -> Vec<String> {
        let mut uses = BTreeSet::new();
        for func in &self.funcs {
            uses.insert(func.raw_name.as_str());
            for param in &func.params {
                if !param.exclude_from_imports {
                    uses.insert(param.rust_type.as_str());
                }
            }
        }
        uses.into_iter().map(str::to_string).collect()
    }

    /// `provider::{a, b, c}` import path.
    #[must_use]
    pub fn use_line(&self, provider_crate: &str) -> String {
        format!(
            "{provider_crate}::{{{}}}",
            self.use_items().join(USE_SEPARATOR)
        )
    }
}
