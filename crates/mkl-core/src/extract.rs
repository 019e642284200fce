//! Declaration extractor: C declarations to [`FunctionDescriptor`]s.
//!
//! Only declarations whose name resolves in the [`PatternRegistry`] are kept.
//! Shapes this tool does not model (variadics, function pointer parameters,
//! multi-dimensional arrays) drop the whole function instead of producing a
//! descriptor with a wrong signature.

use std::collections::HashSet;
use std::fmt;

use crate::decl::{
    Declaration, DeclarationSource, Declarator, Derived, FunctionDeclarator, InitDeclarator,
    ParameterDeclaration, Specifier,
};
use crate::descriptor::{FunctionDescriptor, Parameter, Precision};
use crate::registry::PatternRegistry;
use crate::type_map::map_type;

/// Why a declarator produced no descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    NotAFunction,
    Initialized,
    Unnamed,
    Unmatched,
    Variadic,
    MissingType,
    UnsupportedShape(String),
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAFunction => f.write_str("not a function declarator"),
            Self::Initialized => f.write_str("declarator has an initializer"),
            Self::Unnamed => f.write_str("no function name"),
            Self::Unmatched => f.write_str("name not in pattern list"),
            Self::Variadic => f.write_str("variadic function"),
            Self::MissingType => f.write_str("missing type specifier"),
            Self::UnsupportedShape(kind) => write!(f, "unsupported declarator shape: {kind}"),
        }
    }
}

/// Extract every matching function from a declaration source, in source order.
///
/// Each raw name yields at most one descriptor. A prototype repeated in
/// both branches of an `#if`/`#else` keeps its first occurrence.
pub fn extract_all<S>(source: &S, registry: &PatternRegistry) -> Vec<FunctionDescriptor>
where
    S: DeclarationSource + ?Sized,
{
    let declarations = source.declarations();
    let mut seen = HashSet::new();
    let mut funcs = Vec::new();
    for decl in &declarations {
        for func in extract_declaration(decl, registry) {
            if seen.insert(func.raw_name.clone()) {
                funcs.push(func);
            } else {
                tracing::debug!(
                    line = decl.line,
                    name = %func.raw_name,
                    "skipping repeated declaration"
                );
            }
        }
    }
    tracing::info!(
        declarations = declarations.len(),
        matched = funcs.len(),
        "extracted function descriptors"
    );
    funcs
}

/// Extract the matching functions of one declaration.
///
/// `int f(int), g(double);` declares two functions; each declarator is
/// considered on its own.
#[must_use]
pub fn extract_declaration(
    decl: &Declaration,
    registry: &PatternRegistry,
) -> Vec<FunctionDescriptor> {
    let mut funcs = Vec::new();
    for init in &decl.declarators {
        match extract_function(&decl.specifiers, init, registry) {
            Ok(func) => funcs.push(func),
            Err(Skip::Unmatched | Skip::NotAFunction) => {}
            Err(reason) => {
                tracing::debug!(
                    line = decl.line,
                    name = init.declarator.name.as_deref().unwrap_or_default(),
                    %reason,
                    "skipping declaration"
                );
            }
        }
    }
    funcs
}

/// Build a descriptor from one declarator of a declaration.
///
/// # Errors
/// Returns the [`Skip`] reason when the declarator is not a matching,
/// supported function prototype. Skips are normal control flow.
pub fn extract_function(
    specifiers: &[Specifier],
    init: &InitDeclarator,
    registry: &PatternRegistry,
) -> Result<FunctionDescriptor, Skip> {
    if init.has_initializer {
        return Err(Skip::Initialized);
    }

    let (return_shape, func) = split_function(&init.declarator)?;
    let name = init.declarator.name.as_deref().ok_or(Skip::Unnamed)?;

    let found = registry.find_func(name);
    let precision = found.precision().ok_or(Skip::Unmatched)?;

    let return_type = spell_type(&base_type(specifiers)?, return_shape);
    let params = extract_parameters(func)?;

    Ok(FunctionDescriptor {
        raw_name: name.to_string(),
        precision,
        canonical_name: found.canonical_name,
        return_type,
        params,
    })
}

/// Split a declarator into the pointer levels of the return type and the
/// parameter list. The function shape must be innermost, directly around
/// the name; `(*fp)(int)` and `arr[4]` are not plain function declarators.
fn split_function(declarator: &Declarator) -> Result<(&[Derived], &FunctionDeclarator), Skip> {
    let Some((Derived::Function(func), outer)) = declarator.derived.split_last() else {
        return Err(Skip::NotAFunction);
    };
    if outer.iter().any(|d| !matches!(d, Derived::Pointer(_))) {
        return Err(Skip::NotAFunction);
    }
    Ok((outer, func))
}

/// Base type spelling from a specifier chain: qualifiers and type
/// specifiers in source order. Storage class, function, alignment, and
/// attribute specifiers do not contribute.
///
/// # Errors
/// [`Skip::MissingType`] when no type specifier is present.
pub fn base_type(specifiers: &[Specifier]) -> Result<String, Skip> {
    let mut parts = Vec::new();
    let mut has_type = false;
    for spec in specifiers {
        match spec {
            Specifier::TypeQualifier(text) => parts.push(text.as_str()),
            Specifier::TypeSpecifier(text) => {
                has_type = true;
                parts.push(text.as_str());
            }
            Specifier::StorageClass(_)
            | Specifier::Function(_)
            | Specifier::Alignment(_)
            | Specifier::Attribute(_) => {}
        }
    }
    if has_type {
        Ok(parts.join(" "))
    } else {
        Err(Skip::MissingType)
    }
}

/// Append declarator shape markers to a base type: `*` per pointer level
/// (followed by that level's qualifiers) and `[]` per array.
#[must_use]
pub fn spell_type(base: &str, derived: &[Derived]) -> String {
    let mut spelled = base.to_string();
    for level in derived {
        match level {
            Derived::Pointer(qualifiers) => {
                if !spelled.ends_with('*') {
                    spelled.push(' ');
                }
                spelled.push('*');
                spelled.push_str(&qualifiers.join(" "));
            }
            Derived::Array => spelled.push_str("[]"),
            Derived::Function(_) | Derived::Unsupported(_) => {}
        }
    }
    spelled
}

/// Parameters in declaration order. Unnamed parameters become `p<index>`
/// with the zero-based position in the list.
fn extract_parameters(func: &FunctionDeclarator) -> Result<Vec<Parameter>, Skip> {
    if func.variadic {
        return Err(Skip::Variadic);
    }
    if is_void_list(&func.parameters) {
        return Ok(Vec::new());
    }

    let mut params = Vec::with_capacity(func.parameters.len());
    for (idx, decl) in func.parameters.iter().enumerate() {
        let base = base_type(&decl.specifiers)?;
        let (name, shape) = match &decl.declarator {
            Some(declarator) => (declarator.name.clone(), declarator.derived.as_slice()),
            None => (None, [].as_slice()),
        };
        check_parameter_shape(shape)?;

        let c_type = spell_type(&base, shape);
        let mapped = map_type(&c_type);
        params.push(Parameter {
            name: name.unwrap_or_else(|| format!("p{idx}")),
            c_type,
            rust_type: mapped.rust_type,
            exclude_from_imports: mapped.exclude_from_imports,
        });
    }
    Ok(params)
}

/// `f(void)` declares no parameters.
fn is_void_list(parameters: &[ParameterDeclaration]) -> bool {
    let [only] = parameters else {
        return false;
    };
    let shapeless = only
        .declarator
        .as_ref()
        .is_none_or(|d| d.name.is_none() && d.derived.is_empty());
    shapeless && base_type(&only.specifiers).is_ok_and(|base| base == "void")
}

/// Accept pointer levels optionally followed by one innermost array.
fn check_parameter_shape(shape: &[Derived]) -> Result<(), Skip> {
    let mut seen_array = false;
    for level in shape {
        match level {
            Derived::Pointer(_) if !seen_array => {}
            Derived::Pointer(_) => {
                return Err(Skip::UnsupportedShape("pointer to array".to_string()));
            }
            Derived::Array if !seen_array => seen_array = true,
            Derived::Array => {
                return Err(Skip::UnsupportedShape("multi-dimensional array".to_string()));
            }
            Derived::Function(_) => {
                return Err(Skip::UnsupportedShape("function pointer parameter".to_string()));
            }
            Derived::Unsupported(kind) => return Err(Skip::UnsupportedShape(kind.clone())),
        }
    }
    Ok(())
}

/// Keep only descriptors of one precision, in extraction order.
pub fn by_precision(
    funcs: &[FunctionDescriptor],
    precision: Precision,
) -> impl Iterator<Item = &FunctionDescriptor> {
    funcs.iter().filter(move |f| f.precision == precision)
}
