//! tree-sitter-c nodes to the `mkl_core::decl` model.

use ast_grep_core::Node;
use mkl_core::decl::{
    Declaration, Declarator, Derived, FunctionDeclarator, InitDeclarator, ParameterDeclaration,
    Specifier,
};

const TYPE_SPECIFIER_KINDS: &[&str] = &[
    "primitive_type",
    "type_identifier",
    "sized_type_specifier",
    "struct_specifier",
    "union_specifier",
    "enum_specifier",
    "macro_type_specifier",
];

const DECLARATOR_KINDS: &[&str] = &[
    "identifier",
    "pointer_declarator",
    "function_declarator",
    "array_declarator",
    "parenthesized_declarator",
    "attributed_declarator",
    "init_declarator",
    "abstract_pointer_declarator",
    "abstract_function_declarator",
    "abstract_array_declarator",
    "abstract_parenthesized_declarator",
];

fn is_declarator<D: ast_grep_core::Doc>(node: &Node<D>) -> bool {
    DECLARATOR_KINDS.contains(&node.kind().as_ref())
}

/// Collapse runs of whitespace: `unsigned   long` -> `unsigned long`.
fn normalized_text<D: ast_grep_core::Doc>(node: &Node<D>) -> String {
    node.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert a `declaration` node.
pub(crate) fn convert_declaration<D: ast_grep_core::Doc>(node: &Node<D>) -> Declaration {
    let declarators = node
        .children()
        .filter(is_declarator)
        .map(|child| convert_init_declarator(&child))
        .collect();
    Declaration {
        specifiers: collect_specifiers(node),
        declarators,
        line: node.start_pos().line() + 1,
    }
}

/// Convert a `function_definition` node; the body is ignored.
pub(crate) fn convert_function_definition<D: ast_grep_core::Doc>(node: &Node<D>) -> Declaration {
    let declarators = node
        .field("declarator")
        .map(|declarator| InitDeclarator {
            declarator: convert_declarator(&declarator),
            has_initializer: false,
        })
        .into_iter()
        .collect();
    Declaration {
        specifiers: collect_specifiers(node),
        declarators,
        line: node.start_pos().line() + 1,
    }
}

fn convert_init_declarator<D: ast_grep_core::Doc>(node: &Node<D>) -> InitDeclarator {
    if node.kind().as_ref() == "init_declarator" {
        let declarator = node
            .field("declarator")
            .map_or_else(Declarator::default, |inner| convert_declarator(&inner));
        return InitDeclarator {
            declarator,
            has_initializer: true,
        };
    }
    InitDeclarator {
        declarator: convert_declarator(node),
        has_initializer: false,
    }
}

/// Classify the specifier children of a declaration or parameter.
pub(crate) fn collect_specifiers<D: ast_grep_core::Doc>(node: &Node<D>) -> Vec<Specifier> {
    let mut specifiers = Vec::new();
    for child in node.children() {
        let kind = child.kind();
        let text = normalized_text(&child);
        match kind.as_ref() {
            "storage_class_specifier" => {
                if matches!(
                    text.as_str(),
                    "inline" | "__inline" | "__inline__" | "__forceinline"
                ) {
                    specifiers.push(Specifier::Function(text));
                } else {
                    specifiers.push(Specifier::StorageClass(text));
                }
            }
            "type_qualifier" => specifiers.push(classify_qualifier(text)),
            "alignas_qualifier" => specifiers.push(Specifier::Alignment(text)),
            "attribute_specifier" | "attribute_declaration" | "ms_declspec_modifier" => {
                specifiers.push(Specifier::Attribute(text));
            }
            k if TYPE_SPECIFIER_KINDS.contains(&k) => {
                specifiers.push(Specifier::TypeSpecifier(text));
            }
            _ => {}
        }
    }
    specifiers
}

fn classify_qualifier(text: String) -> Specifier {
    if matches!(text.as_str(), "_Noreturn" | "noreturn") {
        Specifier::Function(text)
    } else if text.starts_with("_Alignas") || text.starts_with("alignas") {
        Specifier::Alignment(text)
    } else {
        Specifier::TypeQualifier(text)
    }
}

/// Pointer, array and function declarators name their inner declarator by
/// field. Anything else among their children (an array size such as
/// `[n]`) is not part of the declarator chain.
fn inner_declarator<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    node.field("declarator")
}

/// Parenthesized and attributed declarators wrap an unlabelled child.
fn wrapped_declarator<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    node.children().find(is_declarator)
}

/// Walk a declarator chain from the outside in, recording each shape.
///
/// `*x[]` is `pointer_declarator > array_declarator > identifier` and yields
/// `[Pointer, Array]` named `x`.
pub(crate) fn convert_declarator<D: ast_grep_core::Doc>(node: &Node<D>) -> Declarator {
    let mut declarator = Declarator::default();
    let mut current = Some(node.clone());

    while let Some(n) = current.take() {
        match n.kind().as_ref() {
            "identifier" => declarator.name = Some(n.text().to_string()),
            "pointer_declarator" | "abstract_pointer_declarator" => {
                let qualifiers = n
                    .children()
                    .filter(|c| c.kind().as_ref() == "type_qualifier")
                    .map(|c| normalized_text(&c))
                    .collect();
                declarator.derived.push(Derived::Pointer(qualifiers));
                current = inner_declarator(&n);
            }
            "array_declarator" | "abstract_array_declarator" => {
                declarator.derived.push(Derived::Array);
                current = inner_declarator(&n);
            }
            "function_declarator" | "abstract_function_declarator" => {
                declarator
                    .derived
                    .push(Derived::Function(convert_parameters(&n)));
                current = inner_declarator(&n);
            }
            "parenthesized_declarator"
            | "abstract_parenthesized_declarator"
            | "attributed_declarator" => current = wrapped_declarator(&n),
            other => declarator
                .derived
                .push(Derived::Unsupported(other.to_string())),
        }
    }

    declarator
}

fn convert_parameters<D: ast_grep_core::Doc>(func: &Node<D>) -> FunctionDeclarator {
    let mut func_decl = FunctionDeclarator::default();
    let Some(list) = func
        .field("parameters")
        .or_else(|| func.children().find(|c| c.kind().as_ref() == "parameter_list"))
    else {
        return func_decl;
    };

    for child in list.children() {
        match child.kind().as_ref() {
            "parameter_declaration" => func_decl.parameters.push(ParameterDeclaration {
                specifiers: collect_specifiers(&child),
                declarator: child.field("declarator").map(|d| convert_declarator(&d)),
            }),
            "variadic_parameter" | "..." => func_decl.variadic = true,
            _ => {}
        }
    }
    func_decl
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_source;

    fn first_declaration(source: &str) -> Declaration {
        let tree = parse_source(source);
        let root = tree.root();
        let node = root
            .children()
            .find(|c| c.kind().as_ref() == "declaration")
            .expect("source should contain a declaration");
        convert_declaration(&node)
    }

    fn ty(text: &str) -> Specifier {
        Specifier::TypeSpecifier(text.to_string())
    }

    fn qual(text: &str) -> Specifier {
        Specifier::TypeQualifier(text.to_string())
    }

    fn params(decl: &Declaration) -> &FunctionDeclarator {
        match decl.declarators[0].declarator.derived.last() {
            Some(Derived::Function(func)) => func,
            other => panic!("expected a function declarator, got {other:?}"),
        }
    }

    #[test]
    fn prototype_with_named_parameters() {
        let decl = first_declaration("void cblas_daxpy(const int N, const double *X, double *Y);");
        assert_eq!(decl.specifiers, [ty("void")]);
        assert_eq!(decl.declarators.len(), 1);
        assert_eq!(decl.declarators[0].declarator.name.as_deref(), Some("cblas_daxpy"));
        assert!(!decl.declarators[0].has_initializer);

        let func = params(&decl);
        assert!(!func.variadic);
        assert_eq!(func.parameters.len(), 3);
        assert_eq!(func.parameters[0].specifiers, [qual("const"), ty("int")]);
        assert_eq!(
            func.parameters[1].declarator,
            Some(Declarator::named("X").with(Derived::Pointer(Vec::new())))
        );
        assert_eq!(func.parameters[2].specifiers, [ty("double")]);
    }

    #[test]
    fn abstract_parameters_have_no_name() {
        let decl = first_declaration("double vdNorm(int, const double *, double[]);");
        let func = params(&decl);
        assert_eq!(func.parameters[0].declarator, None);
        assert_eq!(
            func.parameters[1].declarator,
            Some(Declarator::anonymous().with(Derived::Pointer(Vec::new())))
        );
        assert_eq!(
            func.parameters[2].declarator,
            Some(Declarator::anonymous().with(Derived::Array))
        );
    }

    #[test]
    fn array_parameter_name_comes_from_inner_declarator() {
        let decl = first_declaration("void vdAdd(const int n, const double a[], double r[4]);");
        let func = params(&decl);
        assert_eq!(
            func.parameters[1].declarator,
            Some(Declarator::named("a").with(Derived::Array))
        );
        assert_eq!(
            func.parameters[2].declarator,
            Some(Declarator::named("r").with(Derived::Array))
        );
    }

    #[test]
    fn array_size_is_not_a_parameter_name() {
        let decl = first_declaration("void vdFoo(const int n, const double [n], double *);");
        let func = params(&decl);
        assert_eq!(
            func.parameters[1].declarator,
            Some(Declarator::anonymous().with(Derived::Array))
        );

        let named = first_declaration("void vdBar(const int n, double r[n]);");
        assert_eq!(
            params(&named).parameters[1].declarator,
            Some(Declarator::named("r").with(Derived::Array))
        );
    }

    #[test]
    fn pointer_returning_function() {
        let decl = first_declaration("void *mkl_malloc(size_t size, int align);");
        let declarator = &decl.declarators[0].declarator;
        assert_eq!(declarator.name.as_deref(), Some("mkl_malloc"));
        assert!(matches!(
            declarator.derived.as_slice(),
            [Derived::Pointer(_), Derived::Function(_)]
        ));
    }

    #[test]
    fn storage_class_and_qualified_pointer() {
        let decl = first_declaration("extern void f(double * const restrict x);");
        assert_eq!(
            decl.specifiers,
            [Specifier::StorageClass("extern".to_string()), ty("void")]
        );
        let declarator = params(&decl).parameters[0]
            .declarator
            .clone()
            .expect("named parameter");
        assert_eq!(
            declarator.derived,
            [Derived::Pointer(vec!["const".to_string(), "restrict".to_string()])]
        );
    }

    #[test]
    fn variadic_parameter_is_flagged() {
        let decl = first_declaration("int mkl_printf(const char *fmt, ...);");
        assert!(params(&decl).variadic);
    }

    #[test]
    fn function_pointer_parameter_keeps_function_shape() {
        let decl = first_declaration("void f(double (*cb)(double));");
        let declarator = params(&decl).parameters[0]
            .declarator
            .clone()
            .expect("named parameter");
        assert_eq!(declarator.name.as_deref(), Some("cb"));
        assert!(matches!(
            declarator.derived.as_slice(),
            [Derived::Function(_), Derived::Pointer(_)]
        ));
    }

    #[test]
    fn sized_type_is_normalized() {
        let decl = first_declaration("unsigned   long mkl_count(void);");
        assert_eq!(decl.specifiers, [ty("unsigned long")]);
        let func = params(&decl);
        assert_eq!(func.parameters.len(), 1);
        assert_eq!(func.parameters[0].specifiers, [ty("void")]);
        assert_eq!(func.parameters[0].declarator, None);
    }

    #[test]
    fn variable_with_initializer() {
        let decl = first_declaration("int mkl_flag = 1, other;");
        assert_eq!(decl.declarators.len(), 2);
        assert!(decl.declarators[0].has_initializer);
        assert_eq!(decl.declarators[0].declarator.name.as_deref(), Some("mkl_flag"));
        assert!(!decl.declarators[1].has_initializer);
        assert!(decl.declarators[1].declarator.derived.is_empty());
    }

    #[test]
    fn multiple_function_declarators() {
        let decl = first_declaration("void vdMul(int n), vsMul(int n);");
        let names: Vec<_> = decl
            .declarators
            .iter()
            .filter_map(|d| d.declarator.name.as_deref())
            .collect();
        assert_eq!(names, ["vdMul", "vsMul"]);
    }

    #[test]
    fn line_numbers_are_one_based() {
        let decl = first_declaration("\n\nvoid f(void);");
        assert_eq!(decl.line, 3);
    }
}
