//! # Node-Specific Handlers
//!
//! Text templates for each node kind and for member declarations. The
//! translators decide *when* something is emitted; these functions only
//! decide *how* it is spelled.

use crate::graph::{argument_name, ClassModifier, Method, MethodModifier, Variable, VariableModifier};
use crate::types::TypeSpecifier;
use std::collections::BTreeSet;

/// Keywords for a variable in canonical order: visibility, static,
/// readonly, new, const. Protected wins over public, public over internal.
pub(crate) fn variable_modifiers(modifiers: &BTreeSet<VariableModifier>) -> String {
    let mut keywords = Vec::new();

    if modifiers.contains(&VariableModifier::Protected) {
        keywords.push("protected");
    } else if modifiers.contains(&VariableModifier::Public) {
        keywords.push("public");
    } else if modifiers.contains(&VariableModifier::Internal) {
        keywords.push("internal");
    }

    let flags = [
        (VariableModifier::Static, "static"),
        (VariableModifier::ReadOnly, "readonly"),
        (VariableModifier::New, "new"),
        (VariableModifier::Const, "const"),
    ];
    keywords.extend(
        flags
            .iter()
            .filter(|(flag, _)| modifiers.contains(flag))
            .map(|(_, keyword)| *keyword),
    );

    prefix(&keywords)
}

pub(crate) fn method_modifiers(modifiers: &BTreeSet<MethodModifier>) -> String {
    let visibility = [
        (MethodModifier::Public, "public"),
        (MethodModifier::Protected, "protected"),
        (MethodModifier::Internal, "internal"),
        (MethodModifier::Private, "private"),
    ];
    let mut keywords: Vec<&str> = visibility
        .iter()
        .find(|(flag, _)| modifiers.contains(flag))
        .map(|(_, keyword)| *keyword)
        .into_iter()
        .collect();

    let flags = [
        (MethodModifier::Static, "static"),
        (MethodModifier::Abstract, "abstract"),
        (MethodModifier::Virtual, "virtual"),
        (MethodModifier::Override, "override"),
        (MethodModifier::Sealed, "sealed"),
    ];
    keywords.extend(
        flags
            .iter()
            .filter(|(flag, _)| modifiers.contains(flag))
            .map(|(_, keyword)| *keyword),
    );

    prefix(&keywords)
}

/// `partial` has to come last, directly before `class`.
pub(crate) fn class_modifiers(modifiers: &BTreeSet<ClassModifier>) -> String {
    let order = [
        (ClassModifier::Public, "public"),
        (ClassModifier::Internal, "internal"),
        (ClassModifier::Static, "static"),
        (ClassModifier::Abstract, "abstract"),
        (ClassModifier::Sealed, "sealed"),
        (ClassModifier::Partial, "partial"),
    ];
    let mut keywords: Vec<&str> = order
        .iter()
        .filter(|(flag, _)| modifiers.contains(flag))
        .map(|(_, keyword)| *keyword)
        .collect();

    if modifiers.contains(&ClassModifier::Public) && modifiers.contains(&ClassModifier::Internal) {
        keywords.retain(|keyword| *keyword != "internal");
    }

    prefix(&keywords)
}

fn prefix(keywords: &[&str]) -> String {
    keywords.iter().map(|keyword| format!("{} ", keyword)).collect()
}

pub(crate) fn variable_declaration(variable: &Variable) -> String {
    let modifiers = variable_modifiers(&variable.modifiers);
    match &variable.initial_value {
        Some(value) => format!(
            "{}{} {} = {};",
            modifiers, variable.variable_type, variable.name, value
        ),
        None => format!("{}{} {};", modifiers, variable.variable_type, variable.name),
    }
}

pub(crate) fn class_header(modifiers: &BTreeSet<ClassModifier>, name: &str, super_type: &TypeSpecifier) -> String {
    format!("{}class {} : {}", class_modifiers(modifiers), name, super_type)
}

/// `void`, the single type, or a tuple of all return types.
pub(crate) fn return_type(types: &[TypeSpecifier]) -> String {
    match types {
        [] => "void".to_string(),
        [single] => single.to_string(),
        many => format!("({})", join(many.iter().map(|t| t.to_string()))),
    }
}

pub(crate) fn method_signature(method: &Method) -> String {
    let parameters = method
        .argument_types()
        .iter()
        .enumerate()
        .map(|(index, ty)| format!("{} {}", ty, argument_name(index)));

    format!(
        "{}{} {}({})",
        method_modifiers(&method.modifiers),
        return_type(method.return_types()),
        method.name,
        join(parameters)
    )
}

pub(crate) fn call_method_expression(target: &str, method_name: &str, arguments: &[String]) -> String {
    format!("{}.{}({})", target, method_name, arguments.join(", "))
}

pub(crate) fn static_call_expression(declaring_type: &TypeSpecifier, function_name: &str, arguments: &[String]) -> String {
    format!("{}.{}({})", declaring_type, function_name, arguments.join(", "))
}

/// Statement invoking `expression` and binding each result to a named temporary.
pub(crate) fn bind_results(results: &[(TypeSpecifier, String)], expression: &str) -> String {
    match results {
        [] => format!("{};", expression),
        [(ty, name)] => format!("{} {} = {};", ty, name, expression),
        many => format!(
            "({}) = {};",
            join(many.iter().map(|(ty, name)| format!("{} {}", ty, name))),
            expression
        ),
    }
}

pub(crate) fn temp_declaration(ty: &TypeSpecifier, name: &str, expression: &str) -> String {
    format!("{} {} = {};", ty, name, expression)
}

pub(crate) fn variable_read(variable_name: &str) -> String {
    variable_name.to_string()
}

pub(crate) fn assignment(variable_name: &str, value: &str) -> String {
    format!("{} = {};", variable_name, value)
}

pub(crate) fn return_statement(values: &[String]) -> String {
    match values {
        [] => "return;".to_string(),
        [single] => format!("return {};", single),
        many => format!("return ({});", many.join(", ")),
    }
}

pub(crate) fn if_header(condition: &str) -> String {
    format!("if ({})", condition)
}

pub(crate) fn for_header(index: &str, initial: &str, max: &str) -> String {
    format!("for (int {i} = {}; {i} < {}; {i}++)", initial, max, i = index)
}

/// Source spelling of a literal node's value.
pub(crate) fn literal_expression(value: &str, ty: &TypeSpecifier) -> String {
    match ty.name() {
        "System.String" | "string" if !is_quoted(value, '"') => format!("\"{}\"", escape(value)),
        "System.Char" | "char" if !is_quoted(value, '\'') => format!("'{}'", escape(value)),
        "System.Boolean" | "bool" => value.to_ascii_lowercase(),
        _ if ty.is_enum() && !value.contains('.') => format!("{}.{}", ty, value),
        _ => value.to_string(),
    }
}

fn is_quoted(value: &str, quote: char) -> bool {
    value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote)
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Replace anything that cannot appear in an identifier.
pub(crate) fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}
