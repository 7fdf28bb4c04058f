//! # Classes
//!
//! A class owns its member variables (attributes) and method graphs, both in
//! declaration order. Member names are unique within a class; methods may
//! share a name only when their argument types differ.

use super::method::Method;
use crate::error::GraphError;
use crate::types::TypeSpecifier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableModifier {
    Public,
    Protected,
    Internal,
    Static,
    ReadOnly,
    New,
    Const,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub variable_type: TypeSpecifier,
    #[serde(default)]
    pub modifiers: BTreeSet<VariableModifier>,
    /// Initializer as target-language source text.
    #[serde(default)]
    pub initial_value: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, variable_type: TypeSpecifier) -> Self {
        Self {
            name: name.into(),
            variable_type,
            modifiers: BTreeSet::new(),
            initial_value: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = VariableModifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassModifier {
    Public,
    Internal,
    Static,
    Abstract,
    Sealed,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub namespace: String,
    pub super_type: TypeSpecifier,
    #[serde(default)]
    pub modifiers: BTreeSet<ClassModifier>,
    #[serde(default)]
    attributes: Vec<Variable>,
    #[serde(default)]
    methods: Vec<Method>,
}

impl Class {
    /// A public class deriving from `System.Object`.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            super_type: TypeSpecifier::object(),
            modifiers: BTreeSet::from([ClassModifier::Public]),
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_super_type(mut self, super_type: TypeSpecifier) -> Self {
        self.super_type = super_type;
        self
    }

    /// `Namespace.Name`, or just the name outside any namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn attributes(&self) -> &[Variable] {
        &self.attributes
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_mut(&mut self, name: &str) -> Option<&mut Method> {
        self.methods.iter_mut().find(|m| m.name == name)
    }

    pub fn add_attribute(&mut self, variable: Variable) -> Result<(), GraphError> {
        if self.attributes.iter().any(|v| v.name == variable.name)
            || self.methods.iter().any(|m| m.name == variable.name)
        {
            return Err(self.duplicate(&variable.name));
        }
        self.attributes.push(variable);
        Ok(())
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Variable> {
        let index = self.attributes.iter().position(|v| v.name == name)?;
        Some(self.attributes.remove(index))
    }

    pub fn add_method(&mut self, method: Method) -> Result<(), GraphError> {
        let clashes_with_overload = self
            .methods
            .iter()
            .any(|m| m.name == method.name && m.argument_types() == method.argument_types());
        if clashes_with_overload || self.attributes.iter().any(|v| v.name == method.name) {
            return Err(self.duplicate(&method.name));
        }
        self.methods.push(method);
        Ok(())
    }

    pub fn remove_method(&mut self, name: &str) -> Option<Method> {
        let index = self.methods.iter().position(|m| m.name == name)?;
        Some(self.methods.remove(index))
    }

    fn duplicate(&self, name: &str) -> GraphError {
        GraphError::DuplicateName {
            scope: format!("class '{}'", self.full_name()),
            name: name.to_string(),
        }
    }

    /// Member names declared more than once, in first-clash order.
    ///
    /// Classes built through [`Class::add_attribute`] and
    /// [`Class::add_method`] never have any, but deserialized ones may.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut signatures = HashSet::new();
        let mut duplicates = Vec::new();

        for variable in &self.attributes {
            if !seen.insert(variable.name.as_str()) && !duplicates.contains(&variable.name) {
                duplicates.push(variable.name.clone());
            }
        }

        let attribute_names: HashSet<&str> = self.attributes.iter().map(|v| v.name.as_str()).collect();
        for method in &self.methods {
            let clash = attribute_names.contains(method.name.as_str())
                || !signatures.insert((method.name.as_str(), method.argument_types()));
            if clash && !duplicates.contains(&method.name) {
                duplicates.push(method.name.clone());
            }
        }

        duplicates
    }
}

/// First of `base`, `base2`, `base3`, ... not present in `existing`.
pub fn unique_name(base: &str, existing: &[String]) -> String {
    if !existing.iter().any(|name| name == base) {
        return base.to_string();
    }

    (2..)
        .map(|counter| format!("{}{}", base, counter))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
