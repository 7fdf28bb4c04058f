//! # Type Specifiers
//!
//! Canonical, serializable identity for the types carried by data pins,
//! variables and method signatures.
//!
//! A [`TypeSpecifier`] is a fully qualified name plus an ordered list of
//! generic arguments. Equality and hashing are both structural over
//! `(name, generic_arguments)`; the `is_enum` flag rides along as metadata
//! and is excluded from both, so specifiers are safe keys for hash-based
//! containers (`List<int>` and `List<string>` never collide as equal).
//! Two specifiers that share a name but disagree on `is_enum` indicate a
//! corrupt catalog; [`TypeSpecifier::try_eq`] reports that case instead of
//! silently comparing equal.

use crate::error::TypeError;
use crate::metadata::ReflectedType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fully qualified name of the root type every class derives from.
pub const OBJECT_TYPE_NAME: &str = "System.Object";

/// Names that count as primitive, in both the qualified and keyword spelling.
const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "System.Byte", "byte",
    "System.SByte", "sbyte",
    "System.Char", "char",
    "System.Int16", "short",
    "System.UInt16", "ushort",
    "System.Int32", "int",
    "System.UInt32", "uint",
    "System.Int64", "long",
    "System.UInt64", "ulong",
    "System.Single", "float",
    "System.Double", "double",
    "System.String", "string",
    "System.Boolean", "bool",
];

/// An unbound generic parameter such as the `T` in `List<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericType {
    pub name: String,
}

impl GenericType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A generic argument: either a concrete type or an unbound parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseType {
    Specifier(TypeSpecifier),
    Generic(GenericType),
}

impl BaseType {
    pub fn name(&self) -> &str {
        match self {
            BaseType::Specifier(spec) => spec.name(),
            BaseType::Generic(generic) => &generic.name,
        }
    }
}

impl From<TypeSpecifier> for BaseType {
    fn from(spec: TypeSpecifier) -> Self {
        BaseType::Specifier(spec)
    }
}

impl From<GenericType> for BaseType {
    fn from(generic: GenericType) -> Self {
        BaseType::Generic(generic)
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Specifier(spec) => spec.fmt(f),
            BaseType::Generic(generic) => f.write_str(&generic.name),
        }
    }
}

/// Identity of a type used for pin typing and compatibility checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpecifier {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    generic_arguments: Vec<BaseType>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_enum: bool,
}

impl TypeSpecifier {
    /// Create a non-generic, non-enum specifier from a fully qualified name.
    pub fn from_type_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_arguments: Vec::new(),
            is_enum: false,
        }
    }

    /// Create a specifier for an enum type.
    pub fn enum_type(name: impl Into<String>) -> Self {
        Self {
            is_enum: true,
            ..Self::from_type_name(name)
        }
    }

    /// Replace the generic argument list.
    pub fn with_generic_arguments(mut self, arguments: impl IntoIterator<Item = BaseType>) -> Self {
        self.generic_arguments = arguments.into_iter().collect();
        self
    }

    /// Convert a type description handed over by the metadata collaborator.
    ///
    /// The arity suffix (`` List`1 ``) is stripped and the namespace is
    /// prefixed. Generic arguments that are themselves unbound parameters
    /// become [`BaseType::Generic`]. A bare generic parameter has no
    /// specifier and is rejected.
    pub fn from_reflected_type(reflected: &ReflectedType) -> Result<Self, TypeError> {
        if reflected.is_generic_parameter {
            return Err(TypeError::GenericParameter(reflected.name.clone()));
        }

        let base_name = reflected.name.split('`').next().unwrap_or_default();
        let name = match reflected.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{}.{}", namespace, base_name),
            _ => base_name.to_string(),
        };

        let mut generic_arguments = Vec::with_capacity(reflected.generic_arguments.len());
        for argument in &reflected.generic_arguments {
            if argument.is_generic_parameter {
                generic_arguments.push(BaseType::Generic(GenericType::new(&argument.name)));
            } else {
                generic_arguments.push(BaseType::Specifier(Self::from_reflected_type(argument)?));
            }
        }

        Ok(Self {
            name,
            generic_arguments,
            is_enum: reflected.is_enum,
        })
    }

    pub fn object() -> Self {
        Self::from_type_name(OBJECT_TYPE_NAME)
    }

    pub fn int() -> Self {
        Self::from_type_name("System.Int32")
    }

    pub fn bool() -> Self {
        Self::from_type_name("System.Boolean")
    }

    pub fn string() -> Self {
        Self::from_type_name("System.String")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the qualified name (`System.Int32` -> `Int32`).
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn generic_arguments(&self) -> &[BaseType] {
        &self.generic_arguments
    }

    pub fn is_enum(&self) -> bool {
        self.is_enum
    }

    pub fn is_object(&self) -> bool {
        self.name == OBJECT_TYPE_NAME && self.generic_arguments.is_empty()
    }

    /// Primitive value types, strings and enums.
    pub fn is_primitive(&self) -> bool {
        self.is_enum
            || (self.generic_arguments.is_empty()
                && PRIMITIVE_TYPE_NAMES.contains(&self.name.as_str()))
    }

    /// Equality that reports two same-named specifiers with conflicting
    /// enum flags instead of treating them as equal.
    pub fn try_eq(&self, other: &Self) -> Result<bool, TypeError> {
        if self != other {
            return Ok(false);
        }
        if self.is_enum != other.is_enum {
            return Err(TypeError::EnumFlagConflict {
                name: self.name.clone(),
            });
        }
        Ok(true)
    }
}

impl PartialEq for TypeSpecifier {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.generic_arguments == other.generic_arguments
    }
}

impl Eq for TypeSpecifier {}

impl Hash for TypeSpecifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.generic_arguments.hash(state);
    }
}

impl fmt::Display for TypeSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.generic_arguments.is_empty() {
            f.write_str("<")?;
            for (index, argument) in self.generic_arguments.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", argument)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}
