//! # Type Metadata
//!
//! The [`TypeCatalog`] is the only window the graph core has onto the type
//! system of the target platform. Connection checks ask it whether one type
//! derives from another; node construction asks it for callable methods.
//!
//! Implementations must be pure from the caller's point of view: catalogs
//! are shared read-only across concurrent class translations.
//!
//! [`MemoryTypeCatalog`] is an in-memory implementation populated from
//! [`ReflectedType`] descriptions, typically produced by an external
//! reflection tool and handed over as JSON.

use crate::error::{CatalogError, TypeError};
use crate::types::TypeSpecifier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Read-only type system queries used by the graph core.
pub trait TypeCatalog: Send + Sync {
    /// Whether `a` is a strict subtype of `b` (derives from or implements it).
    fn is_subtype_of(&self, a: &TypeSpecifier, b: &TypeSpecifier) -> bool;

    /// Public instance methods callable on `ty`.
    fn public_methods(&self, _ty: &TypeSpecifier) -> Vec<MethodSpecifier> {
        Vec::new()
    }

    /// Every public static function known to the catalog.
    fn static_functions(&self) -> Vec<MethodSpecifier> {
        Vec::new()
    }

    /// Static functions whose first return value is `ty`.
    fn static_functions_with_return_type(&self, ty: &TypeSpecifier) -> Vec<MethodSpecifier> {
        self.static_functions()
            .into_iter()
            .filter(|function| function.return_types.first() == Some(ty))
            .collect()
    }

    /// Member names of an enum type.
    fn enum_names(&self, _ty: &TypeSpecifier) -> Vec<String> {
        Vec::new()
    }
}

/// A value of type `from` may flow into a pin of type `to`.
///
/// Two specifiers naming the same type but disagreeing on whether it is an
/// enum are reported as [`TypeError::EnumFlagConflict`].
pub fn check_assignable(
    from: &TypeSpecifier,
    to: &TypeSpecifier,
    catalog: &dyn TypeCatalog,
) -> Result<bool, TypeError> {
    Ok(from.try_eq(to)? || catalog.is_subtype_of(from, to))
}

/// Like [`check_assignable`], treating a conflict as not assignable.
pub fn is_assignable(from: &TypeSpecifier, to: &TypeSpecifier, catalog: &dyn TypeCatalog) -> bool {
    check_assignable(from, to, catalog).unwrap_or(false)
}

/// Signature of a callable method or static function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpecifier {
    pub name: String,
    pub declaring_type: TypeSpecifier,
    #[serde(default)]
    pub argument_types: Vec<TypeSpecifier>,
    #[serde(default)]
    pub return_types: Vec<TypeSpecifier>,
    #[serde(default)]
    pub is_static: bool,
}

impl MethodSpecifier {
    fn from_reflected(declaring_type: &TypeSpecifier, method: &ReflectedMethod) -> Result<Self, TypeError> {
        let argument_types = method
            .parameter_types
            .iter()
            .map(TypeSpecifier::from_reflected_type)
            .collect::<Result<Vec<_>, _>>()?;

        let return_types = match &method.return_type {
            Some(ret) if !is_void(ret) => vec![TypeSpecifier::from_reflected_type(ret)?],
            _ => Vec::new(),
        };

        Ok(Self {
            name: method.name.clone(),
            declaring_type: declaring_type.clone(),
            argument_types,
            return_types,
            is_static: method.is_static,
        })
    }
}

fn is_void(ty: &ReflectedType) -> bool {
    ty.name == "Void" && ty.namespace.as_deref() == Some("System")
}

fn default_true() -> bool {
    true
}

/// Type description handed over by a reflection collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectedType {
    /// Simple name, possibly carrying a generic arity suffix (`` List`1 ``).
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub is_generic_parameter: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub generic_arguments: Vec<ReflectedType>,
    #[serde(default)]
    pub base_type: Option<Box<ReflectedType>>,
    #[serde(default)]
    pub interfaces: Vec<ReflectedType>,
    #[serde(default)]
    pub methods: Vec<ReflectedMethod>,
    #[serde(default)]
    pub enum_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectedMethod {
    pub name: String,
    #[serde(default)]
    pub parameter_types: Vec<ReflectedType>,
    #[serde(default)]
    pub return_type: Option<ReflectedType>,
    #[serde(default)]
    pub is_static: bool,
    /// Property accessors and event plumbing; never offered as call nodes.
    #[serde(default)]
    pub is_special_name: bool,
}

#[derive(Debug, Clone, Default)]
struct CatalogEntry {
    bases: Vec<TypeSpecifier>,
    methods: Vec<MethodSpecifier>,
    enum_names: Vec<String>,
}

/// In-memory [`TypeCatalog`] keyed by qualified type name.
///
/// Every type other than `System.Object` is treated as deriving from it,
/// whether or not it was registered.
#[derive(Debug, Clone, Default)]
pub struct MemoryTypeCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl MemoryTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type together with its direct base types and interfaces.
    pub fn with_type(mut self, ty: TypeSpecifier, bases: impl IntoIterator<Item = TypeSpecifier>) -> Self {
        self.register_type(ty, bases);
        self
    }

    pub fn register_type(&mut self, ty: TypeSpecifier, bases: impl IntoIterator<Item = TypeSpecifier>) {
        let entry = self.entries.entry(ty.name().to_string()).or_default();
        entry.bases.extend(bases);
    }

    /// Register a method on its declaring type.
    pub fn register_method(&mut self, method: MethodSpecifier) {
        self.entries
            .entry(method.declaring_type.name().to_string())
            .or_default()
            .methods
            .push(method);
    }

    pub fn register_enum(&mut self, ty: &TypeSpecifier, names: impl IntoIterator<Item = String>) {
        self.entries
            .entry(ty.name().to_string())
            .or_default()
            .enum_names
            .extend(names);
    }

    /// Build a catalog from reflected descriptions. Non-public types and
    /// special-name methods are skipped.
    pub fn from_reflected_types(types: &[ReflectedType]) -> Result<Self, TypeError> {
        let mut catalog = Self::new();

        for reflected in types.iter().filter(|t| t.is_public) {
            let spec = TypeSpecifier::from_reflected_type(reflected)?;

            let mut bases = Vec::new();
            if let Some(base) = &reflected.base_type {
                bases.push(TypeSpecifier::from_reflected_type(base)?);
            }
            for interface in &reflected.interfaces {
                bases.push(TypeSpecifier::from_reflected_type(interface)?);
            }
            catalog.register_type(spec.clone(), bases);

            for method in reflected.methods.iter().filter(|m| !m.is_special_name) {
                catalog.register_method(MethodSpecifier::from_reflected(&spec, method)?);
            }

            if reflected.is_enum {
                catalog.register_enum(&spec, reflected.enum_names.iter().cloned());
            }
        }

        tracing::debug!("[METADATA] Loaded {} types", catalog.entries.len());
        Ok(catalog)
    }

    /// Parse a JSON array of [`ReflectedType`] descriptions.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let types: Vec<ReflectedType> = serde_json::from_str(json)?;
        Ok(Self::from_reflected_types(&types)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bases_of(&self, ty: &TypeSpecifier) -> &[TypeSpecifier] {
        self.entries
            .get(ty.name())
            .map(|entry| entry.bases.as_slice())
            .unwrap_or_default()
    }
}

impl TypeCatalog for MemoryTypeCatalog {
    fn is_subtype_of(&self, a: &TypeSpecifier, b: &TypeSpecifier) -> bool {
        if a == b {
            return false;
        }
        if b.is_object() {
            return !a.is_object();
        }

        let mut seen = HashSet::new();
        let mut queue: VecDeque<&TypeSpecifier> = self.bases_of(a).iter().collect();
        while let Some(base) = queue.pop_front() {
            if base == b {
                return true;
            }
            if seen.insert(base.name()) {
                queue.extend(self.bases_of(base));
            }
        }

        false
    }

    fn public_methods(&self, ty: &TypeSpecifier) -> Vec<MethodSpecifier> {
        self.entries
            .get(ty.name())
            .map(|entry| entry.methods.iter().filter(|m| !m.is_static).cloned().collect())
            .unwrap_or_default()
    }

    fn static_functions(&self) -> Vec<MethodSpecifier> {
        self.entries
            .values()
            .flat_map(|entry| entry.methods.iter().filter(|m| m.is_static).cloned())
            .collect()
    }

    fn enum_names(&self, ty: &TypeSpecifier) -> Vec<String> {
        self.entries
            .get(ty.name())
            .map(|entry| entry.enum_names.clone())
            .unwrap_or_default()
    }
}
