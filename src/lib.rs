//! # PrintGraph Translator
//!
//! Compiler for visual method graphs: typed nodes connected through exec
//! (control flow) and data (value) pins, translated into C# source text.
//!
//! The crate provides:
//! - A graph model with type-checked connections and invertible edits
//! - A method translator that walks exec chains and resolves data inputs
//! - A class translator producing one source file per class
//! - A project driver that translates classes in parallel and forwards the
//!   sources to an external compiler
//!
//! ## Quick Start
//!
//! ```rust
//! use printgraph::{
//!     translate_class, Class, MemoryTypeCatalog, Method, NodeKind, PinRef, Position,
//!     TranslatorConfig, TypeSpecifier,
//! };
//!
//! let catalog = MemoryTypeCatalog::new();
//! let mut method = Method::new("Answer", vec![], vec![TypeSpecifier::int()]);
//! let ret = method.add_node(
//!     NodeKind::Return { return_types: vec![TypeSpecifier::int()] },
//!     Position::default(),
//! )?;
//! let value = method.add_node(NodeKind::literal("42", TypeSpecifier::int()), Position::default())?;
//! method.connect(PinRef::output_exec(method.entry_id(), 0), PinRef::input_exec(ret, 0), &catalog)?;
//! method.connect(PinRef::output_data(value, 0), PinRef::input_data(ret, 0), &catalog)?;
//!
//! let mut class = Class::new("Oracle", "Demo");
//! class.add_method(method)?;
//!
//! let translated = translate_class(&class, &catalog, &TranslatorConfig::default()).unwrap();
//! assert!(translated.source.contains("return 42;"));
//! # Ok::<(), printgraph::GraphError>(())
//! ```
//!
//! ## Architecture
//!
//! Translation of a project runs in two phases:
//!
//! 1. **Class Translation** - Every class is translated independently (in
//!    parallel). Each method graph is walked from its entry node.
//! 2. **Compilation** - The collected sources are handed to a
//!    [`SourceCompiler`] together with the project's references.

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod types;

// Re-export the main translation API
pub use compiler::{
    compile_project, translate_class, translate_project, BuildOutput, ClassFailure, CompileRequest,
    CompilerOutput, Diagnostic, OutputKind, Project, ProjectTranslation, Severity, SourceCompiler,
    TranslatedClass,
};
pub use codegen::{translate_method, ClassTranslator, MethodTranslator};
pub use config::TranslatorConfig;

// Re-export error types
pub use error::{
    CatalogError, ClassTranslationError, CompileError, ConfigError, GraphError, TranslationError, TypeError,
};

// Re-export graph model types
pub use graph::{
    unique_name, Class, ClassModifier, GraphEdit, Link, Method, MethodModifier, Node, NodeId, NodeKind, PinKind,
    PinRef, Position, Variable, VariableModifier, VariableSpecifier, BODY_SLOT, COMPLETED_SLOT, ELSE_SLOT,
    THEN_SLOT,
};

// Re-export metadata types
pub use metadata::{
    check_assignable, is_assignable, MemoryTypeCatalog, MethodSpecifier, ReflectedMethod, ReflectedType,
    TypeCatalog,
};
pub use types::{BaseType, GenericType, TypeSpecifier};
