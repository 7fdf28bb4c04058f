//! # Code Generation
//!
//! C# source generation for method graphs and classes.

mod class_translator;
mod method_translator;
mod node_handlers;
mod writer;

pub use class_translator::ClassTranslator;
pub use method_translator::{translate_method, MethodTranslator};
