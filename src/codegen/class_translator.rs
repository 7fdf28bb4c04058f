//! # Class Translator
//!
//! Assembles a whole class definition: optional banner, namespace, class
//! header, one field per attribute and one member per method graph.
//!
//! Method failures do not stop the class translator early. Every method is
//! attempted and every failure is reported, tagged with the method's name.

use super::method_translator::translate_method;
use super::node_handlers;
use super::writer::SourceWriter;
use crate::config::TranslatorConfig;
use crate::error::ClassTranslationError;
use crate::graph::{Class, Method, Variable};
use crate::metadata::TypeCatalog;

pub struct ClassTranslator<'a> {
    catalog: &'a dyn TypeCatalog,
    config: &'a TranslatorConfig,
}

impl<'a> ClassTranslator<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog, config: &'a TranslatorConfig) -> Self {
        Self { catalog, config }
    }

    /// Translate a class into the full text of one source file.
    ///
    /// # Arguments
    ///
    /// * `class` - The class to translate
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The class source
    /// * `Err(Vec<ClassTranslationError>)` - Every duplicate member name and
    ///   every failing method, in declaration order
    pub fn translate_class(&self, class: &Class) -> Result<String, Vec<ClassTranslationError>> {
        let full_name = class.full_name();
        tracing::debug!(
            "[CODEGEN] Translating class {} ({} attributes, {} methods)",
            full_name,
            class.attributes().len(),
            class.methods().len()
        );

        let mut errors: Vec<ClassTranslationError> = class
            .duplicate_names()
            .into_iter()
            .map(|name| ClassTranslationError::DuplicateName {
                class: full_name.clone(),
                name,
            })
            .collect();

        let mut methods = Vec::new();
        for result in self.translate_methods(class) {
            match result {
                Ok(text) => methods.push(text),
                Err(error) => errors.push(error),
            }
        }

        if !errors.is_empty() {
            tracing::warn!("[CODEGEN] Class {} has {} error(s)", full_name, errors.len());
            return Err(errors);
        }

        Ok(self.render(class, &methods))
    }

    /// Translate every method of `class` independently.
    pub fn translate_methods(&self, class: &Class) -> Vec<Result<String, ClassTranslationError>> {
        class
            .methods()
            .iter()
            .map(|method| self.translate_method(class, method))
            .collect()
    }

    pub fn translate_method(&self, class: &Class, method: &Method) -> Result<String, ClassTranslationError> {
        translate_method(method, self.catalog, self.config).map_err(|error| {
            tracing::warn!(
                "[CODEGEN] Method {}.{} failed: {}",
                class.full_name(),
                method.name,
                error
            );
            ClassTranslationError::Method {
                class: class.full_name(),
                method: method.name.clone(),
                error,
            }
        })
    }

    /// Field declaration for one attribute.
    pub fn translate_variable(&self, variable: &Variable) -> String {
        node_handlers::variable_declaration(variable)
    }

    fn render(&self, class: &Class, methods: &[String]) -> String {
        let mut writer = SourceWriter::new(self.config);

        if self.config.emit_header {
            writer.line("// <auto-generated>");
            writer.line(format!("//     Generated by PrintGraph from class {}.", class.full_name()));
            writer.line("//     Changes to this file will be lost when it is regenerated.");
            writer.line("// </auto-generated>");
            writer.blank();
        }

        let namespaced = !class.namespace.is_empty();
        if namespaced {
            writer.line(format!("namespace {}", class.namespace));
            writer.open_block();
        }

        writer.line(node_handlers::class_header(&class.modifiers, &class.name, &class.super_type));
        writer.open_block();

        for variable in class.attributes() {
            writer.line(self.translate_variable(variable));
        }

        for (index, method) in methods.iter().enumerate() {
            if index > 0 || !class.attributes().is_empty() {
                writer.blank();
            }
            writer.embed(method);
        }

        writer.close_block();
        if namespaced {
            writer.close_block();
        }

        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslationError;
    use crate::graph::{ClassModifier, NodeKind, Position, VariableModifier};
    use crate::metadata::MemoryTypeCatalog;
    use crate::types::TypeSpecifier;

    fn quiet() -> TranslatorConfig {
        TranslatorConfig {
            emit_header: false,
            ..TranslatorConfig::default()
        }
    }

    #[test]
    fn test_empty_class_layout() {
        let catalog = MemoryTypeCatalog::new();
        let config = quiet();
        let class = Class::new("Empty", "Game");

        let text = ClassTranslator::new(&catalog, &config).translate_class(&class).unwrap();
        let expected = "\
namespace Game
{
    public class Empty : System.Object
    {
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_fields_then_methods() {
        let catalog = MemoryTypeCatalog::new();
        let config = quiet();
        let mut class = Class::new("Counter", "");
        class.modifiers.insert(ClassModifier::Sealed);
        class
            .add_attribute(
                Variable::new("count", TypeSpecifier::int())
                    .with_modifiers([VariableModifier::Public])
                    .with_initial_value("0"),
            )
            .unwrap();
        class.add_method(Method::new("Reset", vec![], vec![])).unwrap();

        let text = ClassTranslator::new(&catalog, &config).translate_class(&class).unwrap();
        let expected = "\
public sealed class Counter : System.Object
{
    public System.Int32 count = 0;

    public void Reset()
    {
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_header_banner() {
        let catalog = MemoryTypeCatalog::new();
        let config = TranslatorConfig::default();
        let class = Class::new("Empty", "Game");

        let text = ClassTranslator::new(&catalog, &config).translate_class(&class).unwrap();
        assert!(text.starts_with("// <auto-generated>\n"));
        assert!(text.contains("class Game.Empty."));
    }

    #[test]
    fn test_all_method_failures_reported() {
        let catalog = MemoryTypeCatalog::new();
        let config = quiet();
        let mut class = Class::new("Broken", "Game");

        for name in ["First", "Second"] {
            let mut method = Method::new(name, vec![], vec![]);
            let setter = method
                .add_node(NodeKind::setter("x", TypeSpecifier::int()), Position::default())
                .unwrap();
            method
                .connect(
                    crate::graph::PinRef::output_exec(method.entry_id(), 0),
                    crate::graph::PinRef::input_exec(setter, 0),
                    &catalog,
                )
                .unwrap();
            class.add_method(method).unwrap();
        }
        class.add_method(Method::new("Fine", vec![], vec![])).unwrap();

        let errors = ClassTranslator::new(&catalog, &config)
            .translate_class(&class)
            .unwrap_err();
        let methods: Vec<_> = errors
            .iter()
            .map(|error| match error {
                ClassTranslationError::Method { method, error, .. } => {
                    assert!(matches!(error, TranslationError::MissingConnection { .. }));
                    method.as_str()
                }
                other => panic!("unexpected error {other}"),
            })
            .collect();
        assert_eq!(methods, ["First", "Second"]);
    }
}
