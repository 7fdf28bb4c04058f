//! # Method Translator
//!
//! Turns one method graph into the text of one method definition.
//!
//! Translation walks the exec chain from the entry node. Each exec node
//! becomes one statement (or one compound statement for branches and loops)
//! in chain order. Data inputs are resolved on demand: literals are inlined,
//! getters and impure producers are bound to temporaries the first time they
//! are read on the current control path and reused after that. A getter's
//! temporary is dropped once its variable is assigned on the path, and loop
//! bodies read variables afresh on every iteration.
//!
//! A value is only visible on the control path that produced it. Each `if`
//! branch and each loop body works on its own copy of the path state, so a
//! temporary declared inside a block is never referenced outside of it.

use super::node_handlers;
use super::writer::SourceWriter;
use crate::config::TranslatorConfig;
use crate::error::TranslationError;
use crate::graph::{
    argument_name, Method, MethodModifier, Node, NodeId, NodeKind, PinRef, BODY_SLOT, COMPLETED_SLOT,
    ELSE_SLOT, THEN_SLOT,
};
use crate::metadata::{check_assignable, TypeCatalog};
use crate::types::TypeSpecifier;
use std::collections::{HashMap, HashSet};

/// Values and emitted nodes visible on one control path.
#[derive(Debug, Clone, Default)]
struct PathState {
    /// Expression holding the value of each resolved output data pin.
    values: HashMap<PinRef, String>,
    /// Impure nodes already emitted as statements on this path.
    emitted: HashSet<NodeId>,
    /// Exec nodes entered on this path, outermost first.
    active: Vec<NodeId>,
    /// Enclosing `ForLoop` nodes, outermost first.
    loops: Vec<NodeId>,
}

enum Continuation {
    Next(PinRef),
    End,
}

/// Single-use translator for one method graph.
pub struct MethodTranslator<'a> {
    method: &'a Method,
    catalog: &'a dyn TypeCatalog,
    config: &'a TranslatorConfig,
    writer: SourceWriter,
    temp_counter: usize,
    loop_counter: usize,
    /// Impure nodes whose statement is currently being built.
    resolving: Vec<NodeId>,
}

impl<'a> MethodTranslator<'a> {
    pub fn new(method: &'a Method, catalog: &'a dyn TypeCatalog, config: &'a TranslatorConfig) -> Self {
        Self {
            method,
            catalog,
            config,
            writer: SourceWriter::new(config),
            temp_counter: 0,
            loop_counter: 0,
            resolving: Vec::new(),
        }
    }

    /// Translate the method into its full definition text.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Signature and body, ending with a newline
    /// * `Err(TranslationError)` - The first problem found, naming the node involved
    pub fn translate(mut self) -> Result<String, TranslationError> {
        let method = self.method;
        tracing::debug!(
            "[CODEGEN] Translating method '{}' ({} nodes)",
            method.name,
            method.node_count()
        );

        let entry = method.entry_node().ok_or(TranslationError::MissingEntry)?;
        let signature = node_handlers::method_signature(method);

        if method.modifiers.contains(&MethodModifier::Abstract) {
            self.writer.line(format!("{};", signature));
            return Ok(self.writer.finish());
        }

        self.writer.line(signature);
        self.writer.open_block();

        let mut state = PathState::default();
        for slot in 0..entry.output_data_pins().len() {
            state
                .values
                .insert(PinRef::output_data(entry.id(), slot), argument_name(slot));
        }
        state.active.push(entry.id());

        if !entry.output_exec_pins().is_empty() {
            self.translate_chain(PinRef::output_exec(entry.id(), 0), &mut state)?;
        }

        self.writer.close_block();
        tracing::debug!(
            "[CODEGEN] Method '{}' done ({} temporaries)",
            method.name,
            self.temp_counter
        );
        Ok(self.writer.finish())
    }

    fn node_at(&self, pin: PinRef) -> Result<&'a Node, TranslationError> {
        let method: &'a Method = self.method;
        method
            .node(pin.node)
            .ok_or(TranslationError::DanglingReference(pin))
    }

    /// Follow exec links from `from` until the chain ends.
    fn translate_chain(&mut self, from: PinRef, state: &mut PathState) -> Result<(), TranslationError> {
        let mut current = from;

        loop {
            let source = self.node_at(current)?;
            let Some(exec_out) = source.output_exec_pins().get(current.slot) else {
                return Err(TranslationError::DanglingReference(current));
            };
            let Some(target) = exec_out.outgoing() else {
                return Ok(());
            };

            let node = self.node_at(target)?;
            if state.active.contains(&node.id()) {
                if state.loops.last() == Some(&node.id()) {
                    tracing::debug!("[CODEGEN] Exec link re-enters loop {}, emitting continue", node.id());
                    self.writer.line("continue;");
                    return Ok(());
                }
                return Err(TranslationError::ExecCycle {
                    node: node.id(),
                    node_label: node.label(),
                });
            }
            state.active.push(node.id());

            match self.emit_exec_node(node, state)? {
                Continuation::Next(next) => current = next,
                Continuation::End => return Ok(()),
            }
        }
    }

    fn emit_exec_node(&mut self, node: &'a Node, state: &mut PathState) -> Result<Continuation, TranslationError> {
        tracing::debug!("[CODEGEN] Emitting node {} ({})", node.id(), node.label());
        let id = node.id();

        match node.kind() {
            NodeKind::Return { .. } => {
                let values = self.resolve_inputs(node, 0, state)?;
                self.writer.line(node_handlers::return_statement(&values));
                Ok(Continuation::End)
            }
            NodeKind::CallMethod { .. } | NodeKind::CallStaticFunction { .. } | NodeKind::VariableSetter { .. } => {
                // Already emitted when an earlier statement pulled one of its outputs.
                if !state.emitted.contains(&id) {
                    self.emit_statement(node, state)?;
                }
                Ok(Continuation::Next(PinRef::output_exec(id, 0)))
            }
            NodeKind::IfElse => {
                let condition = self.resolve_input(node, 0, state)?;
                self.writer.line(node_handlers::if_header(&condition));
                self.emit_block(PinRef::output_exec(id, THEN_SLOT), state.clone())?;

                let else_pin = PinRef::output_exec(id, ELSE_SLOT);
                if self.has_successor(node, ELSE_SLOT) {
                    self.writer.line("else");
                    self.emit_block(else_pin, state.clone())?;
                }
                Ok(Continuation::End)
            }
            NodeKind::ForLoop => {
                let initial = self.resolve_input(node, 0, state)?;
                let max = self.resolve_input(node, 1, state)?;
                let index = format!("{}{}", self.config.loop_index_prefix, self.loop_counter);
                self.loop_counter += 1;
                self.writer.line(node_handlers::for_header(&index, &initial, &max));

                let mut body = state.clone();
                self.forget_reads(&mut body, None);
                body.values.insert(PinRef::output_data(id, 0), index);
                body.loops.push(id);
                self.emit_block(PinRef::output_exec(id, BODY_SLOT), body)?;
                self.forget_reads(state, None);

                Ok(Continuation::Next(PinRef::output_exec(id, COMPLETED_SLOT)))
            }
            NodeKind::MethodEntry { .. } | NodeKind::VariableGetter { .. } | NodeKind::Literal { .. } => {
                Err(TranslationError::DanglingReference(PinRef::input_exec(id, 0)))
            }
        }
    }

    /// Emit a braced block for the chain starting at `from`.
    fn emit_block(&mut self, from: PinRef, mut state: PathState) -> Result<(), TranslationError> {
        self.writer.open_block();
        self.translate_chain(from, &mut state)?;
        self.writer.close_block();
        Ok(())
    }

    fn has_successor(&self, node: &Node, slot: usize) -> bool {
        node.output_exec_pins()
            .get(slot)
            .is_some_and(|pin| pin.outgoing().is_some())
    }

    /// Emit the statement for a call or setter and record its outputs.
    fn emit_statement(&mut self, node: &'a Node, state: &mut PathState) -> Result<(), TranslationError> {
        self.resolving.push(node.id());
        let result = self.build_statement(node, state);
        self.resolving.pop();
        result?;

        state.emitted.insert(node.id());
        Ok(())
    }

    fn build_statement(&mut self, node: &'a Node, state: &mut PathState) -> Result<(), TranslationError> {
        match node.kind() {
            NodeKind::CallMethod { method_name, .. } => {
                let target = self.resolve_input(node, 0, state)?;
                let arguments = self.resolve_inputs(node, 1, state)?;
                let invocation = node_handlers::call_method_expression(&target, method_name, &arguments);
                self.bind_outputs(node, &invocation, state);
            }
            NodeKind::CallStaticFunction {
                declaring_type,
                function_name,
                ..
            } => {
                let arguments = self.resolve_inputs(node, 0, state)?;
                let invocation = node_handlers::static_call_expression(declaring_type, function_name, &arguments);
                self.bind_outputs(node, &invocation, state);
            }
            NodeKind::VariableSetter { variable } => {
                let value = self.resolve_input(node, 0, state)?;
                self.writer.line(node_handlers::assignment(&variable.name, &value));
                self.forget_reads(state, Some(&variable.name));
                // The assigned expression is a literal, argument or temporary, none
                // of which a later assignment can change.
                state.values.insert(PinRef::output_data(node.id(), 0), value);
            }
            _ => {}
        }
        Ok(())
    }

    /// Drop memoized getter reads of `variable`, or of every variable.
    fn forget_reads(&self, state: &mut PathState, variable: Option<&str>) {
        let method = self.method;
        state.values.retain(|pin, _| match method.node(pin.node).map(Node::kind) {
            Some(NodeKind::VariableGetter { variable: read }) => {
                variable.is_some_and(|name| name != read.name)
            }
            _ => true,
        });
    }

    fn bind_outputs(&mut self, node: &Node, invocation: &str, state: &mut PathState) {
        let mut bindings: Vec<(TypeSpecifier, String)> = Vec::new();
        for (slot, pin) in node.output_data_pins().iter().enumerate() {
            let name = self.next_temp(&pin.name);
            state
                .values
                .insert(PinRef::output_data(node.id(), slot), name.clone());
            bindings.push((pin.pin_type.clone(), name));
        }
        self.writer.line(node_handlers::bind_results(&bindings, invocation));
    }

    fn next_temp(&mut self, hint: &str) -> String {
        let name = format!(
            "{}{}_{}",
            self.config.temp_prefix,
            self.temp_counter,
            node_handlers::sanitize_identifier(hint)
        );
        self.temp_counter += 1;
        name
    }

    fn resolve_inputs(
        &mut self,
        node: &'a Node,
        first_slot: usize,
        state: &mut PathState,
    ) -> Result<Vec<String>, TranslationError> {
        let mut values = Vec::new();
        for slot in first_slot..node.input_data_pins().len() {
            values.push(self.resolve_input(node, slot, state)?);
        }
        Ok(values)
    }

    /// Expression for the value flowing into input data pin `slot` of `node`.
    fn resolve_input(&mut self, node: &'a Node, slot: usize, state: &mut PathState) -> Result<String, TranslationError> {
        let pin = node
            .input_data_pins()
            .get(slot)
            .ok_or(TranslationError::DanglingReference(PinRef::input_data(node.id(), slot)))?;
        let source = pin.incoming().ok_or_else(|| TranslationError::MissingConnection {
            node: node.id(),
            node_label: node.label(),
            pin: pin.name.clone(),
        })?;

        let producer = self.node_at(source)?;
        let produced = producer
            .output_data_pins()
            .get(source.slot)
            .ok_or(TranslationError::DanglingReference(source))?;

        // The catalog may have changed since the link was made.
        if !matches!(check_assignable(&produced.pin_type, &pin.pin_type, self.catalog), Ok(true)) {
            return Err(TranslationError::TypeMismatch {
                node: node.id(),
                pin: pin.name.clone(),
                expected: describe_type(&pin.pin_type),
                found: describe_type(&produced.pin_type),
            });
        }

        if let Some(value) = state.values.get(&source) {
            return Ok(value.clone());
        }

        let out_of_scope = || TranslationError::ValueOutOfScope {
            node: producer.id(),
            node_label: producer.label(),
            pin: produced.name.clone(),
        };

        match producer.kind() {
            NodeKind::Literal { value, literal_type } => Ok(node_handlers::literal_expression(value, literal_type)),
            NodeKind::VariableGetter { variable } => {
                let name = self.next_temp(&variable.name);
                self.writer.line(node_handlers::temp_declaration(
                    &produced.pin_type,
                    &name,
                    &node_handlers::variable_read(&variable.name),
                ));
                state.values.insert(source, name.clone());
                Ok(name)
            }
            NodeKind::CallMethod { .. } | NodeKind::CallStaticFunction { .. } | NodeKind::VariableSetter { .. } => {
                if self.resolving.contains(&producer.id()) {
                    return Err(TranslationError::DataCycle {
                        node: producer.id(),
                        node_label: producer.label(),
                    });
                }
                if state.emitted.contains(&producer.id()) {
                    return Err(out_of_scope());
                }

                tracing::debug!(
                    "[CODEGEN] Pulling node {} ({}) for input '{}' of {}",
                    producer.id(),
                    producer.label(),
                    pin.name,
                    node.id()
                );
                self.emit_statement(producer, state)?;
                state.values.get(&source).cloned().ok_or_else(out_of_scope)
            }
            NodeKind::MethodEntry { .. } | NodeKind::Return { .. } | NodeKind::IfElse | NodeKind::ForLoop => {
                Err(out_of_scope())
            }
        }
    }
}

fn describe_type(ty: &TypeSpecifier) -> String {
    if ty.is_enum() {
        format!("enum {}", ty)
    } else {
        ty.to_string()
    }
}

/// Translate a single method graph.
pub fn translate_method(
    method: &Method,
    catalog: &dyn TypeCatalog,
    config: &TranslatorConfig,
) -> Result<String, TranslationError> {
    MethodTranslator::new(method, catalog, config).translate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PinKind, Position};
    use crate::metadata::MemoryTypeCatalog;

    fn config() -> TranslatorConfig {
        TranslatorConfig::default()
    }

    fn add(method: &mut Method, kind: NodeKind) -> NodeId {
        method.add_node(kind, Position::default()).unwrap()
    }

    fn exec(method: &mut Method, from: NodeId, slot: usize, to: NodeId, catalog: &MemoryTypeCatalog) {
        method
            .connect(PinRef::output_exec(from, slot), PinRef::input_exec(to, 0), catalog)
            .unwrap();
    }

    fn data(method: &mut Method, from: NodeId, out: usize, to: NodeId, input: usize, catalog: &MemoryTypeCatalog) {
        method
            .connect(PinRef::output_data(from, out), PinRef::input_data(to, input), catalog)
            .unwrap();
    }

    #[test]
    fn test_empty_void_method() {
        let catalog = MemoryTypeCatalog::new();
        let method = Method::new("Run", vec![], vec![]);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        assert_eq!(text, "public void Run()\n{\n}\n");
    }

    #[test]
    fn test_return_argument() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Identity", vec![TypeSpecifier::int()], vec![TypeSpecifier::int()]);
        let entry = method.entry_id();
        let ret = add(&mut method, NodeKind::Return { return_types: vec![TypeSpecifier::int()] });
        exec(&mut method, entry, 0, ret, &catalog);
        data(&mut method, entry, 0, ret, 0, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        assert_eq!(
            text,
            "public System.Int32 Identity(System.Int32 arg0)\n{\n    return arg0;\n}\n"
        );
    }

    #[test]
    fn test_abstract_method_has_no_body() {
        let catalog = MemoryTypeCatalog::new();
        let method = Method::new("Tick", vec![], vec![])
            .with_modifiers([MethodModifier::Protected, MethodModifier::Abstract]);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        assert_eq!(text, "protected abstract void Tick();\n");
    }

    #[test]
    fn test_if_else_branches() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Pick", vec![TypeSpecifier::bool()], vec![TypeSpecifier::int()]);
        let entry = method.entry_id();
        let branch = add(&mut method, NodeKind::IfElse);
        let one = add(&mut method, NodeKind::literal("1", TypeSpecifier::int()));
        let two = add(&mut method, NodeKind::literal("2", TypeSpecifier::int()));
        let ret_then = add(&mut method, NodeKind::Return { return_types: vec![TypeSpecifier::int()] });
        let ret_else = add(&mut method, NodeKind::Return { return_types: vec![TypeSpecifier::int()] });

        exec(&mut method, entry, 0, branch, &catalog);
        data(&mut method, entry, 0, branch, 0, &catalog);
        exec(&mut method, branch, THEN_SLOT, ret_then, &catalog);
        exec(&mut method, branch, ELSE_SLOT, ret_else, &catalog);
        data(&mut method, one, 0, ret_then, 0, &catalog);
        data(&mut method, two, 0, ret_else, 0, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        let expected = "\
public System.Int32 Pick(System.Boolean arg0)
{
    if (arg0)
    {
        return 1;
    }
    else
    {
        return 2;
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_if_without_else_omits_else() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Maybe", vec![TypeSpecifier::bool()], vec![]);
        let entry = method.entry_id();
        let branch = add(&mut method, NodeKind::IfElse);
        let ret = add(&mut method, NodeKind::Return { return_types: vec![] });
        exec(&mut method, entry, 0, branch, &catalog);
        data(&mut method, entry, 0, branch, 0, &catalog);
        exec(&mut method, branch, THEN_SLOT, ret, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        assert!(text.contains("if (arg0)\n    {\n        return;\n    }\n}"));
        assert!(!text.contains("else"));
    }

    #[test]
    fn test_for_loop_index_and_completed() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Count", vec![TypeSpecifier::int()], vec![]);
        let entry = method.entry_id();
        let zero = add(&mut method, NodeKind::literal("0", TypeSpecifier::int()));
        let looped = add(&mut method, NodeKind::ForLoop);
        let setter = add(&mut method, NodeKind::setter("last", TypeSpecifier::int()));
        let done = add(&mut method, NodeKind::Return { return_types: vec![] });

        exec(&mut method, entry, 0, looped, &catalog);
        data(&mut method, zero, 0, looped, 0, &catalog);
        data(&mut method, entry, 0, looped, 1, &catalog);
        exec(&mut method, looped, BODY_SLOT, setter, &catalog);
        data(&mut method, looped, 0, setter, 0, &catalog);
        exec(&mut method, looped, COMPLETED_SLOT, done, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        let expected = "\
public void Count(System.Int32 arg0)
{
    for (int i0 = 0; i0 < arg0; i0++)
    {
        last = i0;
    }
    return;
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_loop_index_outside_body_is_out_of_scope() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Leak", vec![], vec![TypeSpecifier::int()]);
        let entry = method.entry_id();
        let zero = add(&mut method, NodeKind::literal("0", TypeSpecifier::int()));
        let looped = add(&mut method, NodeKind::ForLoop);
        let ret = add(&mut method, NodeKind::Return { return_types: vec![TypeSpecifier::int()] });

        exec(&mut method, entry, 0, looped, &catalog);
        data(&mut method, zero, 0, looped, 0, &catalog);
        data(&mut method, zero, 0, looped, 1, &catalog);
        exec(&mut method, looped, COMPLETED_SLOT, ret, &catalog);
        data(&mut method, looped, 0, ret, 0, &catalog);

        let err = translate_method(&method, &catalog, &config()).unwrap_err();
        assert!(matches!(err, TranslationError::ValueOutOfScope { node, ref pin, .. } if node == looped && pin == "Index"));
    }

    #[test]
    fn test_body_reentering_loop_emits_continue() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Spin", vec![], vec![]);
        let entry = method.entry_id();
        let zero = add(&mut method, NodeKind::literal("0", TypeSpecifier::int()));
        let looped = add(&mut method, NodeKind::ForLoop);
        let branch = add(&mut method, NodeKind::IfElse);
        let flag = add(&mut method, NodeKind::getter("skip", TypeSpecifier::bool()));

        exec(&mut method, entry, 0, looped, &catalog);
        data(&mut method, zero, 0, looped, 0, &catalog);
        data(&mut method, zero, 0, looped, 1, &catalog);
        exec(&mut method, looped, BODY_SLOT, branch, &catalog);
        data(&mut method, flag, 0, branch, 0, &catalog);
        exec(&mut method, branch, THEN_SLOT, looped, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        assert!(text.contains("System.Boolean temp0_skip = skip;"));
        assert!(text.contains("continue;"));
    }

    #[test]
    fn test_exec_cycle_outside_loop_is_rejected() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Forever", vec![], vec![]);
        let entry = method.entry_id();
        let first = add(&mut method, NodeKind::setter("a", TypeSpecifier::int()));
        let second = add(&mut method, NodeKind::setter("b", TypeSpecifier::int()));
        let one = add(&mut method, NodeKind::literal("1", TypeSpecifier::int()));

        exec(&mut method, entry, 0, first, &catalog);
        exec(&mut method, first, 0, second, &catalog);
        exec(&mut method, second, 0, first, &catalog);
        data(&mut method, one, 0, first, 0, &catalog);
        data(&mut method, one, 0, second, 0, &catalog);

        let err = translate_method(&method, &catalog, &config()).unwrap_err();
        assert!(matches!(err, TranslationError::ExecCycle { node, .. } if node == first));
    }

    #[test]
    fn test_data_cycle_is_rejected() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Knot", vec![], vec![]);
        let entry = method.entry_id();
        let a = add(&mut method, NodeKind::setter("a", TypeSpecifier::int()));
        let b = add(&mut method, NodeKind::setter("b", TypeSpecifier::int()));

        exec(&mut method, entry, 0, a, &catalog);
        data(&mut method, b, 0, a, 0, &catalog);
        data(&mut method, a, 0, b, 0, &catalog);

        let err = translate_method(&method, &catalog, &config()).unwrap_err();
        assert!(matches!(err, TranslationError::DataCycle { node, .. } if node == a));
    }

    #[test]
    fn test_missing_input_names_node_and_pin() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Broken", vec![], vec![]);
        let entry = method.entry_id();
        let setter = add(&mut method, NodeKind::setter("x", TypeSpecifier::int()));
        exec(&mut method, entry, 0, setter, &catalog);

        let err = translate_method(&method, &catalog, &config()).unwrap_err();
        assert_eq!(
            err,
            TranslationError::MissingConnection {
                node: setter,
                node_label: "Set x".to_string(),
                pin: "Value".to_string(),
            }
        );
    }

    #[test]
    fn test_catalog_change_is_caught_at_translation() {
        let base = TypeSpecifier::from_type_name("Game.Base");
        let derived = TypeSpecifier::from_type_name("Game.Derived");
        let catalog = MemoryTypeCatalog::new()
            .with_type(base.clone(), [])
            .with_type(derived.clone(), [base.clone()]);

        let mut method = Method::new("Store", vec![derived.clone()], vec![]);
        let entry = method.entry_id();
        let setter = add(&mut method, NodeKind::setter("item", base.clone()));
        exec(&mut method, entry, 0, setter, &catalog);
        data(&mut method, entry, 0, setter, 0, &catalog);

        assert!(translate_method(&method, &catalog, &config()).is_ok());

        let shrunk = MemoryTypeCatalog::new().with_type(base, []);
        let err = translate_method(&method, &shrunk, &config()).unwrap_err();
        assert!(matches!(err, TranslationError::TypeMismatch { node, .. } if node == setter));
    }

    #[test]
    fn test_enum_flag_conflict_is_caught_at_translation() {
        let catalog = MemoryTypeCatalog::new();
        let color = TypeSpecifier::enum_type("Game.Color");
        let mut method = Method::new("Paint", vec![], vec![]);
        let entry = method.entry_id();
        let red = add(&mut method, NodeKind::literal("Red", color.clone()));
        let setter = add(&mut method, NodeKind::setter("tint", color));
        exec(&mut method, entry, 0, setter, &catalog);
        data(&mut method, red, 0, setter, 0, &catalog);

        method.node_mut(setter).unwrap().input_data_pins[0].pin_type = TypeSpecifier::from_type_name("Game.Color");

        let err = translate_method(&method, &catalog, &config()).unwrap_err();
        assert_eq!(
            err,
            TranslationError::TypeMismatch {
                node: setter,
                pin: "Value".to_string(),
                expected: "Game.Color".to_string(),
                found: "enum Game.Color".to_string(),
            }
        );
    }

    #[test]
    fn test_read_after_assignment_sees_new_value() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Report", vec![TypeSpecifier::from_type_name("Game.Player")], vec![]);
        let entry = method.entry_id();
        let count = add(&mut method, NodeKind::getter("count", TypeSpecifier::int()));
        let before = add(&mut method, NodeKind::call_method("Log", vec![TypeSpecifier::int()], vec![]));
        let five = add(&mut method, NodeKind::literal("5", TypeSpecifier::int()));
        let store = add(&mut method, NodeKind::setter("count", TypeSpecifier::int()));
        let after = add(&mut method, NodeKind::call_method("Log", vec![TypeSpecifier::int()], vec![]));

        exec(&mut method, entry, 0, before, &catalog);
        exec(&mut method, before, 0, store, &catalog);
        exec(&mut method, store, 0, after, &catalog);
        data(&mut method, entry, 0, before, 0, &catalog);
        data(&mut method, count, 0, before, 1, &catalog);
        data(&mut method, five, 0, store, 0, &catalog);
        data(&mut method, entry, 0, after, 0, &catalog);
        data(&mut method, count, 0, after, 1, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        let expected = "\
public void Report(Game.Player arg0)
{
    System.Int32 temp0_count = count;
    arg0.Log(temp0_count);
    count = 5;
    System.Int32 temp1_count = count;
    arg0.Log(temp1_count);
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_loop_body_reads_variable_every_iteration() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new(
            "Scan",
            vec![TypeSpecifier::from_type_name("Game.Player"), TypeSpecifier::int()],
            vec![],
        );
        let entry = method.entry_id();
        let zero = add(&mut method, NodeKind::literal("0", TypeSpecifier::int()));
        let count = add(&mut method, NodeKind::getter("count", TypeSpecifier::int()));
        let log_before = add(&mut method, NodeKind::call_method("Log", vec![TypeSpecifier::int()], vec![]));
        let looped = add(&mut method, NodeKind::ForLoop);
        let log_inside = add(&mut method, NodeKind::call_method("Log", vec![TypeSpecifier::int()], vec![]));
        let store = add(&mut method, NodeKind::setter("count", TypeSpecifier::int()));
        let log_after = add(&mut method, NodeKind::call_method("Log", vec![TypeSpecifier::int()], vec![]));

        exec(&mut method, entry, 0, log_before, &catalog);
        exec(&mut method, log_before, 0, looped, &catalog);
        exec(&mut method, looped, BODY_SLOT, log_inside, &catalog);
        exec(&mut method, log_inside, 0, store, &catalog);
        exec(&mut method, looped, COMPLETED_SLOT, log_after, &catalog);
        data(&mut method, zero, 0, looped, 0, &catalog);
        data(&mut method, entry, 1, looped, 1, &catalog);
        data(&mut method, looped, 0, store, 0, &catalog);
        for log in [log_before, log_inside, log_after] {
            data(&mut method, entry, 0, log, 0, &catalog);
            data(&mut method, count, 0, log, 1, &catalog);
        }

        let text = translate_method(&method, &catalog, &config()).unwrap();
        let expected = "\
public void Scan(Game.Player arg0, System.Int32 arg1)
{
    System.Int32 temp0_count = count;
    arg0.Log(temp0_count);
    for (int i0 = 0; i0 < arg1; i0++)
    {
        System.Int32 temp1_count = count;
        arg0.Log(temp1_count);
        count = i0;
    }
    System.Int32 temp2_count = count;
    arg0.Log(temp2_count);
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_setter_output_is_the_assigned_value() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new("Mirror", vec![TypeSpecifier::int()], vec![]);
        let entry = method.entry_id();
        let first = add(&mut method, NodeKind::setter("a", TypeSpecifier::int()));
        let second = add(&mut method, NodeKind::setter("b", TypeSpecifier::int()));
        let third = add(&mut method, NodeKind::setter("a", TypeSpecifier::int()));
        let seven = add(&mut method, NodeKind::literal("7", TypeSpecifier::int()));

        exec(&mut method, entry, 0, first, &catalog);
        exec(&mut method, first, 0, third, &catalog);
        exec(&mut method, third, 0, second, &catalog);
        data(&mut method, entry, 0, first, 0, &catalog);
        data(&mut method, seven, 0, third, 0, &catalog);
        data(&mut method, first, 0, second, 0, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        assert!(text.contains("a = arg0;\n    a = 7;\n    b = arg0;"));
    }

    #[test]
    fn test_multiple_returns_deconstruct_into_temps() {
        let catalog = MemoryTypeCatalog::new();
        let mut method = Method::new(
            "Both",
            vec![TypeSpecifier::object()],
            vec![TypeSpecifier::int(), TypeSpecifier::bool()],
        );
        let entry = method.entry_id();
        let call = add(
            &mut method,
            NodeKind::call_method("Pair", vec![], vec![TypeSpecifier::int(), TypeSpecifier::bool()]),
        );
        let ret = add(
            &mut method,
            NodeKind::Return {
                return_types: vec![TypeSpecifier::int(), TypeSpecifier::bool()],
            },
        );
        exec(&mut method, entry, 0, call, &catalog);
        exec(&mut method, call, 0, ret, &catalog);
        data(&mut method, entry, 0, call, 0, &catalog);
        data(&mut method, call, 0, ret, 0, &catalog);
        data(&mut method, call, 1, ret, 1, &catalog);

        let text = translate_method(&method, &catalog, &config()).unwrap();
        assert!(text.contains("(System.Int32 temp0_Int32, System.Boolean temp1_Boolean) = arg0.Pair();"));
        assert!(text.contains("return (temp0_Int32, temp1_Boolean);"));
    }

    #[test]
    fn test_pin_lookup_by_name_matches_slots() {
        let method = Method::new("Run", vec![TypeSpecifier::int()], vec![]);
        let pin = method
            .pin_by_name(method.entry_id(), PinKind::OutputData, "arg0")
            .unwrap();
        assert_eq!(pin, PinRef::output_data(method.entry_id(), 0));
    }
}
