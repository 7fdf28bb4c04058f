//! # Nodes
//!
//! Graph vertices are a closed set of variants ([`NodeKind`]). The pins a
//! node carries are derived from its kind when the node is created, and the
//! translator dispatches on the kind tag.
//!
//! | Kind                 | Exec in | Exec out            | Data in                   | Data out        |
//! |----------------------|---------|---------------------|---------------------------|-----------------|
//! | `MethodEntry`        | -       | Exec                | -                         | one per argument|
//! | `Return`             | Exec    | -                   | one per return value      | -               |
//! | `CallMethod`         | Exec    | Exec                | Target, one per argument  | one per return  |
//! | `CallStaticFunction` | Exec    | Exec                | one per argument          | one per return  |
//! | `VariableGetter`     | -       | -                   | -                         | variable        |
//! | `VariableSetter`     | Exec    | Exec                | Value                     | variable        |
//! | `IfElse`             | Exec    | Then, Else          | Condition                 | -               |
//! | `ForLoop`            | Exec    | Body, Completed     | InitialIndex, MaxIndex    | Index           |
//! | `Literal`            | -       | -                   | -                         | Value           |

use super::pin::{InputDataPin, InputExecPin, OutputDataPin, OutputExecPin, PinRef};
use crate::metadata::MethodSpecifier;
use crate::types::TypeSpecifier;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXEC_PIN_NAME: &str = "Exec";
pub const TARGET_PIN_NAME: &str = "Target";

/// Output exec slots of an `IfElse` node.
pub const THEN_SLOT: usize = 0;
pub const ELSE_SLOT: usize = 1;

/// Output exec slots of a `ForLoop` node.
pub const BODY_SLOT: usize = 0;
pub const COMPLETED_SLOT: usize = 1;

/// Stable identifier of a node within its method. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Editor canvas position. Carried through for round-tripping only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named, typed variable as referenced by getter and setter nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpecifier {
    pub name: String,
    pub variable_type: TypeSpecifier,
}

impl VariableSpecifier {
    pub fn new(name: impl Into<String>, variable_type: TypeSpecifier) -> Self {
        Self {
            name: name.into(),
            variable_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    MethodEntry {
        argument_types: Vec<TypeSpecifier>,
    },
    Return {
        return_types: Vec<TypeSpecifier>,
    },
    CallMethod {
        method_name: String,
        argument_types: Vec<TypeSpecifier>,
        return_types: Vec<TypeSpecifier>,
    },
    CallStaticFunction {
        declaring_type: TypeSpecifier,
        function_name: String,
        argument_types: Vec<TypeSpecifier>,
        return_types: Vec<TypeSpecifier>,
    },
    VariableGetter {
        variable: VariableSpecifier,
    },
    VariableSetter {
        variable: VariableSpecifier,
    },
    IfElse,
    ForLoop,
    Literal {
        value: String,
        literal_type: TypeSpecifier,
    },
}

/// What a node kind can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub has_exec_pins: bool,
    pub has_data_pins: bool,
    /// Number of alternative or sequential exec continuations.
    pub exec_fanout: usize,
}

impl NodeKind {
    pub fn call_method(
        method_name: impl Into<String>,
        argument_types: Vec<TypeSpecifier>,
        return_types: Vec<TypeSpecifier>,
    ) -> Self {
        NodeKind::CallMethod {
            method_name: method_name.into(),
            argument_types,
            return_types,
        }
    }

    /// Call node for a catalog method: static functions get no Target pin.
    pub fn call(method: &MethodSpecifier) -> Self {
        if method.is_static {
            NodeKind::CallStaticFunction {
                declaring_type: method.declaring_type.clone(),
                function_name: method.name.clone(),
                argument_types: method.argument_types.clone(),
                return_types: method.return_types.clone(),
            }
        } else {
            Self::call_method(
                method.name.clone(),
                method.argument_types.clone(),
                method.return_types.clone(),
            )
        }
    }

    pub fn getter(name: impl Into<String>, variable_type: TypeSpecifier) -> Self {
        NodeKind::VariableGetter {
            variable: VariableSpecifier::new(name, variable_type),
        }
    }

    pub fn setter(name: impl Into<String>, variable_type: TypeSpecifier) -> Self {
        NodeKind::VariableSetter {
            variable: VariableSpecifier::new(name, variable_type),
        }
    }

    pub fn literal(value: impl Into<String>, literal_type: TypeSpecifier) -> Self {
        NodeKind::Literal {
            value: value.into(),
            literal_type,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        let (has_exec_pins, exec_fanout) = match self {
            NodeKind::MethodEntry { .. }
            | NodeKind::CallMethod { .. }
            | NodeKind::CallStaticFunction { .. }
            | NodeKind::VariableSetter { .. } => (true, 1),
            NodeKind::Return { .. } => (true, 0),
            NodeKind::IfElse | NodeKind::ForLoop => (true, 2),
            NodeKind::VariableGetter { .. } | NodeKind::Literal { .. } => (false, 0),
        };

        let has_data_pins = match self {
            NodeKind::MethodEntry { argument_types } => !argument_types.is_empty(),
            NodeKind::Return { return_types } => !return_types.is_empty(),
            NodeKind::CallStaticFunction {
                argument_types,
                return_types,
                ..
            } => !argument_types.is_empty() || !return_types.is_empty(),
            _ => true,
        };

        Capabilities {
            has_exec_pins,
            has_data_pins,
            exec_fanout,
        }
    }

    /// Human readable label used in diagnostics.
    pub fn label(&self) -> String {
        match self {
            NodeKind::MethodEntry { .. } => "Method Entry".to_string(),
            NodeKind::Return { .. } => "Return".to_string(),
            NodeKind::CallMethod { method_name, .. } => format!("Call {}", method_name),
            NodeKind::CallStaticFunction {
                declaring_type,
                function_name,
                ..
            } => format!("Call {}.{}", declaring_type.short_name(), function_name),
            NodeKind::VariableGetter { variable } => format!("Get {}", variable.name),
            NodeKind::VariableSetter { variable } => format!("Set {}", variable.name),
            NodeKind::IfElse => "If".to_string(),
            NodeKind::ForLoop => "For".to_string(),
            NodeKind::Literal { value, .. } => format!("Literal {}", value),
        }
    }
}

/// A graph vertex and the pins it exclusively owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub position: Position,
    pub(crate) input_exec_pins: Vec<InputExecPin>,
    pub(crate) output_exec_pins: Vec<OutputExecPin>,
    pub(crate) input_data_pins: Vec<InputDataPin>,
    pub(crate) output_data_pins: Vec<OutputDataPin>,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, position: Position) -> Self {
        let mut node = Self {
            id,
            kind,
            position,
            input_exec_pins: Vec::new(),
            output_exec_pins: Vec::new(),
            input_data_pins: Vec::new(),
            output_data_pins: Vec::new(),
        };
        node.build_pins();
        node
    }

    fn build_pins(&mut self) {
        let kind = self.kind.clone();
        match &kind {
            NodeKind::MethodEntry { argument_types } => {
                self.output_exec_pins.push(OutputExecPin::new(EXEC_PIN_NAME));
                for (index, ty) in argument_types.iter().enumerate() {
                    self.output_data_pins
                        .push(OutputDataPin::new(argument_name(index), ty.clone()));
                }
            }
            NodeKind::Return { return_types } => {
                self.input_exec_pins.push(InputExecPin::new(EXEC_PIN_NAME));
                for (index, ty) in return_types.iter().enumerate() {
                    self.input_data_pins
                        .push(InputDataPin::new(format!("Return{}", index), ty.clone()));
                }
            }
            NodeKind::CallMethod {
                argument_types,
                return_types,
                ..
            } => {
                self.add_exec_pair();
                self.input_data_pins
                    .push(InputDataPin::new(TARGET_PIN_NAME, TypeSpecifier::object()));
                self.add_signature_pins(argument_types.clone(), return_types.clone());
            }
            NodeKind::CallStaticFunction {
                argument_types,
                return_types,
                ..
            } => {
                self.add_exec_pair();
                self.add_signature_pins(argument_types.clone(), return_types.clone());
            }
            NodeKind::VariableGetter { variable } => {
                self.output_data_pins.push(OutputDataPin::new(
                    variable.name.clone(),
                    variable.variable_type.clone(),
                ));
            }
            NodeKind::VariableSetter { variable } => {
                self.add_exec_pair();
                self.input_data_pins
                    .push(InputDataPin::new("Value", variable.variable_type.clone()));
                self.output_data_pins.push(OutputDataPin::new(
                    variable.name.clone(),
                    variable.variable_type.clone(),
                ));
            }
            NodeKind::IfElse => {
                self.input_exec_pins.push(InputExecPin::new(EXEC_PIN_NAME));
                self.output_exec_pins.push(OutputExecPin::new("Then"));
                self.output_exec_pins.push(OutputExecPin::new("Else"));
                self.input_data_pins
                    .push(InputDataPin::new("Condition", TypeSpecifier::bool()));
            }
            NodeKind::ForLoop => {
                self.input_exec_pins.push(InputExecPin::new(EXEC_PIN_NAME));
                self.output_exec_pins.push(OutputExecPin::new("Body"));
                self.output_exec_pins.push(OutputExecPin::new("Completed"));
                self.input_data_pins
                    .push(InputDataPin::new("InitialIndex", TypeSpecifier::int()));
                self.input_data_pins
                    .push(InputDataPin::new("MaxIndex", TypeSpecifier::int()));
                self.output_data_pins
                    .push(OutputDataPin::new("Index", TypeSpecifier::int()));
            }
            NodeKind::Literal { literal_type, .. } => {
                self.output_data_pins
                    .push(OutputDataPin::new("Value", literal_type.clone()));
            }
        }
    }

    fn add_exec_pair(&mut self) {
        self.input_exec_pins.push(InputExecPin::new(EXEC_PIN_NAME));
        self.output_exec_pins.push(OutputExecPin::new(EXEC_PIN_NAME));
    }

    fn add_signature_pins(&mut self, argument_types: Vec<TypeSpecifier>, return_types: Vec<TypeSpecifier>) {
        for ty in argument_types {
            self.input_data_pins
                .push(InputDataPin::new(ty.short_name().to_string(), ty));
        }
        for ty in return_types {
            self.output_data_pins
                .push(OutputDataPin::new(ty.short_name().to_string(), ty));
        }
    }

    /// Drop every link reference held by this node's pins.
    pub(crate) fn clear_links(&mut self) {
        self.input_exec_pins.iter_mut().for_each(|p| p.incoming.clear());
        self.output_exec_pins.iter_mut().for_each(|p| p.outgoing = None);
        self.input_data_pins.iter_mut().for_each(|p| p.incoming = None);
        self.output_data_pins.iter_mut().for_each(|p| p.outgoing.clear());
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn label(&self) -> String {
        self.kind.label()
    }

    pub fn input_exec_pins(&self) -> &[InputExecPin] {
        &self.input_exec_pins
    }

    pub fn output_exec_pins(&self) -> &[OutputExecPin] {
        &self.output_exec_pins
    }

    pub fn input_data_pins(&self) -> &[InputDataPin] {
        &self.input_data_pins
    }

    pub fn output_data_pins(&self) -> &[OutputDataPin] {
        &self.output_data_pins
    }

    /// Handles to every pin this node owns, inputs before outputs.
    pub fn pin_refs(&self) -> Vec<PinRef> {
        let id = self.id;
        (0..self.input_exec_pins.len())
            .map(|slot| PinRef::input_exec(id, slot))
            .chain((0..self.output_exec_pins.len()).map(|slot| PinRef::output_exec(id, slot)))
            .chain((0..self.input_data_pins.len()).map(|slot| PinRef::input_data(id, slot)))
            .chain((0..self.output_data_pins.len()).map(|slot| PinRef::output_data(id, slot)))
            .collect()
    }

    /// Find an input data pin slot by name.
    pub fn input_data_slot(&self, name: &str) -> Option<usize> {
        self.input_data_pins.iter().position(|p| p.name == name)
    }

    /// Find an output exec pin slot by name.
    pub fn output_exec_slot(&self, name: &str) -> Option<usize> {
        self.output_exec_pins.iter().position(|p| p.name == name)
    }
}

/// Parameter name of the method argument at `index`.
pub fn argument_name(index: usize) -> String {
    format!("arg{}", index)
}
