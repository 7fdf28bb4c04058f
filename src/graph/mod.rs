//! # Graph Model
//!
//! The node-graph intermediate representation: typed pins, the closed set of
//! node kinds, method graphs that own their nodes, and classes that own
//! their methods.
//!
//! Pins refer to their partners through [`PinRef`] handles (node id, pin
//! kind, slot) into the owning [`Method`]'s arena. Exec loops and recursive
//! calls are therefore ordinary data, not ownership cycles.

mod class;
mod connect;
mod edit;
mod method;
mod node;
mod pin;

pub use class::{unique_name, Class, ClassModifier, Variable, VariableModifier};
pub use edit::GraphEdit;
pub use method::{Method, MethodModifier};
pub use node::{
    argument_name, Capabilities, Node, NodeId, NodeKind, Position, VariableSpecifier,
    BODY_SLOT, COMPLETED_SLOT, ELSE_SLOT, EXEC_PIN_NAME, TARGET_PIN_NAME, THEN_SLOT,
};
pub use pin::{InputDataPin, InputExecPin, Link, OutputDataPin, OutputExecPin, PinKind, PinRef};
