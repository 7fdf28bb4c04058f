//! # Pins
//!
//! Typed connection points on nodes. Exec pins carry control flow, data pins
//! carry values. Links are stored on both ends as [`PinRef`] handles into the
//! owning method's node arena, never as owning references.

use super::NodeId;
use crate::types::TypeSpecifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The four disjoint pin kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    InputExec,
    OutputExec,
    InputData,
    OutputData,
}

impl PinKind {
    pub fn is_exec(self) -> bool {
        matches!(self, PinKind::InputExec | PinKind::OutputExec)
    }

    pub fn is_input(self) -> bool {
        matches!(self, PinKind::InputExec | PinKind::InputData)
    }
}

/// Handle to a pin: owning node, pin kind and slot within that kind's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PinRef {
    pub node: NodeId,
    pub kind: PinKind,
    pub slot: usize,
}

impl PinRef {
    pub fn new(node: NodeId, kind: PinKind, slot: usize) -> Self {
        Self { node, kind, slot }
    }

    pub fn input_exec(node: NodeId, slot: usize) -> Self {
        Self::new(node, PinKind::InputExec, slot)
    }

    pub fn output_exec(node: NodeId, slot: usize) -> Self {
        Self::new(node, PinKind::OutputExec, slot)
    }

    pub fn input_data(node: NodeId, slot: usize) -> Self {
        Self::new(node, PinKind::InputData, slot)
    }

    pub fn output_data(node: NodeId, slot: usize) -> Self {
        Self::new(node, PinKind::OutputData, slot)
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PinKind::InputExec => "exec-in",
            PinKind::OutputExec => "exec-out",
            PinKind::InputData => "data-in",
            PinKind::OutputData => "data-out",
        };
        write!(f, "{}:{}[{}]", self.node, kind, self.slot)
    }
}

/// A directed edge, always stored output-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from: PinRef,
    pub to: PinRef,
}

impl Link {
    pub fn new(from: PinRef, to: PinRef) -> Self {
        Self { from, to }
    }

    pub fn is_exec(&self) -> bool {
        self.from.kind.is_exec()
    }
}

/// Control-flow entry. Any number of output exec pins may target it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputExecPin {
    pub name: String,
    #[serde(default)]
    pub(crate) incoming: BTreeSet<PinRef>,
}

impl InputExecPin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            incoming: BTreeSet::new(),
        }
    }

    pub fn incoming(&self) -> &BTreeSet<PinRef> {
        &self.incoming
    }
}

/// Control-flow exit. Targets at most one input exec pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputExecPin {
    pub name: String,
    #[serde(default)]
    pub(crate) outgoing: Option<PinRef>,
}

impl OutputExecPin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outgoing: None,
        }
    }

    pub fn outgoing(&self) -> Option<PinRef> {
        self.outgoing
    }
}

/// Value consumer. Fed by at most one output data pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDataPin {
    pub name: String,
    pub pin_type: TypeSpecifier,
    #[serde(default)]
    pub(crate) incoming: Option<PinRef>,
}

impl InputDataPin {
    pub fn new(name: impl Into<String>, pin_type: TypeSpecifier) -> Self {
        Self {
            name: name.into(),
            pin_type,
            incoming: None,
        }
    }

    pub fn incoming(&self) -> Option<PinRef> {
        self.incoming
    }
}

/// Value producer. May feed any number of input data pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDataPin {
    pub name: String,
    pub pin_type: TypeSpecifier,
    #[serde(default)]
    pub(crate) outgoing: BTreeSet<PinRef>,
}

impl OutputDataPin {
    pub fn new(name: impl Into<String>, pin_type: TypeSpecifier) -> Self {
        Self {
            name: name.into(),
            pin_type,
            outgoing: BTreeSet::new(),
        }
    }

    pub fn outgoing(&self) -> &BTreeSet<PinRef> {
        &self.outgoing
    }
}
