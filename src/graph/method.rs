//! # Method Graphs
//!
//! A [`Method`] exclusively owns its nodes. Nodes live in an arena sorted by
//! [`NodeId`]; ids are handed out monotonically and never reused, so a stale
//! [`PinRef`] can fail to resolve but can never alias a newer pin.
//!
//! The supported mutations are [`Method::add_node`], [`Method::connect`],
//! [`Method::disconnect`] and [`Method::remove_node`]. Each of them is also
//! expressible as an invertible [`GraphEdit`](super::GraphEdit).

use super::node::{Node, NodeId, NodeKind, Position};
use super::pin::{InputDataPin, InputExecPin, Link, OutputDataPin, OutputExecPin, PinKind, PinRef};
use crate::error::GraphError;
use crate::types::TypeSpecifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodModifier {
    Public,
    Protected,
    Internal,
    Private,
    Static,
    Abstract,
    Virtual,
    Override,
    Sealed,
}

/// Two methods compare equal when their signature, modifiers and nodes match.
/// The id counter is not compared: an undone `add_node` leaves it advanced so
/// the discarded id is never handed out again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MethodRecord")]
pub struct Method {
    pub name: String,
    argument_types: Vec<TypeSpecifier>,
    return_types: Vec<TypeSpecifier>,
    #[serde(default)]
    pub modifiers: BTreeSet<MethodModifier>,
    nodes: Vec<Node>,
    entry: NodeId,
    next_node_id: u32,
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.argument_types == other.argument_types
            && self.return_types == other.return_types
            && self.modifiers == other.modifiers
            && self.entry == other.entry
            && self.nodes == other.nodes
    }
}

/// Serialized form of a [`Method`], checked before it becomes one.
#[derive(Deserialize)]
struct MethodRecord {
    name: String,
    argument_types: Vec<TypeSpecifier>,
    return_types: Vec<TypeSpecifier>,
    #[serde(default)]
    modifiers: BTreeSet<MethodModifier>,
    nodes: Vec<Node>,
    entry: NodeId,
    #[serde(default)]
    next_node_id: u32,
}

impl TryFrom<MethodRecord> for Method {
    type Error = GraphError;

    fn try_from(record: MethodRecord) -> Result<Self, Self::Error> {
        let mut nodes = record.nodes;
        nodes.sort_by_key(|node| node.id);
        if let Some(pair) = nodes.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(GraphError::NodeIdInUse(pair[1].id));
        }

        let entry = nodes
            .binary_search_by_key(&record.entry, |node| node.id)
            .map_err(|_| GraphError::NodeNotFound(record.entry))?;
        if !matches!(nodes[entry].kind, NodeKind::MethodEntry { .. }) {
            return Err(GraphError::NodeNotFound(record.entry));
        }
        if let Some(extra) = nodes
            .iter()
            .find(|node| node.id != record.entry && matches!(node.kind, NodeKind::MethodEntry { .. }))
        {
            return Err(GraphError::DuplicateEntry(extra.id));
        }

        let next_node_id = nodes
            .last()
            .map_or(record.next_node_id, |last| record.next_node_id.max(last.id.0 + 1));

        Ok(Self {
            name: record.name,
            argument_types: record.argument_types,
            return_types: record.return_types,
            modifiers: record.modifiers,
            nodes,
            entry: record.entry,
            next_node_id,
        })
    }
}

impl Method {
    /// Create a method graph holding only its entry node.
    pub fn new(
        name: impl Into<String>,
        argument_types: Vec<TypeSpecifier>,
        return_types: Vec<TypeSpecifier>,
    ) -> Self {
        let entry = NodeId(0);
        let entry_node = Node::new(
            entry,
            NodeKind::MethodEntry {
                argument_types: argument_types.clone(),
            },
            Position::default(),
        );

        Self {
            name: name.into(),
            argument_types,
            return_types,
            modifiers: BTreeSet::from([MethodModifier::Public]),
            nodes: vec![entry_node],
            entry,
            next_node_id: 1,
        }
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = MethodModifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    pub fn argument_types(&self) -> &[TypeSpecifier] {
        &self.argument_types
    }

    pub fn return_types(&self) -> &[TypeSpecifier] {
        &self.return_types
    }

    pub fn entry_id(&self) -> NodeId {
        self.entry
    }

    pub fn entry_node(&self) -> Option<&Node> {
        self.node(self.entry)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn index_of(&self, id: NodeId) -> Result<usize, usize> {
        self.nodes.binary_search_by_key(&id, |node| node.id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).ok().map(|index| &self.nodes[index])
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        let index = self.index_of(id).map_err(|_| GraphError::NodeNotFound(id))?;
        Ok(&mut self.nodes[index])
    }

    /// Add a node of the given kind; its pins are derived from the kind.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> Result<NodeId, GraphError> {
        if matches!(kind, NodeKind::MethodEntry { .. }) {
            return Err(GraphError::DuplicateEntry(self.entry));
        }

        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        tracing::debug!("[GRAPH] {}: adding node {} ({})", self.name, id, kind.label());
        self.nodes.push(Node::new(id, kind, position));
        Ok(id)
    }

    /// Re-insert a previously removed node under its original id. Any link
    /// references carried by the node are dropped.
    pub fn insert_node(&mut self, mut node: Node) -> Result<NodeId, GraphError> {
        if matches!(node.kind, NodeKind::MethodEntry { .. }) {
            return Err(GraphError::DuplicateEntry(self.entry));
        }

        let index = match self.index_of(node.id) {
            Ok(_) => return Err(GraphError::NodeIdInUse(node.id)),
            Err(index) => index,
        };

        node.clear_links();
        let id = node.id;
        self.next_node_id = self.next_node_id.max(id.0 + 1);
        self.nodes.insert(index, node);
        Ok(id)
    }

    /// Sever every link of a node and take it out of the graph.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        if id == self.entry {
            return Err(GraphError::EntryNodeRemoval(id));
        }

        let index = self.index_of(id).map_err(|_| GraphError::NodeNotFound(id))?;
        self.disconnect_all(id)?;

        tracing::debug!("[GRAPH] {}: removed node {}", self.name, id);
        Ok(self.nodes.remove(index))
    }

    /// Every link in the graph, output-first, in a deterministic order.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for node in &self.nodes {
            for (slot, pin) in node.output_exec_pins.iter().enumerate() {
                if let Some(target) = pin.outgoing {
                    links.push(Link::new(PinRef::output_exec(node.id, slot), target));
                }
            }
            for (slot, pin) in node.output_data_pins.iter().enumerate() {
                for target in &pin.outgoing {
                    links.push(Link::new(PinRef::output_data(node.id, slot), *target));
                }
            }
        }
        links
    }

    /// Links that touch any pin of the given node.
    pub fn node_links(&self, id: NodeId) -> Vec<Link> {
        self.links()
            .into_iter()
            .filter(|link| link.from.node == id || link.to.node == id)
            .collect()
    }

    /// Pins whose link references are not mirrored by their partner, or
    /// point at pins that do not exist. Empty for a consistent graph.
    pub fn dangling_references(&self) -> Vec<PinRef> {
        let mut dangling = Vec::new();

        for node in &self.nodes {
            for (slot, pin) in node.input_exec_pins.iter().enumerate() {
                let me = PinRef::input_exec(node.id, slot);
                for source in &pin.incoming {
                    let mirrored = self.output_exec_pin(*source).ok().and_then(|p| p.outgoing);
                    if mirrored != Some(me) {
                        dangling.push(me);
                    }
                }
            }
            for (slot, pin) in node.output_exec_pins.iter().enumerate() {
                let me = PinRef::output_exec(node.id, slot);
                if let Some(target) = pin.outgoing {
                    let mirrored = self
                        .input_exec_pin(target)
                        .map(|p| p.incoming.contains(&me))
                        .unwrap_or(false);
                    if !mirrored {
                        dangling.push(me);
                    }
                }
            }
            for (slot, pin) in node.input_data_pins.iter().enumerate() {
                let me = PinRef::input_data(node.id, slot);
                if let Some(source) = pin.incoming {
                    let mirrored = self
                        .output_data_pin(source)
                        .map(|p| p.outgoing.contains(&me))
                        .unwrap_or(false);
                    if !mirrored {
                        dangling.push(me);
                    }
                }
            }
            for (slot, pin) in node.output_data_pins.iter().enumerate() {
                let me = PinRef::output_data(node.id, slot);
                for target in &pin.outgoing {
                    let mirrored = self.input_data_pin(*target).ok().and_then(|p| p.incoming);
                    if mirrored != Some(me) {
                        dangling.push(me);
                    }
                }
            }
        }

        dangling.sort();
        dangling.dedup();
        dangling
    }

    pub fn input_exec_pin(&self, pin: PinRef) -> Result<&InputExecPin, GraphError> {
        self.expect_kind(pin, PinKind::InputExec)?;
        self.node(pin.node)
            .and_then(|node| node.input_exec_pins.get(pin.slot))
            .ok_or(GraphError::PinNotFound(pin))
    }

    pub fn output_exec_pin(&self, pin: PinRef) -> Result<&OutputExecPin, GraphError> {
        self.expect_kind(pin, PinKind::OutputExec)?;
        self.node(pin.node)
            .and_then(|node| node.output_exec_pins.get(pin.slot))
            .ok_or(GraphError::PinNotFound(pin))
    }

    pub fn input_data_pin(&self, pin: PinRef) -> Result<&InputDataPin, GraphError> {
        self.expect_kind(pin, PinKind::InputData)?;
        self.node(pin.node)
            .and_then(|node| node.input_data_pins.get(pin.slot))
            .ok_or(GraphError::PinNotFound(pin))
    }

    pub fn output_data_pin(&self, pin: PinRef) -> Result<&OutputDataPin, GraphError> {
        self.expect_kind(pin, PinKind::OutputData)?;
        self.node(pin.node)
            .and_then(|node| node.output_data_pins.get(pin.slot))
            .ok_or(GraphError::PinNotFound(pin))
    }

    pub(crate) fn input_exec_pin_mut(&mut self, pin: PinRef) -> Result<&mut InputExecPin, GraphError> {
        self.expect_kind(pin, PinKind::InputExec)?;
        self.node_mut(pin.node)?
            .input_exec_pins
            .get_mut(pin.slot)
            .ok_or(GraphError::PinNotFound(pin))
    }

    pub(crate) fn output_exec_pin_mut(&mut self, pin: PinRef) -> Result<&mut OutputExecPin, GraphError> {
        self.expect_kind(pin, PinKind::OutputExec)?;
        self.node_mut(pin.node)?
            .output_exec_pins
            .get_mut(pin.slot)
            .ok_or(GraphError::PinNotFound(pin))
    }

    pub(crate) fn input_data_pin_mut(&mut self, pin: PinRef) -> Result<&mut InputDataPin, GraphError> {
        self.expect_kind(pin, PinKind::InputData)?;
        self.node_mut(pin.node)?
            .input_data_pins
            .get_mut(pin.slot)
            .ok_or(GraphError::PinNotFound(pin))
    }

    pub(crate) fn output_data_pin_mut(&mut self, pin: PinRef) -> Result<&mut OutputDataPin, GraphError> {
        self.expect_kind(pin, PinKind::OutputData)?;
        self.node_mut(pin.node)?
            .output_data_pins
            .get_mut(pin.slot)
            .ok_or(GraphError::PinNotFound(pin))
    }

    fn expect_kind(&self, pin: PinRef, kind: PinKind) -> Result<(), GraphError> {
        if pin.kind == kind {
            Ok(())
        } else {
            Err(GraphError::PinNotFound(pin))
        }
    }

    /// Whether the pin exists in this graph.
    pub fn contains_pin(&self, pin: PinRef) -> bool {
        match pin.kind {
            PinKind::InputExec => self.input_exec_pin(pin).is_ok(),
            PinKind::OutputExec => self.output_exec_pin(pin).is_ok(),
            PinKind::InputData => self.input_data_pin(pin).is_ok(),
            PinKind::OutputData => self.output_data_pin(pin).is_ok(),
        }
    }

    /// Handle to a node's pin of the given kind, looked up by pin name.
    pub fn pin_by_name(&self, id: NodeId, kind: PinKind, name: &str) -> Result<PinRef, GraphError> {
        let node = self.node(id).ok_or(GraphError::NodeNotFound(id))?;
        let slot = match kind {
            PinKind::InputExec => node.input_exec_pins.iter().position(|p| p.name == name),
            PinKind::OutputExec => node.output_exec_pins.iter().position(|p| p.name == name),
            PinKind::InputData => node.input_data_pins.iter().position(|p| p.name == name),
            PinKind::OutputData => node.output_data_pins.iter().position(|p| p.name == name),
        };
        slot.map(|slot| PinRef::new(id, kind, slot))
            .ok_or(GraphError::PinNotFound(PinRef::new(id, kind, usize::MAX)))
    }
}
