//! # Pin Connection Engine
//!
//! Links and unlinks pins while keeping both halves of every edge in sync.
//!
//! - Exec edges: an output exec pin targets at most one input exec pin; an
//!   input exec pin may be targeted by many outputs (control-flow merge).
//! - Data edges: an input data pin is fed by at most one output data pin; an
//!   output data pin may feed many inputs (value reuse).
//!
//! Connecting over an existing single-ended link evicts the old partner.

use super::method::Method;
use super::node::NodeId;
use super::pin::{Link, PinKind, PinRef};
use crate::error::GraphError;
use crate::metadata::{check_assignable, TypeCatalog};

impl Method {
    /// Check whether two pins may be linked. Order of the arguments does not matter.
    pub fn can_connect(&self, a: PinRef, b: PinRef, catalog: &dyn TypeCatalog) -> bool {
        self.check_connection(a, b, catalog).is_ok()
    }

    /// Validate a prospective link and orient it output-first.
    pub fn check_connection(
        &self,
        a: PinRef,
        b: PinRef,
        catalog: &dyn TypeCatalog,
    ) -> Result<Link, GraphError> {
        let link = match (a.kind, b.kind) {
            (PinKind::OutputExec, PinKind::InputExec) | (PinKind::OutputData, PinKind::InputData) => {
                Link::new(a, b)
            }
            (PinKind::InputExec, PinKind::OutputExec) | (PinKind::InputData, PinKind::OutputData) => {
                Link::new(b, a)
            }
            _ => {
                return Err(GraphError::TypeMismatch {
                    a,
                    b,
                    detail: "pin kinds do not form an exec or data pair".to_string(),
                })
            }
        };

        if link.is_exec() {
            self.output_exec_pin(link.from)?;
            self.input_exec_pin(link.to)?;
        } else {
            let produced = &self.output_data_pin(link.from)?.pin_type;
            let consumed = &self.input_data_pin(link.to)?.pin_type;
            match check_assignable(produced, consumed, catalog) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(GraphError::TypeMismatch {
                        a,
                        b,
                        detail: format!("'{}' is not assignable to '{}'", produced, consumed),
                    })
                }
                Err(error) => {
                    return Err(GraphError::TypeMismatch {
                        a,
                        b,
                        detail: error.to_string(),
                    })
                }
            }
        }

        Ok(link)
    }

    pub fn is_linked(&self, link: Link) -> bool {
        if link.is_exec() {
            self.output_exec_pin(link.from)
                .map(|pin| pin.outgoing == Some(link.to))
                .unwrap_or(false)
        } else {
            self.input_data_pin(link.to)
                .map(|pin| pin.incoming == Some(link.from))
                .unwrap_or(false)
        }
    }

    /// Link two pins. Returns the link displaced to make room, if any.
    ///
    /// Connecting pins that are already linked to each other is a no-op.
    pub fn connect(
        &mut self,
        a: PinRef,
        b: PinRef,
        catalog: &dyn TypeCatalog,
    ) -> Result<Option<Link>, GraphError> {
        let link = self.check_connection(a, b, catalog)?;
        if self.is_linked(link) {
            return Ok(None);
        }

        let evicted = if link.is_exec() {
            let previous = self.output_exec_pin_mut(link.from)?.outgoing.replace(link.to);
            if let Some(previous) = previous {
                self.input_exec_pin_mut(previous)?.incoming.remove(&link.from);
            }
            self.input_exec_pin_mut(link.to)?.incoming.insert(link.from);
            previous.map(|previous| Link::new(link.from, previous))
        } else {
            let previous = self.input_data_pin_mut(link.to)?.incoming.replace(link.from);
            if let Some(previous) = previous {
                self.output_data_pin_mut(previous)?.outgoing.remove(&link.to);
            }
            self.output_data_pin_mut(link.from)?.outgoing.insert(link.to);
            previous.map(|previous| Link::new(previous, link.to))
        };

        tracing::debug!("[GRAPH] {}: linked {} -> {}", self.name, link.from, link.to);
        Ok(evicted)
    }

    /// Remove one specific link. Returns whether it existed.
    pub fn unlink(&mut self, link: Link) -> Result<bool, GraphError> {
        if !self.is_linked(link) {
            return Ok(false);
        }

        if link.is_exec() {
            self.output_exec_pin_mut(link.from)?.outgoing = None;
            self.input_exec_pin_mut(link.to)?.incoming.remove(&link.from);
        } else {
            self.input_data_pin_mut(link.to)?.incoming = None;
            self.output_data_pin_mut(link.from)?.outgoing.remove(&link.to);
        }
        Ok(true)
    }

    /// Remove every link of a pin, on both ends. Returns the removed links.
    pub fn disconnect(&mut self, pin: PinRef) -> Result<Vec<Link>, GraphError> {
        let mut removed = Vec::new();

        match pin.kind {
            PinKind::InputExec => {
                let sources = std::mem::take(&mut self.input_exec_pin_mut(pin)?.incoming);
                for source in sources {
                    self.output_exec_pin_mut(source)?.outgoing = None;
                    removed.push(Link::new(source, pin));
                }
            }
            PinKind::OutputExec => {
                if let Some(target) = self.output_exec_pin_mut(pin)?.outgoing.take() {
                    self.input_exec_pin_mut(target)?.incoming.remove(&pin);
                    removed.push(Link::new(pin, target));
                }
            }
            PinKind::InputData => {
                if let Some(source) = self.input_data_pin_mut(pin)?.incoming.take() {
                    self.output_data_pin_mut(source)?.outgoing.remove(&pin);
                    removed.push(Link::new(source, pin));
                }
            }
            PinKind::OutputData => {
                let targets = std::mem::take(&mut self.output_data_pin_mut(pin)?.outgoing);
                for target in targets {
                    self.input_data_pin_mut(target)?.incoming = None;
                    removed.push(Link::new(pin, target));
                }
            }
        }

        Ok(removed)
    }

    /// Disconnect every pin owned by a node.
    pub fn disconnect_all(&mut self, id: NodeId) -> Result<Vec<Link>, GraphError> {
        let pins = self.node(id).ok_or(GraphError::NodeNotFound(id))?.pin_refs();

        let mut removed = Vec::new();
        for pin in pins {
            removed.extend(self.disconnect(pin)?);
        }
        Ok(removed)
    }
}
