//! # Graph Edits
//!
//! Every supported mutation as a plain value. [`GraphEdit::apply`] performs
//! the edit and returns its inverse; applying the inverse puts the graph back
//! as it was, node ids included. The counter for fresh ids is never rewound,
//! so an id freed by undoing an `AddNode` is not handed out again. An external
//! command stack can keep `(edit, inverse)` pairs for undo and redo.
//!
//! An edit that fails leaves the graph unchanged.
//!
//! ```rust
//! use printgraph::{GraphEdit, Method, MemoryTypeCatalog, NodeKind, Position};
//!
//! let catalog = MemoryTypeCatalog::new();
//! let mut method = Method::new("Tick", vec![], vec![]);
//!
//! let add = GraphEdit::AddNode { kind: NodeKind::IfElse, position: Position::default() };
//! let undo = add.apply(&mut method, &catalog)?;
//! assert_eq!(method.node_count(), 2);
//!
//! let redo = undo.apply(&mut method, &catalog)?;
//! assert_eq!(method.node_count(), 1);
//! redo.apply(&mut method, &catalog)?;
//! assert_eq!(method.node_count(), 2);
//! # Ok::<(), printgraph::GraphError>(())
//! ```

use super::method::Method;
use super::node::{Node, NodeId, NodeKind, Position};
use super::pin::{Link, PinRef};
use crate::error::GraphError;
use crate::metadata::TypeCatalog;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", content = "args", rename_all = "snake_case")]
pub enum GraphEdit {
    AddNode { kind: NodeKind, position: Position },
    /// Put a removed node back under its old id and restore its links.
    RestoreNode { node: Node, links: Vec<Link> },
    RemoveNode { node: NodeId },
    Connect { a: PinRef, b: PinRef },
    /// Remove exactly one link, leaving the pins' other links alone.
    Unlink { link: Link },
    Disconnect { pin: PinRef },
    Batch(Vec<GraphEdit>),
}

impl GraphEdit {
    /// Apply the edit and return the edit that undoes it.
    ///
    /// A failing batch rolls back the edits it already applied.
    pub fn apply(&self, method: &mut Method, catalog: &dyn TypeCatalog) -> Result<GraphEdit, GraphError> {
        match self {
            GraphEdit::AddNode { kind, position } => {
                let id = method.add_node(kind.clone(), *position)?;
                Ok(GraphEdit::RemoveNode { node: id })
            }
            GraphEdit::RestoreNode { node, links } => {
                let id = method.insert_node(node.clone())?;
                let mut evicted = Vec::new();
                for link in links {
                    match method.connect(link.from, link.to, catalog) {
                        Ok(displaced) => evicted.extend(displaced),
                        Err(error) => {
                            roll_back(&GraphEdit::RemoveNode { node: id }, method, catalog);
                            for link in evicted.iter().rev() {
                                let reconnect = GraphEdit::Connect {
                                    a: link.from,
                                    b: link.to,
                                };
                                roll_back(&reconnect, method, catalog);
                            }
                            return Err(error);
                        }
                    }
                }
                Ok(GraphEdit::RemoveNode { node: id })
            }
            GraphEdit::RemoveNode { node } => {
                let links = method.node_links(*node);
                let removed = method.remove_node(*node)?;
                Ok(GraphEdit::RestoreNode {
                    node: removed,
                    links,
                })
            }
            GraphEdit::Connect { a, b } => {
                let link = method.check_connection(*a, *b, catalog)?;
                if method.is_linked(link) {
                    return Ok(GraphEdit::Batch(Vec::new()));
                }

                let evicted = method.connect(*a, *b, catalog)?;
                let mut inverse = vec![GraphEdit::Unlink { link }];
                if let Some(evicted) = evicted {
                    inverse.push(GraphEdit::Connect {
                        a: evicted.from,
                        b: evicted.to,
                    });
                }
                Ok(GraphEdit::Batch(inverse))
            }
            GraphEdit::Unlink { link } => {
                if method.unlink(*link)? {
                    Ok(GraphEdit::Connect {
                        a: link.from,
                        b: link.to,
                    })
                } else {
                    Ok(GraphEdit::Batch(Vec::new()))
                }
            }
            GraphEdit::Disconnect { pin } => {
                let removed = method.disconnect(*pin)?;
                Ok(GraphEdit::Batch(
                    removed
                        .into_iter()
                        .map(|link| GraphEdit::Connect {
                            a: link.from,
                            b: link.to,
                        })
                        .collect(),
                ))
            }
            GraphEdit::Batch(edits) => {
                let mut inverses = Vec::with_capacity(edits.len());
                for edit in edits {
                    match edit.apply(method, catalog) {
                        Ok(inverse) => inverses.push(inverse),
                        Err(error) => {
                            for inverse in inverses.iter().rev() {
                                roll_back(inverse, method, catalog);
                            }
                            return Err(error);
                        }
                    }
                }
                inverses.reverse();
                Ok(GraphEdit::Batch(inverses))
            }
        }
    }
}

/// Apply an undo step on an error path, where the original error wins.
fn roll_back(inverse: &GraphEdit, method: &mut Method, catalog: &dyn TypeCatalog) {
    if let Err(error) = inverse.apply(method, catalog) {
        tracing::warn!("[GRAPH] {}: rollback step failed: {}", method.name, error);
    }
}
