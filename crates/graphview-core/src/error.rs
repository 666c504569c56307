use crate::{EdgeId, NodeId};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Node => f.write_str("node"),
            ElementKind::Edge => f.write_str("edge"),
        }
    }
}

/// Failures raised by graph operations.
///
/// None of these are fatal: the worst outcome of any of them is that the
/// attempted gesture has no effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate {element} id: {id}")]
    DuplicateId { element: ElementKind, id: String },
    #[error("Edge {edge} references unknown node {node}")]
    UnknownEndpoint { edge: EdgeId, node: NodeId },
    #[error("No {element} with id {id}")]
    NotFound { element: ElementKind, id: String },
    #[error("Node {0} cannot be connected to itself")]
    SelfLoopNotAllowed(NodeId),
    #[error("Node {from} cannot be connected to node {to}")]
    HandleMismatch { from: NodeId, to: NodeId },
    #[error("No connection is in progress")]
    NoPendingConnection,
}

impl GraphError {
    pub fn node_not_found(id: &NodeId) -> Self {
        GraphError::NotFound {
            element: ElementKind::Node,
            id: id.to_string(),
        }
    }

    pub fn edge_not_found(id: &EdgeId) -> Self {
        GraphError::NotFound {
            element: ElementKind::Edge,
            id: id.to_string(),
        }
    }

    pub fn duplicate_node(id: &NodeId) -> Self {
        GraphError::DuplicateId {
            element: ElementKind::Node,
            id: id.to_string(),
        }
    }

    pub fn duplicate_edge(id: &EdgeId) -> Self {
        GraphError::DuplicateId {
            element: ElementKind::Edge,
            id: id.to_string(),
        }
    }
}
