use crate::kinds::capabilities;
use crate::model::GraphModel;
use graphview_core::{Edge, EdgeId, EdgeStyle, FieldMapping, GraphError, NodeId};
use serde::{Deserialize, Serialize};

/// Screen-level rules for drag-to-connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionPolicy {
    pub allow_self_loops: bool,
    /// Refuse edges out of kinds without an output handle or into kinds
    /// without an input handle. Off unless a screen opts in.
    pub enforce_kind_handles: bool,
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self {
            allow_self_loops: false,
            enforce_kind_handles: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub field_mapping: Option<FieldMapping>,
    /// Falls back to [`EdgeStyle::connection_default`].
    pub style: Option<EdgeStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConnection {
    pub source: NodeId,
}

/// Turns a drag-to-connect gesture into a committed edge.
///
/// The pending connection never outlives a `complete_connection` call, whether
/// it succeeds or fails.
#[derive(Debug, Default)]
pub struct ConnectionController {
    policy: ConnectionPolicy,
    pending: Option<PendingConnection>,
}

impl ConnectionController {
    pub fn new(policy: ConnectionPolicy) -> Self {
        Self {
            policy,
            pending: None,
        }
    }

    pub fn policy(&self) -> ConnectionPolicy {
        self.policy
    }

    pub fn pending(&self) -> Option<&PendingConnection> {
        self.pending.as_ref()
    }

    pub fn is_connecting(&self) -> bool {
        self.pending.is_some()
    }

    /// Anchor a new connection at `source`'s output handle.
    pub fn begin_connection(
        &mut self,
        model: &GraphModel,
        source: &NodeId,
    ) -> Result<(), GraphError> {
        self.pending = None;
        if !model.contains_node(source) {
            return Err(GraphError::node_not_found(source));
        }
        self.pending = Some(PendingConnection {
            source: source.clone(),
        });
        tracing::debug!("Connection started at {}", source);
        Ok(())
    }

    pub fn complete_connection(
        &mut self,
        model: &mut GraphModel,
        target: &NodeId,
        options: ConnectOptions,
    ) -> Result<Edge, GraphError> {
        let pending = self
            .pending
            .take()
            .ok_or(GraphError::NoPendingConnection)?;

        if &pending.source == target && !self.policy.allow_self_loops {
            tracing::warn!("Rejected self loop on {}", target);
            return Err(GraphError::SelfLoopNotAllowed(target.clone()));
        }

        if self.policy.enforce_kind_handles {
            self.check_handles(model, &pending.source, target)?;
        }

        let edge = Edge {
            id: generate_edge_id(),
            source: pending.source,
            target: target.clone(),
            style: options.style.unwrap_or_else(EdgeStyle::connection_default),
            field_mapping: options.field_mapping,
        };
        model.add_edge(edge.clone())?;
        tracing::debug!("Connected {} -> {} as {}", edge.source, edge.target, edge.id);
        Ok(edge)
    }

    /// Drop the pending connection (released over empty canvas).
    pub fn cancel_connection(&mut self) -> Option<PendingConnection> {
        self.pending.take()
    }

    fn check_handles(
        &self,
        model: &GraphModel,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<(), GraphError> {
        // Missing endpoints are reported by add_edge.
        let (Some(from), Some(to)) = (model.get_node(source), model.get_node(target)) else {
            return Ok(());
        };
        if !capabilities(from.kind).emits_outgoing || !capabilities(to.kind).accepts_incoming {
            tracing::warn!(
                "Rejected connection {} ({}) -> {} ({})",
                source,
                from.kind.as_str(),
                target,
                to.kind.as_str()
            );
            return Err(GraphError::HandleMismatch {
                from: source.clone(),
                to: target.clone(),
            });
        }
        Ok(())
    }
}

fn generate_edge_id() -> EdgeId {
    EdgeId(format!("edge-{}", uuid::Uuid::new_v4()))
}
