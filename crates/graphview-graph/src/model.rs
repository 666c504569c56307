use graphview_core::{Attributes, Edge, EdgeId, GraphError, GraphSnapshot, Node, NodeId, Vec2};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// Single source of truth for the nodes and edges of one screen.
///
/// Nodes and edges iterate in insertion order. Incident edges of every node are
/// kept in an adjacency index that is updated on each add/remove, so
/// [`GraphModel::neighbors`] costs O(degree).
#[derive(Debug, Default, Clone)]
pub struct GraphModel {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    adjacency: HashMap<NodeId, BTreeSet<EdgeId>>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from an initial data-source payload.
    ///
    /// Fails on the first invalid entry; nothing is returned in that case.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, GraphError> {
        let mut model = Self::new();
        for node in snapshot.nodes {
            model.add_node(node)?;
        }
        for edge in snapshot.edges {
            model.add_edge(edge)?;
        }
        tracing::debug!(
            "Loaded snapshot with {} nodes and {} edges",
            model.node_count(),
            model.edge_count()
        );
        Ok(model)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            tracing::warn!("Rejecting duplicate node id {}", node.id);
            return Err(GraphError::duplicate_node(&node.id));
        }
        self.adjacency.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Remove a node and every edge incident to it. Returns the removed edges
    /// in insertion order.
    ///
    /// Incident edges are dropped in a single pass over the edge map, so the
    /// cascade is O(E) whatever the node's degree.
    pub fn remove_node(&mut self, id: &NodeId) -> Vec<Edge> {
        if self.nodes.shift_remove(id).is_none() {
            return Vec::new();
        }

        let incident = self.adjacency.remove(id).unwrap_or_default();
        if incident.is_empty() {
            tracing::debug!("Removed node {}", id);
            return Vec::new();
        }

        let mut removed = Vec::with_capacity(incident.len());
        let edges = std::mem::take(&mut self.edges);
        self.edges = IndexMap::with_capacity(edges.len().saturating_sub(incident.len()));
        for (edge_id, edge) in edges {
            if !incident.contains(&edge_id) {
                self.edges.insert(edge_id, edge);
                continue;
            }
            let other = if &edge.source == id {
                &edge.target
            } else {
                &edge.source
            };
            if let Some(set) = self.adjacency.get_mut(other) {
                set.remove(&edge_id);
            }
            removed.push(edge);
        }

        tracing::debug!("Removed node {} and {} incident edges", id, removed.len());
        removed
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                tracing::warn!(
                    "Rejecting edge {} because node {} is missing from graph model",
                    edge.id,
                    endpoint
                );
                return Err(GraphError::UnknownEndpoint {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        if self.edges.contains_key(&edge.id) {
            tracing::warn!("Rejecting duplicate edge id {}", edge.id);
            return Err(GraphError::duplicate_edge(&edge.id));
        }

        for endpoint in [&edge.source, &edge.target] {
            self.adjacency
                .entry(endpoint.clone())
                .or_default()
                .insert(edge.id.clone());
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let edge = self.edges.shift_remove(id)?;
        for endpoint in [&edge.source, &edge.target] {
            if let Some(set) = self.adjacency.get_mut(endpoint) {
                set.remove(id);
            }
        }
        Some(edge)
    }

    pub fn update_node_position(&mut self, id: &NodeId, position: Vec2) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        node.position = position;
        Ok(())
    }

    /// Shallow-merge `partial` into the node's attributes.
    ///
    /// Existing keys keep their slot; new keys are appended in the order given.
    pub fn update_node_attributes(
        &mut self,
        id: &NodeId,
        partial: Attributes,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        for (key, value) in partial {
            node.attributes.insert(key, value);
        }
        Ok(())
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    /// Edges incident to `id` (either endpoint), in ascending edge id order.
    pub fn neighbors(&self, id: &NodeId) -> Vec<&Edge> {
        self.adjacency
            .get(id)
            .map(|set| set.iter().filter_map(|e| self.edges.get(e)).collect())
            .unwrap_or_default()
    }

    /// Nodes one hop away from `id`, excluding `id` itself unless it has a self loop.
    pub fn adjacent_nodes(&self, id: &NodeId) -> BTreeSet<&NodeId> {
        self.neighbors(id)
            .into_iter()
            .map(|edge| {
                if &edge.source == id {
                    &edge.target
                } else {
                    &edge.source
                }
            })
            .collect()
    }

    /// Edges joining `a` and `b` in either direction, in ascending edge id order.
    pub fn edges_between(&self, a: &NodeId, b: &NodeId) -> Vec<&Edge> {
        self.neighbors(a)
            .into_iter()
            .filter(|edge| edge.connects(a, b))
            .collect()
    }

    pub fn degree(&self, id: &NodeId) -> usize {
        self.adjacency.get(id).map_or(0, BTreeSet::len)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
