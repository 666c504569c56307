use crate::model::GraphModel;
use graphview_core::{Edge, EdgeId, GraphError, NodeId};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Per-node attribute fields to emphasise, derived from one active edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    pub edge: Option<EdgeId>,
    pub fields: IndexMap<NodeId, Vec<String>>,
}

impl HighlightSet {
    /// Rebuild the highlight list of every node for `edge`.
    ///
    /// Nodes that are not endpoints of a field-mapped edge get an empty list.
    pub fn compute(model: &GraphModel, edge: Option<&Edge>) -> Self {
        let mut fields: IndexMap<NodeId, Vec<String>> = model
            .node_ids()
            .map(|id| (id.clone(), Vec::new()))
            .collect();

        if let Some(edge) = edge
            && let Some(mapping) = &edge.field_mapping
        {
            if let Some(list) = fields.get_mut(&edge.source) {
                list.push(mapping.source_field.clone());
            }
            if let Some(list) = fields.get_mut(&edge.target) {
                list.push(mapping.target_field.clone());
            }
        }

        Self {
            edge: edge.map(|e| e.id.clone()),
            fields,
        }
    }

    pub fn fields_for(&self, id: &NodeId) -> &[String] {
        self.fields.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any node is highlighted or an edge is active.
    pub fn is_active(&self) -> bool {
        self.edge.is_some() || self.fields.values().any(|f| !f.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_nodes: BTreeSet<NodeId>,
    pub selected_edge: Option<EdgeId>,
    pub hovered_edge: Option<EdgeId>,
}

/// Derives highlight state from the selection. Never mutates the model.
///
/// Hover takes precedence while it lasts; clearing it always falls back to the
/// highlights of the standing selection.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    selected: HighlightSet,
    hovered: Option<HighlightSet>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The effective highlights: hover if one is active, otherwise selection.
    pub fn highlights(&self) -> &HighlightSet {
        self.hovered.as_ref().unwrap_or(&self.selected)
    }

    /// The edge currently driving [`Self::highlights`].
    pub fn active_edge(&self) -> Option<&EdgeId> {
        self.highlights().edge.as_ref()
    }

    pub fn select_edge(
        &mut self,
        model: &GraphModel,
        id: &EdgeId,
    ) -> Result<&HighlightSet, GraphError> {
        let edge = model
            .get_edge(id)
            .ok_or_else(|| GraphError::edge_not_found(id))?;
        self.state.selected_edge = Some(id.clone());
        self.selected = HighlightSet::compute(model, Some(edge));
        tracing::debug!("Selected edge {}", id);
        Ok(self.highlights())
    }

    pub fn hover_edge(
        &mut self,
        model: &GraphModel,
        id: &EdgeId,
    ) -> Result<&HighlightSet, GraphError> {
        let edge = model
            .get_edge(id)
            .ok_or_else(|| GraphError::edge_not_found(id))?;
        self.state.hovered_edge = Some(id.clone());
        self.hovered = Some(HighlightSet::compute(model, Some(edge)));
        Ok(self.highlights())
    }

    /// Mouse left the hovered edge.
    pub fn clear_hover(&mut self) -> &HighlightSet {
        self.state.hovered_edge = None;
        self.hovered = None;
        &self.selected
    }

    /// Select nodes to reveal their relationship.
    ///
    /// Exactly two nodes activate the connecting edge with the lowest id (or
    /// clear the edge selection when none connects them). Zero nodes clear
    /// everything. Any other count leaves edge highlighting untouched.
    /// Returns the selected edge afterwards.
    pub fn select_nodes_for_comparison<I>(&mut self, model: &GraphModel, ids: I) -> Option<EdgeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let selected: BTreeSet<NodeId> = ids.into_iter().collect();

        match selected.len() {
            0 => self.clear_selection(model),
            2 => {
                let mut pair = selected.iter();
                if let (Some(a), Some(b)) = (pair.next(), pair.next()) {
                    match model.edges_between(a, b).into_iter().next() {
                        Some(edge) if self.state.selected_edge.as_ref() != Some(&edge.id) => {
                            self.state.selected_edge = Some(edge.id.clone());
                            self.selected = HighlightSet::compute(model, Some(edge));
                            tracing::debug!("Promoted edge {} from node pair {}/{}", edge.id, a, b);
                        }
                        Some(_) => {}
                        None => {
                            self.state.selected_edge = None;
                            self.selected = HighlightSet::compute(model, None);
                        }
                    }
                }
                self.state.selected_nodes = selected;
            }
            _ => self.state.selected_nodes = selected,
        }

        self.state.selected_edge.clone()
    }

    /// Reset every highlight-bearing field, hover included.
    pub fn clear_selection(&mut self, model: &GraphModel) {
        self.state = SelectionState::default();
        self.selected = HighlightSet::compute(model, None);
        self.hovered = None;
    }

    /// Recompute after the model changed underneath the selection.
    ///
    /// Selected nodes and edges that no longer exist are dropped.
    pub fn refresh(&mut self, model: &GraphModel) {
        self.state
            .selected_nodes
            .retain(|id| model.contains_node(id));

        let selected_edge = self
            .state
            .selected_edge
            .take()
            .and_then(|id| model.get_edge(&id));
        self.state.selected_edge = selected_edge.map(|e| e.id.clone());
        self.selected = HighlightSet::compute(model, selected_edge);

        let hovered_edge = self
            .state
            .hovered_edge
            .take()
            .and_then(|id| model.get_edge(&id));
        self.state.hovered_edge = hovered_edge.map(|e| e.id.clone());
        self.hovered = hovered_edge.map(|edge| HighlightSet::compute(model, Some(edge)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphview_core::{Node, NodeKind};

    fn erd_model() -> GraphModel {
        let mut model = GraphModel::new();
        for id in ["A", "B", "C"] {
            model.add_node(Node::new(id, NodeKind::Table)).unwrap();
        }
        model
            .add_edge(Edge::new("A->B", "A", "B").with_field_mapping("id", "name"))
            .unwrap();
        model
            .add_edge(Edge::new("B->C", "B", "C").with_field_mapping("owner_id", "id"))
            .unwrap();
        model
    }

    fn ids(values: &[&str]) -> Vec<NodeId> {
        values.iter().map(|v| NodeId::from(*v)).collect()
    }

    #[test]
    fn test_two_node_selection_reveals_edge() {
        let model = erd_model();
        let mut selection = SelectionController::new();

        let active = selection.select_nodes_for_comparison(&model, ids(&["A", "B"]));

        assert_eq!(active, Some(EdgeId::from("A->B")));
        let highlights = selection.highlights();
        assert_eq!(highlights.fields_for(&NodeId::from("A")), ["id"]);
        assert_eq!(highlights.fields_for(&NodeId::from("B")), ["name"]);
        assert!(highlights.fields_for(&NodeId::from("C")).is_empty());
    }

    #[test]
    fn test_two_unconnected_nodes_clear_highlights() {
        let model = erd_model();
        let mut selection = SelectionController::new();
        selection.select_nodes_for_comparison(&model, ids(&["A", "B"]));

        let active = selection.select_nodes_for_comparison(&model, ids(&["A", "C"]));

        assert_eq!(active, None);
        assert!(!selection.highlights().is_active());
        assert_eq!(selection.highlights().fields.len(), 3);
    }

    #[test]
    fn test_three_nodes_do_not_auto_highlight() {
        let model = erd_model();
        let mut selection = SelectionController::new();
        selection.select_edge(&model, &EdgeId::from("B->C")).unwrap();

        let active = selection.select_nodes_for_comparison(&model, ids(&["A", "B", "C"]));

        assert_eq!(active, Some(EdgeId::from("B->C")));
        assert_eq!(selection.state().selected_nodes.len(), 3);
    }

    #[test]
    fn test_zero_nodes_clear_everything() {
        let model = erd_model();
        let mut selection = SelectionController::new();
        selection.select_edge(&model, &EdgeId::from("A->B")).unwrap();
        selection.hover_edge(&model, &EdgeId::from("B->C")).unwrap();

        selection.select_nodes_for_comparison(&model, Vec::new());

        assert_eq!(selection.state(), &SelectionState::default());
        assert!(!selection.highlights().is_active());
    }

    #[test]
    fn test_hover_wins_then_restores_selection() {
        let model = erd_model();
        let mut selection = SelectionController::new();
        let selected = selection
            .select_edge(&model, &EdgeId::from("A->B"))
            .unwrap()
            .clone();

        let hovered = selection
            .hover_edge(&model, &EdgeId::from("B->C"))
            .unwrap()
            .clone();
        assert_eq!(hovered.edge, Some(EdgeId::from("B->C")));
        assert_eq!(hovered.fields_for(&NodeId::from("B")), ["owner_id"]);
        assert!(hovered.fields_for(&NodeId::from("A")).is_empty());

        selection.clear_hover();
        assert_eq!(selection.highlights(), &selected);
    }

    #[test]
    fn test_repeated_hover_does_not_stack() {
        let model = erd_model();
        let mut selection = SelectionController::new();
        selection.hover_edge(&model, &EdgeId::from("A->B")).unwrap();
        selection.hover_edge(&model, &EdgeId::from("B->C")).unwrap();
        selection.hover_edge(&model, &EdgeId::from("A->B")).unwrap();

        selection.clear_hover();

        assert!(!selection.highlights().is_active());
        assert_eq!(selection.active_edge(), None);
    }

    #[test]
    fn test_parallel_edges_pick_lowest_id() {
        let mut model = erd_model();
        model
            .add_edge(Edge::new("0-B->A", "B", "A").with_field_mapping("ref", "pk"))
            .unwrap();
        let mut selection = SelectionController::new();

        let active = selection.select_nodes_for_comparison(&model, ids(&["B", "A"]));

        assert_eq!(active, Some(EdgeId::from("0-B->A")));
        assert_eq!(selection.highlights().fields_for(&NodeId::from("B")), ["ref"]);
        assert_eq!(selection.highlights().fields_for(&NodeId::from("A")), ["pk"]);
    }

    #[test]
    fn test_self_loop_highlights_both_fields() {
        let mut model = GraphModel::new();
        model.add_node(Node::new("emp", NodeKind::Table)).unwrap();
        model
            .add_edge(Edge::new("mgr", "emp", "emp").with_field_mapping("manager_id", "id"))
            .unwrap();
        let mut selection = SelectionController::new();

        selection.select_edge(&model, &EdgeId::from("mgr")).unwrap();

        assert_eq!(
            selection.highlights().fields_for(&NodeId::from("emp")),
            ["manager_id", "id"]
        );
    }

    #[test]
    fn test_unknown_edge_leaves_state() {
        let model = erd_model();
        let mut selection = SelectionController::new();
        selection.select_edge(&model, &EdgeId::from("A->B")).unwrap();

        assert!(selection.select_edge(&model, &EdgeId::from("nope")).is_err());
        assert!(selection.hover_edge(&model, &EdgeId::from("nope")).is_err());
        assert_eq!(selection.active_edge(), Some(&EdgeId::from("A->B")));
    }

    #[test]
    fn test_refresh_drops_removed_edge() {
        let mut model = erd_model();
        let mut selection = SelectionController::new();
        selection.select_nodes_for_comparison(&model, ids(&["A", "B"]));

        model.remove_node(&NodeId::from("A"));
        selection.refresh(&model);

        assert_eq!(selection.state().selected_edge, None);
        assert_eq!(selection.state().selected_nodes.len(), 1);
        assert!(!selection.highlights().fields.contains_key(&NodeId::from("A")));
    }
}
