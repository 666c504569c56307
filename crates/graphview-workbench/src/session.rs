use crate::interaction::InteractionState;
use crate::panels::ViewportPanelManager;
use crate::settings::WorkbenchSettings;
use crate::viewport::Viewport;
use graphview_core::{
    Attributes, CurveKind, Edge, EdgeId, EdgeStyle, GraphError, GraphSnapshot, Node, NodeId, Vec2,
};
use graphview_events::{Event, EventBus, LayoutName};
use graphview_graph::{
    ConnectOptions, ConnectionController, DoubleClickAction, ExportError, GraphModel, HighlightSet,
    LayoutController, LayoutParams, SelectionController, capabilities, export_csv,
};

/// One graph screen: the model, its controllers, the surrounding panels and
/// the gesture state machine.
///
/// All mutations go through here so that every change is published on the
/// [`EventBus`] for the rendering layer.
pub struct GraphSession {
    model: GraphModel,
    selection: SelectionController,
    connection: ConnectionController,
    layout: LayoutController,
    panels: ViewportPanelManager,
    viewport: Viewport,
    interaction: InteractionState,
    settings: WorkbenchSettings,
    bus: EventBus,
}

impl GraphSession {
    pub fn new(settings: &WorkbenchSettings) -> Self {
        Self::with_model(GraphModel::new(), settings)
    }

    pub fn from_snapshot(
        snapshot: GraphSnapshot,
        settings: &WorkbenchSettings,
    ) -> Result<Self, GraphError> {
        let model = GraphModel::from_snapshot(snapshot)?;
        tracing::info!(
            "Session loaded {} nodes, {} edges",
            model.node_count(),
            model.edge_count()
        );
        Ok(Self::with_model(model, settings))
    }

    fn with_model(model: GraphModel, settings: &WorkbenchSettings) -> Self {
        let mut selection = SelectionController::new();
        selection.refresh(&model);
        let mut panels = ViewportPanelManager::with_panels(settings.panels.iter().cloned());
        panels.set_window_height(settings.window_height);
        Self {
            model,
            selection,
            connection: ConnectionController::new(settings.connection),
            layout: LayoutController::new(),
            panels,
            viewport: Viewport::default(),
            interaction: InteractionState::Idle,
            settings: settings.clone(),
            bus: EventBus::new(),
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn highlights(&self) -> &HighlightSet {
        self.selection.highlights()
    }

    pub fn panels(&self) -> &ViewportPanelManager {
        &self.panels
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn settings(&self) -> &WorkbenchSettings {
        &self.settings
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.model.snapshot()
    }

    // Model

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        let id = node.id.clone();
        self.model.add_node(node)?;
        self.selection.refresh(&self.model);
        self.bus.publish(Event::NodeAdded { id });
        Ok(())
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        let id = edge.id.clone();
        self.model.add_edge(edge)?;
        self.bus.publish(Event::EdgeAdded { id });
        Ok(())
    }

    /// Remove a node and its incident edges. Returns the removed edges.
    pub fn remove_node(&mut self, id: &NodeId) -> Vec<Edge> {
        if !self.model.contains_node(id) {
            return Vec::new();
        }
        let removed = self.model.remove_node(id);
        self.selection.refresh(&self.model);
        self.bus.publish(Event::NodeRemoved {
            id: id.clone(),
            removed_edges: removed.iter().map(|e| e.id.clone()).collect(),
        });
        removed
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let removed = self.model.remove_edge(id)?;
        self.selection.refresh(&self.model);
        self.bus.publish(Event::EdgeRemoved { id: id.clone() });
        Some(removed)
    }

    pub fn update_node_attributes(
        &mut self,
        id: &NodeId,
        attributes: Attributes,
    ) -> Result<(), GraphError> {
        self.model.update_node_attributes(id, attributes)?;
        self.bus
            .publish(Event::NodeAttributesChanged { id: id.clone() });
        Ok(())
    }

    // Selection

    pub fn select_edge(&mut self, id: &EdgeId) -> Result<&HighlightSet, GraphError> {
        self.selection.select_edge(&self.model, id)?;
        self.bus.publish(Event::EdgeSelected { id: id.clone() });
        Ok(self.selection.highlights())
    }

    pub fn hover_edge(&mut self, id: &EdgeId) -> Result<&HighlightSet, GraphError> {
        self.selection.hover_edge(&self.model, id)?;
        self.bus.publish(Event::EdgeHovered { id: id.clone() });
        Ok(self.selection.highlights())
    }

    pub fn clear_hover(&mut self) -> &HighlightSet {
        self.selection.clear_hover();
        self.bus.publish(Event::HoverCleared);
        self.selection.highlights()
    }

    /// Select nodes for comparison. Returns the edge now driving highlights.
    pub fn select_nodes<I>(&mut self, ids: I) -> Option<EdgeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let ids: Vec<NodeId> = ids.into_iter().collect();
        if ids.is_empty() {
            self.clear_selection();
            return None;
        }
        let active_edge = self
            .selection
            .select_nodes_for_comparison(&self.model, ids);
        self.bus.publish(Event::NodesSelected {
            ids: self.selection.state().selected_nodes.iter().cloned().collect(),
            active_edge: active_edge.clone(),
        });
        active_edge
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection(&self.model);
        self.bus.publish(Event::SelectionCleared);
    }

    // Gestures

    /// Start dragging `id`. `pointer` is in graph coordinates.
    pub fn begin_node_drag(&mut self, id: &NodeId, pointer: Vec2) -> bool {
        let Some(origin) = self.model.get_node(id).map(|n| n.position) else {
            return false;
        };
        if !self.interaction.begin_drag(id.clone(), pointer, origin) {
            return false;
        }
        self.bus.publish(Event::DragStarted { id: id.clone() });
        true
    }

    /// Move the dragged node under the pointer. Touches only that node.
    ///
    /// If the node was removed mid-drag the gesture is dropped and `None`
    /// is returned.
    pub fn drag_to(&mut self, pointer: Vec2) -> Option<Vec2> {
        let InteractionState::Dragging { node, grab, .. } = &self.interaction else {
            return None;
        };
        let position = pointer + *grab;
        let node = node.clone();
        match self.model.update_node_position(&node, position) {
            Ok(()) => {
                self.bus.publish(Event::NodeMoved {
                    id: node,
                    position,
                });
                Some(position)
            }
            Err(e) => {
                tracing::debug!("Drag aborted: {}", e);
                self.interaction.finish();
                None
            }
        }
    }

    pub fn end_drag(&mut self) -> Option<Vec2> {
        if !matches!(self.interaction, InteractionState::Dragging { .. }) {
            return None;
        }
        let InteractionState::Dragging { node, .. } = self.interaction.finish() else {
            return None;
        };
        let position = self.model.get_node(&node)?.position;
        self.bus.publish(Event::DragEnded { id: node, position });
        Some(position)
    }

    pub fn begin_connection(&mut self, source: &NodeId) -> bool {
        if !self.interaction.is_idle() {
            return false;
        }
        if let Err(e) = self.connection.begin_connection(&self.model, source) {
            self.warn(e.to_string());
            return false;
        }
        self.interaction.begin_connecting(source.clone());
        self.bus.publish(Event::ConnectionStarted {
            source: source.clone(),
        });
        true
    }

    /// Release a connection drag over `target`.
    ///
    /// Without an explicit style the new edge follows the display settings.
    /// Failures are published as a warning and returned; the gesture ends
    /// either way.
    pub fn complete_connection(
        &mut self,
        target: &NodeId,
        mut options: ConnectOptions,
    ) -> Result<Edge, GraphError> {
        if matches!(self.interaction, InteractionState::Connecting { .. }) {
            self.interaction.finish();
        }
        if options.style.is_none() {
            options.style = Some(self.default_edge_style());
        }

        match self
            .connection
            .complete_connection(&mut self.model, target, options)
        {
            Ok(edge) => {
                self.bus.publish(Event::EdgeAdded {
                    id: edge.id.clone(),
                });
                self.bus.publish(Event::ConnectionCommitted {
                    id: edge.id.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
                Ok(edge)
            }
            Err(e) => {
                self.warn(e.to_string());
                self.bus.publish(Event::ConnectionCancelled);
                Err(e)
            }
        }
    }

    /// `pointer` is in screen coordinates.
    pub fn begin_panel_resize(&mut self, panel: &str, pointer: Vec2) -> bool {
        let Some(size) = self.panels.panel(panel).map(|p| p.size) else {
            return false;
        };
        self.interaction
            .begin_resizing(panel.to_string(), pointer, size)
    }

    pub fn resize_to(&mut self, pointer: Vec2) -> Option<f32> {
        let InteractionState::Resizing {
            panel,
            pointer_start,
            size_start,
        } = &self.interaction
        else {
            return None;
        };
        let edge = self.panels.config(panel)?.edge;
        let requested = size_start + edge.size_delta(pointer - *pointer_start);
        let panel = panel.clone();
        let size = self.panels.set_size(&panel, requested)?;
        self.bus.publish(Event::PanelResized { panel, size });
        Some(size)
    }

    pub fn end_resize(&mut self) -> Option<f32> {
        if !matches!(self.interaction, InteractionState::Resizing { .. }) {
            return None;
        }
        let InteractionState::Resizing { panel, .. } = self.interaction.finish() else {
            return None;
        };
        self.panels.panel(&panel).map(|p| p.size)
    }

    /// Abort whatever gesture is in flight and restore the state before it.
    pub fn cancel_gesture(&mut self) {
        match self.interaction.finish() {
            InteractionState::Idle => return,
            InteractionState::Dragging { node, origin, .. } => {
                if self.model.update_node_position(&node, origin).is_ok() {
                    self.bus.publish(Event::NodeMoved {
                        id: node,
                        position: origin,
                    });
                }
            }
            InteractionState::Connecting { .. } => {
                self.connection.cancel_connection();
                self.bus.publish(Event::ConnectionCancelled);
            }
            InteractionState::Resizing {
                panel, size_start, ..
            } => {
                if let Some(size) = self.panels.set_size(&panel, size_start) {
                    self.bus.publish(Event::PanelResized { panel, size });
                }
            }
        }
        self.bus.publish(Event::GestureCancelled);
    }

    /// Resolve a double click through the node's kind.
    pub fn double_click(&mut self, id: &NodeId) -> Option<DoubleClickAction> {
        let kind = self.model.get_node(id)?.kind;
        let action = capabilities(kind).double_click;
        if action != DoubleClickAction::None {
            self.bus.publish(Event::EditRequested { id: id.clone() });
        }
        Some(action)
    }

    // Layout

    /// Apply `name` with the configured parameters. An empty `ids` lays out
    /// every node. Returns how many nodes moved.
    pub fn apply_layout(&mut self, name: LayoutName, ids: &[NodeId]) -> Result<usize, GraphError> {
        let params = self.settings.layout.clone();
        self.apply_layout_with(name, ids, &params)
    }

    /// Apply the layout preset chosen in the settings.
    pub fn apply_default_layout(&mut self, ids: &[NodeId]) -> Result<usize, GraphError> {
        self.apply_layout(self.settings.layout_name, ids)
    }

    pub fn apply_layout_with(
        &mut self,
        name: LayoutName,
        ids: &[NodeId],
        params: &LayoutParams,
    ) -> Result<usize, GraphError> {
        let all: Vec<NodeId>;
        let ids = if ids.is_empty() {
            all = self.model.node_ids().cloned().collect();
            all.as_slice()
        } else {
            ids
        };
        let positions = self.layout.apply_layout(&self.model, name, ids, params)?;
        LayoutController::commit(&mut self.model, &positions)?;
        self.bus.publish(Event::LayoutApplied {
            name,
            moved: positions.len(),
        });
        Ok(positions.len())
    }

    // Panels & viewport

    pub fn toggle_panel(&mut self, panel: &str) -> Option<bool> {
        let open = self.panels.toggle_panel(panel)?;
        self.bus.publish(Event::PanelToggled {
            panel: panel.to_string(),
            open,
        });
        Some(open)
    }

    /// Toggle, but keep at least one panel of `group` open.
    pub fn toggle_panel_in_group(&mut self, panel: &str, group: &[&str]) -> Option<bool> {
        if self.panels.is_last_open(panel, group) {
            self.bus.publish(Event::ShowInfo {
                message: "At least one panel must stay open".to_string(),
            });
            return Some(true);
        }
        self.toggle_panel(panel)
    }

    /// The window was resized; bottom panels follow its height.
    pub fn set_window_height(&mut self, height: f32) {
        self.settings.window_height = height;
        for (panel, size) in self.panels.set_window_height(height) {
            self.bus.publish(Event::PanelResized { panel, size });
        }
    }

    pub fn set_active_tab(&mut self, panel: &str, tab: &str) -> bool {
        if !self.panels.set_active_tab(panel, tab) {
            return false;
        }
        self.bus.publish(Event::TabSelected {
            panel: panel.to_string(),
            tab: tab.to_string(),
        });
        true
    }

    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
        self.viewport.zoom_by(factor, anchor);
        self.publish_viewport();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
        self.publish_viewport();
    }

    pub fn reset_viewport(&mut self) {
        self.viewport.reset();
        self.publish_viewport();
    }

    // Export

    pub fn export_csv(&self, columns: &[String]) -> Result<String, ExportError> {
        export_csv(self.model.nodes(), columns)
    }

    fn default_edge_style(&self) -> EdgeStyle {
        let display = &self.settings.display;
        EdgeStyle {
            curve: if display.curved_edges {
                CurveKind::Bezier
            } else {
                CurveKind::Straight
            },
            animated: display.animated_edges,
            ..EdgeStyle::connection_default()
        }
    }

    fn publish_viewport(&self) {
        self.bus.publish(Event::ViewportChanged {
            zoom: self.viewport.zoom,
            pan: self.viewport.pan,
        });
    }

    fn warn(&self, message: String) {
        tracing::warn!("{}", message);
        self.bus.publish(Event::ShowWarning { message });
    }
}
