use graphview_core::Vec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type PanelId = String;

/// Canvas edge a panel is docked to. Decides which pointer axis (and sign)
/// grows the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelEdge {
    Left,
    Right,
    Bottom,
}

impl PanelEdge {
    /// Size change produced by moving the resize handle by `pointer_delta`.
    pub fn size_delta(self, pointer_delta: Vec2) -> f32 {
        match self {
            PanelEdge::Left => pointer_delta.x,
            PanelEdge::Right => -pointer_delta.x,
            PanelEdge::Bottom => -pointer_delta.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub id: PanelId,
    pub edge: PanelEdge,
    pub min_size: f32,
    pub max_size: f32,
    pub initial_size: f32,
    #[serde(default)]
    pub open: bool,
}

impl PanelConfig {
    /// Bottom drawer; may grow up to the full window height.
    pub fn bottom(id: impl Into<PanelId>, window_height: f32) -> Self {
        let max_size = window_height.max(100.0);
        Self {
            id: id.into(),
            edge: PanelEdge::Bottom,
            min_size: 100.0,
            max_size,
            initial_size: 250.0_f32.min(max_size),
            open: false,
        }
    }

    pub fn side(id: impl Into<PanelId>) -> Self {
        Self {
            id: id.into(),
            edge: PanelEdge::Right,
            min_size: 200.0,
            max_size: 800.0,
            initial_size: 320.0,
            open: true,
        }
    }

    pub fn tools_flyout(id: impl Into<PanelId>) -> Self {
        Self {
            id: id.into(),
            edge: PanelEdge::Left,
            min_size: 300.0,
            max_size: 800.0,
            initial_size: 360.0,
            open: false,
        }
    }

    pub fn with_edge(mut self, edge: PanelEdge) -> Self {
        self.edge = edge;
        self
    }

    pub fn opened(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn clamp(&self, size: f32) -> f32 {
        if size.is_nan() {
            return self.min_size;
        }
        size.clamp(self.min_size, self.max_size.max(self.min_size))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    pub open: bool,
    pub size: f32,
    pub active_tab: Option<String>,
}

#[derive(Debug, Clone)]
struct Panel {
    config: PanelConfig,
    state: PanelState,
}

/// Geometry and visibility of the auxiliary panels around the canvas.
///
/// Independent of graph content. Sizes never leave their configured range.
#[derive(Debug, Default, Clone)]
pub struct ViewportPanelManager {
    panels: IndexMap<PanelId, Panel>,
}

impl ViewportPanelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_panels(configs: impl IntoIterator<Item = PanelConfig>) -> Self {
        let mut manager = Self::new();
        for config in configs {
            manager.register(config);
        }
        manager
    }

    /// Register a panel, replacing any previous one with the same id.
    pub fn register(&mut self, config: PanelConfig) {
        let state = PanelState {
            open: config.open,
            size: config.clamp(config.initial_size),
            active_tab: None,
        };
        tracing::debug!("Registered panel {} at {}px", config.id, state.size);
        self.panels
            .insert(config.id.clone(), Panel { config, state });
    }

    pub fn panel(&self, id: &str) -> Option<&PanelState> {
        self.panels.get(id).map(|p| &p.state)
    }

    pub fn config(&self, id: &str) -> Option<&PanelConfig> {
        self.panels.get(id).map(|p| &p.config)
    }

    pub fn panel_ids(&self) -> impl Iterator<Item = &PanelId> {
        self.panels.keys()
    }

    /// Grow or shrink by `delta`, clamped into the panel's range.
    /// Returns the new size, or `None` for an unknown panel.
    pub fn resize_panel(&mut self, id: &str, delta: f32) -> Option<f32> {
        let current = self.panels.get(id)?.state.size;
        self.set_size(id, current + delta)
    }

    /// Set an absolute size, clamped into the panel's range.
    pub fn set_size(&mut self, id: &str, requested: f32) -> Option<f32> {
        let panel = self.panels.get_mut(id)?;
        panel.state.size = panel.config.clamp(requested);
        Some(panel.state.size)
    }

    /// Flip open/closed. Returns the new open state.
    ///
    /// Does not enforce "keep one open"; callers check [`Self::is_last_open`]
    /// first when that rule applies.
    pub fn toggle_panel(&mut self, id: &str) -> Option<bool> {
        let panel = self.panels.get_mut(id)?;
        panel.state.open = !panel.state.open;
        Some(panel.state.open)
    }

    pub fn set_open(&mut self, id: &str, open: bool) -> Option<bool> {
        let panel = self.panels.get_mut(id)?;
        panel.state.open = open;
        Some(open)
    }

    /// Tab ids are not validated.
    pub fn set_active_tab(&mut self, id: &str, tab: impl Into<String>) -> bool {
        match self.panels.get_mut(id) {
            Some(panel) => {
                panel.state.active_tab = Some(tab.into());
                true
            }
            None => false,
        }
    }

    /// Bottom panels may grow up to the window height. Refit their range to
    /// `height` and re-clamp their sizes. Returns the panels whose size changed.
    pub fn set_window_height(&mut self, height: f32) -> Vec<(PanelId, f32)> {
        let mut resized = Vec::new();
        for (id, panel) in self.panels.iter_mut() {
            if panel.config.edge != PanelEdge::Bottom {
                continue;
            }
            panel.config.max_size = height.max(panel.config.min_size);
            let size = panel.config.clamp(panel.state.size);
            if size != panel.state.size {
                panel.state.size = size;
                resized.push((id.clone(), size));
            }
        }
        resized
    }

    /// Whether `id` is the only open panel among `group`.
    pub fn is_last_open(&self, id: &str, group: &[&str]) -> bool {
        let is_open = |panel: &str| self.panel(panel).is_some_and(|p| p.open);
        is_open(id) && !group.iter().any(|other| *other != id && is_open(other))
    }
}
