use crossbeam_channel::{unbounded, Receiver, Sender};
use graphview_core::{EdgeId, NodeId, Vec2};
use serde::{Deserialize, Serialize};

/// Named layout presets offered by the canvas toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutName {
    #[default]
    Organic,
    Sequential,
    Hierarchy,
    Lens,
    Radial,
    Structural,
}

impl LayoutName {
    pub const ALL: [LayoutName; 6] = [
        LayoutName::Organic,
        LayoutName::Sequential,
        LayoutName::Hierarchy,
        LayoutName::Lens,
        LayoutName::Radial,
        LayoutName::Structural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutName::Organic => "organic",
            LayoutName::Sequential => "sequential",
            LayoutName::Hierarchy => "hierarchy",
            LayoutName::Lens => "lens",
            LayoutName::Radial => "radial",
            LayoutName::Structural => "structural",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Model
    NodeAdded {
        id: NodeId,
    },
    NodeRemoved {
        id: NodeId,
        removed_edges: Vec<EdgeId>,
    },
    NodeMoved {
        id: NodeId,
        position: Vec2,
    },
    NodeAttributesChanged {
        id: NodeId,
    },
    EdgeAdded {
        id: EdgeId,
    },
    EdgeRemoved {
        id: EdgeId,
    },

    // Selection
    EdgeSelected {
        id: EdgeId,
    },
    EdgeHovered {
        id: EdgeId,
    },
    HoverCleared,
    NodesSelected {
        ids: Vec<NodeId>,
        active_edge: Option<EdgeId>,
    },
    SelectionCleared,

    // Gestures
    DragStarted {
        id: NodeId,
    },
    DragEnded {
        id: NodeId,
        position: Vec2,
    },
    ConnectionStarted {
        source: NodeId,
    },
    ConnectionCommitted {
        id: EdgeId,
        source: NodeId,
        target: NodeId,
    },
    ConnectionCancelled,
    GestureCancelled,
    /// Open the kind-specific editor for a node (double click).
    EditRequested {
        id: NodeId,
    },

    // Layout
    LayoutApplied {
        name: LayoutName,
        moved: usize,
    },

    // Panels
    PanelResized {
        panel: String,
        size: f32,
    },
    PanelToggled {
        panel: String,
        open: bool,
    },
    TabSelected {
        panel: String,
        tab: String,
    },

    // Viewport
    ViewportChanged {
        zoom: f32,
        pan: Vec2,
    },

    // Notifications
    ShowInfo {
        message: String,
    },
    ShowWarning {
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!(?event, "publish");
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// Called once per frame by the rendering layer.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }

    /// Take every pending event without a listener.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
