//! Pointer gesture state.
//!
//! Every gesture is `begin -> update* -> end | cancel`. The state carries
//! everything needed to restore the pre-gesture world on cancel, so no
//! per-gesture closures or listeners hold onto stale data.

use crate::panels::PanelId;
use graphview_core::{NodeId, Vec2};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Ready for any input.
    #[default]
    Idle,
    /// Repositioning a node.
    Dragging {
        node: NodeId,
        /// Offset from the pointer (graph space) to the node position.
        grab: Vec2,
        /// Position before the drag started.
        origin: Vec2,
    },
    /// Dragging a new edge out of `source`.
    Connecting { source: NodeId },
    /// Moving a panel's resize handle.
    Resizing {
        panel: PanelId,
        pointer_start: Vec2,
        size_start: f32,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::Connecting { .. } => "connecting",
            InteractionState::Resizing { .. } => "resizing",
        }
    }

    /// Start a node drag. Only valid from `Idle`.
    pub fn begin_drag(&mut self, node: NodeId, pointer: Vec2, origin: Vec2) -> bool {
        self.enter(InteractionState::Dragging {
            node,
            grab: origin - pointer,
            origin,
        })
    }

    pub fn begin_connecting(&mut self, source: NodeId) -> bool {
        self.enter(InteractionState::Connecting { source })
    }

    pub fn begin_resizing(&mut self, panel: PanelId, pointer_start: Vec2, size_start: f32) -> bool {
        self.enter(InteractionState::Resizing {
            panel,
            pointer_start,
            size_start,
        })
    }

    /// End the current gesture, returning the state it was in.
    pub fn finish(&mut self) -> InteractionState {
        std::mem::take(self)
    }

    fn enter(&mut self, next: InteractionState) -> bool {
        if !self.is_idle() {
            tracing::debug!("Ignoring {} while {}", next.name(), self.name());
            return false;
        }
        tracing::debug!("Gesture: idle -> {}", next.name());
        *self = next;
        true
    }
}
