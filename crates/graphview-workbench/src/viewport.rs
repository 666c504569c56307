use graphview_core::Vec2;
use serde::{Deserialize, Serialize};

/// Canvas camera. `pan` is in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom level (0.1 to 4.0, representing 10% to 400%)
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub const MIN_ZOOM: f32 = 0.1;
    pub const MAX_ZOOM: f32 = 4.0;

    /// Clamped into `MIN_ZOOM..=MAX_ZOOM`. A NaN request keeps the current zoom.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }

    /// Multiply the zoom by `factor`, keeping the graph point under the
    /// screen position `anchor` fixed.
    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
        let before = self.screen_to_graph(anchor);
        self.set_zoom(self.zoom * factor);
        self.pan = anchor - before * self.zoom;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan = self.pan + delta;
    }

    pub fn screen_to_graph(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn graph_to_screen(&self, graph: Vec2) -> Vec2 {
        graph * self.zoom + self.pan
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
