//! Per-kind node behaviour.
//!
//! Each [`NodeKind`] maps to a static capability record: which fields the
//! inspector may edit, what a double click does, which connection handles the
//! node exposes and how it is painted. Lookup is a table index, not a runtime
//! type check.

use graphview_core::NodeKind;

/// Straight sRGB, opaque unless stated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Scale each channel towards black by `amount` (0.0..=1.0). Alpha is kept.
    pub fn shade(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);
        let scale = |channel: u8| (channel as f32 * keep).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub fill: Color,
    pub text: Color,
    pub corner_radius: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl NodeStyle {
    const BORDER_SHADE: f32 = 0.15;

    /// Outline colour, a darker shade of the fill.
    pub fn border(&self) -> Color {
        self.fill.shade(Self::BORDER_SHADE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleClickAction {
    /// Open the attribute editor panel.
    OpenEditor,
    /// Toggle the full column list of a table.
    ExpandColumns,
    /// Edit the label in place.
    RenameLabel,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindCapabilities {
    pub kind: NodeKind,
    pub editable_fields: &'static [&'static str],
    pub double_click: DoubleClickAction,
    pub accepts_incoming: bool,
    pub emits_outgoing: bool,
    pub style: NodeStyle,
}

impl KindCapabilities {
    pub fn can_edit(&self, field: &str) -> bool {
        self.editable_fields.contains(&field)
    }
}

const TEXT_LIGHT: Color = Color::rgb(255, 255, 255);
const TEXT_DARK: Color = Color::rgb(30, 30, 30);

const fn style(fill: Color, text: Color, min_width: f32, min_height: f32) -> NodeStyle {
    NodeStyle {
        fill,
        text,
        corner_radius: 6.0,
        min_width,
        min_height,
    }
}

static CAPABILITIES: [KindCapabilities; 6] = [
    KindCapabilities {
        kind: NodeKind::Table,
        editable_fields: &["name", "columns", "schema"],
        double_click: DoubleClickAction::ExpandColumns,
        accepts_incoming: true,
        emits_outgoing: true,
        style: style(Color::rgb(85, 85, 85), TEXT_LIGHT, 220.0, 60.0),
    },
    KindCapabilities {
        kind: NodeKind::Operation,
        editable_fields: &["label", "operation", "parameters"],
        double_click: DoubleClickAction::OpenEditor,
        accepts_incoming: true,
        emits_outgoing: true,
        style: style(Color::rgb(200, 160, 80), TEXT_DARK, 160.0, 48.0),
    },
    KindCapabilities {
        kind: NodeKind::Entity,
        editable_fields: &["label", "sublabel", "image"],
        double_click: DoubleClickAction::OpenEditor,
        accepts_incoming: true,
        emits_outgoing: true,
        style: style(Color::rgb(80, 130, 180), TEXT_LIGHT, 120.0, 40.0),
    },
    KindCapabilities {
        kind: NodeKind::Destination,
        editable_fields: &["label", "target"],
        double_click: DoubleClickAction::OpenEditor,
        accepts_incoming: true,
        emits_outgoing: false,
        style: style(Color::rgb(80, 140, 100), TEXT_LIGHT, 160.0, 48.0),
    },
    KindCapabilities {
        kind: NodeKind::Source,
        editable_fields: &["label", "connection"],
        double_click: DoubleClickAction::OpenEditor,
        accepts_incoming: false,
        emits_outgoing: true,
        style: style(Color::rgb(130, 100, 170), TEXT_LIGHT, 160.0, 48.0),
    },
    KindCapabilities {
        kind: NodeKind::Note,
        editable_fields: &["text"],
        double_click: DoubleClickAction::RenameLabel,
        accepts_incoming: false,
        emits_outgoing: false,
        style: style(Color::rgb(240, 220, 130), TEXT_DARK, 140.0, 80.0),
    },
];

pub fn capabilities(kind: NodeKind) -> &'static KindCapabilities {
    let index = match kind {
        NodeKind::Table => 0,
        NodeKind::Operation => 1,
        NodeKind::Entity => 2,
        NodeKind::Destination => 3,
        NodeKind::Source => 4,
        NodeKind::Note => 5,
    };
    &CAPABILITIES[index]
}
