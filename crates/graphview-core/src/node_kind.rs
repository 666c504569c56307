use serde::{Deserialize, Serialize};

/// Role of a node on the canvas. Rendering and behaviour rules are keyed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// ERD table with a column list.
    Table,
    /// Pipeline transformation step.
    Operation,
    /// Ontology / investigation entity.
    #[default]
    Entity,
    /// Pipeline sink.
    Destination,
    /// Pipeline input.
    Source,
    /// Free-form annotation.
    Note,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Table,
        NodeKind::Operation,
        NodeKind::Entity,
        NodeKind::Destination,
        NodeKind::Source,
        NodeKind::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Table => "table",
            NodeKind::Operation => "operation",
            NodeKind::Entity => "entity",
            NodeKind::Destination => "destination",
            NodeKind::Source => "source",
            NodeKind::Note => "note",
        }
    }
}
