use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

pub mod edge_style;
pub mod error;
pub mod node_kind;
pub mod snapshot;

pub use edge_style::{CurveKind, EdgeStyle, FieldMapping};
pub use error::{ElementKind, GraphError};
pub use node_kind::NodeKind;
pub use snapshot::{GraphSnapshot, SnapshotError};

/// Ordered attribute mapping. Key order is the rendered column order.
pub type Attributes = IndexMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A positioned, attributed entity on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default, alias = "data")]
    pub attributes: Attributes,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Vec2::ZERO,
            attributes: Attributes::new(),
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// The `label` attribute when it is a string, otherwise the id.
    pub fn label(&self) -> &str {
        self.attributes
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default, alias = "fieldMapping", skip_serializing_if = "Option::is_none")]
    pub field_mapping: Option<FieldMapping>,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            style: EdgeStyle::default(),
            field_mapping: None,
        }
    }

    pub fn with_field_mapping(mut self, source_field: &str, target_field: &str) -> Self {
        self.field_mapping = Some(FieldMapping::new(source_field, target_field));
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Whether this edge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder_keeps_attribute_order() {
        let node = Node::new("users", NodeKind::Table)
            .with_attribute("zeta", 1)
            .with_attribute("alpha", "x")
            .with_attribute("mid", true);

        let keys: Vec<&str> = node.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_node_label_falls_back_to_id() {
        let plain = Node::new("n1", NodeKind::Entity);
        assert_eq!(plain.label(), "n1");

        let labelled = plain.clone().with_attribute("label", "Suspect A");
        assert_eq!(labelled.label(), "Suspect A");
    }

    #[test]
    fn test_edge_connects_either_direction() {
        let edge = Edge::new("e1", "a", "b");
        assert!(edge.connects(&NodeId::from("a"), &NodeId::from("b")));
        assert!(edge.connects(&NodeId::from("b"), &NodeId::from("a")));
        assert!(!edge.connects(&NodeId::from("a"), &NodeId::from("c")));
        assert!(!edge.is_self_loop());
    }

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 5.0);
        assert_eq!(a + b, Vec2::new(4.0, 7.0));
        assert_eq!(b - a, Vec2::new(2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&NodeId::from("t1")).unwrap();
        assert_eq!(json, "\"t1\"");
        let id: EdgeId = serde_json::from_str("\"e9\"").unwrap();
        assert_eq!(id, EdgeId::from("e9"));
    }
}
