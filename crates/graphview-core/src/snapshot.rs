use crate::{Edge, Node};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Initial `{nodes, edges}` payload handed over by a mock or static data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKind, Vec2};

    #[test]
    fn test_parse_mock_payload() {
        let json = r#"{
            "nodes": [
                {"id": "t1", "kind": "table", "position": {"x": 10, "y": 20},
                 "data": {"name": "Suspect A", "age": 34}},
                {"id": "t2"}
            ],
            "edges": [
                {"id": "e1", "source": "t1", "target": "t2",
                 "fieldMapping": {"sourceField": "id", "targetField": "name"}}
            ]
        }"#;

        let snapshot = GraphSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.nodes[0].kind, NodeKind::Table);
        assert_eq!(snapshot.nodes[0].position, Vec2::new(10.0, 20.0));
        assert_eq!(snapshot.nodes[0].attributes["name"], "Suspect A");
        assert_eq!(snapshot.nodes[1].kind, NodeKind::Entity);
        assert!(snapshot.edges[0].field_mapping.is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = GraphSnapshot::load(Path::new("/nonexistent/graph.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = GraphSnapshot::from_json(r#"{"nodes": [{"id": "x", "kind": "widget"}]}"#);
        assert!(err.is_err());
    }
}
