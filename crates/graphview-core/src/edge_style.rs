use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    #[default]
    Bezier,
    Straight,
    Step,
}

/// Presentation hint only; carries no graph semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
    pub curve: CurveKind,
    pub stroke_width: f32,
    pub arrow_head: bool,
    pub animated: bool,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            curve: CurveKind::Bezier,
            stroke_width: 1.0,
            arrow_head: false,
            animated: false,
        }
    }
}

impl EdgeStyle {
    /// Style given to edges created by a drag-to-connect gesture.
    pub fn connection_default() -> Self {
        Self {
            curve: CurveKind::Bezier,
            stroke_width: 2.0,
            arrow_head: true,
            animated: true,
        }
    }
}

/// Pair of attribute names emphasised on the endpoints when the edge is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(alias = "sourceField")]
    pub source_field: String,
    #[serde(alias = "targetField")]
    pub target_field: String,
}

impl FieldMapping {
    pub fn new(source_field: &str, target_field: &str) -> Self {
        Self {
            source_field: source_field.to_string(),
            target_field: target_field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_default_style() {
        let style = EdgeStyle::connection_default();
        assert_eq!(style.curve, CurveKind::Bezier);
        assert_eq!(style.stroke_width, 2.0);
        assert!(style.arrow_head);
        assert!(style.animated);
    }

    #[test]
    fn test_field_mapping_accepts_camel_case() {
        let mapping: FieldMapping =
            serde_json::from_str(r#"{"sourceField":"id","targetField":"name"}"#).unwrap();
        assert_eq!(mapping, FieldMapping::new("id", "name"));
    }
}
