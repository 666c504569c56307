use crate::model::GraphModel;
use graphview_core::{GraphError, NodeId, Vec2};
use graphview_events::LayoutName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::f32::consts::TAU;

/// Computes positions for a node set. Implementations are pure: the same
/// model and input always produce the same output.
pub trait Layouter {
    fn execute(&self, model: &GraphModel, nodes: &[NodeId]) -> Vec<(NodeId, Vec2)>;
}

/// Axis along which successive layers are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Orientation {
    /// Map (primary, secondary) offsets onto canvas coordinates.
    fn place(self, primary: f32, secondary: f32) -> Vec2 {
        match self {
            Orientation::Down => Vec2::new(secondary, primary),
            Orientation::Up => Vec2::new(secondary, -primary),
            Orientation::Right => Vec2::new(primary, secondary),
            Orientation::Left => Vec2::new(-primary, secondary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Ring radius for radial layouts.
    pub radius: f32,
    /// Focus node of radial layouts; defaults to the first requested node.
    pub center: Option<NodeId>,
    /// 0 (loose) ..= 10 (tight).
    pub tightness: u8,
    pub orientation: Orientation,
    /// Base distance between layers and grid cells.
    pub spacing: f32,
    /// Anchor of layered and grid layouts.
    pub origin: Vec2,
    /// Hand-authored coordinates. When non-empty the preset wins over `name`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub preset: BTreeMap<NodeId, Vec2>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            radius: 200.0,
            center: None,
            tightness: Self::DEFAULT_TIGHTNESS,
            orientation: Orientation::Down,
            spacing: 150.0,
            origin: Vec2::ZERO,
            preset: BTreeMap::new(),
        }
    }
}

impl LayoutParams {
    pub const DEFAULT_TIGHTNESS: u8 = 5;
    pub const MAX_TIGHTNESS: u8 = 10;

    /// Spacing multiplier: 1.5 at tightness 0, 1.0 at 5, 0.5 at 10.
    pub fn spacing_factor(&self) -> f32 {
        let tightness = self.tightness.min(Self::MAX_TIGHTNESS) as f32;
        1.5 - 0.1 * tightness
    }
}

/// The algorithm a [`LayoutName`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStrategy {
    Preset,
    Radial,
    Layered { sequential: bool },
    Grid,
}

impl LayoutStrategy {
    pub fn resolve(name: LayoutName, params: &LayoutParams) -> Self {
        if !params.preset.is_empty() {
            return LayoutStrategy::Preset;
        }
        match name {
            LayoutName::Radial | LayoutName::Lens | LayoutName::Organic => LayoutStrategy::Radial,
            LayoutName::Hierarchy => LayoutStrategy::Layered { sequential: false },
            LayoutName::Sequential => LayoutStrategy::Layered { sequential: true },
            LayoutName::Structural => LayoutStrategy::Grid,
        }
    }
}

/// Assigns coordinates from a lookup table. Nodes missing from the table are
/// left where they are.
pub struct PresetLayouter<'a> {
    pub table: &'a BTreeMap<NodeId, Vec2>,
}

impl Layouter for PresetLayouter<'_> {
    fn execute(&self, _model: &GraphModel, nodes: &[NodeId]) -> Vec<(NodeId, Vec2)> {
        nodes
            .iter()
            .filter_map(|id| self.table.get(id).map(|pos| (id.clone(), *pos)))
            .collect()
    }
}

/// Places every node except `center` on a circle around it.
///
/// Ring node `i` of `n` lands at `center + radius * (cos(2πi/n), sin(2πi/n))`.
/// The center keeps its current position.
pub struct RadialLayouter {
    pub center: NodeId,
    pub radius: f32,
}

impl Layouter for RadialLayouter {
    fn execute(&self, model: &GraphModel, nodes: &[NodeId]) -> Vec<(NodeId, Vec2)> {
        let Some(center_pos) = model.get_node(&self.center).map(|n| n.position) else {
            return Vec::new();
        };

        let ring: Vec<&NodeId> = nodes.iter().filter(|id| **id != self.center).collect();
        let count = ring.len() as f32;

        let mut positions = Vec::with_capacity(nodes.len());
        if nodes.contains(&self.center) {
            positions.push((self.center.clone(), center_pos));
        }
        for (i, id) in ring.into_iter().enumerate() {
            let angle = TAU * i as f32 / count;
            let offset = Vec2::new(angle.cos(), angle.sin()) * self.radius;
            positions.push((id.clone(), center_pos + offset));
        }
        positions
    }
}

/// Ranks nodes along the edges between them and stacks the ranks as layers.
pub struct LayeredLayouter {
    pub layer_spacing: f32,
    pub node_spacing: f32,
    pub orientation: Orientation,
    pub origin: Vec2,
    /// One node per layer in request order, ignoring edges.
    pub sequential: bool,
}

impl LayeredLayouter {
    /// Maximum iterations for ranking convergence
    const MAX_RANKING_ITERATIONS: usize = 1000;

    /// Longest-path ranking by repeated relaxation. Cycles stop at the
    /// iteration bound instead of diverging.
    fn assign_ranks(model: &GraphModel, nodes: &[NodeId]) -> HashMap<NodeId, usize> {
        let members: HashSet<&NodeId> = nodes.iter().collect();
        let mut ranks: HashMap<NodeId, usize> = nodes.iter().map(|id| (id.clone(), 0)).collect();

        let mut relations = Vec::new();
        for edge in model.edges() {
            if edge.is_self_loop() {
                continue;
            }
            if members.contains(&edge.source) && members.contains(&edge.target) {
                relations.push((&edge.source, &edge.target));
            }
        }

        let max_iterations = (nodes.len() + 2).min(Self::MAX_RANKING_ITERATIONS);
        let mut converged = false;
        for _ in 0..max_iterations {
            let mut changed = false;
            for &(source, target) in &relations {
                let source_rank = ranks[source];
                if ranks[target] <= source_rank && source_rank + 1 < nodes.len() {
                    ranks.insert(target.clone(), source_rank + 1);
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::debug!("Layer ranking hit the iteration bound; graph has cycles");
        }
        ranks
    }
}

impl Layouter for LayeredLayouter {
    fn execute(&self, model: &GraphModel, nodes: &[NodeId]) -> Vec<(NodeId, Vec2)> {
        let ranks: HashMap<NodeId, usize> = if self.sequential {
            nodes
                .iter()
                .enumerate()
                .map(|(i, id)| (id.clone(), i))
                .collect()
        } else {
            Self::assign_ranks(model, nodes)
        };

        let mut layers: BTreeMap<usize, Vec<&NodeId>> = BTreeMap::new();
        for id in nodes {
            layers.entry(ranks[id]).or_default().push(id);
        }

        let mut positions = Vec::with_capacity(nodes.len());
        for (layer_index, (_, members)) in layers.iter().enumerate() {
            let primary = layer_index as f32 * self.layer_spacing;
            let half_width = (members.len() as f32 - 1.0) / 2.0;
            for (slot, id) in members.iter().enumerate() {
                let secondary = (slot as f32 - half_width) * self.node_spacing;
                let offset = self.orientation.place(primary, secondary);
                positions.push(((*id).clone(), self.origin + offset));
            }
        }
        positions
    }
}

/// Row-major grid with `ceil(sqrt(n))` columns.
pub struct GridLayouter {
    pub spacing: f32,
    pub origin: Vec2,
}

impl Layouter for GridLayouter {
    fn execute(&self, _model: &GraphModel, nodes: &[NodeId]) -> Vec<(NodeId, Vec2)> {
        let columns = (nodes.len() as f32).sqrt().ceil().max(1.0) as usize;
        nodes
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let col = (i % columns) as f32;
                let row = (i / columns) as f32;
                (
                    id.clone(),
                    self.origin + Vec2::new(col * self.spacing, row * self.spacing),
                )
            })
            .collect()
    }
}

/// Applies named layout presets. Computes positions only; animation belongs
/// to the rendering layer.
#[derive(Debug, Default)]
pub struct LayoutController;

impl LayoutController {
    pub fn new() -> Self {
        Self
    }

    /// Compute new positions for `node_ids` without touching the model.
    pub fn apply_layout(
        &self,
        model: &GraphModel,
        name: LayoutName,
        node_ids: &[NodeId],
        params: &LayoutParams,
    ) -> Result<Vec<(NodeId, Vec2)>, GraphError> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(node_ids.len());
        for id in node_ids {
            if !model.contains_node(id) {
                return Err(GraphError::node_not_found(id));
            }
            if seen.insert(id) {
                nodes.push(id.clone());
            }
        }

        let strategy = LayoutStrategy::resolve(name, params);
        let factor = params.spacing_factor();
        let positions = match strategy {
            LayoutStrategy::Preset => PresetLayouter {
                table: &params.preset,
            }
            .execute(model, &nodes),
            LayoutStrategy::Radial => {
                let Some(center) = params.center.clone().or_else(|| nodes.first().cloned())
                else {
                    return Ok(Vec::new());
                };
                if !model.contains_node(&center) {
                    return Err(GraphError::node_not_found(&center));
                }
                let radius = if name == LayoutName::Organic {
                    params.radius * factor
                } else {
                    params.radius
                };
                RadialLayouter { center, radius }.execute(model, &nodes)
            }
            LayoutStrategy::Layered { sequential } => LayeredLayouter {
                layer_spacing: params.spacing * factor,
                node_spacing: params.spacing * factor,
                orientation: params.orientation,
                origin: params.origin,
                sequential,
            }
            .execute(model, &nodes),
            LayoutStrategy::Grid => GridLayouter {
                spacing: params.spacing * factor,
                origin: params.origin,
            }
            .execute(model, &nodes),
        };

        tracing::info!(
            "Layout {} ({:?}) placed {} nodes",
            name.as_str(),
            strategy,
            positions.len()
        );
        Ok(positions)
    }

    /// Write computed positions back into the model.
    pub fn commit(model: &mut GraphModel, positions: &[(NodeId, Vec2)]) -> Result<(), GraphError> {
        for (id, position) in positions {
            model.update_node_position(id, *position)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphview_core::{Edge, Node, NodeKind};
    use proptest::prelude::*;

    fn add_node(model: &mut GraphModel, id: &str, x: f32, y: f32) {
        model
            .add_node(Node::new(id, NodeKind::Entity).with_position(x, y))
            .unwrap();
    }

    fn ids(values: &[&str]) -> Vec<NodeId> {
        values.iter().map(|v| NodeId::from(*v)).collect()
    }

    fn position_of(positions: &[(NodeId, Vec2)], id: &str) -> Vec2 {
        positions
            .iter()
            .find(|(n, _)| n.as_str() == id)
            .map(|(_, p)| *p)
            .unwrap()
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_radial_places_ring_around_center() {
        let mut model = GraphModel::new();
        add_node(&mut model, "hub", 100.0, 50.0);
        for id in ["a", "b", "c", "d"] {
            add_node(&mut model, id, 0.0, 0.0);
        }
        let params = LayoutParams {
            radius: 10.0,
            ..Default::default()
        };

        let positions = LayoutController::new()
            .apply_layout(
                &model,
                LayoutName::Radial,
                &ids(&["hub", "a", "b", "c", "d"]),
                &params,
            )
            .unwrap();

        assert_eq!(positions.len(), 5);
        assert!(approx(position_of(&positions, "hub"), Vec2::new(100.0, 50.0)));
        assert!(approx(position_of(&positions, "a"), Vec2::new(110.0, 50.0)));
        assert!(approx(position_of(&positions, "b"), Vec2::new(100.0, 60.0)));
        assert!(approx(position_of(&positions, "c"), Vec2::new(90.0, 50.0)));
        assert!(approx(position_of(&positions, "d"), Vec2::new(100.0, 40.0)));
    }

    #[test]
    fn test_radial_with_explicit_center_outside_request() {
        let mut model = GraphModel::new();
        add_node(&mut model, "hub", 0.0, 0.0);
        add_node(&mut model, "a", 5.0, 5.0);
        let params = LayoutParams {
            radius: 3.0,
            center: Some(NodeId::from("hub")),
            ..Default::default()
        };

        let positions = LayoutController::new()
            .apply_layout(&model, LayoutName::Lens, &ids(&["a"]), &params)
            .unwrap();

        assert_eq!(positions.len(), 1);
        assert!(approx(position_of(&positions, "a"), Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_preset_table_wins() {
        let mut model = GraphModel::new();
        add_node(&mut model, "a", 0.0, 0.0);
        add_node(&mut model, "b", 0.0, 0.0);
        let mut params = LayoutParams::default();
        params.preset.insert(NodeId::from("a"), Vec2::new(42.0, 7.0));

        let positions = LayoutController::new()
            .apply_layout(&model, LayoutName::Hierarchy, &ids(&["a", "b"]), &params)
            .unwrap();

        assert_eq!(positions, vec![(NodeId::from("a"), Vec2::new(42.0, 7.0))]);
    }

    #[test]
    fn test_hierarchy_follows_edges_and_orientation() {
        let mut model = GraphModel::new();
        for id in ["root", "left", "right", "leaf"] {
            add_node(&mut model, id, 0.0, 0.0);
        }
        model.add_edge(Edge::new("e1", "root", "left")).unwrap();
        model.add_edge(Edge::new("e2", "root", "right")).unwrap();
        model.add_edge(Edge::new("e3", "left", "leaf")).unwrap();
        let nodes = ids(&["root", "left", "right", "leaf"]);

        let down = LayoutController::new()
            .apply_layout(&model, LayoutName::Hierarchy, &nodes, &LayoutParams::default())
            .unwrap();
        let root = position_of(&down, "root");
        let left = position_of(&down, "left");
        let right = position_of(&down, "right");
        let leaf = position_of(&down, "leaf");
        assert!(left.y > root.y);
        assert_eq!(left.y, right.y);
        assert!(leaf.y > left.y);

        let params = LayoutParams {
            orientation: Orientation::Left,
            ..Default::default()
        };
        let sideways = LayoutController::new()
            .apply_layout(&model, LayoutName::Hierarchy, &nodes, &params)
            .unwrap();
        assert!(position_of(&sideways, "leaf").x < position_of(&sideways, "root").x);
    }

    #[test]
    fn test_tightness_scales_spacing() {
        let mut model = GraphModel::new();
        add_node(&mut model, "a", 0.0, 0.0);
        add_node(&mut model, "b", 0.0, 0.0);
        let nodes = ids(&["a", "b"]);
        let loose = LayoutParams {
            tightness: 0,
            ..Default::default()
        };
        let tight = LayoutParams {
            tightness: 10,
            ..Default::default()
        };

        let controller = LayoutController::new();
        let loose_pos = controller
            .apply_layout(&model, LayoutName::Sequential, &nodes, &loose)
            .unwrap();
        let tight_pos = controller
            .apply_layout(&model, LayoutName::Sequential, &nodes, &tight)
            .unwrap();

        let gap = |p: &[(NodeId, Vec2)]| (position_of(p, "b") - position_of(p, "a")).length();
        assert!((gap(&loose_pos) - 225.0).abs() < 1e-3);
        assert!((gap(&tight_pos) - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut model = GraphModel::new();
        for id in ["a", "b", "c"] {
            add_node(&mut model, id, 0.0, 0.0);
        }
        model.add_edge(Edge::new("e1", "a", "b")).unwrap();
        model.add_edge(Edge::new("e2", "b", "c")).unwrap();
        model.add_edge(Edge::new("e3", "c", "a")).unwrap();

        let positions = LayoutController::new()
            .apply_layout(&model, LayoutName::Hierarchy, &ids(&["a", "b", "c"]), &LayoutParams::default())
            .unwrap();
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_grid_and_commit() {
        let mut model = GraphModel::new();
        for id in ["a", "b", "c", "d", "e"] {
            add_node(&mut model, id, 0.0, 0.0);
        }
        let params = LayoutParams {
            spacing: 10.0,
            ..Default::default()
        };

        let positions = LayoutController::new()
            .apply_layout(&model, LayoutName::Structural, &ids(&["a", "b", "c", "d", "e"]), &params)
            .unwrap();
        LayoutController::commit(&mut model, &positions).unwrap();

        assert_eq!(model.get_node(&NodeId::from("c")).unwrap().position, Vec2::new(20.0, 0.0));
        assert_eq!(model.get_node(&NodeId::from("d")).unwrap().position, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_unknown_node_rejected() {
        let model = GraphModel::new();
        let err = LayoutController::new()
            .apply_layout(&model, LayoutName::Radial, &ids(&["ghost"]), &LayoutParams::default())
            .unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
    }

    proptest! {
        #[test]
        fn prop_radial_is_deterministic(
            count in 1usize..30,
            radius in 1.0f32..500.0,
            cx in -500.0f32..500.0,
            cy in -500.0f32..500.0,
        ) {
            let mut model = GraphModel::new();
            add_node(&mut model, "center", cx, cy);
            let mut nodes = vec![NodeId::from("center")];
            for i in 0..count {
                let id = format!("n{i}");
                add_node(&mut model, &id, 0.0, 0.0);
                nodes.push(NodeId(id));
            }
            let params = LayoutParams { radius, ..Default::default() };
            let controller = LayoutController::new();

            let first = controller.apply_layout(&model, LayoutName::Radial, &nodes, &params).unwrap();
            let second = controller.apply_layout(&model, LayoutName::Radial, &nodes, &params).unwrap();

            prop_assert_eq!(&first, &second);
            for (id, pos) in &first {
                if id.as_str() != "center" {
                    let distance = (*pos - Vec2::new(cx, cy)).length();
                    prop_assert!((distance - radius).abs() < radius * 1e-3 + 1e-2);
                }
            }
        }
    }
}
