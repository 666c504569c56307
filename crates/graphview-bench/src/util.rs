use graphview_core::{Edge, Node, NodeId, NodeKind};
use graphview_graph::GraphModel;

/// Ring of `node_count` tables, each joined to its next `fan_out` successors.
pub fn generate_synthetic_graph(node_count: usize, fan_out: usize) -> GraphModel {
    let mut model = GraphModel::new();
    for i in 0..node_count {
        let node = Node::new(format!("n{i}"), NodeKind::Table)
            .with_attribute("name", format!("table_{i}"))
            .with_attribute("rows", i as u64 * 10);
        // Ids are unique by construction.
        let _ = model.add_node(node);
    }

    for i in 0..node_count {
        for step in 1..=fan_out {
            let j = (i + step) % node_count;
            let edge = Edge::new(format!("e{i}-{j}"), format!("n{i}"), format!("n{j}"))
                .with_field_mapping("id", &format!("fk_{i}"));
            let _ = model.add_edge(edge);
        }
    }
    model
}

pub fn node_id(i: usize) -> NodeId {
    NodeId(format!("n{i}"))
}
