use std::collections::HashSet;

use crate::types::{Graph, Node, NodeType};

use super::GraphFilter;

/// Collapses variants: a node tagged VARIANT is hidden unless it is itself a
/// variation point, so only the representative classes remain.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantsFilter;

impl VariantsFilter {
    fn is_collapsed(node: &Node) -> bool {
        node.has_type(&NodeType::Variant)
            && !node.has_type(&NodeType::Vp)
            && !node.has_type(&NodeType::MethodLevelVp)
    }
}

impl GraphFilter for VariantsFilter {
    fn name(&self) -> &'static str {
        "variants"
    }

    fn apply(&self, graph: &Graph) -> Graph {
        let removed: HashSet<&str> = graph
            .nodes
            .iter()
            .filter(|n| Self::is_collapsed(n))
            .map(|n| n.name.as_str())
            .collect();

        let nodes = graph
            .nodes
            .iter()
            .filter(|n| !removed.contains(n.name.as_str()))
            .cloned()
            .collect();
        let links = graph
            .links
            .iter()
            .filter(|l| !removed.contains(l.source.as_str()) && !removed.contains(l.target.as_str()))
            .cloned()
            .collect();

        Graph::new(nodes, links)
    }
}
