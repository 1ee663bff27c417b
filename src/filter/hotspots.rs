use std::collections::HashSet;

use crate::types::{Graph, NodeType};

use super::GraphFilter;

/// Keeps only hotspot nodes and the links running between two of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotspotsFilter;

impl GraphFilter for HotspotsFilter {
    fn name(&self) -> &'static str {
        "hotspots"
    }

    fn apply(&self, graph: &Graph) -> Graph {
        let nodes: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.has_type(&NodeType::Hotspot))
            .cloned()
            .collect();

        let kept: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        let links = graph
            .links
            .iter()
            .filter(|l| kept.contains(l.source.as_str()) && kept.contains(l.target.as_str()))
            .cloned()
            .collect();

        Graph::new(nodes, links)
    }
}
