use std::collections::HashSet;

use crate::types::Graph;

use super::GraphFilter;

/// Hides nodes that no link in the current link set touches.
///
/// Links are passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsolatedFilter;

impl GraphFilter for IsolatedFilter {
    fn name(&self) -> &'static str {
        "isolated"
    }

    fn apply(&self, graph: &Graph) -> Graph {
        let linked: HashSet<&str> = graph
            .links
            .iter()
            .flat_map(|l| [l.source.as_str(), l.target.as_str()])
            .collect();

        let nodes = graph
            .nodes
            .iter()
            .filter(|n| linked.contains(n.name.as_str()))
            .cloned()
            .collect();

        Graph::new(nodes, graph.links.clone())
    }
}
