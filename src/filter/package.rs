use crate::patterns::PatternSet;
use crate::types::{Graph, Link, Node};

use super::GraphFilter;

/// Hides every node whose name matches one of the user's package patterns,
/// together with every link that has such a node at either end.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    patterns: PatternSet,
}

impl PackageFilter {
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    pub fn filter_nodes(&self, nodes: &[Node]) -> Vec<Node> {
        nodes
            .iter()
            .filter(|n| !self.patterns.matches(&n.name))
            .cloned()
            .collect()
    }

    pub fn filter_links(&self, links: &[Link]) -> Vec<Link> {
        links
            .iter()
            .filter(|l| !self.patterns.matches(&l.source) && !self.patterns.matches(&l.target))
            .cloned()
            .collect()
    }
}

impl GraphFilter for PackageFilter {
    fn name(&self) -> &'static str {
        "package"
    }

    fn apply(&self, graph: &Graph) -> Graph {
        if self.patterns.is_empty() {
            return graph.clone();
        }
        Graph::new(self.filter_nodes(&graph.nodes), self.filter_links(&graph.links))
    }
}
