use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{Graph, Link};

use super::expander::Expansion;

/// The node/link set handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageView {
    /// Usage level shown, or `None` when no entry point is registered and the
    /// whole filtered graph is displayed.
    pub level: Option<u32>,
    pub graph: Graph,
}

impl UsageView {
    /// A view over a graph that was not expanded.
    pub fn unexpanded(graph: Graph) -> Self {
        Self { level: None, graph }
    }

    /// USE and API links, drawn as usage arrows.
    pub fn usage_links(&self) -> Vec<&Link> {
        self.graph.links.iter().filter(|l| l.kind.is_usage()).collect()
    }

    /// Every other relation; only drawn in hybrid view.
    pub fn structural_links(&self) -> Vec<&Link> {
        self.graph.links.iter().filter(|l| !l.kind.is_usage()).collect()
    }

    /// Links whose two endpoints are part of the view.
    ///
    /// A link pointing at a node outside the view is not an error; it is
    /// simply not drawn.
    pub fn renderable_links(&self) -> Vec<&Link> {
        let names = self.graph.node_names();
        self.graph
            .links
            .iter()
            .filter(|l| names.contains(l.source.as_str()) && names.contains(l.target.as_str()))
            .collect()
    }
}

/// Brings a requested level into the range the expansion actually reached.
///
/// Levels start at 1; an expansion that reached nothing beyond its entry
/// points only offers level 0.
pub fn clamp_level(requested: u32, max_level: u32) -> u32 {
    if max_level == 0 {
        return 0;
    }
    requested.clamp(1, max_level)
}

/// Slices the expansion down to what `level` shows: the first
/// `counts[level].nodes` nodes and `counts[level].links` link entries.
///
/// Out-of-range levels are clamped rather than rejected.
pub fn project(expansion: &Expansion, level: u32) -> UsageView {
    let max_level = expansion.max_level();
    let shown = clamp_level(level, max_level);
    if shown != level {
        warn!(requested = level, shown, max_level, "usage level clamped");
    }

    let Some(count) = expansion.counts().get(shown as usize) else {
        return UsageView {
            level: Some(shown),
            graph: Graph::default(),
        };
    };

    let nodes = expansion.nodes().iter().take(count.nodes).cloned().collect();
    let links = expansion.links().iter().take(count.links).cloned().collect();

    UsageView {
        level: Some(shown),
        graph: Graph::new(nodes, links),
    }
}
