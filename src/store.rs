use std::collections::HashMap;

use tracing::{debug, warn};

use crate::types::{Graph, GraphPayload, Link, Node};

/// Holds the immutable analyzer payload and hands out fresh working graphs.
///
/// Nothing derived from a previous display cycle is kept: every call to
/// [`GraphStore::working_graph`] rebuilds from the original payload.
#[derive(Debug, Clone)]
pub struct GraphStore {
    payload: GraphPayload,
    index: HashMap<String, usize>,
}

impl GraphStore {
    pub fn new(payload: GraphPayload) -> Self {
        let index = payload
            .allnodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.clone(), i))
            .collect();
        Self { payload, index }
    }

    /// Looks a node up by name in the unfiltered payload.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.payload.allnodes[i])
    }

    /// All nodes as loaded, before any filter.
    pub fn saved_nodes(&self) -> &[Node] {
        &self.payload.allnodes
    }

    /// All links as loaded (`alllinks`), before any filter or link-set switch.
    pub fn saved_links(&self) -> &[Link] {
        &self.payload.alllinks
    }

    /// Builds the unfiltered working graph for one display cycle.
    ///
    /// Hybrid view uses `alllinks`; otherwise the composition-only
    /// `linkscompose` set is used, or `alllinks` if the payload has none.
    /// Links whose two endpoints resolve get their endpoint types copied in.
    pub fn working_graph(&self, hybrid_view: bool) -> Graph {
        let source_links = match (&self.payload.linkscompose, hybrid_view) {
            (Some(compose), false) => compose,
            _ => &self.payload.alllinks,
        };

        let mut dangling = 0usize;
        let links: Vec<Link> = source_links
            .iter()
            .map(|l| {
                let mut link = l.clone();
                if let (Some(src), Some(tgt)) = (self.node(&l.source), self.node(&l.target)) {
                    link.source_types = Some(src.types.clone());
                    link.target_types = Some(tgt.types.clone());
                } else {
                    dangling += 1;
                }
                link
            })
            .collect();

        if dangling > 0 {
            warn!(dangling, "links reference unknown nodes and will not be drawn");
        }

        debug!(
            nodes = self.payload.allnodes.len(),
            links = links.len(),
            hybrid_view,
            "built working graph"
        );

        Graph::new(self.payload.allnodes.clone(), links)
    }
}
