use std::collections::HashSet;

use tracing::debug;

use crate::store::GraphStore;
use crate::types::{Graph, Link};

/// Re-admits the supertypes of visible nodes for the hybrid view.
///
/// Inheritance links are taken from the store's unfiltered link set, so a
/// supertype hidden by an earlier filter comes back together with its link.
pub struct HybridAugmenter<'a> {
    store: &'a GraphStore,
}

impl<'a> HybridAugmenter<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// Returns `graph` extended with every IMPLEMENTS/EXTENDS link leaving one
    /// of its nodes and every target node of those links.
    ///
    /// Links and nodes already present are not added a second time.
    pub fn augment(&self, graph: &Graph) -> Graph {
        let visible = graph.node_names();

        let inheritance: Vec<&Link> = self
            .store
            .saved_links()
            .iter()
            .filter(|l| l.kind.is_inheritance() && visible.contains(l.source.as_str()))
            .collect();

        let mut links = graph.links.clone();
        let mut added_links = 0usize;
        for link in &inheritance {
            if links.iter().any(|l| l.same_relation(link)) {
                continue;
            }
            let mut link = (*link).clone();
            if let (Some(src), Some(tgt)) =
                (self.store.node(&link.source), self.store.node(&link.target))
            {
                link.source_types = Some(src.types.clone());
                link.target_types = Some(tgt.types.clone());
            }
            links.push(link);
            added_links += 1;
        }

        let targets: HashSet<&str> = inheritance.iter().map(|l| l.target.as_str()).collect();
        let mut nodes = graph.nodes.clone();
        let mut present: HashSet<String> = visible.iter().map(|n| n.to_string()).collect();
        let mut added_nodes = 0usize;
        for node in self.store.saved_nodes() {
            if targets.contains(node.name.as_str()) && present.insert(node.name.clone()) {
                nodes.push(node.clone());
                added_nodes += 1;
            }
        }

        debug!(added_links, added_nodes, "hybrid inheritance augmentation");
        Graph::new(nodes, links)
    }
}
