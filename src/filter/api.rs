use tracing::debug;

use crate::patterns::PatternSet;
use crate::types::{Graph, NodeType};

/// Entry points registered on behalf of the API filtering switch.
///
/// Only names this tracker added itself are unregistered when the switch is
/// turned off; entry points the user typed in are left alone, API classes
/// included.
#[derive(Debug, Clone, Default)]
pub struct ApiEntryPoints {
    registered: PatternSet,
}

impl ApiEntryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently registered by the switch.
    pub fn registered(&self) -> &PatternSet {
        &self.registered
    }

    /// Registers (when `enabled`) every API-tagged node of `graph` as an entry
    /// point, or unregisters (when not) the ones registered earlier.
    ///
    /// Returns `true` if the graph holds at least one API node, which is what
    /// decides whether the API filtering switch is offered at all.
    pub fn sync(&mut self, graph: &Graph, entry_points: &mut PatternSet, enabled: bool) -> bool {
        let api_nodes: Vec<&str> = graph
            .nodes
            .iter()
            .filter(|n| n.has_type(&NodeType::Api))
            .map(|n| n.name.as_str())
            .collect();

        if enabled {
            for name in &api_nodes {
                if entry_points.add(name) {
                    self.registered.add(name);
                    debug!(node = %name, "api entry point registered");
                }
            }
        } else if !self.registered.is_empty() {
            for name in self.registered.iter() {
                if entry_points.remove(name) {
                    debug!(node = %name, "api entry point unregistered");
                }
            }
            self.registered = PatternSet::new();
        }

        !api_nodes.is_empty()
    }
}
