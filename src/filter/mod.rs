/// Removal of nodes under excluded packages.
pub mod package;

/// Collapsing of variant classes.
pub mod variants;

/// Removal of nodes without incident links.
pub mod isolated;

/// Restriction to hotspot nodes.
pub mod hotspots;

/// Registration of API classes as entry points.
pub mod api;

use tracing::debug;

use crate::config::ViewConfig;
use crate::patterns::PatternSet;
use crate::types::Graph;

pub use api::ApiEntryPoints;
pub use hotspots::HotspotsFilter;
pub use isolated::IsolatedFilter;
pub use package::PackageFilter;
pub use variants::VariantsFilter;

/// A pure graph-to-graph pruning stage.
pub trait GraphFilter {
    /// Short stage name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the pruned graph. The input is never modified.
    fn apply(&self, graph: &Graph) -> Graph;
}

/// The fixed, ordered sequence of pruning stages of a display cycle.
pub struct FilterChain {
    stages: Vec<Box<dyn GraphFilter>>,
}

impl FilterChain {
    /// Builds the chain enabled by the given toggles, in the fixed order
    /// package, variants, isolated, hotspots.
    pub fn from_config(package_filters: &PatternSet, config: &ViewConfig) -> Self {
        let mut stages: Vec<Box<dyn GraphFilter>> =
            vec![Box::new(PackageFilter::new(package_filters.clone()))];
        if config.filter_variants {
            stages.push(Box::new(VariantsFilter));
        }
        if config.filter_isolated {
            stages.push(Box::new(IsolatedFilter));
        }
        if config.only_hotspots {
            stages.push(Box::new(HotspotsFilter));
        }
        Self { stages }
    }

    /// Names of the enabled stages, in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage, each consuming the previous stage's output.
    pub fn apply(&self, graph: &Graph) -> Graph {
        let mut current = graph.clone();
        for stage in &self.stages {
            current = stage.apply(&current);
            debug!(
                stage = stage.name(),
                nodes = current.nodes.len(),
                links = current.links.len(),
                "filter stage applied"
            );
        }
        current
    }
}
