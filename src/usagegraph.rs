use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ViewConfig;
use crate::errors::{Result, UsageGraphError};
use crate::filter::{ApiEntryPoints, FilterChain};
use crate::patterns::PatternSet;
use crate::store::GraphStore;
use crate::style::{color_domain, node_style, ColorDomain, NodeStyle, PackageColors, Rgb};
use crate::types::{GraphPayload, NodeType, ProjectStats};
use crate::usage::{
    expand, project, Expansion, HybridAugmenter, LevelCount, UsageDirection, UsageView,
};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Fetches the graph and stats files, one load at a time.
///
/// A load requested while another is still pending is rejected instead of
/// being interleaved with it.
#[derive(Debug, Default)]
pub struct GraphLoader {
    pending: AtomicBool,
}

/// Marks a load as pending until dropped.
#[derive(Debug)]
pub struct LoadGuard<'a> {
    pending: &'a AtomicBool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl GraphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a load is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Claims the loader. Fails with `LoadInProgress` if it is already claimed.
    pub fn try_begin(&self) -> Result<LoadGuard<'_>> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| UsageGraphError::LoadInProgress)?;
        Ok(LoadGuard {
            pending: &self.pending,
        })
    }

    /// Reads and parses both files. Either one failing fails the whole load.
    pub async fn load(
        &self,
        graph_path: &Path,
        stats_path: &Path,
    ) -> Result<(GraphPayload, ProjectStats)> {
        let _guard = self.try_begin()?;
        let start = Instant::now();

        let (graph_text, stats_text) =
            tokio::try_join!(read_file(graph_path), read_file(stats_path))?;

        let payload: GraphPayload = parse_json(&graph_text, graph_path)?;
        let stats: ProjectStats = parse_json(&stats_text, stats_path)?;

        info!(
            nodes = payload.allnodes.len(),
            links = payload.alllinks.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "graph data loaded"
        );
        Ok((payload, stats))
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| UsageGraphError::Fetch {
            message: e.to_string(),
            path: path.display().to_string(),
        })
}

fn parse_json<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T> {
    serde_json::from_str(text).map_err(|e| UsageGraphError::Parse {
        message: e.to_string(),
        path: path.display().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Display cycle
// ---------------------------------------------------------------------------

/// Everything one display cycle produces for the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct Display {
    /// The node/link set to draw.
    pub view: UsageView,
    /// The full expansion, when entry points are registered.
    pub expansion: Option<Expansion>,
    /// Whether the graph holds API classes (the API switch is offered).
    pub api_available: bool,
    pub styles: Vec<NodeStyle>,
    pub color_domain: Option<ColorDomain>,
    pub stats: Vec<String>,
}

impl Display {
    /// Per-level cumulative totals for the level selector; empty without entry points.
    pub fn counts(&self) -> &[LevelCount] {
        match &self.expansion {
            Some(expansion) => expansion.counts(),
            None => &[],
        }
    }

    /// Levels the selector offers: `1..=max_level`.
    pub fn selectable_levels(&self) -> Vec<u32> {
        let max = self.expansion.as_ref().map_or(0, |e| e.max_level());
        (1..=max).collect()
    }
}

/// Central orchestrator: owns the loaded data and the user's choices, and
/// recomputes the whole view from scratch on every display.
pub struct UsageGraph {
    store: GraphStore,
    stats: ProjectStats,
    config: ViewConfig,
    package_filters: PatternSet,
    entry_points: PatternSet,
    api_entry_points: ApiEntryPoints,
    package_colors: PackageColors,
}

impl UsageGraph {
    /// Builds an orchestrator over already loaded data.
    pub fn new(payload: GraphPayload, stats: ProjectStats, config: ViewConfig) -> Self {
        let package_filters = config.package_filters.iter().collect();
        let entry_points = config.entry_points.iter().collect();
        let package_colors = config.package_colors.iter().cloned().collect();
        Self {
            store: GraphStore::new(payload),
            stats,
            config,
            package_filters,
            entry_points,
            api_entry_points: ApiEntryPoints::new(),
            package_colors,
        }
    }

    /// Loads both files through `loader` and builds an orchestrator over them.
    pub async fn open(
        loader: &GraphLoader,
        graph_path: &Path,
        stats_path: &Path,
        config: ViewConfig,
    ) -> Result<Self> {
        let (payload, stats) = loader.load(graph_path, stats_path).await?;
        Ok(Self::new(payload, stats, config))
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn entry_points(&self) -> &PatternSet {
        &self.entry_points
    }

    pub fn package_filters(&self) -> &PatternSet {
        &self.package_filters
    }

    /// The current toggles together with the current pattern lists. Entry
    /// points registered by the API switch are left out.
    pub fn config(&self) -> ViewConfig {
        ViewConfig {
            package_filters: self.package_filters.iter().map(String::from).collect(),
            entry_points: self
                .entry_points
                .iter()
                .filter(|p| !self.api_entry_points.registered().contains(p))
                .map(String::from)
                .collect(),
            package_colors: self.package_colors.entries().to_vec(),
            ..self.config.clone()
        }
    }

    /// Runs filters, API registration, hybrid augmentation, expansion and
    /// projection over a fresh copy of the loaded graph.
    ///
    /// When the entry points match no node the filtered graph is shown as is;
    /// the (level 0 only) expansion is still returned for the level table.
    pub fn display(&mut self) -> Display {
        let start = Instant::now();
        let working = self.store.working_graph(self.config.hybrid_view);

        let chain = FilterChain::from_config(&self.package_filters, &self.config);
        debug!(stages = ?chain.stage_names(), "running filter chain");
        let filtered = chain.apply(&working);

        let mut api_available = self.api_entry_points.sync(
            &filtered,
            &mut self.entry_points,
            self.config.api_filtering,
        );

        let graph = if self.config.hybrid_view {
            HybridAugmenter::new(&self.store).augment(&filtered)
        } else {
            filtered
        };
        api_available |= graph.nodes.iter().any(|n| n.has_type(&NodeType::Api));

        let (view, expansion) = if self.entry_points.is_empty() {
            (UsageView::unexpanded(graph), None)
        } else {
            let expansion = expand(&graph, &self.entry_points, self.config.direction);
            if expansion.is_empty() {
                warn!("no node matches the registered entry points; showing the filtered graph");
                (UsageView::unexpanded(graph), Some(expansion))
            } else {
                (project(&expansion, self.config.usage_level), Some(expansion))
            }
        };

        let domain = color_domain(self.store.saved_nodes());
        let styles = view
            .graph
            .nodes
            .iter()
            .map(|n| node_style(n, &self.entry_points, &self.package_colors, domain.as_ref()))
            .collect();

        info!(
            nodes = view.graph.nodes.len(),
            links = view.graph.links.len(),
            level = ?view.level,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "display cycle complete"
        );

        Display {
            color_domain: domain,
            styles,
            view,
            expansion,
            api_available,
            stats: self.stats.summary_lines(),
        }
    }
}

// ---------------------------------------------------------------------------
// User events
// ---------------------------------------------------------------------------

impl UsageGraph {
    pub fn add_entry_point(&mut self, pattern: &str) -> bool {
        self.entry_points.add(pattern)
    }

    pub fn remove_entry_point(&mut self, pattern: &str) -> bool {
        self.entry_points.remove(pattern)
    }

    pub fn add_package_filter(&mut self, pattern: &str) -> bool {
        self.package_filters.add(pattern)
    }

    pub fn remove_package_filter(&mut self, pattern: &str) -> bool {
        self.package_filters.remove(pattern)
    }

    pub fn package_colors(&self) -> &PackageColors {
        &self.package_colors
    }

    /// Draws classes under `pattern` towards `color`.
    pub fn set_package_color(&mut self, pattern: &str, color: Rgb) -> bool {
        self.package_colors.set(pattern, color)
    }

    pub fn remove_package_color(&mut self, pattern: &str) -> bool {
        self.package_colors.remove(pattern)
    }

    pub fn set_direction(&mut self, direction: UsageDirection) {
        self.config.direction = direction;
    }

    pub fn select_level(&mut self, level: u32) {
        self.config.usage_level = level;
    }

    /// Each toggle flips its flag and returns the new value.
    pub fn toggle_isolated(&mut self) -> bool {
        self.config.filter_isolated = !self.config.filter_isolated;
        self.config.filter_isolated
    }

    pub fn toggle_variants(&mut self) -> bool {
        self.config.filter_variants = !self.config.filter_variants;
        self.config.filter_variants
    }

    pub fn toggle_hotspots(&mut self) -> bool {
        self.config.only_hotspots = !self.config.only_hotspots;
        self.config.only_hotspots
    }

    pub fn toggle_api_filtering(&mut self) -> bool {
        self.config.api_filtering = !self.config.api_filtering;
        self.config.api_filtering
    }

    pub fn toggle_hybrid_view(&mut self) -> bool {
        self.config.hybrid_view = !self.config.hybrid_view;
        self.config.hybrid_view
    }
}
