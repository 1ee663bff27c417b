use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::patterns::PatternSet;
use crate::types::{Graph, Link, Node};

/// Link direction followed when measuring usage levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageDirection {
    /// Follow links pointing at the reached nodes (who uses them).
    #[serde(rename = "IN")]
    In,
    /// Follow links leaving the reached nodes (what they use).
    #[default]
    #[serde(rename = "OUT")]
    Out,
    /// Follow links both ways.
    #[serde(rename = "IN-OUT", alias = "IN_OUT")]
    InOut,
}

impl UsageDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageDirection::In => "IN",
            UsageDirection::Out => "OUT",
            UsageDirection::InOut => "IN-OUT",
        }
    }

    /// Returns `true` if `link` is followed from the nodes `is_seed` accepts.
    fn selects(&self, link: &Link, is_seed: impl Fn(&str) -> bool) -> bool {
        match self {
            UsageDirection::In => is_seed(link.target.as_str()),
            UsageDirection::Out => is_seed(link.source.as_str()),
            UsageDirection::InOut => {
                is_seed(link.source.as_str()) || is_seed(link.target.as_str())
            }
        }
    }
}

impl fmt::Display for UsageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "IN" => Ok(UsageDirection::In),
            "OUT" => Ok(UsageDirection::Out),
            "IN-OUT" | "INOUT" => Ok(UsageDirection::InOut),
            other => Err(format!(
                "unknown usage direction '{other}' (expected IN, OUT or IN-OUT)"
            )),
        }
    }
}

/// Cumulative totals reached once a usage level is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: u32,
    /// Number of nodes leveled at or below `level`.
    pub nodes: usize,
    /// Number of link entries visited up to and including `level`.
    pub links: usize,
}

/// The outcome of one usage-level expansion.
///
/// `nodes` is in discovery order and `links` in visit order, so the first
/// `counts[k].nodes` nodes and `counts[k].links` links are exactly what level
/// `k` shows. `links` may hold the same link several times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    pub direction: UsageDirection,
    levels: BTreeMap<String, u32>,
    counts: Vec<LevelCount>,
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Expansion {
    fn new(direction: UsageDirection) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Levels `node` unless it already has a level. Returns `true` if it was new.
    fn reach(&mut self, node: &Node, level: u32) -> bool {
        if self.levels.contains_key(&node.name) {
            return false;
        }
        self.levels.insert(node.name.clone(), level);
        self.nodes.push(node.clone());
        true
    }

    fn record(&mut self, level: u32) {
        self.counts.push(LevelCount {
            level,
            nodes: self.nodes.len(),
            links: self.links.len(),
        });
    }

    /// Per-level cumulative totals, indexed by level (entry 0 is the entry points).
    pub fn counts(&self) -> &[LevelCount] {
        &self.counts
    }

    /// Reached nodes in discovery order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Visited link entries in visit order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Node name to usage level, for every reached node.
    pub fn levels(&self) -> &BTreeMap<String, u32> {
        &self.levels
    }

    pub fn level_of(&self, name: &str) -> Option<u32> {
        self.levels.get(name).copied()
    }

    /// Deepest level that reached at least one new node.
    pub fn max_level(&self) -> u32 {
        self.counts.last().map_or(0, |c| c.level)
    }

    /// Names of the nodes first reached at exactly `level`, in discovery order.
    pub fn nodes_at(&self, level: u32) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| self.level_of(&n.name) == Some(level))
            .map(|n| n.name.as_str())
            .collect()
    }

    /// `true` if no node matched an entry point.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Computes usage levels over `graph` from the nodes matching `entry_points`.
///
/// Level 0 holds the matching nodes. Level 1 follows the links selected by
/// `direction` against the entry-point patterns; every further level follows
/// the links selected against the nodes first reached one level before. A
/// node keeps the first level it is reached at. Expansion stops at the first
/// level that reaches no new node; that level is not recorded in the counts.
///
/// Level 1 appends each followed link once. Deeper levels append a followed
/// link once per distinct endpoint present in `graph`, so the same link can be
/// listed several times.
pub fn expand(graph: &Graph, entry_points: &PatternSet, direction: UsageDirection) -> Expansion {
    let mut expansion = Expansion::new(direction);

    let mut index: HashMap<&str, &Node> = HashMap::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        index.entry(node.name.as_str()).or_insert(node);
    }

    for node in &graph.nodes {
        if entry_points.matches(&node.name) {
            expansion.reach(node, 0);
        }
    }
    expansion.record(0);

    if expansion.is_empty() {
        debug!("no node matches an entry point; expansion stops at level 0");
        return expansion;
    }

    let mut frontier: Vec<String> = Vec::new();
    for link in graph
        .links
        .iter()
        .filter(|l| direction.selects(l, |end| entry_points.matches(end)))
    {
        expansion.links.push(link.clone());
        for node in endpoints(&index, link) {
            if expansion.reach(node, 1) {
                frontier.push(node.name.clone());
            }
        }
    }

    let mut level = 1;
    while !frontier.is_empty() {
        expansion.record(level);
        debug!(level, new_nodes = frontier.len(), "usage level reached");

        level += 1;
        let mut next: Vec<String> = Vec::new();
        {
            let seeds: HashSet<&str> = frontier.iter().map(String::as_str).collect();
            for link in graph
                .links
                .iter()
                .filter(|l| direction.selects(l, |end| seeds.contains(end)))
            {
                for node in endpoints(&index, link) {
                    expansion.links.push(link.clone());
                    if expansion.reach(node, level) {
                        next.push(node.name.clone());
                    }
                }
            }
        }
        frontier = next;
    }

    info!(
        direction = %direction,
        max_level = expansion.max_level(),
        nodes = expansion.nodes.len(),
        link_entries = expansion.links.len(),
        "usage expansion complete"
    );

    expansion
}

/// Resolves the endpoints of `link` that are nodes of the expanded graph.
/// A self-loop resolves to its node once.
fn endpoints<'g>(index: &HashMap<&str, &'g Node>, link: &Link) -> Vec<&'g Node> {
    let mut names = vec![link.source.as_str()];
    if link.target != link.source {
        names.push(link.target.as_str());
    }
    names
        .into_iter()
        .filter_map(|name| index.get(name).copied())
        .collect()
}
