use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Tags attached to a node by the upstream analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Class,
    Interface,
    Abstract,
    Api,
    ApiRoot,
    Hotspot,
    Vp,
    Variant,
    MethodLevelVp,
    Strategy,
    Factory,
    Template,
    Decorator,
    CompositionStrategy,
    /// Any tag this crate does not interpret, kept verbatim.
    Other(String),
}

impl NodeType {
    /// Returns the tag as it appears in the graph JSON.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Class => "CLASS",
            NodeType::Interface => "INTERFACE",
            NodeType::Abstract => "ABSTRACT",
            NodeType::Api => "API",
            NodeType::ApiRoot => "API_ROOT",
            NodeType::Hotspot => "HOTSPOT",
            NodeType::Vp => "VP",
            NodeType::Variant => "VARIANT",
            NodeType::MethodLevelVp => "METHOD_LEVEL_VP",
            NodeType::Strategy => "STRATEGY",
            NodeType::Factory => "FACTORY",
            NodeType::Template => "TEMPLATE",
            NodeType::Decorator => "DECORATOR",
            NodeType::CompositionStrategy => "COMPOSITION_STRATEGY",
            NodeType::Other(tag) => tag,
        }
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        match s {
            "CLASS" => NodeType::Class,
            "INTERFACE" => NodeType::Interface,
            "ABSTRACT" => NodeType::Abstract,
            "API" => NodeType::Api,
            "API_ROOT" => NodeType::ApiRoot,
            "HOTSPOT" => NodeType::Hotspot,
            "VP" => NodeType::Vp,
            "VARIANT" => NodeType::Variant,
            "METHOD_LEVEL_VP" => NodeType::MethodLevelVp,
            "STRATEGY" => NodeType::Strategy,
            "FACTORY" => NodeType::Factory,
            "TEMPLATE" => NodeType::Template,
            "DECORATOR" => NodeType::Decorator,
            "COMPOSITION_STRATEGY" => NodeType::CompositionStrategy,
            other => NodeType::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        NodeType::from(s.as_str())
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

/// Kinds of relations between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkKind {
    Use,
    Api,
    Implements,
    Extends,
    Instantiate,
    /// Any other structural relation, kept verbatim.
    Other(String),
}

impl LinkKind {
    /// Returns the relation tag as it appears in the graph JSON.
    pub fn as_str(&self) -> &str {
        match self {
            LinkKind::Use => "USE",
            LinkKind::Api => "API",
            LinkKind::Implements => "IMPLEMENTS",
            LinkKind::Extends => "EXTENDS",
            LinkKind::Instantiate => "INSTANTIATE",
            LinkKind::Other(tag) => tag,
        }
    }

    /// `true` for IMPLEMENTS and EXTENDS.
    pub fn is_inheritance(&self) -> bool {
        matches!(self, LinkKind::Implements | LinkKind::Extends)
    }

    /// `true` for the relations drawn as usage arrows (USE and API).
    pub fn is_usage(&self) -> bool {
        matches!(self, LinkKind::Use | LinkKind::Api)
    }
}

impl From<&str> for LinkKind {
    fn from(s: &str) -> Self {
        match s {
            "USE" => LinkKind::Use,
            "API" => LinkKind::Api,
            "IMPLEMENTS" => LinkKind::Implements,
            "EXTENDS" => LinkKind::Extends,
            "INSTANTIATE" => LinkKind::Instantiate,
            other => LinkKind::Other(other.to_string()),
        }
    }
}

impl From<String> for LinkKind {
    fn from(s: String) -> Self {
        LinkKind::from(s.as_str())
    }
}

impl From<LinkKind> for String {
    fn from(k: LinkKind) -> Self {
        k.as_str().to_string()
    }
}

/// A class-level entity of the analysed project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Fully qualified name; unique within a payload.
    pub name: String,
    #[serde(default)]
    pub types: Vec<NodeType>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub class_variants: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub constructor_variants: u32,
    #[serde(rename = "methodVPs", default, deserialize_with = "lenient_u32")]
    pub method_vps: u32,
}

impl Node {
    /// Creates a node with the given tags and zeroed variability counters.
    pub fn new(name: &str, types: &[NodeType]) -> Self {
        Self {
            name: name.to_string(),
            types: types.to_vec(),
            class_variants: 0,
            constructor_variants: 0,
            method_vps: 0,
        }
    }

    pub fn has_type(&self, t: &NodeType) -> bool {
        self.types.contains(t)
    }
}

/// A directed relation between two nodes, referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_types: Option<Vec<NodeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_types: Option<Vec<NodeType>>,
}

impl Link {
    pub fn new(source: &str, target: &str, kind: LinkKind) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            source_types: None,
            target_types: None,
        }
    }

    /// Returns `true` if `name` is either endpoint.
    pub fn touches(&self, name: &str) -> bool {
        self.source == name || self.target == name
    }

    /// Compares endpoints and kind, ignoring derived annotations.
    pub fn same_relation(&self, other: &Link) -> bool {
        self.source == other.source && self.target == other.target && self.kind == other.kind
    }
}

/// The working `{nodes, links}` pair flowing through the filter pipeline.
///
/// Links may reference nodes that are not (or no longer) in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    /// Returns the set of node names currently in the graph.
    pub fn node_names(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// The graph JSON produced by the upstream analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    #[serde(default)]
    pub allnodes: Vec<Node>,
    #[serde(default)]
    pub alllinks: Vec<Link>,
    /// Composition-only link set shown when hybrid view is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkscompose: Option<Vec<Link>>,
}

/// The stats JSON produced next to the graph. Display-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(rename = "classLevelVPs", default)]
    pub class_level_vps: Option<u64>,
    #[serde(rename = "methodLevelVPs", default)]
    pub method_level_vps: Option<u64>,
    #[serde(rename = "classLevelVariants", default)]
    pub class_level_variants: Option<u64>,
    #[serde(rename = "methodLevelVariants", default)]
    pub method_level_variants: Option<u64>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ProjectStats {
    /// The headline figures shown in the project information panel.
    pub fn summary_lines(&self) -> Vec<String> {
        let fmt = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |n| n.to_string());
        vec![
            format!("Number of class level VPs: {}", fmt(self.class_level_vps)),
            format!("Number of method level VPs: {}", fmt(self.method_level_vps)),
            format!(
                "Number of class level variants: {}",
                fmt(self.class_level_variants)
            ),
            format!(
                "Number of method level variants: {}",
                fmt(self.method_level_variants)
            ),
        ]
    }
}

/// Accepts a JSON number, a numeric string or null for counter fields.
fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("expected a small unsigned integer, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|e| D::Error::custom(format!("invalid counter '{s}': {e}"))),
        other => Err(D::Error::custom(format!(
            "expected a number or numeric string, got {other}"
        ))),
    }
}
