//! Styling hints derived from node tags and variability counters.
//!
//! The renderer owns geometry; this module decides each node's category, sizes
//! and scale colours so every front-end draws the same thing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::UsageGraphError;
use crate::patterns::{matches_pattern, normalize_pattern, PatternSet};
use crate::types::{Node, NodeType};

/// Base radius of every node.
pub const BASE_RADIUS: u32 = 10;

/// How far below the smallest constructor-variant count the colour scale starts.
const COLOR_DOMAIN_PADDING: i64 = 3;

/// Upper end of the colour scale for nodes outside every coloured package.
pub const DEFAULT_UPPER_COLOR: Rgb = Rgb::new(0xFF, 0x00, 0x00);

/// Lower end of every colour scale.
pub const SCALE_LOW_COLOR: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

/// An sRGB colour, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear blend, `t = 0` giving `self` and `t = 1` giving `other`.
    pub fn interpolate(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Perceived luminance in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)) / 255.0
    }

    /// Black on bright colours, white on dark ones.
    pub fn contrast(self) -> Rgb {
        if self.luminance() > 0.5 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = UsageGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UsageGraphError::InvalidColor {
            value: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = UsageGraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// A package pattern and the colour its classes are drawn towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageColor {
    pub pattern: String,
    pub color: Rgb,
}

/// User-assigned package colours, checked in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageColors {
    entries: Vec<PackageColor>,
}

impl PackageColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `color` to `pattern`, replacing an earlier colour for the same
    /// pattern. Returns `false` if the pattern is empty after normalization.
    pub fn set(&mut self, pattern: &str, color: Rgb) -> bool {
        let pattern = normalize_pattern(pattern);
        if pattern.is_empty() {
            return false;
        }
        match self.entries.iter_mut().find(|e| e.pattern == pattern) {
            Some(entry) => entry.color = color,
            None => self.entries.push(PackageColor { pattern, color }),
        }
        true
    }

    /// Drops the colour of `pattern`. Returns `false` if it had none.
    pub fn remove(&mut self, pattern: &str) -> bool {
        let pattern = normalize_pattern(pattern);
        let before = self.entries.len();
        self.entries.retain(|e| e.pattern != pattern);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[PackageColor] {
        &self.entries
    }

    /// Upper scale colour for `name`: the first matching package's colour, or
    /// [`DEFAULT_UPPER_COLOR`].
    pub fn color_for(&self, name: &str) -> Rgb {
        self.entries
            .iter()
            .find(|e| matches_pattern(name, &e.pattern))
            .map_or(DEFAULT_UPPER_COLOR, |e| e.color)
    }
}

impl FromIterator<PackageColor> for PackageColors {
    fn from_iter<I: IntoIterator<Item = PackageColor>>(iter: I) -> Self {
        let mut colors = PackageColors::new();
        for entry in iter {
            colors.set(&entry.pattern, entry.color);
        }
        colors
    }
}

/// Fill category of a node, in decreasing precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillCategory {
    ApiRoot,
    Interface,
    /// Not a hotspot.
    Plain,
    /// Hotspot carrying variability; coloured on the constructor-variant scale.
    Variability,
    Neutral,
}

/// Rendering hints for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub name: String,
    pub radius: u32,
    pub dashed: bool,
    pub stroke_width: u32,
    pub fill: FillCategory,
    /// Drawn with the entry-point outline.
    pub entry_point: bool,
    /// Design-pattern initials, e.g. `"S, F"`.
    pub label: String,
    /// Top of this node's constructor-variant scale (its package colour).
    pub upper_color: Rgb,
    /// Position of the node on its scale, used for `Variability` fills.
    pub scale_color: Rgb,
    /// Label text colour, contrasting with the node.
    pub label_color: Rgb,
}

/// Linear domain of the constructor-variant colour scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDomain {
    pub min: i64,
    pub max: i64,
}

impl ColorDomain {
    /// Position of `value` on the scale, clamped to `0.0..=1.0`.
    pub fn position(&self, value: u32) -> f64 {
        if self.max <= self.min {
            return 1.0;
        }
        let t = (i64::from(value) - self.min) as f64 / (self.max - self.min) as f64;
        t.clamp(0.0, 1.0)
    }
}

/// The colour domain over the CLASS nodes, `None` if there are none.
pub fn color_domain(nodes: &[Node]) -> Option<ColorDomain> {
    let mut counts = nodes
        .iter()
        .filter(|n| n.has_type(&NodeType::Class))
        .map(|n| i64::from(n.constructor_variants));
    let first = counts.next()?;
    let (min, max) = counts.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some(ColorDomain {
        min: min - COLOR_DOMAIN_PADDING,
        max,
    })
}

/// Initials of the design patterns a node takes part in.
pub fn pattern_label(node: &Node) -> String {
    let mut letters = Vec::new();
    for (tag, letter) in [
        (NodeType::Strategy, "S"),
        (NodeType::Factory, "F"),
        (NodeType::Template, "T"),
        (NodeType::Decorator, "D"),
    ] {
        if node.has_type(&tag) {
            letters.push(letter);
        }
    }
    if node.has_type(&NodeType::CompositionStrategy) && !node.has_type(&NodeType::Strategy) {
        letters.push("S");
    }
    letters.join(", ")
}

fn fill_category(node: &Node) -> FillCategory {
    if node.has_type(&NodeType::ApiRoot) {
        FillCategory::ApiRoot
    } else if node.has_type(&NodeType::Interface) {
        FillCategory::Interface
    } else if !node.has_type(&NodeType::Hotspot) {
        FillCategory::Plain
    } else if [NodeType::MethodLevelVp, NodeType::Variant, NodeType::Vp]
        .iter()
        .any(|t| node.has_type(t))
    {
        FillCategory::Variability
    } else {
        FillCategory::Neutral
    }
}

/// Styling hints for `node`.
///
/// `domain` is the constructor-variant domain of the loaded graph; without one
/// every node sits at the top of its scale.
pub fn node_style(
    node: &Node,
    entry_points: &PatternSet,
    colors: &PackageColors,
    domain: Option<&ColorDomain>,
) -> NodeStyle {
    let is_abstract = node.has_type(&NodeType::Abstract);
    let upper_color = colors.color_for(&node.name);
    let position = domain.map_or(1.0, |d| d.position(node.constructor_variants));
    let scale_color = SCALE_LOW_COLOR.interpolate(upper_color, position);
    let label_color = if node.has_type(&NodeType::Interface) {
        Rgb::BLACK.contrast()
    } else {
        scale_color.contrast()
    };

    NodeStyle {
        name: node.name.clone(),
        radius: if node.has_type(&NodeType::Class) {
            BASE_RADIUS.saturating_add(node.method_vps)
        } else {
            BASE_RADIUS
        },
        dashed: is_abstract,
        stroke_width: node.class_variants.saturating_add(u32::from(is_abstract)),
        fill: fill_category(node),
        entry_point: entry_points.matches(&node.name),
        label: pattern_label(node),
        upper_color,
        scale_color,
        label_color,
    }
}
