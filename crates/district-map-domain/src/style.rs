//! Colour rules for building and network features.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// RGBA colour in the engine's `[r, g, b, a]` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(color: Rgba) -> Self {
        color.to_array()
    }
}

// =============================================================================
// PALETTE
// =============================================================================

pub const ZONE_FILL: Rgba = Rgba::rgb(0, 0, 255);
pub const DISTRICT_FILL: Rgba = Rgba::rgb(255, 0, 0);
pub const SELECTED_BUILDING: Rgba = Rgba::rgba(255, 255, 0, 255);
pub const HOVER_HIGHLIGHT: Rgba = Rgba::rgba(255, 255, 0, 128);

pub const STREETS_LINE: Rgba = Rgba::rgb(255, 0, 0);
pub const DH_NETWORK_LINE: Rgba = Rgba::rgb(0, 255, 0);
pub const DC_NETWORK_LINE: Rgba = Rgba::rgb(0, 255, 244);

/// Fill for a building footprint: the selected building is highlighted in
/// every layer that contains it, everything else keeps the layer colour.
#[must_use]
pub fn building_color(base: Rgba, name: Option<&str>, selected: Option<&str>) -> Rgba {
    match (name, selected) {
        (Some(name), Some(selected)) if name == selected => SELECTED_BUILDING,
        _ => base,
    }
}

/// Thermal network node role, taken from the node's `Type` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    None,
    Consumer,
    Plant,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Consumer => "CONSUMER",
            Self::Plant => "PLANT",
        }
    }

    pub fn fill(&self) -> Rgba {
        match self {
            Self::None => Rgba::rgb(100, 100, 100),
            Self::Consumer => Rgba::rgb(255, 255, 255),
            Self::Plant => Rgba::rgb(0, 0, 0),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "CONSUMER" => Ok(Self::Consumer),
            "PLANT" => Ok(Self::Plant),
            other => Err(format!("unknown node type '{other}'")),
        }
    }
}

/// Fill for a network feature. Edges and unknown node types return `None`
/// and are left to the engine's default.
#[must_use]
pub fn node_fill_color(node_type: Option<&str>) -> Option<Rgba> {
    node_type
        .and_then(|t| t.parse::<NodeType>().ok())
        .map(|t| t.fill())
}
