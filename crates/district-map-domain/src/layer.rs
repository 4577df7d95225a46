//! # Map Layers
//!
//! Layer catalogue, the GeoJSON store and the z-ordered layer set handed to
//! the rendering engine.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::style::{
    DC_NETWORK_LINE, DH_NETWORK_LINE, DISTRICT_FILL, HOVER_HIGHLIGHT, Rgba, STREETS_LINE,
    ZONE_FILL,
};

/// Feature property holding the building height above ground.
pub const HEIGHT_PROPERTY: &str = "height_ag";

/// Feature property holding the building name.
pub const NAME_PROPERTY: &str = "Name";

/// Feature property holding the network node role.
pub const NODE_TYPE_PROPERTY: &str = "Type";

// =============================================================================
// CATALOGUE
// =============================================================================

/// Every layer the panel knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    Streets,
    DhNetworks,
    DcNetworks,
    Zone,
    District,
}

/// Broad family of a layer, which decides styling and click behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Streets,
    Network,
    Building,
}

/// Where a layer's GeoJSON comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSource {
    /// Shipped with the page in the global `geojsons` object
    PageGlobal,
    /// Fetched from a dashboard-relative endpoint
    Remote(&'static str),
}

impl LayerId {
    /// Bottom-to-top draw order. Slot positions never change.
    pub const DRAW_ORDER: [Self; 5] = [
        Self::Streets,
        Self::DhNetworks,
        Self::DcNetworks,
        Self::Zone,
        Self::District,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Streets => "streets",
            Self::DhNetworks => "dh_networks",
            Self::DcNetworks => "dc_networks",
            Self::Zone => "zone",
            Self::District => "district",
        }
    }

    pub fn z_index(&self) -> usize {
        match self {
            Self::Streets => 0,
            Self::DhNetworks => 1,
            Self::DcNetworks => 2,
            Self::Zone => 3,
            Self::District => 4,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Streets => LayerKind::Streets,
            Self::DhNetworks | Self::DcNetworks => LayerKind::Network,
            Self::Zone | Self::District => LayerKind::Building,
        }
    }

    pub fn source(&self) -> LayerSource {
        match self {
            Self::Streets => LayerSource::Remote("/inputs/geojson/others/streets"),
            Self::DhNetworks => LayerSource::Remote("/inputs/geojson/networks/DH"),
            Self::DcNetworks => LayerSource::Remote("/inputs/geojson/networks/DC"),
            Self::Zone | Self::District => LayerSource::PageGlobal,
        }
    }

    /// Layers fetched after the map is created
    pub fn remote() -> impl Iterator<Item = (Self, &'static str)> {
        Self::DRAW_ORDER.into_iter().filter_map(|id| match id.source() {
            LayerSource::Remote(url) => Some((id, url)),
            LayerSource::PageGlobal => None,
        })
    }

    pub fn is_building(&self) -> bool {
        self.kind() == LayerKind::Building
    }

    /// DOM id of the checkbox container
    pub fn checkbox_id(&self) -> String {
        format!("{}-cb", self.as_str())
    }

    /// DOM id of the checkbox input
    pub fn toggle_id(&self) -> String {
        format!("{}-toggle", self.as_str())
    }

    /// Checkbox label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Streets => "Streets",
            Self::DhNetworks => "District heating network",
            Self::DcNetworks => "District cooling network",
            Self::Zone => "Zone",
            Self::District => "District",
        }
    }

    /// Human title, e.g. `Zone` for the panel header
    pub fn title(&self) -> String {
        let id = self.as_str();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerId {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DRAW_ORDER
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| MapError::UnknownLayer(s.to_string()))
    }
}

// =============================================================================
// GEOJSON STORE
// =============================================================================

/// Most recent GeoJSON payload per layer
#[derive(Debug, Clone, Default)]
pub struct GeoJsonStore {
    collections: HashMap<LayerId, FeatureCollection>,
}

impl GeoJsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload, replacing any earlier one for the same layer.
    pub fn insert(&mut self, id: LayerId, collection: FeatureCollection) {
        self.collections.insert(id, collection);
    }

    pub fn get(&self, id: LayerId) -> Option<&FeatureCollection> {
        self.collections.get(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.collections.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

// =============================================================================
// LAYER PROPERTIES
// =============================================================================

/// Per-feature fill colour rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FillRule {
    Constant { color: Rgba },
    /// Layer colour, except the selected building
    BuildingName { base: Rgba },
    /// Colour by network node `Type`
    NodeType,
}

/// What a click on a picked feature does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    /// Open the building-properties panel
    ShowProperties,
    /// Open the row editor of the attribute table
    EditProperties,
}

/// Session values the layer factories depend on
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerContext<'a> {
    pub extruded: bool,
    pub selected_building: Option<&'a str>,
}

/// Overrides applied on top of a layer's defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerOptions {
    pub visible: Option<bool>,
}

impl LayerOptions {
    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
        }
    }
}

/// Render configuration of one layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProps {
    pub id: LayerId,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    pub extruded: bool,
    pub wireframe: bool,
    pub filled: bool,
    pub stroked: bool,
    #[serde(rename = "getLineColor", skip_serializing_if = "Option::is_none")]
    pub line_color: Option<Rgba>,
    #[serde(rename = "getLineWidth", skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    #[serde(rename = "getRadius", skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f32>,
    #[serde(skip)]
    pub fill: Option<FillRule>,
    #[serde(skip)]
    pub elevation_property: Option<&'static str>,
    pub pickable: bool,
    pub auto_highlight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<Rgba>,
    #[serde(skip)]
    pub click: Option<ClickAction>,
    /// Changes whenever per-feature colours must be re-evaluated
    #[serde(skip)]
    pub update_trigger: Option<String>,
    /// Placeholder slots carry no data yet
    #[serde(skip)]
    pub placeholder: bool,
}

impl LayerProps {
    /// Empty slot that only reserves the layer's z position
    pub fn placeholder(id: LayerId) -> Self {
        Self {
            id,
            visible: true,
            opacity: None,
            extruded: false,
            wireframe: false,
            filled: true,
            stroked: true,
            line_color: None,
            line_width: None,
            point_radius: None,
            fill: None,
            elevation_property: None,
            pickable: false,
            auto_highlight: false,
            highlight_color: None,
            click: None,
            update_trigger: None,
            placeholder: true,
        }
    }

    /// Rebuild a layer's configuration from scratch.
    pub fn build(id: LayerId, ctx: &LayerContext<'_>, options: &LayerOptions) -> Self {
        let mut props = match id {
            LayerId::Zone => Self::building(id, ZONE_FILL, ctx),
            LayerId::District => Self::building(id, DISTRICT_FILL, ctx),
            LayerId::Streets => Self::streets(),
            LayerId::DhNetworks => Self::network(id, DH_NETWORK_LINE),
            LayerId::DcNetworks => Self::network(id, DC_NETWORK_LINE),
        };
        if let Some(visible) = options.visible {
            props.visible = visible;
        }
        props
    }

    fn building(id: LayerId, base: Rgba, ctx: &LayerContext<'_>) -> Self {
        Self {
            opacity: Some(0.5),
            extruded: ctx.extruded,
            wireframe: true,
            filled: true,
            fill: Some(FillRule::BuildingName { base }),
            elevation_property: Some(HEIGHT_PROPERTY),
            pickable: true,
            auto_highlight: true,
            highlight_color: Some(HOVER_HIGHLIGHT),
            click: Some(ClickAction::ShowProperties),
            update_trigger: Some(ctx.selected_building.unwrap_or_default().to_string()),
            placeholder: false,
            ..Self::placeholder(id)
        }
    }

    fn streets() -> Self {
        Self {
            line_color: Some(STREETS_LINE),
            line_width: Some(3.0),
            pickable: true,
            auto_highlight: true,
            click: Some(ClickAction::EditProperties),
            placeholder: false,
            ..Self::placeholder(LayerId::Streets)
        }
    }

    fn network(id: LayerId, line: Rgba) -> Self {
        Self {
            stroked: false,
            filled: true,
            line_color: Some(line),
            fill: Some(FillRule::NodeType),
            line_width: Some(3.0),
            point_radius: Some(3.0),
            pickable: true,
            auto_highlight: true,
            click: Some(ClickAction::EditProperties),
            placeholder: false,
            ..Self::placeholder(id)
        }
    }
}

// =============================================================================
// LAYER SET
// =============================================================================

/// Ordered layer configurations; one fixed slot per [`LayerId`]
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSet {
    slots: [LayerProps; 5],
}

impl LayerSet {
    pub fn new() -> Self {
        Self {
            slots: LayerId::DRAW_ORDER.map(LayerProps::placeholder),
        }
    }

    /// Replace the slot of `props.id`, leaving every other slot untouched.
    pub fn upsert(&mut self, props: LayerProps) {
        let index = props.id.z_index();
        self.slots[index] = props;
    }

    pub fn get(&self, id: LayerId) -> &LayerProps {
        &self.slots[id.z_index()]
    }

    /// Slots in draw order, placeholders included
    pub fn ordered(&self) -> impl Iterator<Item = &LayerProps> {
        self.slots.iter()
    }

    pub fn ids(&self) -> Vec<LayerId> {
        self.slots.iter().map(|props| props.id).collect()
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::new()
    }
}
