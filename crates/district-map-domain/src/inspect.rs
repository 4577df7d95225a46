//! # Feature Inspection
//!
//! Hover tooltips, the building-properties panel and row-edit requests for
//! picked features.

use geojson::Feature;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MapError, Result};
use crate::layer::{HEIGHT_PROPERTY, LayerId, LayerKind, NAME_PROPERTY};
use crate::measure::{area_m2, length_m, round3};

/// Network features carrying this property are nodes, not pipes.
pub const NODE_BUILDING_PROPERTY: &str = "Building";

/// Name of a building feature
pub fn feature_name(feature: &Feature) -> Option<&str> {
    feature.property(NAME_PROPERTY).and_then(Value::as_str)
}

/// Property value the way the dashboard prints it: strings bare, numbers
/// without a trailing `.0`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => f.to_string(),
            (None, None) => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn property_rows(properties: Option<&Map<String, Value>>) -> Vec<(String, String)> {
    properties
        .map(|props| {
            props
                .iter()
                .map(|(key, value)| (key.clone(), display_value(value)))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// TOOLTIP
// =============================================================================

/// Unit of a derived measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    Metres,
    SquareMetres,
    CubicMetres,
}

impl Unit {
    /// Unit symbol without the exponent
    pub fn symbol(&self) -> &'static str {
        "m"
    }

    /// Superscript exponent, if any
    pub fn exponent(&self) -> Option<&'static str> {
        match self {
            Self::Metres => None,
            Self::SquareMetres => Some("2"),
            Self::CubicMetres => Some("3"),
        }
    }
}

/// Quantity derived from a feature's geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub label: &'static str,
    pub value: f64,
    pub unit: Unit,
}

/// Content and position of the hover tooltip
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tooltip {
    pub x: f64,
    pub y: f64,
    pub rows: Vec<(String, String)>,
    pub measures: Vec<Measure>,
}

impl Tooltip {
    /// Tooltip shown while nothing is under the cursor
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.measures.is_empty()
    }

    /// Properties of the hovered feature plus the measurements its layer
    /// warrants: area and volume for buildings, length for network pipes.
    pub fn for_feature(layer: LayerId, feature: &Feature, x: f64, y: f64) -> Result<Self> {
        let mut tooltip = Self {
            x,
            y,
            rows: property_rows(feature.properties.as_ref()),
            measures: Vec::new(),
        };

        let Some(geometry) = feature.geometry.as_ref() else {
            return Ok(tooltip);
        };

        match layer.kind() {
            LayerKind::Building => {
                let area = area_m2(geometry)?;
                tooltip.measures.push(Measure {
                    label: "area",
                    value: round3(area),
                    unit: Unit::SquareMetres,
                });
                if let Some(height) = feature.property(HEIGHT_PROPERTY).and_then(Value::as_f64) {
                    tooltip.measures.push(Measure {
                        label: "volume",
                        value: round3(area * height),
                        unit: Unit::CubicMetres,
                    });
                }
            }
            LayerKind::Network if !feature.contains_property(NODE_BUILDING_PROPERTY) => {
                tooltip.measures.push(Measure {
                    label: "length",
                    value: round3(length_m(geometry)?),
                    unit: Unit::Metres,
                });
            }
            LayerKind::Network | LayerKind::Streets => {}
        }

        Ok(tooltip)
    }
}

// =============================================================================
// ATTRIBUTE TABLES
// =============================================================================

/// Per-table building attributes: `table -> building name -> column -> value`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeTables {
    tables: Map<String, Value>,
}

impl AttributeTables {
    pub fn new(tables: Map<String, Value>) -> Self {
        Self { tables }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(tables) => Ok(Self::new(tables)),
            Value::Null => Ok(Self::default()),
            other => Err(MapError::InvalidPayload(format!(
                "attribute tables must be an object, got {other}"
            ))),
        }
    }

    /// Row of `building` in `table`
    pub fn row(&self, table: &str, building: &str) -> Option<&Map<String, Value>> {
        self.tables
            .get(table)
            .and_then(|rows| rows.get(building))
            .and_then(Value::as_object)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// One titled block of the building-properties panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySection {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

/// Content of the building-properties panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingProperties {
    pub building: String,
    pub sections: Vec<PropertySection>,
}

impl BuildingProperties {
    /// The clicked layer's own row first, then every other table that knows
    /// the building, in table order.
    pub fn build(layer: LayerId, building: &str, tables: &AttributeTables) -> Self {
        let mut sections = vec![PropertySection {
            title: format!("{} building", layer.title()),
            rows: property_rows(tables.row(layer.as_str(), building)),
        }];

        sections.extend(
            tables
                .table_names()
                .filter(|name| *name != layer.as_str())
                .filter_map(|name| {
                    tables.row(name, building).map(|row| PropertySection {
                        title: format!("{name}:"),
                        rows: property_rows(Some(row)),
                    })
                }),
        );

        Self {
            building: building.to_string(),
            sections,
        }
    }

    pub fn header(&self) -> String {
        format!("Building Properties: {}", self.building)
    }
}

// =============================================================================
// ROW EDITING
// =============================================================================

/// Request for the attribute-table widget to open a row editor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditRequest {
    pub layer: LayerId,
    pub key_field: String,
    pub key: Value,
}

impl EditRequest {
    /// Primary key of a picked street or network feature, looked up by the
    /// table widget's unique-id column.
    pub fn for_feature(layer: LayerId, feature: &Feature, key_field: &str) -> Option<Self> {
        feature
            .property(key_field)
            .filter(|value| !value.is_null())
            .map(|key| Self {
                layer,
                key_field: key_field.to_string(),
                key: key.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    fn building(name: &str, height: f64) -> Feature {
        let side = 100.0 / 111_195.08;
        feature(json!({
            "type": "Feature",
            "properties": { "Name": name, "height_ag": height, "floors_ag": 3 },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [side, 0.0], [side, side], [0.0, side], [0.0, 0.0]]]
            }
        }))
    }

    #[test]
    fn test_building_tooltip_has_area_and_volume() {
        let tooltip = Tooltip::for_feature(LayerId::Zone, &building("B1001", 12.0), 5.0, 7.0).unwrap();

        assert_eq!(tooltip.x, 5.0);
        assert_eq!(tooltip.y, 7.0);
        assert_eq!(
            tooltip.rows,
            vec![
                ("Name".to_string(), "B1001".to_string()),
                ("height_ag".to_string(), "12".to_string()),
                ("floors_ag".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(tooltip.measures.len(), 2);
        assert_eq!(tooltip.measures[0].label, "area");
        assert_eq!(tooltip.measures[1].label, "volume");
        let expected = round3(tooltip.measures[0].value * 12.0);
        assert!((tooltip.measures[1].value - expected).abs() < 0.05);
    }

    #[test]
    fn test_network_edge_tooltip_has_length() {
        let edge = feature(json!({
            "type": "Feature",
            "properties": { "Name": "PIPE0", "Type_mat": "T1" },
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [0.001, 0.0]] }
        }));

        let tooltip = Tooltip::for_feature(LayerId::DhNetworks, &edge, 0.0, 0.0).unwrap();
        assert_eq!(tooltip.measures.len(), 1);
        assert_eq!(tooltip.measures[0].label, "length");
        assert!((tooltip.measures[0].value - 111.195).abs() < 0.01);
    }

    #[test]
    fn test_network_node_tooltip_has_no_length() {
        let node = feature(json!({
            "type": "Feature",
            "properties": { "Name": "NODE1", "Building": "B1001", "Type": "CONSUMER" },
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
        }));

        let tooltip = Tooltip::for_feature(LayerId::DcNetworks, &node, 0.0, 0.0).unwrap();
        assert!(tooltip.measures.is_empty());
        assert_eq!(tooltip.rows.len(), 3);
    }

    #[test]
    fn test_streets_tooltip_only_lists_properties() {
        let street = feature(json!({
            "type": "Feature",
            "properties": { "highway": "residential" },
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [0.001, 0.0]] }
        }));

        let tooltip = Tooltip::for_feature(LayerId::Streets, &street, 0.0, 0.0).unwrap();
        assert!(tooltip.measures.is_empty());
        assert!(!tooltip.is_empty());
        assert!(Tooltip::empty().is_empty());
    }

    fn tables() -> AttributeTables {
        AttributeTables::from_value(json!({
            "zone": { "B1001": { "floors_ag": 3, "height_ag": 12.0 } },
            "district": { "B2001": { "floors_ag": 5 } },
            "occupancy": { "B1001": { "MULTI_RES": 1.0 }, "B2001": { "OFFICE": 1.0 } },
            "age": { "B1001": { "built": 1984 } }
        }))
        .unwrap()
    }

    #[test]
    fn test_building_properties_sections() {
        let panel = BuildingProperties::build(LayerId::Zone, "B1001", &tables());

        assert_eq!(panel.header(), "Building Properties: B1001");
        let titles: Vec<_> = panel.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Zone building", "occupancy:", "age:"]);
        assert_eq!(
            panel.sections[0].rows,
            vec![
                ("floors_ag".to_string(), "3".to_string()),
                ("height_ag".to_string(), "12".to_string()),
            ]
        );
        assert_eq!(panel.sections[2].rows, vec![("built".to_string(), "1984".to_string())]);
    }

    #[test]
    fn test_building_missing_from_own_table() {
        let panel = BuildingProperties::build(LayerId::District, "B1001", &tables());

        assert_eq!(panel.sections[0].title, "District building");
        assert!(panel.sections[0].rows.is_empty());
        let titles: Vec<_> = panel.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["District building", "zone:", "occupancy:", "age:"]);
    }

    #[test]
    fn test_tables_must_be_object() {
        assert!(AttributeTables::from_value(json!([1, 2])).is_err());
        assert_eq!(AttributeTables::from_value(Value::Null).unwrap(), AttributeTables::default());
    }

    #[test]
    fn test_edit_request_uses_unique_id_field() {
        let pipe = feature(json!({
            "type": "Feature",
            "properties": { "Name": "PIPE3", "pipe_id": 42 },
            "geometry": null
        }));

        let request = EditRequest::for_feature(LayerId::DhNetworks, &pipe, "pipe_id").unwrap();
        assert_eq!(request.key, json!(42));
        assert!(EditRequest::for_feature(LayerId::DhNetworks, &pipe, "missing").is_none());
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("text")), "text");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(null)), "null");
        assert_eq!(display_value(&json!(true)), "true");
    }
}
