//! # Page Payload
//!
//! GeoJSON and attribute tables the dashboard template embeds in the global
//! `geojsons` and `tables` objects.

use district_map_domain::{AttributeTables, LayerId, MapError, Result};
use geojson::FeatureCollection;
use wasm_bindgen::JsValue;

use super::interop::{from_js, get, global};

/// Everything the panel needs before the map can be created
#[derive(Debug, Clone)]
pub struct PagePayload {
    pub zone: FeatureCollection,
    pub district: Option<FeatureCollection>,
    pub tables: AttributeTables,
}

fn collection(geojsons: &JsValue, id: LayerId) -> Result<Option<FeatureCollection>> {
    get(geojsons, id.as_str())
        .map(|value| from_js::<FeatureCollection>(&value))
        .transpose()
}

/// Read the embedded payload. Without a zone there is no map.
pub fn read_payload() -> Result<PagePayload> {
    let geojsons = global("geojsons").ok_or(MapError::MissingZone)?;
    let zone = collection(&geojsons, LayerId::Zone)?.ok_or(MapError::MissingZone)?;
    let district = collection(&geojsons, LayerId::District)?;

    let tables = match global("tables") {
        Some(value) => AttributeTables::from_value(from_js(&value)?)?,
        None => AttributeTables::default(),
    };

    Ok(PagePayload {
        zone,
        district,
        tables,
    })
}
