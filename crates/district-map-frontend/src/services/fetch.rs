//! # GeoJSON Client
//!
//! Fetches the layers the dashboard serves separately from the page.

use district_map_domain::{LayerId, MapError, Result};
use geojson::FeatureCollection;
use gloo_net::http::Request;

use crate::config::MapConfig;

/// GET a layer's FeatureCollection from its dashboard endpoint.
pub async fn fetch_layer(config: &MapConfig, layer: LayerId) -> Result<FeatureCollection> {
    let fail = |message: String| MapError::Fetch { layer, message };

    let url = config
        .layer_url(layer)
        .ok_or_else(|| fail("layer is not served remotely".to_string()))?;

    let response = Request::get(&url)
        .header("Accept", "application/geo+json, application/json")
        .send()
        .await
        .map_err(|e| fail(e.to_string()))?;

    if !response.ok() {
        return Err(fail(format!(
            "{} {}",
            response.status(),
            response.status_text()
        )));
    }

    response
        .json::<FeatureCollection>()
        .await
        .map_err(|e| fail(e.to_string()))
}
