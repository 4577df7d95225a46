//! # Panel Configuration
//!
//! Defaults for the map panel, optionally overridden by a `mapConfig` object
//! the host page defines before the panel loads.

use district_map_domain::{LayerId, LayerSource};
use serde::Deserialize;

use crate::services::interop::{from_js, global};

/// Map panel configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// DOM id of the element the engine renders into
    pub container_id: String,

    /// Prefix prepended to the dashboard-relative layer endpoints
    pub api_base: String,

    /// jQuery selector of the attribute table widget
    pub table_selector: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "mapid".to_string(),
            api_base: String::new(),
            table_selector: "#cea-table".to_string(),
        }
    }
}

impl MapConfig {
    /// Load the page overrides, falling back to defaults.
    pub fn from_page() -> Self {
        let Some(value) = global("mapConfig") else {
            return Self::default();
        };
        from_js(&value).unwrap_or_else(|err| {
            log::warn!("Ignoring invalid mapConfig: {err}");
            Self::default()
        })
    }

    /// Endpoint of a remotely loaded layer
    pub fn layer_url(&self, id: LayerId) -> Option<String> {
        match id.source() {
            LayerSource::Remote(path) => {
                Some(format!("{}{}", self.api_base.trim_end_matches('/'), path))
            }
            LayerSource::PageGlobal => None,
        }
    }
}
