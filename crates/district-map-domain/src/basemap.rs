//! Raster basemap themes.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Basemap theme shown under the data layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basemap {
    #[default]
    Light,
    Dark,
}

impl Basemap {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn source_id(self) -> &'static str {
        match self {
            Self::Light => "osm-tiles",
            Self::Dark => "carto-tiles",
        }
    }

    fn tiles(self) -> [&'static str; 3] {
        match self {
            Self::Light => [
                "http://a.tile.openstreetmap.org/{z}/{x}/{y}.png",
                "http://b.tile.openstreetmap.org/{z}/{x}/{y}.png",
                "http://c.tile.openstreetmap.org/{z}/{x}/{y}.png",
            ],
            Self::Dark => [
                "https://cartodb-basemaps-a.global.ssl.fastly.net/dark_all/{z}/{x}/{y}.png",
                "https://cartodb-basemaps-b.global.ssl.fastly.net/dark_all/{z}/{x}/{y}.png",
                "https://cartodb-basemaps-c.global.ssl.fastly.net/dark_all/{z}/{x}/{y}.png",
            ],
        }
    }

    fn attribution(self) -> &'static str {
        match self {
            Self::Light => "Map data © OpenStreetMap contributors",
            Self::Dark => {
                "Map tiles by Carto, under CC BY 3.0. Data by OpenStreetMap, under ODbL."
            }
        }
    }

    /// Version-8 style document with a single raster source
    pub fn style(self) -> Value {
        let source = self.source_id();
        json!({
            "version": 8,
            "sources": {
                source: {
                    "type": "raster",
                    "tiles": self.tiles(),
                    "tileSize": 256,
                    "attribution": self.attribution(),
                }
            },
            "layers": [{
                "id": source,
                "type": "raster",
                "source": source,
                "minzoom": 0,
                "maxzoom": 22,
            }]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_theme() {
        assert_eq!(Basemap::default(), Basemap::Light);
        assert_eq!(Basemap::Light.toggled(), Basemap::Dark);
        assert_eq!(Basemap::Dark.toggled().toggled(), Basemap::Dark);
    }

    #[test]
    fn test_dark_style_document() {
        let style = Basemap::Dark.style();
        assert_eq!(style["version"], 8);
        assert_eq!(style["layers"][0]["source"], "carto-tiles");
        assert_eq!(style["sources"]["carto-tiles"]["tileSize"], 256);
        assert!(
            style["sources"]["carto-tiles"]["tiles"][0]
                .as_str()
                .unwrap()
                .contains("dark_all")
        );
    }
}
