//! # Camera
//!
//! View state, bounding boxes and the Web-Mercator camera fit used to frame
//! the zone on load and on recenter.

use std::f64::consts::PI;

use geo::BoundingRect;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::layer::LayerId;
use crate::measure::to_geo;

/// Padding in pixels kept around the zone when fitting the camera.
pub const FIT_PADDING_PX: f64 = 10.0;

/// Duration of animated camera moves.
pub const TRANSITION_MS: u32 = 300;

/// Camera pitch while buildings are extruded.
pub const EXTRUDED_PITCH_DEG: f64 = 45.0;

/// Highest zoom the basemap styles serve.
pub const MAX_ZOOM: f64 = 22.0;

const TILE_SIZE: f64 = 512.0;

/// Camera state exchanged with the rendering engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<u32>,
}

impl ViewState {
    /// Flat, north-up view centred on a point
    pub fn centered(latitude: f64, longitude: f64, zoom: f64) -> Self {
        Self {
            latitude,
            longitude,
            zoom,
            bearing: 0.0,
            pitch: 0.0,
            transition_duration: None,
        }
    }

    #[must_use]
    pub fn with_transition(mut self, millis: u32) -> Self {
        self.transition_duration = Some(millis);
        self
    }

    /// Same orientation, moved to a camera target
    #[must_use]
    pub fn looking_at(mut self, target: CameraTarget) -> Self {
        self.latitude = target.latitude;
        self.longitude = target.longitude;
        self.zoom = target.zoom;
        self
    }
}

/// Geographic extent in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Read a GeoJSON `bbox` member, 2D or 3D.
    pub fn from_geojson_bbox(bbox: &[f64]) -> Option<Self> {
        match *bbox {
            [min_lon, min_lat, max_lon, max_lat] => {
                Some(Self::new(min_lon, min_lat, max_lon, max_lat))
            }
            [min_lon, min_lat, _, max_lon, max_lat, _] => {
                Some(Self::new(min_lon, min_lat, max_lon, max_lat))
            }
            _ => None,
        }
    }

    /// Extent of a collection: its `bbox` member when present, otherwise the
    /// union of its features' geometry.
    pub fn of_collection(layer: LayerId, collection: &FeatureCollection) -> Result<Self> {
        if let Some(bbox) = collection.bbox.as_deref().and_then(Self::from_geojson_bbox) {
            return Ok(bbox);
        }

        let mut extent: Option<Self> = None;
        for feature in &collection.features {
            let Some(geometry) = feature.geometry.as_ref() else {
                continue;
            };
            let Some(rect) = to_geo(geometry)?.bounding_rect() else {
                continue;
            };
            let rect = Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
            extent = Some(match extent {
                Some(current) => current.union(&rect),
                None => rect,
            });
        }

        extent.ok_or(MapError::MissingBoundingBox(layer))
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.min_lon.min(other.min_lon),
            self.min_lat.min(other.min_lat),
            self.max_lon.max(other.max_lon),
            self.max_lat.max(other.max_lat),
        )
    }

    /// Arithmetic centre as `(latitude, longitude)`
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn to_geojson_bbox(&self) -> Vec<f64> {
        vec![self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

/// Size of the map container in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Centre and zoom that frame a bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-85.051_129, 85.051_129);
    (180.0 - (180.0 / PI) * (PI / 4.0 + lat * PI / 360.0).tan().ln()) / 360.0
}

fn inverse_mercator_y(y: f64) -> f64 {
    let y2 = 180.0 - y * 360.0;
    360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0
}

/// Fit a bounding box inside the viewport with `padding` pixels on each side.
///
/// The centre is the Mercator midpoint of the box, not the arithmetic one, so
/// tall boxes at high latitudes stay visually centred.
pub fn camera_for_bounds(bbox: &BoundingBox, viewport: Viewport, padding: f64) -> CameraTarget {
    let x1 = mercator_x(bbox.min_lon);
    let x2 = mercator_x(bbox.max_lon);
    let y1 = mercator_y(bbox.max_lat);
    let y2 = mercator_y(bbox.min_lat);

    let center_x = (x1 + x2) / 2.0;
    let center_y = (y1 + y2) / 2.0;

    let usable_width = viewport.width - 2.0 * padding;
    let usable_height = viewport.height - 2.0 * padding;

    let zoom = if usable_width <= 0.0 || usable_height <= 0.0 {
        0.0
    } else {
        let scale_x = usable_width / ((x2 - x1).abs() * TILE_SIZE);
        let scale_y = usable_height / ((y2 - y1).abs() * TILE_SIZE);
        let scale = scale_x.min(scale_y);
        if scale.is_finite() {
            scale.log2().clamp(0.0, MAX_ZOOM)
        } else {
            MAX_ZOOM
        }
    };

    CameraTarget {
        latitude: inverse_mercator_y(center_y),
        longitude: center_x * 360.0 - 180.0,
        zoom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Viewport {
        Viewport {
            width: size,
            height: size,
        }
    }

    #[test]
    fn test_bbox_from_geojson_member() {
        let bbox = BoundingBox::from_geojson_bbox(&[8.0, 47.0, 9.0, 48.0]).unwrap();
        assert_eq!(bbox.center(), (47.5, 8.5));

        let bbox3d = BoundingBox::from_geojson_bbox(&[8.0, 47.0, 0.0, 9.0, 48.0, 30.0]).unwrap();
        assert_eq!(bbox3d, bbox);

        assert!(BoundingBox::from_geojson_bbox(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_bbox_computed_from_features() {
        let collection: FeatureCollection = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": { "type": "Point", "coordinates": [8.5, 47.3] }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[8.4, 47.4], [8.6, 47.2]]
                    }
                }
            ]
        }))
        .unwrap();

        let bbox = BoundingBox::of_collection(LayerId::Zone, &collection).unwrap();
        assert_eq!(bbox, BoundingBox::new(8.4, 47.2, 8.6, 47.4));
    }

    #[test]
    fn test_empty_collection_has_no_bbox() {
        let collection = FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        };
        assert!(matches!(
            BoundingBox::of_collection(LayerId::District, &collection),
            Err(MapError::MissingBoundingBox(LayerId::District))
        ));
    }

    #[test]
    fn test_world_fits_at_zoom_zero() {
        let world = BoundingBox::new(-180.0, -85.051_129, 180.0, 85.051_129);
        let camera = camera_for_bounds(&world, square(512.0 + 2.0 * FIT_PADDING_PX), FIT_PADDING_PX);

        assert!(camera.zoom.abs() < 1e-6);
        assert!(camera.latitude.abs() < 1e-6);
        assert!(camera.longitude.abs() < 1e-6);
    }

    #[test]
    fn test_doubling_viewport_adds_one_zoom_level() {
        let bbox = BoundingBox::new(8.50, 47.37, 8.52, 47.38);
        let small = camera_for_bounds(&bbox, square(400.0), 0.0);
        let large = camera_for_bounds(&bbox, square(800.0), 0.0);

        assert!((large.zoom - small.zoom - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fitted_box_stays_inside_padding() {
        let bbox = BoundingBox::new(8.50, 47.37, 8.52, 47.38);
        let viewport = Viewport {
            width: 800.0,
            height: 600.0,
        };
        let camera = camera_for_bounds(&bbox, viewport, FIT_PADDING_PX);

        let world = TILE_SIZE * camera.zoom.exp2();
        let width_px = (mercator_x(bbox.max_lon) - mercator_x(bbox.min_lon)) * world;
        let height_px = (mercator_y(bbox.min_lat) - mercator_y(bbox.max_lat)) * world;

        assert!(width_px <= viewport.width - 2.0 * FIT_PADDING_PX + 1e-6);
        assert!(height_px <= viewport.height - 2.0 * FIT_PADDING_PX + 1e-6);
        assert!((camera.longitude - 8.51).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        let point = BoundingBox::new(8.5, 47.3, 8.5, 47.3);
        assert_eq!(camera_for_bounds(&point, square(500.0), 10.0).zoom, MAX_ZOOM);

        let bbox = BoundingBox::new(8.50, 47.37, 8.52, 47.38);
        assert_eq!(camera_for_bounds(&bbox, square(10.0), 10.0).zoom, 0.0);
    }

    #[test]
    fn test_view_state_wire_format() {
        let view = ViewState::centered(47.0, 8.0, 3.0).with_transition(TRANSITION_MS);
        let json = serde_json::to_value(view).unwrap();

        assert_eq!(json["transitionDuration"], 300);
        assert_eq!(json["pitch"], 0.0);
    }
}
