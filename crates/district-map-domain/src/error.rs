//! Map panel error types.

use thiserror::Error;

use crate::layer::LayerId;

/// Errors raised while preparing or updating the map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The page payload carries no zone collection, so no map is built
    #[error("Zone geometry missing from page payload")]
    MissingZone,

    /// Neither a `bbox` member nor any coordinates to derive one from
    #[error("Cannot determine bounding box for layer '{0}'")]
    MissingBoundingBox(LayerId),

    /// Layer id outside the known catalogue
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    /// Page payload with an unexpected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// GeoJSON payload that failed to decode
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON payload that failed to decode
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote layer request failed
    #[error("Fetching layer '{layer}' failed: {message}")]
    Fetch { layer: LayerId, message: String },

    /// Failure reported by the browser or the rendering engine
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Result type for map operations.
pub type Result<T> = std::result::Result<T, MapError>;
