//! # District Map Server
//!
//! Serves the scenario GeoJSON the map panel fetches after load, plus the
//! built frontend.
//!
//! ```text
//! GET /inputs/geojson/others/streets          inputs/networks/streets.geojson
//! GET /inputs/geojson/networks/{DH|DC}        inputs/networks/<type>/{edges,nodes}.geojson
//! GET /inputs/geojson/{zone|district}         inputs/building-geometry/<layer>.geojson
//! GET /health
//! GET /*                                      static frontend
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod scenario;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::get,
};
use district_map_domain::LayerId;
use geojson::FeatureCollection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use scenario::{NetworkType, Scenario};

/// Application state for Axum handlers
#[derive(Clone)]
pub struct AppState {
    pub scenario: Arc<Scenario>,
}

/// Streets of the scenario
pub async fn streets(State(state): State<AppState>) -> ApiResult<Json<FeatureCollection>> {
    state.scenario.streets().await.map(Json)
}

/// Edges and nodes of a thermal network
pub async fn network(
    State(state): State<AppState>,
    Path(network_type): Path<String>,
) -> ApiResult<Json<FeatureCollection>> {
    let network = network_type.parse::<NetworkType>()?;
    state.scenario.network(network).await.map(Json)
}

/// Zone or district building geometry
pub async fn buildings(
    State(state): State<AppState>,
    Path(layer): Path<String>,
) -> ApiResult<Json<FeatureCollection>> {
    let layer = layer
        .parse::<LayerId>()
        .map_err(|err| ApiError::NotFound(err.to_string()))?;
    state.scenario.buildings(layer).await.map(Json)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Build the Axum router
pub fn build_router(config: &Config) -> Router {
    let state = AppState {
        scenario: Arc::new(Scenario::new(&config.scenario_dir)),
    };

    Router::new()
        // Scenario GeoJSON
        .route("/inputs/geojson/others/streets", get(streets))
        .route("/inputs/geojson/networks/{network_type}", get(network))
        .route("/inputs/geojson/{layer}", get(buildings))
        // Health check
        .route("/health", get(health_check))
        // Frontend bundle
        .fallback_service(ServeDir::new(&config.static_dir))
        // State and middleware
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const STREETS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"Name":"street0","pk":7},"geometry":{"type":"LineString","coordinates":[[8.5,47.3],[8.51,47.31]]}}
    ]}"#;

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Config,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let scenario = dir.path().join("scenario");
        let networks = scenario.join("inputs/networks");
        std::fs::create_dir_all(networks.join("DH")).unwrap();
        std::fs::write(networks.join("streets.geojson"), STREETS).unwrap();
        std::fs::write(networks.join("DH/edges.geojson"), STREETS).unwrap();

        let static_dir = dir.path().join("dist");
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<html>map</html>").unwrap();

        let config = Config {
            static_dir,
            ..Config::for_scenario(scenario)
        };
        Fixture { _dir: dir, config }
    }

    async fn get(config: &Config, uri: &str) -> (StatusCode, String) {
        let response = build_router(config)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let fixture = fixture();
        let (status, body) = get(&fixture.config, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_streets() {
        let fixture = fixture();
        let (status, body) = get(&fixture.config, "/inputs/geojson/others/streets").await;
        assert_eq!(status, StatusCode::OK);

        let collection: FeatureCollection = tokio_test::assert_ok!(body.parse());
        assert_eq!(collection.features.len(), 1);
    }

    #[tokio::test]
    async fn test_network_routes() {
        let fixture = fixture();

        let (status, _) = get(&fixture.config, "/inputs/geojson/networks/DH").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&fixture.config, "/inputs/geojson/networks/DC").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error"]["code"], "NOT_FOUND");

        let (status, body) = get(&fixture.config, "/inputs/geojson/networks/XX").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("INVALID_INPUT"));
    }

    #[tokio::test]
    async fn test_unknown_building_layer() {
        let fixture = fixture();
        let (status, _) = get(&fixture.config, "/inputs/geojson/roads").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(&fixture.config, "/inputs/geojson/zone").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let fixture = fixture();
        let (status, body) = get(&fixture.config, "/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("map"));
    }
}
