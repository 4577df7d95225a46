//! Browser tests for the JavaScript glue.

#![cfg(target_arch = "wasm32")]

use district_map_domain::{LayerId, MapError};
use district_map_frontend::components::MapControls;
use district_map_frontend::config::MapConfig;
use district_map_frontend::services::deck::view_update;
use district_map_frontend::services::interop::{from_js, get, set, to_js};
use district_map_frontend::services::read_payload;
use district_map_frontend::state::provide_app_state;
use geojson::FeatureCollection;
use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_feature_collection_survives_js() {
    let text = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"Name":"B1001"},"geometry":{"type":"Point","coordinates":[8.5,47.3]}}]}"#;
    let collection: FeatureCollection = serde_json::from_str(text).unwrap();

    let value = to_js(&collection).unwrap();
    let features = get(&value, "features").unwrap();
    assert_eq!(js_sys::Array::from(&features).length(), 1);

    let back: FeatureCollection = from_js(&value).unwrap();
    assert_eq!(back, collection);
}

#[wasm_bindgen_test]
fn test_missing_zone_is_reported() {
    let window = web_sys::window().unwrap();
    set(&window, "geojsons", &js_sys::Object::new().into()).unwrap();

    assert!(matches!(read_payload(), Err(MapError::MissingZone)));
}

#[wasm_bindgen_test]
fn test_page_config_override() {
    let window = web_sys::window().unwrap();
    let config = js_sys::Object::new();
    set(&config, "apiBase", &JsValue::from_str("/dashboard")).unwrap();
    set(&window, "mapConfig", &config.into()).unwrap();

    let config = MapConfig::from_page();
    assert_eq!(config.container_id, "mapid");
    assert_eq!(
        config.layer_url(LayerId::Streets).as_deref(),
        Some("/dashboard/inputs/geojson/others/streets")
    );
}

#[wasm_bindgen_test]
fn test_camera_update_is_controlled() {
    let view = js_sys::Object::new();
    set(&view, "latitude", &JsValue::from_f64(47.3)).unwrap();

    let update = view_update(&view.clone().into()).unwrap();

    assert!(get(&update, "initialViewState").is_none());
    let pushed = get(&update, "viewState").unwrap();
    assert!(js_sys::Object::is(&pushed, &view));
}

#[wasm_bindgen_test]
fn test_control_buttons_carry_tooltips() {
    let document = web_sys::window().unwrap().document().unwrap();
    let host: web_sys::HtmlElement = document.create_element("div").unwrap().unchecked_into();
    document.body().unwrap().append_child(&host).unwrap();

    let _mounted = leptos::mount::mount_to(host.clone(), || {
        provide_app_state();
        view! { <MapControls /> }
    });

    for id in ["3d-button", "dark-button", "recenter-button"] {
        let button = document.get_element_by_id(id).unwrap();
        assert_eq!(button.get_attribute("data-toggle").as_deref(), Some("tooltip"));
        assert_eq!(button.get_attribute("data-placement").as_deref(), Some("right"));
    }
}
