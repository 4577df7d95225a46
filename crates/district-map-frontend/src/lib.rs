//! # District Map Frontend
//!
//! Map panel of the energy dashboard's input editor: building footprints of
//! the zone and district, streets and thermal networks drawn with deck.gl,
//! with hover tooltips, building inspection and row editing.

#![warn(clippy::all)]

pub mod components;
pub mod config;
pub mod services;
pub mod state;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use components::*;
use state::*;

#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    view! {
        <div class="map-panel">
            <MapPanel />
        </div>
        <BuildingPropertiesPanel />
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("District map v{}", env!("CARGO_PKG_VERSION"));
    leptos::mount::mount_to_body(App);
}
