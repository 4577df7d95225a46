//! # Map Component
//!
//! Container the deck.gl engine renders into, with the control, toggle and
//! tooltip overlays on top.

use leptos::prelude::*;

use crate::components::{LayerToggles, MapControls, MapTooltip};
use crate::services::deck;
use crate::services::read_payload;
use crate::state::use_app_state;

/// Building and network map panel
#[component]
pub fn MapPanel() -> impl IntoView {
    let state = use_app_state();
    let container_id = state.config.with_value(|config| config.container_id.clone());

    // Create the map once the container is mounted
    Effect::new(move |_| {
        if !deck::is_available() {
            log::warn!("deck.gl not loaded, map will not render");
            return;
        }

        let payload = match read_payload() {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Map not created: {err}");
                return;
            }
        };

        if let Err(err) = state.start(payload) {
            log::warn!("Map not created: {err}");
            return;
        }
        state.load_remote_layers();
    });

    view! {
        <div class="map-container" style="position: relative; width: 100%; height: 100%;">
            <div id=container_id style="position: absolute; inset: 0;"></div>
            <MapControls />
            <LayerToggles />
            <MapTooltip />
        </div>
    }
}
