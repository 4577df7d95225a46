//! # Layer Toggles
//!
//! One checkbox per layer. A checkbox stays hidden until its layer's data
//! has been loaded.

use district_map_domain::LayerId;
use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub fn LayerToggles() -> impl IntoView {
    view! {
        <div class="layer-toggles" style="position: absolute; top: 10px; right: 10px; z-index: 1;">
            {LayerId::DRAW_ORDER
                .into_iter()
                .rev()
                .map(|id| view! { <LayerToggle layer=id /> })
                .collect_view()}
        </div>
    }
}

/// Checkbox of a single layer
#[component]
pub fn LayerToggle(layer: LayerId) -> impl IntoView {
    let state = use_app_state();

    let on_change = move |ev: leptos::ev::Event| {
        state.set_layer_visible(layer, event_target_checked(&ev));
    };

    view! {
        <div id=layer.checkbox_id() class="form-check" hidden=move || !state.checkbox_visible(layer)>
            <input
                id=layer.toggle_id()
                class="form-check-input"
                type="checkbox"
                value=layer.as_str()
                prop:checked=move || state.is_layer_visible(layer)
                on:change=on_change
            />
            <label class="form-check-label" for=layer.toggle_id()>
                {layer.label()}
            </label>
        </div>
    }
}
