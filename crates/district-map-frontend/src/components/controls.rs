//! Map control buttons: 3D toggle, basemap toggle and recenter.

use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub fn MapControls() -> impl IntoView {
    let state = use_app_state();

    // The button offers the mode it switches to
    let toggle_class = move || {
        if state.is_extruded() {
            "mapboxgl-ctrl-icon mapboxgl-ctrl-2d"
        } else {
            "mapboxgl-ctrl-icon mapboxgl-ctrl-3d"
        }
    };

    view! {
        <div class="map-controls" style="position: absolute; top: 10px; left: 10px; z-index: 1;">
            <div class="mapboxgl-ctrl-group mapboxgl-ctrl">
                <button
                    id="3d-button"
                    type="button"
                    class=toggle_class
                    title="Toggle 3D"
                    data-toggle="tooltip"
                    data-placement="right"
                    on:click=move |_| state.toggle_3d()
                ></button>
            </div>
            <div class="mapboxgl-ctrl-group mapboxgl-ctrl">
                <button
                    id="dark-button"
                    type="button"
                    class="mapboxgl-ctrl-icon"
                    title="Toggle Dark map"
                    data-toggle="tooltip"
                    data-placement="right"
                    on:click=move |_| state.toggle_basemap()
                >
                    <i class="fa fa-adjust"></i>
                </button>
            </div>
            <div class="mapboxgl-ctrl-group mapboxgl-ctrl">
                <button
                    id="recenter-button"
                    type="button"
                    class="mapboxgl-ctrl-icon mapboxgl-ctrl-recenter"
                    title="Center to location"
                    data-toggle="tooltip"
                    data-placement="right"
                    on:click=move |_| state.recenter()
                ></button>
            </div>
        </div>
    }
}
