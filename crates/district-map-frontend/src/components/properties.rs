//! # Building Properties Panel
//!
//! Attribute-table rows of the last clicked building.

use district_map_domain::inspect::PropertySection;
use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub fn BuildingPropertiesPanel() -> impl IntoView {
    let state = use_app_state();
    let properties = state.properties;

    view! {
        <div class="building-properties-panel">
            <div id="building-name">
                {move || properties.with(|p| p.as_ref().map(|p| view! { <h3>{p.header()}</h3> }))}
            </div>
            <div id="building-properties">
                {move || {
                    properties
                        .get()
                        .map(|p| p.sections.into_iter().map(property_section).collect_view())
                }}
            </div>
        </div>
    }
}

fn property_section(section: PropertySection) -> impl IntoView {
    view! {
        <h3>{section.title}</h3>
        {section
            .rows
            .into_iter()
            .map(|(key, value)| view! { <div>{key}":"{value}</div> })
            .collect_view()}
    }
}
