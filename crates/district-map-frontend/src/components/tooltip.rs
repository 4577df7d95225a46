//! Hover tooltip, anchored at the cursor.

use district_map_domain::inspect::Measure;
use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub fn MapTooltip() -> impl IntoView {
    let state = use_app_state();
    let tooltip = state.tooltip;

    let style = move || {
        tooltip.with(|t| {
            format!(
                "position: absolute; z-index: 2; pointer-events: none; top: {}px; left: {}px;",
                t.y, t.x
            )
        })
    };

    view! {
        <div id="map-tooltip" style=style hidden=move || tooltip.with(|t| t.is_empty())>
            {move || {
                tooltip
                    .get()
                    .rows
                    .into_iter()
                    .map(|(key, value)| view! {
                        <div><b>{key}</b>": "{value}</div>
                    })
                    .collect_view()
            }}
            <Show when=move || tooltip.with(|t| !t.measures.is_empty())>
                <br />
                {move || tooltip.get().measures.into_iter().map(measure_row).collect_view()}
            </Show>
        </div>
    }
}

fn measure_row(measure: Measure) -> impl IntoView {
    view! {
        <div>
            <b>{measure.label}</b>
            ": "
            {measure.value}
            {measure.unit.symbol()}
            {measure.unit.exponent().map(|exp| view! { <sup>{exp}</sup> })}
        </div>
    }
}
