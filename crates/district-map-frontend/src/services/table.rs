//! # Attribute Table
//!
//! Bridge to the host page's bootstrap-table widget, which owns row editing
//! for streets and network features.

use district_map_domain::{EditRequest, LayerId, MapError, Result};
use geojson::Feature;
use wasm_bindgen::prelude::*;

use super::interop::{get, js_error, to_js};

#[wasm_bindgen]
extern "C" {
    type JQuery;

    #[wasm_bindgen(catch, js_name = "$")]
    fn jquery(selector: &str) -> std::result::Result<JQuery, JsValue>;

    #[wasm_bindgen(method, catch, js_name = bootstrapTable)]
    fn bootstrap_table(this: &JQuery, method: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = bootstrapTable)]
    fn bootstrap_table_with(this: &JQuery, method: &str, arg: &JsValue)
    -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = edit_row)]
    fn edit_row(row: &JsValue) -> std::result::Result<(), JsValue>;
}

/// Open the table's row editor for a picked street or network feature.
pub fn edit_feature(selector: &str, layer: LayerId, feature: &Feature) -> Result<()> {
    let table = jquery(selector).map_err(js_error)?;
    let options = table.bootstrap_table("getOptions").map_err(js_error)?;
    let key_field = get(&options, "uniqueId")
        .and_then(|field| field.as_string())
        .ok_or_else(|| MapError::InvalidPayload("attribute table has no uniqueId".to_string()))?;

    let Some(request) = EditRequest::for_feature(layer, feature, &key_field) else {
        log::warn!("{layer} feature has no '{key_field}' value, nothing to edit");
        return Ok(());
    };

    let row = table
        .bootstrap_table_with("getRowByUniqueId", &to_js(&request.key)?)
        .map_err(js_error)?;
    edit_row(&row).map_err(js_error)
}
