//! JSON bridging between Rust values and JavaScript objects.

use district_map_domain::{MapError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

/// Turn a thrown JavaScript value into a map error.
pub fn js_error(err: JsValue) -> MapError {
    MapError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Serialize a Rust value into a plain JavaScript object.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    let text = serde_json::to_string(value)?;
    js_sys::JSON::parse(&text).map_err(js_error)
}

/// Deserialize a plain JavaScript object into a Rust value.
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T> {
    let text: String = js_sys::JSON::stringify(value).map_err(js_error)?.into();
    Ok(serde_json::from_str(&text)?)
}

/// Read `object[key]`, treating `null` and `undefined` as absent.
pub fn get(object: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Set `object[key] = value`.
pub fn set(object: &JsValue, key: &str, value: &JsValue) -> Result<()> {
    js_sys::Reflect::set(object, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_error)
}

/// Read a global variable of the page.
pub fn global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    get(&window, name)
}
