//! WebAssembly bindings used by the JavaScript editing surface.
//!
//! Every function takes and returns JSON strings. Conversions return
//! `{ "value": ..., "diagnostics": [...] }`.

mod bindings;

use wasm_bindgen::prelude::*;

pub use bindings::BindingError;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(error: BindingError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Open one channel of a document as an editing tree
#[wasm_bindgen(js_name = toEditingTree)]
pub fn to_editing_tree_js(content: Option<String>, channel: &str) -> Result<String, JsValue> {
    bindings::to_editing_tree(content.as_deref(), channel).map_err(js_error)
}

/// Convert an editing state back into a channel patch
#[wasm_bindgen(js_name = toElemental)]
pub fn to_elemental_js(state: &str, options: Option<String>) -> Result<String, JsValue> {
    bindings::to_elemental(state, options.as_deref()).map_err(js_error)
}

/// Patch one channel into a document (creating it when absent)
#[wasm_bindgen(js_name = applyChannelUpdate)]
pub fn apply_channel_update_js(content: Option<String>, patch: &str) -> Result<String, JsValue> {
    bindings::apply_patch(content.as_deref(), patch).map_err(js_error)
}

#[wasm_bindgen(js_name = removeChannel)]
pub fn remove_channel_js(content: &str, channel: &str) -> Result<String, JsValue> {
    bindings::remove(content, channel).map_err(js_error)
}

#[wasm_bindgen(js_name = channelDefaults)]
pub fn channel_defaults_js(channel: &str) -> Result<String, JsValue> {
    bindings::defaults(channel).map_err(js_error)
}

/// Canonical form of a document, for comparing two versions
#[wasm_bindgen(js_name = normalize)]
pub fn normalize_js(content: &str) -> Result<String, JsValue> {
    bindings::normalize(content).map_err(js_error)
}
