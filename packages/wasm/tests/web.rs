//! Runs in a JS host: `wasm-pack test --node packages/wasm`
#![cfg(target_arch = "wasm32")]

use elemental_wasm::*;
use wasm_bindgen_test::*;

const CONTENT: &str = r#"{
    "version": "2022-01-01",
    "elements": [
        { "type": "channel", "channel": "email", "raw": { "subject": "Hello" },
          "elements": [{ "type": "text", "content": "Body" }] }
    ]
}"#;

#[wasm_bindgen_test]
fn round_trips_through_js_api() {
    let tree: serde_json::Value =
        serde_json::from_str(&to_editing_tree_js(Some(CONTENT.to_string()), "email").unwrap())
            .unwrap();
    let state = tree["value"].to_string();

    let patch: serde_json::Value =
        serde_json::from_str(&to_elemental_js(&state, None).unwrap()).unwrap();
    let updated = apply_channel_update_js(Some(CONTENT.to_string()), &patch["value"].to_string())
        .unwrap();

    let before: serde_json::Value = serde_json::from_str(CONTENT).unwrap();
    let after: serde_json::Value = serde_json::from_str(&updated).unwrap();
    assert_eq!(before, after);
}

#[wasm_bindgen_test]
fn unknown_channel_is_rejected() {
    assert!(channel_defaults_js("fax").is_err());
}
