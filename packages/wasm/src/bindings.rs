//! JSON-in, JSON-out wrappers around the codec.
//!
//! Kept free of `wasm_bindgen` types so they can be tested natively.

use elemental_codec::{
    apply_channel_update, channel_defaults, decode_content, default_channel_node,
    normalize_channel, parse_json, remove_channel, Codec, CodecError, CodecOptions, Converted,
    EditingState,
};
use elemental_proto::{Channel, ChannelPatch, ElementalContent, UnknownChannel};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Channel(#[from] UnknownChannel),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Channel),
}

pub type BindingResult<T> = Result<T, BindingError>;

fn codec(options: Option<&str>) -> BindingResult<Codec> {
    let options: CodecOptions = match options {
        Some(json) => serde_json::from_str(json)?,
        None => CodecOptions::default(),
    };
    Ok(Codec::new(options))
}

/// `content` may be absent, in which case the channel starts from defaults
fn optional_content(content: Option<&str>) -> BindingResult<Option<ElementalContent>> {
    match content.map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(json) => Ok(Some(decode_content(json)?)),
    }
}

fn to_json<T: Serialize>(value: &T) -> BindingResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// `{ value: EditingState, diagnostics }` for one channel
pub fn to_editing_tree(content: Option<&str>, channel: &str) -> BindingResult<String> {
    let channel: Channel = channel.parse()?;
    let node = optional_content(content)?
        .and_then(|content| content.channel(channel).cloned())
        .unwrap_or_else(|| default_channel_node(channel));

    let converted: Converted<EditingState> = Codec::default().to_editing_tree(&node);
    to_json(&converted)
}

/// `{ value: ChannelPatch, diagnostics }`
pub fn to_elemental(state: &str, options: Option<&str>) -> BindingResult<String> {
    let state: EditingState = parse_json(state)?;
    let converted = codec(options)?.to_elemental(&state);
    to_json(&converted)
}

pub fn apply_patch(content: Option<&str>, patch: &str) -> BindingResult<String> {
    let content = optional_content(content)?;
    let patch: ChannelPatch = parse_json(patch)?;
    to_json(&apply_channel_update(content.as_ref(), patch))
}

pub fn remove(content: &str, channel: &str) -> BindingResult<String> {
    let channel: Channel = channel.parse()?;
    let content = decode_content(content)?;
    if content.channel(channel).is_none() {
        return Err(BindingError::ChannelNotFound(channel));
    }
    to_json(&remove_channel(&content, channel))
}

pub fn defaults(channel: &str) -> BindingResult<String> {
    let channel: Channel = channel.parse()?;
    to_json(&channel_defaults(channel))
}

/// Every channel in canonical form, for equality checks on the JS side
pub fn normalize(content: &str) -> BindingResult<String> {
    let content = decode_content(content)?;
    let codec = Codec::default();
    let normalized = ElementalContent {
        elements: content
            .elements
            .iter()
            .map(|node| normalize_channel(codec.registry(), node))
            .collect(),
        ..content
    };
    to_json(&normalized)
}
