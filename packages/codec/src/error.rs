//! Error types for decoding and encoding Elemental JSON
//!
//! Conversion itself never fails; only turning text into a document can.
//! Nesting depth is not limited while parsing.

use elemental_proto::{ChannelNode, ContentVisitor, ElementalContent, ListDepth};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported Elemental version {found:?} (expected {expected:?})")]
    UnsupportedVersion { found: String, expected: &'static str },
}

/// Deserialize JSON text of any nesting depth. The stack grows on demand
/// instead of hitting serde_json's recursion limit.
pub fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Parse a full Elemental document
pub fn decode_content(json: &str) -> CodecResult<ElementalContent> {
    let content: ElementalContent = parse_json(json)?;
    if content.version != elemental_proto::ELEMENTAL_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: content.version,
            expected: elemental_proto::ELEMENTAL_VERSION,
        });
    }

    for channel in &content.elements {
        log_depth(channel);
    }
    Ok(content)
}

/// Parse a single channel node
pub fn decode_channel(json: &str) -> CodecResult<ChannelNode> {
    let channel: ChannelNode = parse_json(json)?;
    log_depth(&channel);
    Ok(channel)
}

fn log_depth(channel: &ChannelNode) {
    let mut depth = ListDepth::default();
    for node in &channel.elements {
        depth.visit_node(node);
    }
    debug!(
        channel = %channel.channel,
        nodes = channel.elements.len(),
        list_depth = depth.max,
        "Decoded channel"
    );
}

pub fn encode_content(content: &ElementalContent, pretty: bool) -> CodecResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(content)?
    } else {
        serde_json::to_string(content)?
    };
    Ok(json)
}
