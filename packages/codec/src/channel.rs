//! Merging one channel's patch into a multi-channel document

use elemental_proto::{Channel, ChannelPatch, ElementalContent};
use tracing::debug;

/// Replace (or append) the patched channel, leaving every other channel as is.
///
/// An absent document is bootstrapped with the current version and the patch
/// as its only channel. Channel order is preserved; a new channel goes last.
pub fn apply_channel_update(
    content: Option<&ElementalContent>,
    patch: ChannelPatch,
) -> ElementalContent {
    let Some(content) = content else {
        debug!(channel = %patch.channel, "Bootstrapping new document");
        return ElementalContent::new(vec![patch.into_channel_node()]);
    };

    let mut updated = content.clone();
    match updated
        .elements
        .iter_mut()
        .find(|node| node.channel == patch.channel)
    {
        Some(node) => {
            node.elements = patch.elements;
            node.raw = patch.raw;
        }
        None => {
            debug!(channel = %patch.channel, "Appending channel");
            updated.elements.push(patch.into_channel_node());
        }
    }
    updated
}

/// Drop a channel. Choosing the next active channel is up to the caller.
pub fn remove_channel(content: &ElementalContent, channel: Channel) -> ElementalContent {
    ElementalContent {
        version: content.version.clone(),
        elements: content
            .elements
            .iter()
            .filter(|node| node.channel != channel)
            .cloned()
            .collect(),
    }
}
