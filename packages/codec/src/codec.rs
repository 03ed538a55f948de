use crate::diagnostics::Converted;
use crate::normalize;
use crate::title::TitleState;
use crate::to_elemental::ElementalWriter;
use crate::to_tree::TreeBuilder;
use elemental_proto::{Channel, ChannelNode, ChannelPatch, ContentNode, EditorDocument, RawFields};
use elemental_schema::SchemaRegistry;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Conversion options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecOptions {
    /// Write every declared attribute, including those at their default.
    /// When off (the default) default-valued attributes are omitted.
    #[serde(default)]
    pub emit_default_attributes: bool,
}

/// One channel opened for editing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingState {
    pub channel: Channel,
    pub document: EditorDocument,
    pub title: TitleState,

    /// Side-channel fields of the source content, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawFields>,
}

impl EditingState {
    /// Empty state for a channel with no content yet
    pub fn empty(channel: Channel) -> Self {
        Self {
            channel,
            document: EditorDocument::default(),
            title: TitleState::default(),
            raw: None,
        }
    }
}

/// The Elemental ⇄ editing tree converter
#[derive(Debug, Clone, Default)]
pub struct Codec {
    registry: SchemaRegistry,
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            registry: SchemaRegistry::standard(),
            options,
        }
    }

    pub fn with_registry(registry: SchemaRegistry, options: CodecOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Elemental channel → editing tree
    #[instrument(skip_all, fields(channel = %channel.channel))]
    pub fn to_editing_tree(&self, channel: &ChannelNode) -> Converted<EditingState> {
        let converted = TreeBuilder::new(&self.registry, channel.channel).build(channel);
        info!(
            blocks = converted.value.document.content.len(),
            diagnostics = converted.diagnostics.len(),
            "Converted channel to editing tree"
        );
        converted
    }

    /// Editing tree → Elemental channel patch
    #[instrument(skip_all, fields(channel = %state.channel))]
    pub fn to_elemental(&self, state: &EditingState) -> Converted<ChannelPatch> {
        let converted = ElementalWriter::new(&self.registry, &self.options).write(state);
        info!(
            nodes = converted.value.elements.len(),
            "Converted editing tree to Elemental"
        );
        converted
    }

    /// Convert a channel to the editing tree and straight back
    pub fn round_trip(&self, channel: &ChannelNode) -> Converted<ChannelPatch> {
        let tree = self.to_editing_tree(channel);
        let mut back = self.to_elemental(&tree.value);
        let mut diagnostics = tree.diagnostics;
        diagnostics.append(&mut back.diagnostics);
        Converted {
            value: back.value,
            diagnostics,
        }
    }

    pub fn normalize(&self, nodes: &[ContentNode]) -> Vec<ContentNode> {
        normalize::normalize_nodes(&self.registry, nodes)
    }

    pub fn semantically_equal(&self, a: &[ContentNode], b: &[ContentNode]) -> bool {
        normalize::semantically_equal(&self.registry, a, b)
    }
}

/// Convert with the standard schema and default options
pub fn to_editing_tree(channel: &ChannelNode) -> Converted<EditingState> {
    Codec::default().to_editing_tree(channel)
}

/// Convert with the standard schema and default options
pub fn to_elemental(state: &EditingState) -> Converted<ChannelPatch> {
    Codec::default().to_elemental(state)
}
