//! # Title/Subject Normalizer
//!
//! A channel's title lives in one of two places, depending on which
//! producer wrote the content:
//!
//! ```text
//! StructuredTitle   elements: [{ "type": "meta", "title": "..." }, ...]
//! RawSubject        raw: { "subject": "..." }
//! ```
//!
//! Whatever location the title was read from is where it is written back,
//! and a `meta` node goes back to the root position it was read at.
//! Editing the value never migrates it between the two forms. When both are
//! present the `meta` node is authoritative and `raw.subject` is left alone.

use crate::diagnostics::{Converted, DiagnosticKind, DiagnosticSink, NodePath};
use elemental_proto::{ChannelNode, ContentNode, MetaNode, RawFields};
use serde::{Deserialize, Serialize};

/// Storage location of a channel title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleLocation {
    /// `meta` node inside `elements`
    #[default]
    StructuredTitle,
    /// `raw.subject`, no `meta` node
    RawSubject,
}

/// Title value plus where it came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleState {
    pub location: TitleLocation,

    /// `None` when the channel has no title at all
    #[serde(default)]
    pub value: Option<String>,

    /// Number of root nodes written before the `meta` node
    #[serde(default, skip_serializing_if = "is_zero")]
    pub position: usize,
}

fn is_zero(position: &usize) -> bool {
    *position == 0
}

impl TitleState {
    pub fn structured(value: impl Into<String>) -> Self {
        Self {
            location: TitleLocation::StructuredTitle,
            value: Some(value.into()),
            position: 0,
        }
    }

    /// Place the `meta` node after `position` other root nodes
    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn raw_subject(value: impl Into<String>) -> Self {
        Self {
            location: TitleLocation::RawSubject,
            value: Some(value.into()),
            position: 0,
        }
    }

    /// Replace the value, keeping the storage location
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    pub fn as_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// Resolve the authoritative title of a channel
pub fn read_title(channel: &ChannelNode) -> Converted<TitleState> {
    let mut sink = DiagnosticSink::default();
    let state = read_title_into(channel, &mut sink);
    sink.finish(state)
}

pub(crate) fn read_title_into(channel: &ChannelNode, sink: &mut DiagnosticSink) -> TitleState {
    let mut meta: Option<(&MetaNode, usize)> = None;
    let mut blocks_before = 0;

    for (index, node) in channel.elements.iter().enumerate() {
        match node {
            ContentNode::Meta(node) => {
                if meta.is_some() {
                    sink.report(&NodePath::root().child(index), DiagnosticKind::DuplicateMeta);
                } else {
                    meta = Some((node, blocks_before));
                }
            }
            // Dropped by the tree converter, so not counted
            ContentNode::Unrecognized(_) => {}
            _ => blocks_before += 1,
        }
    }

    let subject = channel.raw.as_ref().and_then(|raw| raw.subject.as_ref());

    match (meta, subject) {
        (Some((meta, position)), subject) => {
            if subject.is_some() {
                sink.report(&NodePath::root(), DiagnosticKind::ConflictingTitle);
            }
            TitleState::structured(meta.title.clone()).at(position)
        }
        (None, Some(subject)) => TitleState::raw_subject(subject.clone()),
        (None, None) => TitleState::default(),
    }
}

/// Write the title back into the location it was read from.
///
/// Any `meta` nodes already in `elements` are replaced. A structured title
/// is inserted after `title.position` nodes, or last when there are fewer.
pub fn write_title(
    elements: Vec<ContentNode>,
    raw: Option<RawFields>,
    title: &TitleState,
) -> (Vec<ContentNode>, Option<RawFields>) {
    let mut elements: Vec<ContentNode> = elements
        .into_iter()
        .filter(|node| !matches!(node, ContentNode::Meta(_)))
        .collect();

    match title.location {
        TitleLocation::StructuredTitle => {
            if let Some(value) = &title.value {
                let position = title.position.min(elements.len());
                elements.insert(position, ContentNode::meta(value.clone()));
            }
            (elements, raw)
        }
        TitleLocation::RawSubject => {
            let mut raw = raw.unwrap_or_default();
            raw.subject = title.value.clone();
            let raw = if raw.is_empty() { None } else { Some(raw) };
            (elements, raw)
        }
    }
}
