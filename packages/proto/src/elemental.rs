//! # Elemental Content
//!
//! The canonical, channel-scoped document format used for storage,
//! transmission and final rendering.
//!
//! ```text
//! ElementalContent
//!   └─ ChannelNode (email, sms, push, ...)
//!        ├─ raw        (free-form side channel, e.g. subject)
//!        └─ ContentNode*
//!             text, image, action, divider, quote, list, html, meta, variable
//! ```
//!
//! Content nodes decode leniently: a node with an unknown `type` or broken
//! structural fields becomes [`ContentNode::Unrecognized`] and keeps its
//! original JSON, so one bad node never fails the whole document.

use elemental_schema::{AttrMap, NodeKind, StyleFlags};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Format tag written into every document
pub const ELEMENTAL_VERSION: &str = "2022-01-01";

/// Root of a persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementalContent {
    pub version: String,
    #[serde(default)]
    pub elements: Vec<ChannelNode>,
}

impl ElementalContent {
    pub fn new(elements: Vec<ChannelNode>) -> Self {
        Self {
            version: ELEMENTAL_VERSION.to_string(),
            elements,
        }
    }

    pub fn channel(&self, channel: Channel) -> Option<&ChannelNode> {
        self.elements.iter().find(|node| node.channel == channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.elements.iter().map(|node| node.channel)
    }
}

/// Delivery medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Push,
    Inbox,
    Slack,
    Msteams,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Email,
        Channel::Sms,
        Channel::Push,
        Channel::Inbox,
        Channel::Slack,
        Channel::Msteams,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Push => "push",
            Channel::Inbox => "inbox",
            Channel::Slack => "slack",
            Channel::Msteams => "msteams",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// One channel's content inside a document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelNode {
    pub channel: Channel,

    #[serde(default)]
    pub elements: Vec<ContentNode>,

    #[serde(default)]
    pub raw: Option<RawFields>,
}

impl ChannelNode {
    pub fn new(channel: Channel, elements: Vec<ContentNode>) -> Self {
        Self {
            channel,
            elements,
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: RawFields) -> Self {
        self.raw = Some(raw);
        self
    }
}

impl Serialize for ChannelNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a> {
            #[serde(rename = "type")]
            tag: &'static str,
            channel: Channel,
            elements: &'a [ContentNode],
            #[serde(skip_serializing_if = "Option::is_none")]
            raw: Option<&'a RawFields>,
        }

        Tagged {
            tag: "channel",
            channel: self.channel,
            elements: &self.elements,
            raw: self.raw.as_ref(),
        }
        .serialize(serializer)
    }
}

/// Side-channel fields kept outside the node tree for older producers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(flatten)]
    pub extra: AttrMap,
}

impl RawFields {
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            extra: AttrMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.extra.is_empty()
    }
}

/// New content for one channel, produced by the tree converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPatch {
    pub channel: Channel,

    #[serde(default)]
    pub elements: Vec<ContentNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawFields>,
}

impl ChannelPatch {
    pub fn new(channel: Channel, elements: Vec<ContentNode>) -> Self {
        Self {
            channel,
            elements,
            raw: None,
        }
    }

    pub fn into_channel_node(self) -> ChannelNode {
        ChannelNode {
            channel: self.channel,
            elements: self.elements,
            raw: self.raw,
        }
    }
}

/// A typed content node
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Text(TextNode),
    Image(ImageNode),
    Action(ActionNode),
    Divider(DividerNode),
    Quote(QuoteNode),
    List(ListNode),
    Html(HtmlNode),
    Meta(MetaNode),
    Variable(VariableNode),
    Unrecognized(UnrecognizedNode),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<TextElement>>,

    #[serde(flatten)]
    pub attrs: AttrMap,
}

impl TextNode {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn styled(elements: Vec<TextElement>) -> Self {
        Self {
            elements: Some(elements),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }
}

/// Inline element of a styled text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TextElement {
    String(StringRun),
    Variable(VariableRef),
}

impl TextElement {
    pub fn string(content: impl Into<String>, style: StyleFlags) -> Self {
        TextElement::String(StringRun {
            content: content.into(),
            style,
            extra: AttrMap::new(),
        })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TextElement::Variable(VariableRef { name: name.into() })
    }
}

/// A run of text with its style flags.
///
/// Flags decode one at a time: a flag with the wrong JSON type stays in
/// `extra` under its own key instead of failing the run, and fields the
/// run format does not know about are kept there too.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StringRun {
    pub content: String,

    #[serde(flatten)]
    pub style: StyleFlags,

    #[serde(flatten)]
    pub extra: AttrMap,
}

impl StringRun {
    /// Keys in `extra` that name a style flag but could not be read as one
    pub fn malformed_flags(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extra
            .iter()
            .filter(|(name, _)| StyleFlags::is_flag_name(name))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// `extra` without the malformed flags
    pub fn unknown_fields(&self) -> AttrMap {
        self.extra
            .iter()
            .filter(|(name, _)| !StyleFlags::is_flag_name(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl<'de> Deserialize<'de> for StringRun {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            #[serde(default)]
            content: String,
            #[serde(flatten)]
            fields: AttrMap,
        }

        let repr = Repr::deserialize(deserializer)?;
        let mut style = StyleFlags::default();
        let mut extra = AttrMap::new();

        for (name, value) in repr.fields {
            if !StyleFlags::is_flag_name(&name) || !style.set_flag(&name, &value) {
                extra.insert(name, value);
            }
        }

        Ok(StringRun {
            content: repr.content,
            style,
            extra,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    #[serde(flatten)]
    pub attrs: AttrMap,
}

/// Button or link call to action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    #[serde(default)]
    pub content: String,

    #[serde(flatten)]
    pub attrs: AttrMap,
}

/// Divider line or blank spacer, depending on `variant`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividerNode {
    #[serde(flatten)]
    pub attrs: AttrMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteNode {
    #[serde(default)]
    pub elements: Vec<ContentNode>,

    #[serde(flatten)]
    pub attrs: AttrMap,

    /// Read from, and written as, the `blockquote` type name
    #[serde(skip)]
    pub blockquote: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListNode {
    #[serde(default)]
    pub elements: Vec<ListItemNode>,

    #[serde(flatten)]
    pub attrs: AttrMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItemNode {
    pub elements: Vec<ContentNode>,
    pub attrs: AttrMap,
}

impl ListItemNode {
    pub fn new(elements: Vec<ContentNode>) -> Self {
        Self {
            elements,
            attrs: AttrMap::new(),
        }
    }
}

impl Serialize for ListItemNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a> {
            #[serde(rename = "type")]
            tag: &'static str,
            elements: &'a [ContentNode],
            #[serde(flatten)]
            attrs: &'a AttrMap,
        }

        Tagged {
            tag: NodeKind::ListItem.type_name(),
            elements: &self.elements,
            attrs: &self.attrs,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ListItemNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            #[serde(default)]
            elements: Vec<ContentNode>,
            #[serde(flatten)]
            attrs: AttrMap,
        }

        let mut repr = Repr::deserialize(deserializer)?;
        match repr.attrs.remove("type") {
            None => {}
            Some(Value::String(tag)) if tag == NodeKind::ListItem.type_name() => {}
            Some(other) => {
                return Err(serde::de::Error::custom(format!(
                    "expected list-item, found {}",
                    other
                )))
            }
        }

        Ok(ListItemNode {
            elements: repr.elements,
            attrs: repr.attrs,
        })
    }
}

/// Raw markup block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HtmlNode {
    #[serde(default)]
    pub content: String,

    #[serde(flatten)]
    pub attrs: AttrMap,
}

/// Structured channel title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaNode {
    #[serde(default)]
    pub title: String,

    #[serde(flatten)]
    pub attrs: AttrMap,
}

impl MetaNode {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            attrs: AttrMap::new(),
        }
    }
}

/// Standalone interpolation placeholder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableNode {
    pub name: String,

    #[serde(flatten)]
    pub attrs: AttrMap,
}

/// Why a node could not be decoded into a typed variant
#[derive(Debug, Clone, PartialEq)]
pub enum UnrecognizedReason {
    MissingType,
    UnknownType(String),
    /// Known type whose structural fields did not decode
    Malformed { kind: NodeKind, message: String },
}

impl fmt::Display for UnrecognizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnrecognizedReason::MissingType => write!(f, "node has no type"),
            UnrecognizedReason::UnknownType(kind) => write!(f, "unknown node type {:?}", kind),
            UnrecognizedReason::Malformed { kind, message } => {
                write!(f, "malformed {} node: {}", kind.type_name(), message)
            }
        }
    }
}

/// A node kept verbatim because it could not be typed
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedNode {
    pub value: Value,
    pub reason: UnrecognizedReason,
}

impl ContentNode {
    pub fn kind(&self) -> Option<NodeKind> {
        match self {
            ContentNode::Text(_) => Some(NodeKind::Text),
            ContentNode::Image(_) => Some(NodeKind::Image),
            ContentNode::Action(_) => Some(NodeKind::Action),
            ContentNode::Divider(_) => Some(NodeKind::Divider),
            ContentNode::Quote(_) => Some(NodeKind::Quote),
            ContentNode::List(_) => Some(NodeKind::List),
            ContentNode::Html(_) => Some(NodeKind::Html),
            ContentNode::Meta(_) => Some(NodeKind::Meta),
            ContentNode::Variable(_) => Some(NodeKind::Variable),
            ContentNode::Unrecognized(_) => None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        ContentNode::Text(TextNode::plain(content))
    }

    pub fn meta(title: impl Into<String>) -> Self {
        ContentNode::Meta(MetaNode::titled(title))
    }

    /// Decode a node from JSON, falling back to [`ContentNode::Unrecognized`]
    pub fn from_value(value: Value) -> Self {
        let type_name = match value.get("type") {
            Some(Value::String(name)) => name.clone(),
            _ => {
                return ContentNode::Unrecognized(UnrecognizedNode {
                    value,
                    reason: UnrecognizedReason::MissingType,
                })
            }
        };

        let kind = match NodeKind::from_type_name(&type_name) {
            Some(kind) => kind,
            None => {
                return ContentNode::Unrecognized(UnrecognizedNode {
                    value,
                    reason: UnrecognizedReason::UnknownType(type_name),
                })
            }
        };

        let mut body = value.clone();
        if let Value::Object(map) = &mut body {
            map.remove("type");
        }

        let decoded = match kind {
            NodeKind::Text => serde_json::from_value(body).map(ContentNode::Text),
            NodeKind::Image => serde_json::from_value(body).map(ContentNode::Image),
            NodeKind::Action => serde_json::from_value(body).map(ContentNode::Action),
            NodeKind::Divider => serde_json::from_value(body).map(ContentNode::Divider),
            NodeKind::Quote => serde_json::from_value(body).map(|quote: QuoteNode| {
                ContentNode::Quote(QuoteNode {
                    blockquote: type_name == "blockquote",
                    ..quote
                })
            }),
            NodeKind::List => serde_json::from_value(body).map(ContentNode::List),
            NodeKind::Html => serde_json::from_value(body).map(ContentNode::Html),
            NodeKind::Meta => serde_json::from_value(body).map(ContentNode::Meta),
            NodeKind::Variable => serde_json::from_value(body).map(ContentNode::Variable),
            // A list item is only valid directly inside a list
            NodeKind::ListItem => {
                return ContentNode::Unrecognized(UnrecognizedNode {
                    value,
                    reason: UnrecognizedReason::UnknownType(type_name),
                })
            }
        };

        decoded.unwrap_or_else(|err| {
            ContentNode::Unrecognized(UnrecognizedNode {
                value,
                reason: UnrecognizedReason::Malformed {
                    kind,
                    message: err.to_string(),
                },
            })
        })
    }
}

impl Serialize for ContentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(tag = "type", rename_all = "lowercase")]
        enum Tagged<'a> {
            Text(&'a TextNode),
            Image(&'a ImageNode),
            Action(&'a ActionNode),
            Divider(&'a DividerNode),
            Quote(&'a QuoteNode),
            Blockquote(&'a QuoteNode),
            List(&'a ListNode),
            Html(&'a HtmlNode),
            Meta(&'a MetaNode),
            Variable(&'a VariableNode),
        }

        match self {
            ContentNode::Text(node) => Tagged::Text(node).serialize(serializer),
            ContentNode::Image(node) => Tagged::Image(node).serialize(serializer),
            ContentNode::Action(node) => Tagged::Action(node).serialize(serializer),
            ContentNode::Divider(node) => Tagged::Divider(node).serialize(serializer),
            ContentNode::Quote(node) if node.blockquote => {
                Tagged::Blockquote(node).serialize(serializer)
            }
            ContentNode::Quote(node) => Tagged::Quote(node).serialize(serializer),
            ContentNode::List(node) => Tagged::List(node).serialize(serializer),
            ContentNode::Html(node) => Tagged::Html(node).serialize(serializer),
            ContentNode::Meta(node) => Tagged::Meta(node).serialize(serializer),
            ContentNode::Variable(node) => Tagged::Variable(node).serialize(serializer),
            ContentNode::Unrecognized(node) => node.value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ContentNode::from_value)
    }
}
