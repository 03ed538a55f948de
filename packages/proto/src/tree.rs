//! # Editing Document Tree
//!
//! The live block/inline tree manipulated by the rich-text editing surface.
//! Serialized in the node/mark JSON shape the surface consumes:
//!
//! ```json
//! { "type": "doc", "content": [
//!     { "type": "paragraph", "id": "c1a2-1", "attrs": { "align": "left" },
//!       "content": [{ "type": "text", "text": "Hi", "marks": [{ "type": "bold" }] }] }
//! ] }
//! ```

use elemental_schema::{AttrMap, MarkSet};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Stable identifier of a block or list item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Root document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EditorDocument {
    #[serde(default)]
    pub content: Vec<Block>,
}

impl Serialize for EditorDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a> {
            #[serde(rename = "type")]
            tag: &'static str,
            content: &'a [Block],
        }

        Tagged {
            tag: "doc",
            content: &self.content,
        }
        .serialize(serializer)
    }
}

impl EditorDocument {
    pub fn new(content: Vec<Block>) -> Self {
        Self { content }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Find a block anywhere in the tree
    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        find_in(&self.content, id)
    }

    pub fn find_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        find_in_mut(&mut self.content, id)
    }
}

fn find_in<'a>(blocks: &'a [Block], id: &BlockId) -> Option<&'a Block> {
    blocks.iter().find_map(|block| {
        if &block.id == id {
            return Some(block);
        }
        match &block.body {
            BlockBody::Blockquote { content } => find_in(content, id),
            BlockBody::List { items, .. } => {
                items.iter().find_map(|item| find_in(&item.content, id))
            }
            _ => None,
        }
    })
}

fn find_in_mut<'a>(blocks: &'a mut [Block], id: &BlockId) -> Option<&'a mut Block> {
    for block in blocks.iter_mut() {
        if &block.id == id {
            return Some(block);
        }
        let found = match &mut block.body {
            BlockBody::Blockquote { content } => find_in_mut(content, id),
            BlockBody::List { items, .. } => items
                .iter_mut()
                .find_map(|item| find_in_mut(&mut item.content, id)),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Elemental node form a block was read from, when the block type alone
/// does not say which one to write back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// A standalone `variable` node
    Variable,
    /// A quote spelled `blockquote`
    Blockquote,
}

/// A block node with its style-attribute bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attrs: AttrMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceType>,

    #[serde(flatten)]
    pub body: BlockBody,
}

impl Block {
    pub fn new(id: BlockId, body: BlockBody) -> Self {
        Self {
            id,
            attrs: AttrMap::new(),
            source: None,
            body,
        }
    }

    pub fn with_attrs(mut self, attrs: AttrMap) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_source(mut self, source: SourceType) -> Self {
        self.source = Some(source);
        self
    }

    /// Same block apart from ids, here and in every nested block
    pub fn same_content(&self, other: &Block) -> bool {
        self.attrs == other.attrs
            && self.source == other.source
            && match (&self.body, &other.body) {
                (BlockBody::Blockquote { content: a }, BlockBody::Blockquote { content: b }) => {
                    same_blocks(a, b)
                }
                (
                    BlockBody::List { ordered: a_ordered, items: a },
                    BlockBody::List { ordered: b_ordered, items: b },
                ) => {
                    a_ordered == b_ordered
                        && a.len() == b.len()
                        && a.iter().zip(b).all(|(a, b)| {
                            a.attrs == b.attrs && same_blocks(&a.content, &b.content)
                        })
                }
                (a, b) => a == b,
            }
    }

    /// Inline content of text-bearing blocks
    pub fn inline(&self) -> Option<&[Inline]> {
        match &self.body {
            BlockBody::Paragraph { content } | BlockBody::Heading { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn inline_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match &mut self.body {
            BlockBody::Paragraph { content } | BlockBody::Heading { content, .. } => Some(content),
            _ => None,
        }
    }
}

fn same_blocks(a: &[Block], b: &[Block]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.same_content(b))
}

/// Block content, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockBody {
    Paragraph {
        #[serde(default)]
        content: Vec<Inline>,
    },
    Heading {
        level: HeadingLevel,
        #[serde(default)]
        content: Vec<Inline>,
    },
    ImageBlock,
    Button {
        #[serde(default)]
        label: String,
    },
    Divider,
    Blockquote {
        #[serde(default)]
        content: Vec<Block>,
    },
    List {
        #[serde(default)]
        ordered: bool,
        #[serde(default)]
        items: Vec<ListItem>,
    },
    /// Atomic raw markup
    CustomCode {
        #[serde(default)]
        markup: String,
    },
}

impl BlockBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockBody::Paragraph { .. } => "paragraph",
            BlockBody::Heading { .. } => "heading",
            BlockBody::ImageBlock => "imageBlock",
            BlockBody::Button { .. } => "button",
            BlockBody::Divider => "divider",
            BlockBody::Blockquote { .. } => "blockquote",
            BlockBody::List { .. } => "list",
            BlockBody::CustomCode { .. } => "customCode",
        }
    }
}

/// Heading level, 1 through 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const H1: HeadingLevel = HeadingLevel(1);
    pub const H2: HeadingLevel = HeadingLevel(2);
    pub const H3: HeadingLevel = HeadingLevel(3);

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Elemental `text_style` value
    pub fn text_style(&self) -> &'static str {
        match self.0 {
            1 => "h1",
            2 => "h2",
            _ => "h3",
        }
    }

    pub fn from_text_style(style: &str) -> Option<Self> {
        match style {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            _ => None,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if (1..=3).contains(&level) {
            Ok(HeadingLevel(level))
        } else {
            Err(format!("heading level must be 1..=3, got {}", level))
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// List item holding nested blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: BlockId,

    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attrs: AttrMap,

    #[serde(default)]
    pub content: Vec<Block>,
}

impl ListItem {
    pub fn new(id: BlockId, content: Vec<Block>) -> Self {
        Self {
            id,
            attrs: AttrMap::new(),
            content,
        }
    }
}

/// Inline content of paragraphs and headings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "MarkSet::is_empty")]
        marks: MarkSet,
        /// Run fields with no mark equivalent, carried back on write
        #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
        attrs: AttrMap,
    },
    /// Atomic interpolation token
    Variable { name: String },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::marked(text, MarkSet::new())
    }

    pub fn marked(text: impl Into<String>, marks: MarkSet) -> Self {
        Inline::Text {
            text: text.into(),
            marks,
            attrs: AttrMap::new(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Inline::Variable { name: name.into() }
    }

    /// Length in characters; a variable token counts as one
    pub fn char_len(&self) -> usize {
        match self {
            Inline::Text { text, .. } => text.chars().count(),
            Inline::Variable { .. } => 1,
        }
    }
}
