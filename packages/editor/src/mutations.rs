//! # Tree Mutations
//!
//! High-level editing operations on one channel's editing state.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation names a user-level edit
//! 2. **Validated**: a mutation that fails leaves the state untouched
//! 3. **Structural**: positions are block ids and character offsets,
//!    never document-wide integer positions
//!
//! ## Mutation Semantics
//!
//! ### MoveBlock
//! - Relocates a block, with its subtree, under a new parent at an index
//! - Fails if the parent is the block itself or one of its descendants
//!
//! ### ApplyMark / RemoveMark
//! - Range in characters over the block's inline content
//! - Runs are split at the range ends and merged again afterwards
//!
//! ### SetAttribute
//! - Checked against the block's node schema; `null` removes the attribute
//! - `text_style` and `list_type` are structural and cannot be set here

use crate::inline;
use crate::location::{children_of, container_mut, locate, Target};
use elemental_codec::EditingState;
use elemental_proto::{
    Block, BlockBody, BlockId, EditorDocument, HeadingLevel, IdCollector, Inline, Mark, MarkKind,
    TreeVisitor,
};
use elemental_schema::{NodeKind, SchemaRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Editing operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a block under `parent` (root when `None`) at `index`
    InsertBlock {
        parent: Option<BlockId>,
        index: usize,
        block: Block,
    },

    /// Remove a block with everything inside it
    RemoveBlock { block_id: BlockId },

    /// Move a block under a new parent at `index`
    MoveBlock {
        block_id: BlockId,
        new_parent: Option<BlockId>,
        index: usize,
    },

    /// Replace the inline content of a paragraph or heading
    ReplaceInline {
        block_id: BlockId,
        content: Vec<Inline>,
    },

    /// Type text at a character offset
    InsertText {
        block_id: BlockId,
        offset: usize,
        text: String,
    },

    ApplyMark {
        block_id: BlockId,
        start: usize,
        end: usize,
        mark: Mark,
    },

    RemoveMark {
        block_id: BlockId,
        start: usize,
        end: usize,
        kind: MarkKind,
    },

    SetAttribute {
        block_id: BlockId,
        name: String,
        value: Value,
    },

    /// Turn a paragraph into a heading, or back with `None`
    SetHeadingLevel {
        block_id: BlockId,
        level: Option<HeadingLevel>,
    },

    /// Change the channel title, keeping its storage location
    SetTitle { title: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Parent not found: {0}")]
    ParentNotFound(BlockId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Block {0} has no inline content")]
    NotText(BlockId),

    #[error("Range {start}..{end} out of bounds for length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Invalid attribute {name}: {message}")]
    InvalidAttribute { name: String, message: String },
}

pub type MutationResult = Result<(), MutationError>;

impl Mutation {
    /// Apply to the editing state. On error nothing has changed.
    pub fn apply(&self, state: &mut EditingState) -> MutationResult {
        debug!(mutation = self.name(), "Applying mutation");
        let doc = &mut state.document;

        match self {
            Mutation::InsertBlock {
                parent,
                index,
                block,
            } => Self::apply_insert(doc, parent.as_ref(), *index, block),

            Mutation::RemoveBlock { block_id } => Self::apply_remove(doc, block_id).map(|_| ()),

            Mutation::MoveBlock {
                block_id,
                new_parent,
                index,
            } => Self::apply_move(doc, block_id, new_parent.as_ref(), *index),

            Mutation::ReplaceInline { block_id, content } => {
                let inline = Self::inline_mut(doc, block_id)?;
                *inline = content.clone();
                inline::normalize(inline);
                Ok(())
            }

            Mutation::InsertText {
                block_id,
                offset,
                text,
            } => {
                let content = Self::inline_mut(doc, block_id)?;
                check_range(content, *offset, *offset)?;
                inline::insert_text(content, *offset, text);
                Ok(())
            }

            Mutation::ApplyMark {
                block_id,
                start,
                end,
                mark,
            } => {
                let content = Self::inline_mut(doc, block_id)?;
                check_range(content, *start, *end)?;
                inline::apply_mark(content, *start, *end, mark);
                Ok(())
            }

            Mutation::RemoveMark {
                block_id,
                start,
                end,
                kind,
            } => {
                let content = Self::inline_mut(doc, block_id)?;
                check_range(content, *start, *end)?;
                inline::remove_mark(content, *start, *end, *kind);
                Ok(())
            }

            Mutation::SetAttribute {
                block_id,
                name,
                value,
            } => Self::apply_set_attribute(doc, block_id, name, value),

            Mutation::SetHeadingLevel { block_id, level } => {
                Self::apply_heading_level(doc, block_id, *level)
            }

            Mutation::SetTitle { title } => {
                state.title.set(title.clone());
                Ok(())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "insert_block",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::ReplaceInline { .. } => "replace_inline",
            Mutation::InsertText { .. } => "insert_text",
            Mutation::ApplyMark { .. } => "apply_mark",
            Mutation::RemoveMark { .. } => "remove_mark",
            Mutation::SetAttribute { .. } => "set_attribute",
            Mutation::SetHeadingLevel { .. } => "set_heading_level",
            Mutation::SetTitle { .. } => "set_title",
        }
    }

    fn apply_insert(
        doc: &mut EditorDocument,
        parent: Option<&BlockId>,
        index: usize,
        block: &Block,
    ) -> MutationResult {
        let existing = collect_ids(&doc.content);
        for id in collect_ids(std::slice::from_ref(block)) {
            if existing.contains(&id) {
                return Err(MutationError::DuplicateId(id));
            }
        }

        let children = Self::children(doc, parent)?;
        let index = index.min(children.len());
        children.insert(index, block.clone());
        Ok(())
    }

    fn apply_remove(doc: &mut EditorDocument, block_id: &BlockId) -> Result<Block, MutationError> {
        let not_found = || MutationError::BlockNotFound(block_id.clone());

        match locate(&doc.content, block_id).ok_or_else(not_found)? {
            Target::Block { container, index } => {
                let blocks = container_mut(&mut doc.content, &container).ok_or_else(not_found)?;
                Ok(blocks.remove(index))
            }
            Target::Item(_) => Err(MutationError::InvalidStructure(
                "list items are removed through their list".to_string(),
            )),
        }
    }

    fn apply_move(
        doc: &mut EditorDocument,
        block_id: &BlockId,
        new_parent: Option<&BlockId>,
        index: usize,
    ) -> MutationResult {
        let block = doc
            .find(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;

        if let Some(parent) = new_parent {
            if collect_ids(std::slice::from_ref(block)).contains(parent) {
                return Err(MutationError::CycleDetected);
            }
            // Validate the destination before detaching anything
            Self::children(doc, Some(parent))?;
        }

        let block = Self::apply_remove(doc, block_id)?;
        let children = Self::children(doc, new_parent)?;
        let index = index.min(children.len());
        children.insert(index, block);
        Ok(())
    }

    fn apply_set_attribute(
        doc: &mut EditorDocument,
        block_id: &BlockId,
        name: &str,
        value: &Value,
    ) -> MutationResult {
        let block = doc
            .find_mut(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
        let kind = node_kind(&block.body);

        if name == "text_style" || name == "list_type" {
            return Err(MutationError::InvalidAttribute {
                name: name.to_string(),
                message: "structural attribute; edit the block type instead".to_string(),
            });
        }

        if value.is_null() {
            block.attrs.remove(name);
            return Ok(());
        }

        SchemaRegistry::standard()
            .validate(kind, name, value)
            .map_err(|issue| MutationError::InvalidAttribute {
                name: name.to_string(),
                message: issue.to_string(),
            })?;
        block.attrs.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn apply_heading_level(
        doc: &mut EditorDocument,
        block_id: &BlockId,
        level: Option<HeadingLevel>,
    ) -> MutationResult {
        let block = doc
            .find_mut(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;

        let content = match &mut block.body {
            BlockBody::Paragraph { content } | BlockBody::Heading { content, .. } => {
                std::mem::take(content)
            }
            _ => return Err(MutationError::NotText(block_id.clone())),
        };

        block.body = match level {
            Some(level) => BlockBody::Heading { level, content },
            None => BlockBody::Paragraph { content },
        };
        Ok(())
    }

    fn inline_mut<'a>(
        doc: &'a mut EditorDocument,
        block_id: &BlockId,
    ) -> Result<&'a mut Vec<Inline>, MutationError> {
        doc.find_mut(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?
            .inline_mut()
            .ok_or_else(|| MutationError::NotText(block_id.clone()))
    }

    fn children<'a>(
        doc: &'a mut EditorDocument,
        parent: Option<&BlockId>,
    ) -> Result<&'a mut Vec<Block>, MutationError> {
        if let Some(parent) = parent {
            if locate(&doc.content, parent).is_none() {
                return Err(MutationError::ParentNotFound(parent.clone()));
            }
        }
        children_of(&mut doc.content, parent).ok_or_else(|| {
            MutationError::InvalidStructure("parent block cannot contain blocks".to_string())
        })
    }
}

fn check_range(content: &[Inline], start: usize, end: usize) -> MutationResult {
    let len = inline::inline_len(content);
    if start > end || end > len {
        return Err(MutationError::RangeOutOfBounds { start, end, len });
    }
    Ok(())
}

fn collect_ids(blocks: &[Block]) -> Vec<BlockId> {
    let mut collector = IdCollector::default();
    for block in blocks {
        collector.visit_block(block);
    }
    collector.ids
}

/// Schema node kind behind a block
pub fn node_kind(body: &BlockBody) -> NodeKind {
    match body {
        BlockBody::Paragraph { .. } | BlockBody::Heading { .. } => NodeKind::Text,
        BlockBody::ImageBlock => NodeKind::Image,
        BlockBody::Button { .. } => NodeKind::Action,
        BlockBody::Divider => NodeKind::Divider,
        BlockBody::Blockquote { .. } => NodeKind::Quote,
        BlockBody::List { .. } => NodeKind::List,
        BlockBody::CustomCode { .. } => NodeKind::Html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_proto::{Channel, ListItem};
    use serde_json::json;

    fn paragraph(id: &str, text: &str) -> Block {
        Block::new(
            BlockId::new(id),
            BlockBody::Paragraph {
                content: vec![Inline::text(text)],
            },
        )
    }

    fn state() -> EditingState {
        let mut state = EditingState::empty(Channel::Email);
        state.document = EditorDocument::new(vec![
            paragraph("a", "Hello world"),
            Block::new(
                BlockId::new("quote"),
                BlockBody::Blockquote {
                    content: vec![paragraph("b", "quoted")],
                },
            ),
            Block::new(
                BlockId::new("list"),
                BlockBody::List {
                    ordered: false,
                    items: vec![ListItem::new(BlockId::new("item"), vec![])],
                },
            ),
        ]);
        state
    }

    #[test]
    fn test_insert_into_list_item() {
        let mut state = state();
        Mutation::InsertBlock {
            parent: Some(BlockId::new("item")),
            index: 0,
            block: paragraph("c", "new"),
        }
        .apply(&mut state)
        .unwrap();

        assert!(state.document.find(&BlockId::new("c")).is_some());
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let mut state = state();
        let result = Mutation::InsertBlock {
            parent: None,
            index: 0,
            block: paragraph("b", "dup"),
        }
        .apply(&mut state);

        assert_eq!(result, Err(MutationError::DuplicateId(BlockId::new("b"))));
    }

    #[test]
    fn test_insert_into_paragraph_fails() {
        let mut state = state();
        let result = Mutation::InsertBlock {
            parent: Some(BlockId::new("a")),
            index: 0,
            block: paragraph("c", "x"),
        }
        .apply(&mut state);

        assert!(matches!(result, Err(MutationError::InvalidStructure(_))));
    }

    #[test]
    fn test_move_into_own_subtree_fails() {
        let mut state = state();
        let before = state.clone();
        let result = Mutation::MoveBlock {
            block_id: BlockId::new("quote"),
            new_parent: Some(BlockId::new("quote")),
            index: 0,
        }
        .apply(&mut state);

        assert_eq!(result, Err(MutationError::CycleDetected));
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_out_of_quote() {
        let mut state = state();
        Mutation::MoveBlock {
            block_id: BlockId::new("b"),
            new_parent: None,
            index: 0,
        }
        .apply(&mut state)
        .unwrap();

        assert_eq!(state.document.content[0].id, BlockId::new("b"));
        match &state.document.content[2].body {
            BlockBody::Blockquote { content } => assert!(content.is_empty()),
            other => panic!("expected blockquote, got {:?}", other),
        }
    }

    #[test]
    fn test_set_attribute_validates() {
        let mut state = state();
        let result = Mutation::SetAttribute {
            block_id: BlockId::new("a"),
            name: "align".to_string(),
            value: json!("sideways"),
        }
        .apply(&mut state);
        assert!(matches!(result, Err(MutationError::InvalidAttribute { .. })));

        Mutation::SetAttribute {
            block_id: BlockId::new("a"),
            name: "align".to_string(),
            value: json!("center"),
        }
        .apply(&mut state)
        .unwrap();
        assert_eq!(state.document.content[0].attrs["align"], "center");
    }

    #[test]
    fn test_heading_level_round_trip() {
        let mut state = state();
        let id = BlockId::new("a");
        Mutation::SetHeadingLevel {
            block_id: id.clone(),
            level: Some(HeadingLevel::H1),
        }
        .apply(&mut state)
        .unwrap();
        assert!(matches!(
            state.document.content[0].body,
            BlockBody::Heading { level: HeadingLevel::H1, .. }
        ));

        Mutation::SetHeadingLevel {
            block_id: id,
            level: None,
        }
        .apply(&mut state)
        .unwrap();
        assert_eq!(
            state.document.content[0].body,
            BlockBody::Paragraph {
                content: vec![Inline::text("Hello world")]
            }
        );
    }

    #[test]
    fn test_mark_range_checked() {
        let mut state = state();
        let result = Mutation::ApplyMark {
            block_id: BlockId::new("a"),
            start: 3,
            end: 40,
            mark: Mark::Bold,
        }
        .apply(&mut state);

        assert_eq!(
            result,
            Err(MutationError::RangeOutOfBounds {
                start: 3,
                end: 40,
                len: 11
            })
        );
    }
}
