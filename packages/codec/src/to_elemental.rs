//! Editing tree → Elemental
//!
//! Paragraphs and headings become `text` nodes. Adjacent runs with the same
//! mark set are merged into one string element; a text node whose runs are
//! all unmarked is written in the plain `content` form. A paragraph read from
//! a standalone `variable` node goes back to one while it still holds only
//! that placeholder.

use crate::codec::{CodecOptions, EditingState};
use crate::diagnostics::{Converted, DiagnosticSink};
use crate::title::write_title;
use elemental_proto::{
    ActionNode, AttrMap, Block, BlockBody, ChannelPatch, ContentNode, DividerNode, HeadingLevel,
    HtmlNode, ImageNode, Inline, ListItem, ListItemNode, ListNode, MarkSet, QuoteNode, SourceType,
    StringRun, TextElement, TextNode, VariableNode,
};
use elemental_schema::{NodeKind, SchemaRegistry};
use serde_json::Value;

pub(crate) struct ElementalWriter<'a> {
    registry: &'a SchemaRegistry,
    options: &'a CodecOptions,
}

impl<'a> ElementalWriter<'a> {
    pub fn new(registry: &'a SchemaRegistry, options: &'a CodecOptions) -> Self {
        Self { registry, options }
    }

    pub fn write(&self, state: &EditingState) -> Converted<ChannelPatch> {
        let sink = DiagnosticSink::default();
        let nodes = self.write_blocks(&state.document.content);
        let (elements, raw) = write_title(nodes, state.raw.clone(), &state.title);

        sink.finish(ChannelPatch {
            channel: state.channel,
            elements,
            raw,
        })
    }

    fn write_blocks(&self, blocks: &[Block]) -> Vec<ContentNode> {
        blocks.iter().map(|block| self.write_block(block)).collect()
    }

    fn write_block(&self, block: &Block) -> ContentNode {
        match &block.body {
            BlockBody::Paragraph { content } => self.write_text(block, None, content),
            BlockBody::Heading { level, content } => self.write_text(block, Some(*level), content),
            BlockBody::ImageBlock => ContentNode::Image(ImageNode {
                attrs: self.finish_attrs(NodeKind::Image, block.attrs.clone()),
            }),
            BlockBody::Button { label } => ContentNode::Action(ActionNode {
                content: label.clone(),
                attrs: self.finish_attrs(NodeKind::Action, block.attrs.clone()),
            }),
            BlockBody::Divider => ContentNode::Divider(DividerNode {
                attrs: self.finish_attrs(NodeKind::Divider, block.attrs.clone()),
            }),
            BlockBody::CustomCode { markup } => ContentNode::Html(HtmlNode {
                content: markup.clone(),
                attrs: self.finish_attrs(NodeKind::Html, block.attrs.clone()),
            }),
            BlockBody::Blockquote { content } => ContentNode::Quote(QuoteNode {
                elements: self.write_blocks(content),
                attrs: self.finish_attrs(NodeKind::Quote, block.attrs.clone()),
                blockquote: block.source == Some(SourceType::Blockquote),
            }),
            BlockBody::List { ordered, items } => {
                let mut attrs = block.attrs.clone();
                let list_type = if *ordered { "ordered" } else { "unordered" };
                attrs.insert("list_type".to_string(), Value::from(list_type));

                ContentNode::List(ListNode {
                    elements: items.iter().map(|item| self.write_list_item(item)).collect(),
                    attrs: self.finish_attrs(NodeKind::List, attrs),
                })
            }
        }
    }

    fn write_list_item(&self, item: &ListItem) -> ListItemNode {
        ListItemNode {
            elements: self.write_blocks(&item.content),
            attrs: self.finish_attrs(NodeKind::ListItem, item.attrs.clone()),
        }
    }

    fn write_text(&self, block: &Block, level: Option<HeadingLevel>, content: &[Inline]) -> ContentNode {
        let mut attrs = block.attrs.clone();
        match level {
            Some(level) => {
                attrs.insert("text_style".to_string(), Value::from(level.text_style()));
            }
            None => {
                attrs.remove("text_style");
            }
        }

        if let (Some(SourceType::Variable), None, [Inline::Variable { name }]) =
            (block.source, level, content)
        {
            return ContentNode::Variable(VariableNode {
                name: name.clone(),
                attrs: self.registry.strip_defaults(NodeKind::Text, &attrs),
            });
        }

        let attrs = self.finish_attrs(NodeKind::Text, attrs);
        let runs = merge_runs(content);

        if runs.iter().all(Run::is_plain) {
            let text: String = runs
                .iter()
                .filter_map(|run| match run {
                    Run::Text(text, ..) => Some(text.as_str()),
                    Run::Variable(_) => None,
                })
                .collect();
            return ContentNode::Text(TextNode {
                content: Some(text),
                elements: None,
                attrs,
            });
        }

        ContentNode::Text(TextNode {
            content: None,
            elements: Some(runs.into_iter().map(Run::into_element).collect()),
            attrs,
        })
    }

    fn finish_attrs(&self, kind: NodeKind, attrs: AttrMap) -> AttrMap {
        if self.options.emit_default_attributes {
            self.registry.repair(kind, &attrs).attrs
        } else {
            self.registry.strip_defaults(kind, &attrs)
        }
    }
}

/// Contiguous inline content with one mark set and one set of run fields
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Run {
    Text(String, MarkSet, AttrMap),
    Variable(String),
}

impl Run {
    fn is_plain(&self) -> bool {
        matches!(self, Run::Text(_, marks, attrs) if marks.is_empty() && attrs.is_empty())
    }

    fn into_element(self) -> TextElement {
        match self {
            Run::Text(content, marks, extra) => TextElement::String(StringRun {
                content,
                style: marks.to_flags(),
                extra,
            }),
            Run::Variable(name) => TextElement::variable(name),
        }
    }
}

/// Merge adjacent text runs that carry identical marks and run fields.
/// Empty runs vanish.
pub(crate) fn merge_runs(content: &[Inline]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for inline in content {
        match inline {
            Inline::Text { text, .. } if text.is_empty() => {}
            Inline::Text { text, marks, attrs } => match runs.last_mut() {
                Some(Run::Text(previous, previous_marks, previous_attrs))
                    if previous_marks == marks && previous_attrs == attrs =>
                {
                    previous.push_str(text);
                }
                _ => runs.push(Run::Text(text.clone(), marks.clone(), attrs.clone())),
            },
            Inline::Variable { name } => runs.push(Run::Variable(name.clone())),
        }
    }

    runs
}
