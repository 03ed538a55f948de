//! Elemental → editing tree
//!
//! One block per content node, in order. Attribute bags are repaired by the
//! schema (defaults filled, malformed values replaced) before they reach the
//! tree. Structural recursion only; no position bookkeeping.

use crate::codec::EditingState;
use crate::diagnostics::{Converted, DiagnosticKind, DiagnosticSink, NodePath};
use crate::id_generator::IdGenerator;
use crate::title::read_title_into;
use elemental_proto::{
    AttrMap, Block, BlockBody, Channel, ChannelNode, ContentNode, EditorDocument, HeadingLevel,
    Inline, ListItem, ListNode, MarkSet, SourceType, StringRun, TextElement, TextNode,
    UnrecognizedReason,
};
use elemental_schema::{NodeKind, SchemaRegistry};
use serde_json::Value;
use tracing::debug;

pub(crate) struct TreeBuilder<'a> {
    registry: &'a SchemaRegistry,
    ids: IdGenerator,
    sink: DiagnosticSink,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry, channel: Channel) -> Self {
        Self {
            registry,
            ids: IdGenerator::for_channel(channel),
            sink: DiagnosticSink::default(),
        }
    }

    pub fn build(mut self, channel: &ChannelNode) -> Converted<EditingState> {
        let title = read_title_into(channel, &mut self.sink);
        let content = self.convert_nodes(&channel.elements, &NodePath::root(), true);

        let state = EditingState {
            channel: channel.channel,
            document: EditorDocument::new(content),
            title,
            raw: channel.raw.clone(),
        };
        self.sink.finish(state)
    }

    fn convert_nodes(&mut self, nodes: &[ContentNode], path: &NodePath, root: bool) -> Vec<Block> {
        nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| self.convert_node(node, &path.child(index), root))
            .collect()
    }

    fn convert_node(&mut self, node: &ContentNode, path: &NodePath, root: bool) -> Option<Block> {
        match node {
            ContentNode::Text(text) => Some(self.text_block(text, path)),
            ContentNode::Image(image) => {
                Some(self.atomic_block(NodeKind::Image, &image.attrs, path, BlockBody::ImageBlock))
            }
            ContentNode::Action(action) => Some(self.atomic_block(
                NodeKind::Action,
                &action.attrs,
                path,
                BlockBody::Button {
                    label: action.content.clone(),
                },
            )),
            ContentNode::Divider(divider) => {
                Some(self.atomic_block(NodeKind::Divider, &divider.attrs, path, BlockBody::Divider))
            }
            ContentNode::Html(html) => Some(self.atomic_block(
                NodeKind::Html,
                &html.attrs,
                path,
                BlockBody::CustomCode {
                    markup: html.content.clone(),
                },
            )),
            ContentNode::Quote(quote) => {
                let id = self.ids.next_id();
                let attrs = self.repair(NodeKind::Quote, &quote.attrs, path);
                let content = self.convert_nodes(&quote.elements, path, false);
                Some(Block {
                    id,
                    attrs,
                    source: quote.blockquote.then_some(SourceType::Blockquote),
                    body: BlockBody::Blockquote { content },
                })
            }
            ContentNode::List(list) => Some(self.list_block(list, path)),
            ContentNode::Variable(variable) => {
                // Same block shape as a text node holding only the placeholder
                let text = TextNode {
                    content: None,
                    elements: Some(vec![TextElement::variable(variable.name.clone())]),
                    attrs: variable.attrs.clone(),
                };
                Some(self.text_block(&text, path).with_source(SourceType::Variable))
            }
            ContentNode::Meta(_) => {
                // Root-level meta nodes were consumed by the title normalizer
                if !root {
                    self.sink.report(path, DiagnosticKind::NestedMeta);
                }
                None
            }
            ContentNode::Unrecognized(node) => {
                let kind = match &node.reason {
                    UnrecognizedReason::MissingType => {
                        DiagnosticKind::UnrecognizedNode { type_name: None }
                    }
                    UnrecognizedReason::UnknownType(name) => DiagnosticKind::UnrecognizedNode {
                        type_name: Some(name.clone()),
                    },
                    UnrecognizedReason::Malformed { kind, message } => {
                        DiagnosticKind::MalformedNode {
                            node: kind.type_name().to_string(),
                            message: message.clone(),
                        }
                    }
                };
                self.sink.report(path, kind);
                None
            }
        }
    }

    fn text_block(&mut self, text: &TextNode, path: &NodePath) -> Block {
        let id = self.ids.next_id();
        let mut attrs = self.repair(NodeKind::Text, &text.attrs, path);
        let level = attrs
            .remove("text_style")
            .and_then(|style| style.as_str().and_then(HeadingLevel::from_text_style));

        let content = match (&text.elements, &text.content) {
            (Some(elements), content) => {
                if content.as_deref().map_or(false, |c| !c.is_empty()) {
                    self.sink.report(path, DiagnosticKind::IgnoredTextContent);
                }
                elements
                    .iter()
                    .enumerate()
                    .filter_map(|(index, element)| self.inline_from_element(element, index, path))
                    .collect()
            }
            (None, Some(content)) if !content.is_empty() => vec![Inline::text(content.clone())],
            (None, _) => Vec::new(),
        };

        let body = match level {
            Some(level) => BlockBody::Heading { level, content },
            None => BlockBody::Paragraph { content },
        };

        Block {
            id,
            attrs,
            source: None,
            body,
        }
    }

    fn list_block(&mut self, list: &ListNode, path: &NodePath) -> Block {
        let id = self.ids.next_id();
        let mut attrs = self.repair(NodeKind::List, &list.attrs, path);
        let ordered = matches!(
            attrs.remove("list_type"),
            Some(Value::String(list_type)) if list_type == "ordered"
        );

        let items = list
            .elements
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item_path = path.child(index);
                let item_id = self.ids.next_id();
                let item_attrs = self.repair(NodeKind::ListItem, &item.attrs, &item_path);
                ListItem {
                    id: item_id,
                    attrs: item_attrs,
                    content: self.convert_nodes(&item.elements, &item_path, false),
                }
            })
            .collect();

        Block {
            id,
            attrs,
            source: None,
            body: BlockBody::List { ordered, items },
        }
    }

    fn atomic_block(
        &mut self,
        kind: NodeKind,
        attrs: &AttrMap,
        path: &NodePath,
        body: BlockBody,
    ) -> Block {
        let id = self.ids.next_id();
        let attrs = self.repair(kind, attrs, path);
        Block::new(id, body).with_attrs(attrs)
    }

    fn repair(&mut self, kind: NodeKind, attrs: &AttrMap, path: &NodePath) -> AttrMap {
        let repaired = self.registry.repair(kind, attrs);
        for (attribute, issue) in repaired.issues {
            self.sink.report(
                path,
                DiagnosticKind::malformed_attribute(kind, &attribute, issue.to_string()),
            );
        }
        repaired.attrs
    }

    fn inline_from_element(
        &mut self,
        element: &TextElement,
        index: usize,
        path: &NodePath,
    ) -> Option<Inline> {
        match element {
            TextElement::String(run) if run.content.is_empty() => {
                debug!("Dropping empty string run");
                None
            }
            TextElement::String(run) => Some(self.inline_from_run(run, index, path)),
            TextElement::Variable(variable) => Some(Inline::variable(variable.name.clone())),
        }
    }

    /// Malformed flags fall back to unset
    fn inline_from_run(&mut self, run: &StringRun, index: usize, path: &NodePath) -> Inline {
        for (flag, value) in run.malformed_flags() {
            let expected = if flag == "href" { "a string" } else { "a boolean" };
            self.sink.report(
                path,
                DiagnosticKind::malformed_attribute(
                    NodeKind::Text,
                    &format!("elements[{}].{}", index, flag),
                    format!("expected {}, found {}", expected, value),
                ),
            );
        }

        Inline::Text {
            text: run.content.clone(),
            marks: MarkSet::from_flags(&run.style),
            attrs: run.unknown_fields(),
        }
    }
}
