//! # Semantic normalization
//!
//! Two node sequences are *semantically equal* when they render the same.
//! The canonical form used to decide this is computed directly on Elemental
//! nodes, without going through the editing tree, so it can serve as the
//! oracle for round-trip tests.
//!
//! ```text
//! attributes     repaired by the schema, then default values removed
//! text runs      empty runs dropped, malformed style flags dropped,
//!                equal-style neighbours merged, all-plain runs
//!                collapsed into `content`
//! quote          `blockquote` and `quote` spellings are the same node
//! meta           first root-level meta kept in place, others dropped
//! unrecognized   dropped
//! ```
//!
//! A `text` node holding one variable and a standalone `variable` node stay
//! distinct: the codec writes each back in the form it was read.

use elemental_proto::{
    AttrMap, ChannelNode, ContentNode, ListItemNode, ListNode, MarkSet, MetaNode, QuoteNode,
    StringRun, StyleFlags, TextElement, TextNode, VariableNode,
};
use elemental_schema::{NodeKind, SchemaRegistry};

/// Canonical form of a channel's root node sequence
pub fn normalize_nodes(registry: &SchemaRegistry, nodes: &[ContentNode]) -> Vec<ContentNode> {
    let mut seen_meta = false;
    nodes
        .iter()
        .filter_map(|node| match node {
            ContentNode::Meta(meta) if !seen_meta => {
                seen_meta = true;
                Some(ContentNode::Meta(MetaNode::titled(meta.title.clone())))
            }
            _ => normalize_node(registry, node),
        })
        .collect()
}

/// Canonical form of a whole channel; an empty `raw` is the same as none
pub fn normalize_channel(registry: &SchemaRegistry, channel: &ChannelNode) -> ChannelNode {
    ChannelNode {
        channel: channel.channel,
        elements: normalize_nodes(registry, &channel.elements),
        raw: channel.raw.clone().filter(|raw| !raw.is_empty()),
    }
}

pub fn semantically_equal(registry: &SchemaRegistry, a: &[ContentNode], b: &[ContentNode]) -> bool {
    normalize_nodes(registry, a) == normalize_nodes(registry, b)
}

fn normalize_children(registry: &SchemaRegistry, nodes: &[ContentNode]) -> Vec<ContentNode> {
    nodes
        .iter()
        .filter_map(|node| normalize_node(registry, node))
        .collect()
}

fn normalize_node(registry: &SchemaRegistry, node: &ContentNode) -> Option<ContentNode> {
    let attrs = |kind: NodeKind, attrs: &AttrMap| canonical_attrs(registry, kind, attrs);

    let node = match node {
        ContentNode::Meta(_) | ContentNode::Unrecognized(_) => return None,
        ContentNode::Text(text) => normalize_text(registry, text),
        ContentNode::Variable(variable) => ContentNode::Variable(VariableNode {
            name: variable.name.clone(),
            attrs: attrs(NodeKind::Text, &variable.attrs),
        }),
        ContentNode::Image(image) => {
            let mut image = image.clone();
            image.attrs = attrs(NodeKind::Image, &image.attrs);
            ContentNode::Image(image)
        }
        ContentNode::Action(action) => {
            let mut action = action.clone();
            action.attrs = attrs(NodeKind::Action, &action.attrs);
            ContentNode::Action(action)
        }
        ContentNode::Divider(divider) => {
            let mut divider = divider.clone();
            divider.attrs = attrs(NodeKind::Divider, &divider.attrs);
            ContentNode::Divider(divider)
        }
        ContentNode::Html(html) => {
            let mut html = html.clone();
            html.attrs = attrs(NodeKind::Html, &html.attrs);
            ContentNode::Html(html)
        }
        ContentNode::Quote(quote) => ContentNode::Quote(QuoteNode {
            elements: normalize_children(registry, &quote.elements),
            attrs: attrs(NodeKind::Quote, &quote.attrs),
            blockquote: false,
        }),
        ContentNode::List(list) => ContentNode::List(ListNode {
            elements: list
                .elements
                .iter()
                .map(|item| ListItemNode {
                    elements: normalize_children(registry, &item.elements),
                    attrs: attrs(NodeKind::ListItem, &item.attrs),
                })
                .collect(),
            attrs: attrs(NodeKind::List, &list.attrs),
        }),
    };

    Some(node)
}

fn canonical_attrs(registry: &SchemaRegistry, kind: NodeKind, attrs: &AttrMap) -> AttrMap {
    let repaired = registry.repair(kind, attrs).attrs;
    registry.strip_defaults(kind, &repaired)
}

fn normalize_text(registry: &SchemaRegistry, text: &TextNode) -> ContentNode {
    let attrs = canonical_attrs(registry, NodeKind::Text, &text.attrs);

    let elements = match &text.elements {
        Some(elements) => merge_elements(elements),
        None => match text.content.as_deref() {
            Some(content) if !content.is_empty() => {
                vec![TextElement::string(content, StyleFlags::default())]
            }
            _ => Vec::new(),
        },
    };

    let plain = elements.iter().all(|element| match element {
        TextElement::String(run) => run.style.is_plain() && run.extra.is_empty(),
        TextElement::Variable(_) => false,
    });

    if plain {
        let content = elements
            .iter()
            .filter_map(|element| match element {
                TextElement::String(run) => Some(run.content.as_str()),
                TextElement::Variable(_) => None,
            })
            .collect::<String>();
        return ContentNode::Text(TextNode {
            content: Some(content),
            elements: None,
            attrs,
        });
    }

    ContentNode::Text(TextNode {
        content: None,
        elements: Some(elements),
        attrs,
    })
}

fn merge_elements(elements: &[TextElement]) -> Vec<TextElement> {
    let mut merged: Vec<TextElement> = Vec::new();

    for element in elements {
        match element {
            TextElement::String(run) if run.content.is_empty() => {}
            TextElement::String(run) => {
                let style = MarkSet::from_flags(&run.style).to_flags();
                let extra = run.unknown_fields();
                match merged.last_mut() {
                    Some(TextElement::String(previous))
                        if previous.style == style && previous.extra == extra =>
                    {
                        previous.content.push_str(&run.content);
                    }
                    _ => merged.push(TextElement::String(StringRun {
                        content: run.content.clone(),
                        style,
                        extra,
                    })),
                }
            }
            TextElement::Variable(_) => merged.push(element.clone()),
        }
    }

    merged
}
