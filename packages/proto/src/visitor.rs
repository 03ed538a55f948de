use crate::elemental::{ContentNode, ListItemNode, TextElement};
use crate::tree::{Block, BlockBody, EditorDocument, Inline, ListItem};

/// Visitor pattern for traversing editing trees immutably
///
/// Default implementations walk the entire tree.
/// Override specific visit_* methods to act on nodes.
pub trait TreeVisitor: Sized {
    fn visit_document(&mut self, doc: &EditorDocument) {
        walk_document(self, doc);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_list_item(&mut self, item: &ListItem) {
        walk_list_item(self, item);
    }

    fn visit_inline(&mut self, _inline: &Inline) {
        // Leaf node, no children to walk
    }
}

pub fn walk_document<V: TreeVisitor>(visitor: &mut V, doc: &EditorDocument) {
    for block in &doc.content {
        visitor.visit_block(block);
    }
}

pub fn walk_block<V: TreeVisitor>(visitor: &mut V, block: &Block) {
    match &block.body {
        BlockBody::Paragraph { content } | BlockBody::Heading { content, .. } => {
            for inline in content {
                visitor.visit_inline(inline);
            }
        }
        BlockBody::Blockquote { content } => {
            for child in content {
                visitor.visit_block(child);
            }
        }
        BlockBody::List { items, .. } => {
            for item in items {
                visitor.visit_list_item(item);
            }
        }
        BlockBody::ImageBlock
        | BlockBody::Button { .. }
        | BlockBody::Divider
        | BlockBody::CustomCode { .. } => {
            // Atomic, no children to walk
        }
    }
}

pub fn walk_list_item<V: TreeVisitor>(visitor: &mut V, item: &ListItem) {
    for block in &item.content {
        visitor.visit_block(block);
    }
}

/// Visitor pattern for traversing Elemental content nodes
pub trait ContentVisitor: Sized {
    fn visit_node(&mut self, node: &ContentNode) {
        walk_node(self, node);
    }

    fn visit_list_item(&mut self, item: &ListItemNode) {
        for node in &item.elements {
            self.visit_node(node);
        }
    }

    fn visit_text_element(&mut self, _element: &TextElement) {
        // Leaf node, no children to walk
    }
}

pub fn walk_node<V: ContentVisitor>(visitor: &mut V, node: &ContentNode) {
    match node {
        ContentNode::Text(text) => {
            for element in text.elements.iter().flatten() {
                visitor.visit_text_element(element);
            }
        }
        ContentNode::Quote(quote) => {
            for child in &quote.elements {
                visitor.visit_node(child);
            }
        }
        ContentNode::List(list) => {
            for item in &list.elements {
                visitor.visit_list_item(item);
            }
        }
        ContentNode::Image(_)
        | ContentNode::Action(_)
        | ContentNode::Divider(_)
        | ContentNode::Html(_)
        | ContentNode::Meta(_)
        | ContentNode::Variable(_)
        | ContentNode::Unrecognized(_) => {
            // Leaf nodes
        }
    }
}

/// Collects every block and list item id in document order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<crate::tree::BlockId>,
}

impl TreeVisitor for IdCollector {
    fn visit_block(&mut self, block: &Block) {
        self.ids.push(block.id.clone());
        walk_block(self, block);
    }

    fn visit_list_item(&mut self, item: &ListItem) {
        self.ids.push(item.id.clone());
        walk_list_item(self, item);
    }
}

/// Maximum list nesting depth of a content sequence
#[derive(Debug, Default)]
pub struct ListDepth {
    current: usize,
    pub max: usize,
}

impl ContentVisitor for ListDepth {
    fn visit_node(&mut self, node: &ContentNode) {
        if let ContentNode::List(_) = node {
            self.current += 1;
            self.max = self.max.max(self.current);
            walk_node(self, node);
            self.current -= 1;
        } else {
            walk_node(self, node);
        }
    }
}
