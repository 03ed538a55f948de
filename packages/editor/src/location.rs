//! Resolving block ids to positions in the tree
//!
//! A position is recorded as the chain of containers leading to it, so a
//! mutable reference can be re-derived one level at a time.

use elemental_proto::{Block, BlockBody, BlockId};

/// One level of descent: a blockquote, or one item of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub block: usize,
    pub item: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    /// A block at `index` inside the container reached by `container`
    Block { container: Vec<Step>, index: usize },
    /// A list item; the steps lead to its content
    Item(Vec<Step>),
}

pub(crate) fn locate(blocks: &[Block], id: &BlockId) -> Option<Target> {
    locate_in(blocks, id, &mut Vec::new())
}

fn locate_in(blocks: &[Block], id: &BlockId, trail: &mut Vec<Step>) -> Option<Target> {
    for (index, block) in blocks.iter().enumerate() {
        if &block.id == id {
            return Some(Target::Block {
                container: trail.clone(),
                index,
            });
        }

        match &block.body {
            BlockBody::Blockquote { content } => {
                trail.push(Step { block: index, item: None });
                if let Some(target) = locate_in(content, id, trail) {
                    return Some(target);
                }
                trail.pop();
            }
            BlockBody::List { items, .. } => {
                for (item_index, item) in items.iter().enumerate() {
                    trail.push(Step {
                        block: index,
                        item: Some(item_index),
                    });
                    if &item.id == id {
                        return Some(Target::Item(trail.clone()));
                    }
                    if let Some(target) = locate_in(&item.content, id, trail) {
                        return Some(target);
                    }
                    trail.pop();
                }
            }
            _ => {}
        }
    }
    None
}

/// Follow `steps` down from `blocks` to a child block sequence
pub(crate) fn container_mut<'a>(
    blocks: &'a mut Vec<Block>,
    steps: &[Step],
) -> Option<&'a mut Vec<Block>> {
    let mut current = blocks;
    for step in steps {
        let block = current.get_mut(step.block)?;
        current = match (&mut block.body, step.item) {
            (BlockBody::Blockquote { content }, None) => content,
            (BlockBody::List { items, .. }, Some(item)) => &mut items.get_mut(item)?.content,
            _ => return None,
        };
    }
    Some(current)
}

/// Child sequence that new blocks can be placed into: the root, a
/// blockquote, or a list item
pub(crate) fn children_of<'a>(
    root: &'a mut Vec<Block>,
    parent: Option<&BlockId>,
) -> Option<&'a mut Vec<Block>> {
    let Some(parent) = parent else {
        return Some(root);
    };

    match locate(root, parent)? {
        Target::Item(steps) => container_mut(root, &steps),
        Target::Block { container, index } => {
            let mut steps = container;
            steps.push(Step { block: index, item: None });
            container_mut(root, &steps)
        }
    }
}
