//! # Inline range editing
//!
//! Offsets are in characters across a block's inline content; a variable
//! token occupies exactly one position.
//!
//! ```text
//!  "Hello " {first_name} "!"
//!  0    5  6            7 8
//! ```
//!
//! Marking a range splits runs at both ends, stacks the mark onto every run
//! inside, then merges neighbours whose mark sets became identical.

use elemental_proto::{Inline, Mark, MarkKind, MarkSet};

/// Total length in characters
pub fn inline_len(content: &[Inline]) -> usize {
    content.iter().map(Inline::char_len).sum()
}

/// Add `mark` to every character in `start..end`
pub fn apply_mark(content: &mut Vec<Inline>, start: usize, end: usize, mark: &Mark) {
    for_each_in_range(content, start, end, |marks| marks.add(mark.clone()));
}

/// Remove marks of `kind` from every character in `start..end`
pub fn remove_mark(content: &mut Vec<Inline>, start: usize, end: usize, kind: MarkKind) {
    for_each_in_range(content, start, end, |marks| {
        marks.remove(kind);
    });
}

/// Insert plain text at `offset`, continuing the marks of the run it lands in
pub fn insert_text(content: &mut Vec<Inline>, offset: usize, text: &str) {
    if text.is_empty() {
        return;
    }

    let mut position = 0;
    let mut target = None;
    for (index, inline) in content.iter().enumerate() {
        let len = inline.char_len();
        if let Inline::Text { .. } = inline {
            // Prefer the run that ends at the offset, like a caret does
            if (offset > position && offset <= position + len) || (offset == 0 && position == 0) {
                target = Some((index, offset - position));
                break;
            }
        }
        position += len;
        if position > offset {
            break;
        }
    }

    match target {
        Some((index, at)) => {
            if let Inline::Text { text: run, .. } = &mut content[index] {
                let byte = byte_offset(run, at);
                run.insert_str(byte, text);
            }
        }
        None => {
            let index = split_at(content, offset);
            content.insert(index, Inline::text(text));
        }
    }

    normalize(content);
}

/// Make `offset` a run boundary and return the index of the first inline
/// at or after it
fn split_at(content: &mut Vec<Inline>, offset: usize) -> usize {
    let mut position = 0;
    for index in 0..content.len() {
        if position == offset {
            return index;
        }
        let len = content[index].char_len();
        if offset < position + len {
            if let Inline::Text { text, marks, attrs } = &content[index] {
                let byte = byte_offset(text, offset - position);
                let tail = Inline::Text {
                    text: text[byte..].to_string(),
                    marks: marks.clone(),
                    attrs: attrs.clone(),
                };
                let head = Inline::Text {
                    text: text[..byte].to_string(),
                    marks: marks.clone(),
                    attrs: attrs.clone(),
                };
                content[index] = head;
                content.insert(index + 1, tail);
                return index + 1;
            }
        }
        position += len;
    }
    content.len()
}

fn for_each_in_range(
    content: &mut Vec<Inline>,
    start: usize,
    end: usize,
    mut update: impl FnMut(&mut MarkSet),
) {
    if start >= end {
        return;
    }

    let first = split_at(content, start);
    let last = split_at(content, end);
    for inline in &mut content[first..last] {
        if let Inline::Text { marks, .. } = inline {
            update(marks);
        }
    }

    normalize(content);
}

/// Drop empty runs and merge neighbours with identical marks and run fields
pub fn normalize(content: &mut Vec<Inline>) {
    let mut merged: Vec<Inline> = Vec::with_capacity(content.len());

    for inline in content.drain(..) {
        match inline {
            Inline::Text { text, .. } if text.is_empty() => {}
            Inline::Text { text, marks, attrs } => match merged.last_mut() {
                Some(Inline::Text {
                    text: previous,
                    marks: previous_marks,
                    attrs: previous_attrs,
                }) if *previous_marks == marks && *previous_attrs == attrs => {
                    previous.push_str(&text)
                }
                _ => merged.push(Inline::Text { text, marks, attrs }),
            },
            variable => merged.push(variable),
        }
    }

    *content = merged;
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}
