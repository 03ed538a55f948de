//! # Mark Model
//!
//! Inline formatting marks and their stacking rules.
//!
//! A [`MarkSet`] is kept in canonical order (link outermost, then bold,
//! italic, underline, strike) so two runs with the same formatting always
//! compare equal regardless of the order the marks were applied in. Each
//! mark kind appears at most once; adding a second link replaces the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inline formatting mark
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mark {
    Link { href: String },
    Bold,
    Italic,
    Underline,
    Strike,
}

/// Mark identity without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Link,
    Bold,
    Italic,
    Underline,
    Strike,
}

impl Mark {
    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Link { .. } => MarkKind::Link,
            Mark::Bold => MarkKind::Bold,
            Mark::Italic => MarkKind::Italic,
            Mark::Underline => MarkKind::Underline,
            Mark::Strike => MarkKind::Strike,
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link { href: href.into() }
    }
}

/// Canonically ordered set of marks on one inline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Mark>", into = "Vec<Mark>")]
pub struct MarkSet(Vec<Mark>);

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.0.iter()
    }

    pub fn contains(&self, kind: MarkKind) -> bool {
        self.0.iter().any(|mark| mark.kind() == kind)
    }

    /// Add a mark, replacing any mark of the same kind
    pub fn add(&mut self, mark: Mark) {
        let kind = mark.kind();
        match self.0.binary_search_by(|m| m.kind().cmp(&kind)) {
            Ok(index) => self.0[index] = mark,
            Err(index) => self.0.insert(index, mark),
        }
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.add(mark);
        self
    }

    pub fn remove(&mut self, kind: MarkKind) -> Option<Mark> {
        let index = self.0.iter().position(|mark| mark.kind() == kind)?;
        Some(self.0.remove(index))
    }

    pub fn link_href(&self) -> Option<&str> {
        self.0.iter().find_map(|mark| match mark {
            Mark::Link { href } => Some(href.as_str()),
            _ => None,
        })
    }

    pub fn to_flags(&self) -> StyleFlags {
        StyleFlags {
            bold: self.contains(MarkKind::Bold),
            italic: self.contains(MarkKind::Italic),
            underline: self.contains(MarkKind::Underline),
            strike: self.contains(MarkKind::Strike),
            href: self.link_href().map(str::to_string),
        }
    }

    pub fn from_flags(flags: &StyleFlags) -> Self {
        let mut set = MarkSet::new();
        if let Some(href) = &flags.href {
            set.add(Mark::link(href.clone()));
        }
        if flags.bold {
            set.add(Mark::Bold);
        }
        if flags.italic {
            set.add(Mark::Italic);
        }
        if flags.underline {
            set.add(Mark::Underline);
        }
        if flags.strike {
            set.add(Mark::Strike);
        }
        set
    }
}

impl From<Vec<Mark>> for MarkSet {
    fn from(marks: Vec<Mark>) -> Self {
        let mut set = MarkSet::new();
        for mark in marks {
            set.add(mark);
        }
        set
    }
}

impl From<MarkSet> for Vec<Mark> {
    fn from(set: MarkSet) -> Self {
        set.0
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

/// Elemental style flags of a string run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleFlags {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,

    #[serde(default, alias = "strikethrough", skip_serializing_if = "is_false")]
    pub strike: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl StyleFlags {
    /// Run keys that carry a style flag
    pub const FLAG_NAMES: [&'static str; 6] =
        ["bold", "italic", "underline", "strike", "strikethrough", "href"];

    pub fn is_plain(&self) -> bool {
        *self == StyleFlags::default()
    }

    pub fn is_flag_name(name: &str) -> bool {
        Self::FLAG_NAMES.contains(&name)
    }

    /// Set one flag from its JSON value. Returns `false`, leaving the flag
    /// untouched, when the value has the wrong type for that flag.
    pub fn set_flag(&mut self, name: &str, value: &Value) -> bool {
        let slot = match name {
            "bold" => &mut self.bold,
            "italic" => &mut self.italic,
            "underline" => &mut self.underline,
            "strike" | "strikethrough" => &mut self.strike,
            "href" => {
                return match value {
                    Value::String(href) => {
                        self.href = Some(href.clone());
                        true
                    }
                    Value::Null => {
                        self.href = None;
                        true
                    }
                    _ => false,
                }
            }
            _ => return false,
        };

        match value {
            Value::Bool(flag) => {
                *slot = *flag;
                true
            }
            _ => false,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
