//! Structured diagnostics reported by the converters
//!
//! The codec never raises user-facing errors. Anything it had to skip or
//! repair is recorded here for the caller to log or ignore, and mirrored to
//! `tracing` as it happens.

use elemental_schema::NodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Content was dropped or replaced
    Warning,
    /// Content was reshaped without loss
    Info,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Node with an unknown or missing `type`; skipped
    UnrecognizedNode { type_name: Option<String> },

    /// Node of a known type whose structure did not decode; skipped
    MalformedNode { node: String, message: String },

    /// Attribute value rejected by the schema; default substituted
    MalformedAttribute {
        node: String,
        attribute: String,
        message: String,
    },

    /// Second `meta` node in a channel; ignored
    DuplicateMeta,

    /// `meta` nested inside a list or quote; ignored
    NestedMeta,

    /// Both `meta` and `raw.subject` present; `meta` wins
    ConflictingTitle,

    /// A text node carried both `content` and `elements`; `content` ignored
    IgnoredTextContent,
}

impl DiagnosticKind {
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            DiagnosticKind::ConflictingTitle | DiagnosticKind::IgnoredTextContent => {
                DiagnosticLevel::Info
            }
            _ => DiagnosticLevel::Warning,
        }
    }

    pub(crate) fn malformed_attribute(kind: NodeKind, attribute: &str, message: String) -> Self {
        DiagnosticKind::MalformedAttribute {
            node: kind.type_name().to_string(),
            attribute: attribute.to_string(),
            message,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnrecognizedNode { type_name: Some(name) } => {
                write!(f, "skipped node of unknown type {:?}", name)
            }
            DiagnosticKind::UnrecognizedNode { type_name: None } => {
                write!(f, "skipped node without a type")
            }
            DiagnosticKind::MalformedNode { node, message } => {
                write!(f, "skipped malformed {} node: {}", node, message)
            }
            DiagnosticKind::MalformedAttribute {
                node,
                attribute,
                message,
            } => write!(f, "{}.{} replaced by default: {}", node, attribute, message),
            DiagnosticKind::DuplicateMeta => write!(f, "ignored duplicate meta node"),
            DiagnosticKind::NestedMeta => write!(f, "ignored meta node outside the channel root"),
            DiagnosticKind::ConflictingTitle => {
                write!(f, "meta title and raw.subject both present; using meta")
            }
            DiagnosticKind::IgnoredTextContent => {
                write!(f, "text node has both content and elements; using elements")
            }
        }
    }
}

/// Position of a node as indices into nested `elements` arrays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    pub fn segments(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "elements[{}]", index)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub path: NodePath,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// A conversion result together with everything noticed on the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Converted<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Converted<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        Converted {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

/// Collects diagnostics during one conversion
#[derive(Debug, Default)]
pub(crate) struct DiagnosticSink {
    items: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn report(&mut self, path: &NodePath, kind: DiagnosticKind) {
        let level = kind.level();
        match level {
            DiagnosticLevel::Warning => warn!(path = %path, "{}", kind),
            DiagnosticLevel::Info => debug!(path = %path, "{}", kind),
        }
        self.items.push(Diagnostic {
            level,
            path: path.clone(),
            kind,
        });
    }

    pub fn finish<T>(self, value: T) -> Converted<T> {
        Converted {
            value,
            diagnostics: self.items,
        }
    }
}
