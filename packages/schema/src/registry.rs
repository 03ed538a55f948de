//! # Node Schema Registry
//!
//! Declares every Elemental content node type together with its attribute
//! set. Converters never hard-code attribute names or defaults; they ask
//! the registry to repair an incoming bag (`repair`) and to drop
//! default-valued attributes on the way out (`strip_defaults`).
//!
//! Attributes that a node carries but the schema does not declare are left
//! untouched in both directions so newer producers do not lose data.

use crate::attrs::{AttrDefault, AttrIssue, AttrKind, AttrMap, AttrSpec};
use serde_json::Value;

const ALIGN: &[&str] = &["left", "center", "right", "full"];

/// Every content node category known to this schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Text,
    Image,
    Action,
    Divider,
    Quote,
    List,
    ListItem,
    Html,
    Meta,
    Variable,
}

impl NodeKind {
    pub const ALL: [NodeKind; 10] = [
        NodeKind::Text,
        NodeKind::Image,
        NodeKind::Action,
        NodeKind::Divider,
        NodeKind::Quote,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::Html,
        NodeKind::Meta,
        NodeKind::Variable,
    ];

    /// Wire name used in the `type` field
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Image => "image",
            NodeKind::Action => "action",
            NodeKind::Divider => "divider",
            NodeKind::Quote => "quote",
            NodeKind::List => "list",
            NodeKind::ListItem => "list-item",
            NodeKind::Html => "html",
            NodeKind::Meta => "meta",
            NodeKind::Variable => "variable",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "blockquote" => Some(NodeKind::Quote),
            _ => Self::ALL.into_iter().find(|kind| kind.type_name() == name),
        }
    }

    /// Atomic nodes have no editable inline content or child nodes
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            NodeKind::Image | NodeKind::Action | NodeKind::Divider | NodeKind::Html
        )
    }
}

/// Attribute declarations of one node kind
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSchema {
    pub kind: NodeKind,
    pub attrs: &'static [AttrSpec],
}

impl NodeSchema {
    pub fn attr(&self, name: &str) -> Option<&AttrSpec> {
        self.attrs.iter().find(|spec| spec.name == name)
    }
}

/// Result of repairing an attribute bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairedAttrs {
    /// Attributes with defaults filled and malformed values replaced
    pub attrs: AttrMap,
    /// Rejected values, by attribute name
    pub issues: Vec<(String, AttrIssue)>,
}

/// Lookup table from node kind to schema
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    nodes: &'static [NodeSchema; 10],
}

static TEXT_ATTRS: &[AttrSpec] = &[
    AttrSpec::new("text_style", AttrKind::Enum(&["h1", "h2", "h3"]), AttrDefault::None),
    AttrSpec::new("align", AttrKind::Enum(ALIGN), AttrDefault::Str("left")),
    AttrSpec::new("color", AttrKind::Color, AttrDefault::None),
    AttrSpec::new("background_color", AttrKind::Color, AttrDefault::None),
    AttrSpec::new("padding", AttrKind::Padding, AttrDefault::Str("6px 0px")),
    AttrSpec::new("border", AttrKind::Object, AttrDefault::None),
];

static IMAGE_ATTRS: &[AttrSpec] = &[
    AttrSpec::new("src", AttrKind::Url, AttrDefault::Str("")),
    AttrSpec::new("href", AttrKind::Url, AttrDefault::None),
    AttrSpec::new("alt_text", AttrKind::Text, AttrDefault::None),
    AttrSpec::new("width", AttrKind::Length, AttrDefault::Str("100%")),
    AttrSpec::new("align", AttrKind::Enum(ALIGN), AttrDefault::Str("center")),
    AttrSpec::new("border", AttrKind::Object, AttrDefault::None),
];

static ACTION_ATTRS: &[AttrSpec] = &[
    AttrSpec::new("href", AttrKind::Url, AttrDefault::Str("")),
    AttrSpec::new("style", AttrKind::Enum(&["button", "link"]), AttrDefault::Str("button")),
    AttrSpec::new("align", AttrKind::Enum(ALIGN), AttrDefault::Str("center")),
    AttrSpec::new("background_color", AttrKind::Color, AttrDefault::Str("#000000")),
    AttrSpec::new("color", AttrKind::Color, AttrDefault::Str("#ffffff")),
    AttrSpec::new("padding", AttrKind::Padding, AttrDefault::Str("8px 16px")),
    AttrSpec::new(
        "border_radius",
        AttrKind::Number { min: 0.0, max: 100.0 },
        AttrDefault::Int(4),
    ),
];

static DIVIDER_ATTRS: &[AttrSpec] = &[
    AttrSpec::new("variant", AttrKind::Enum(&["divider", "spacer"]), AttrDefault::Str("divider")),
    AttrSpec::new("size", AttrKind::Number { min: 0.0, max: 200.0 }, AttrDefault::Int(1)),
    AttrSpec::new("color", AttrKind::Color, AttrDefault::Str("#dddddd")),
    AttrSpec::new("padding", AttrKind::Padding, AttrDefault::Str("6px 0px")),
];

static QUOTE_ATTRS: &[AttrSpec] = &[
    AttrSpec::new("border_color", AttrKind::Color, AttrDefault::Str("#dddddd")),
    AttrSpec::new("padding", AttrKind::Padding, AttrDefault::Str("6px 0px")),
];

static LIST_ATTRS: &[AttrSpec] = &[
    AttrSpec::new(
        "list_type",
        AttrKind::Enum(&["ordered", "unordered"]),
        AttrDefault::Str("unordered"),
    ),
    AttrSpec::new("padding", AttrKind::Padding, AttrDefault::Str("6px 0px")),
];

static NO_ATTRS: &[AttrSpec] = &[];

impl SchemaRegistry {
    /// Registry with the standard Elemental node set
    pub fn standard() -> Self {
        Self { nodes: &SCHEMAS }
    }

    pub fn schema(&self, kind: NodeKind) -> &NodeSchema {
        &self.nodes[kind as usize]
    }

    /// Resolve a wire `type` name
    pub fn lookup(&self, type_name: &str) -> Option<NodeKind> {
        NodeKind::from_type_name(type_name)
    }

    pub fn default_value(&self, kind: NodeKind, attr: &str) -> Option<Value> {
        self.schema(kind)
            .attr(attr)
            .and_then(|spec| spec.default.to_value())
    }

    pub fn validate(&self, kind: NodeKind, attr: &str, value: &Value) -> Result<(), AttrIssue> {
        match self.schema(kind).attr(attr) {
            Some(spec) => spec.validate(value),
            None => Ok(()),
        }
    }

    /// Fill absent attributes with their defaults and replace malformed ones.
    ///
    /// `null` counts as absent. Undeclared attributes are kept verbatim.
    pub fn repair(&self, kind: NodeKind, attrs: &AttrMap) -> RepairedAttrs {
        let mut out = attrs.clone();
        let mut issues = Vec::new();

        for spec in self.schema(kind).attrs {
            let incoming = attrs.get(spec.name).filter(|value| !value.is_null());
            let value = match incoming {
                Some(value) => match spec.validate(value) {
                    Ok(()) => Some(value.clone()),
                    Err(issue) => {
                        issues.push((spec.name.to_string(), issue));
                        spec.default.to_value()
                    }
                },
                None => spec.default.to_value(),
            };

            match value {
                Some(value) => {
                    out.insert(spec.name.to_string(), value);
                }
                None => {
                    out.remove(spec.name);
                }
            }
        }

        RepairedAttrs { attrs: out, issues }
    }

    /// Drop declared attributes that hold their default value, and nulls
    pub fn strip_defaults(&self, kind: NodeKind, attrs: &AttrMap) -> AttrMap {
        let schema = self.schema(kind);
        attrs
            .iter()
            .filter(|(name, value)| {
                if value.is_null() {
                    return false;
                }
                match schema.attr(name) {
                    Some(spec) => !spec.default.matches(value),
                    None => true,
                }
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Whether every declared attribute in `attrs` sits at its default
    pub fn is_default(&self, kind: NodeKind, attrs: &AttrMap) -> bool {
        self.strip_defaults(kind, attrs).is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// Indexed by `NodeKind` discriminant
static SCHEMAS: [NodeSchema; 10] = [
    NodeSchema { kind: NodeKind::Text, attrs: TEXT_ATTRS },
    NodeSchema { kind: NodeKind::Image, attrs: IMAGE_ATTRS },
    NodeSchema { kind: NodeKind::Action, attrs: ACTION_ATTRS },
    NodeSchema { kind: NodeKind::Divider, attrs: DIVIDER_ATTRS },
    NodeSchema { kind: NodeKind::Quote, attrs: QUOTE_ATTRS },
    NodeSchema { kind: NodeKind::List, attrs: LIST_ATTRS },
    NodeSchema { kind: NodeKind::ListItem, attrs: NO_ATTRS },
    NodeSchema { kind: NodeKind::Html, attrs: NO_ATTRS },
    NodeSchema { kind: NodeKind::Meta, attrs: NO_ATTRS },
    NodeSchema { kind: NodeKind::Variable, attrs: NO_ATTRS },
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> AttrMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_lookup_type_names() {
        let registry = SchemaRegistry::standard();
        assert_eq!(registry.lookup("text"), Some(NodeKind::Text));
        assert_eq!(registry.lookup("list-item"), Some(NodeKind::ListItem));
        assert_eq!(registry.lookup("blockquote"), Some(NodeKind::Quote));
        assert_eq!(registry.lookup("carousel"), None);
    }

    #[test]
    fn test_repair_fills_defaults() {
        let registry = SchemaRegistry::standard();
        let repaired = registry.repair(NodeKind::Action, &map(json!({ "href": "https://x.io" })));

        assert!(repaired.issues.is_empty());
        assert_eq!(repaired.attrs["href"], json!("https://x.io"));
        assert_eq!(repaired.attrs["padding"], json!("8px 16px"));
        assert_eq!(repaired.attrs["border_radius"], json!(4));
    }

    #[test]
    fn test_repair_replaces_malformed_values() {
        let registry = SchemaRegistry::standard();
        let repaired = registry.repair(
            NodeKind::Divider,
            &map(json!({ "size": 9000, "color": 12, "variant": "spacer" })),
        );

        assert_eq!(repaired.issues.len(), 2);
        assert_eq!(repaired.attrs["size"], json!(1));
        assert_eq!(repaired.attrs["color"], json!("#dddddd"));
        assert_eq!(repaired.attrs["variant"], json!("spacer"));
    }

    #[test]
    fn test_repair_keeps_undeclared_attributes() {
        let registry = SchemaRegistry::standard();
        let repaired = registry.repair(NodeKind::Image, &map(json!({ "locales": { "fr": {} } })));
        assert_eq!(repaired.attrs["locales"], json!({ "fr": {} }));
    }

    #[test]
    fn test_strip_defaults_is_inverse_of_repair() {
        let registry = SchemaRegistry::standard();
        let input = map(json!({ "src": "a.png", "width": "50%", "align": "center" }));
        let repaired = registry.repair(NodeKind::Image, &input);
        let stripped = registry.strip_defaults(NodeKind::Image, &repaired.attrs);

        assert_eq!(stripped, map(json!({ "src": "a.png", "width": "50%" })));
        assert_eq!(
            registry.strip_defaults(NodeKind::Image, &registry.repair(NodeKind::Image, &stripped).attrs),
            stripped
        );
    }

    #[test]
    fn test_default_lookup() {
        let registry = SchemaRegistry::standard();
        assert_eq!(
            registry.default_value(NodeKind::Text, "padding"),
            Some(json!("6px 0px"))
        );
        assert_eq!(registry.default_value(NodeKind::Text, "color"), None);
        assert!(registry.is_default(NodeKind::Text, &map(json!({ "align": "left" }))));
        assert!(!registry.is_default(NodeKind::Text, &map(json!({ "align": "right" }))));
        assert!(NodeKind::Divider.is_atomic());
        assert!(!NodeKind::Quote.is_atomic());
    }

    #[test]
    fn test_schema_table_matches_kind_order() {
        let registry = SchemaRegistry::standard();
        for kind in NodeKind::ALL {
            assert_eq!(registry.schema(kind).kind, kind);
        }
    }
}
