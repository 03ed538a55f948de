//! Attribute declarations and validation
//!
//! Attributes travel as plain JSON values in both representations. The
//! schema decides which values are acceptable; anything else is repaired
//! by the registry before it reaches a converter.

use serde_json::Value;
use thiserror::Error;

/// Attribute bag shared by Elemental nodes and editor blocks
pub type AttrMap = serde_json::Map<String, Value>;

/// Value domain of a declared attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrKind {
    /// Free-form string
    Text,
    /// `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` or a named color
    Color,
    /// Link target; may be empty or a `{{variable}}`, never contains whitespace
    Url,
    /// `auto`, a non-negative number, or a number with a `px`/`%`/`em` unit
    Length,
    /// One to four space separated `px` lengths (`"6px 0px"`)
    Padding,
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
    /// Number within an inclusive range
    Number { min: f64, max: f64 },
    Bool,
    /// JSON object with node-specific fields (e.g. `border`)
    Object,
}

/// Declared default of an attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrDefault {
    /// No default; the attribute is simply absent
    None,
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl AttrDefault {
    pub fn to_value(&self) -> Option<Value> {
        match self {
            AttrDefault::None => None,
            AttrDefault::Str(s) => Some(Value::String((*s).to_string())),
            AttrDefault::Int(n) => Some(Value::from(*n)),
            AttrDefault::Bool(b) => Some(Value::Bool(*b)),
        }
    }

    /// Whether `value` is the declared default
    pub fn matches(&self, value: &Value) -> bool {
        match self.to_value() {
            Some(default) => values_equal(&default, value),
            None => value.is_null(),
        }
    }
}

/// A single attribute declaration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub kind: AttrKind,
    pub default: AttrDefault,
}

impl AttrSpec {
    pub const fn new(name: &'static str, kind: AttrKind, default: AttrDefault) -> Self {
        Self {
            name,
            kind,
            default,
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), AttrIssue> {
        self.kind.validate(value)
    }
}

/// Why an attribute value was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttrIssue {
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("{value:?} is not one of {allowed:?}")]
    NotAllowed {
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("invalid {expected}: {value:?}")]
    Malformed {
        expected: &'static str,
        value: String,
    },
}

impl AttrKind {
    pub fn name(&self) -> &'static str {
        match self {
            AttrKind::Text => "string",
            AttrKind::Color => "color",
            AttrKind::Url => "url",
            AttrKind::Length => "length",
            AttrKind::Padding => "padding",
            AttrKind::Enum(_) => "keyword",
            AttrKind::Number { .. } => "number",
            AttrKind::Bool => "boolean",
            AttrKind::Object => "object",
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), AttrIssue> {
        match self {
            AttrKind::Text => expect_str(value, "string").map(|_| ()),
            AttrKind::Color => {
                let s = expect_str(value, "color")?;
                if is_color(s) {
                    Ok(())
                } else {
                    Err(malformed("color", s))
                }
            }
            AttrKind::Url => {
                let s = expect_str(value, "url")?;
                if s.chars().any(char::is_whitespace) {
                    Err(malformed("url", s))
                } else {
                    Ok(())
                }
            }
            AttrKind::Length => match value {
                Value::Number(n) if n.as_f64().map_or(false, |v| v >= 0.0) => Ok(()),
                Value::String(s) if s == "auto" || is_length(s, &["px", "%", "em"]) => Ok(()),
                Value::String(s) => Err(malformed("length", s)),
                other => Err(wrong_type("length", other)),
            },
            AttrKind::Padding => {
                let s = expect_str(value, "padding")?;
                let parts: Vec<&str> = s.split_whitespace().collect();
                let valid = (1..=4).contains(&parts.len())
                    && parts.iter().all(|p| *p == "0" || is_length(p, &["px"]));
                if valid {
                    Ok(())
                } else {
                    Err(malformed("padding", s))
                }
            }
            AttrKind::Enum(allowed) => {
                let s = expect_str(value, "keyword")?;
                if allowed.contains(&s) {
                    Ok(())
                } else {
                    Err(AttrIssue::NotAllowed {
                        value: s.to_string(),
                        allowed,
                    })
                }
            }
            AttrKind::Number { min, max } => {
                let n = value.as_f64().ok_or_else(|| wrong_type("number", value))?;
                if n < *min || n > *max {
                    Err(AttrIssue::OutOfRange {
                        value: n,
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            AttrKind::Bool => match value {
                Value::Bool(_) => Ok(()),
                other => Err(wrong_type("boolean", other)),
            },
            AttrKind::Object => match value {
                Value::Object(_) => Ok(()),
                other => Err(wrong_type("object", other)),
            },
        }
    }
}

/// JSON equality that treats `1` and `1.0` as the same number
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_str<'a>(value: &'a Value, expected: &'static str) -> Result<&'a str, AttrIssue> {
    value.as_str().ok_or_else(|| wrong_type(expected, value))
}

fn wrong_type(expected: &'static str, found: &Value) -> AttrIssue {
    AttrIssue::WrongType {
        expected,
        found: json_type_name(found),
    }
}

fn malformed(expected: &'static str, value: &str) -> AttrIssue {
    AttrIssue::Malformed {
        expected,
        value: value.to_string(),
    }
}

fn is_color(s: &str) -> bool {
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if s.starts_with("rgb(") || s.starts_with("rgba(") {
        return s.ends_with(')');
    }
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_length(s: &str, units: &[&str]) -> bool {
    units.iter().any(|unit| {
        s.strip_suffix(unit)
            .map_or(false, |num| !num.is_empty() && num.parse::<f64>().map_or(false, |n| n >= 0.0))
    })
}
