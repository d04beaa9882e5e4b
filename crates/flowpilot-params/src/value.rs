//! Parameter values
//!
//! A value is either absent, a boolean or text. Booleans are persisted as
//! `"1"`/`"0"` so other processes sharing the store can read them as bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Never written, or removed
    #[default]
    Absent,
    /// Boolean flag
    Bool(bool),
    /// Free-form text
    Text(String),
}

impl ParamValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        ParamValue::Text(value.into())
    }

    /// Check if the value is absent
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamValue::Absent)
    }

    /// Interpret the value as a boolean.
    ///
    /// Text decodes when it is `1`, `0`, `true`, `false` (any case) or empty.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Absent => None,
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Text(s) => decode_bool(s),
        }
    }

    /// Interpret the value as text; booleans read as `"1"`/`"0"`
    pub fn as_text(&self) -> Option<String> {
        match self {
            ParamValue::Absent => None,
            ParamValue::Bool(b) => Some(encode_bool(*b).to_string()),
            ParamValue::Text(s) => Some(s.clone()),
        }
    }

    /// Byte encoding used by file-backed stores. `None` for absent values.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        self.as_text().map(String::into_bytes)
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Absent => "absent",
            ParamValue::Bool(_) => "bool",
            ParamValue::Text(_) => "text",
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Absent => write!(f, "<absent>"),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

fn encode_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn decode_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else if trimmed == "1" || trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else {
        None
    }
}
