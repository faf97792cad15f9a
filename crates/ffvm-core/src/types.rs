//! Core data types shared across the engine
//!
//! [`Issue`] is the unit of validation output. The path helpers build the
//! dotted/bracketed field paths issues are reported under.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single validation failure
///
/// `field` is the fully qualified path of the offending field, for example
/// `orders[2].lines.sku`, and `value` is the value the validator saw after
/// mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable description of the failure
    pub message: String,
    /// Dotted/bracketed path of the field
    pub field: String,
    /// Value that failed validation
    pub value: Value,
}

impl Issue {
    /// Create a new issue
    pub fn new(message: impl Into<String>, field: impl Into<String>, value: Value) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
            value,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (value: {})", self.field, self.message, self.value)
    }
}

/// Join a record field or map key onto a parent path
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

/// Append a sequence index to a parent path
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// String form of a dynamic value as used in messages and `enum` checks
///
/// Strings render without quotes, everything else renders as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
