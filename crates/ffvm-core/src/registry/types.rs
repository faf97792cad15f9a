//! Function types stored in the registry
//!
//! Generators are factories bound once per annotation token; the mappers and
//! validators they return run once per field visit.

use super::built_in::is_empty_value;
use crate::error::ConfigResult;
use serde_json::Value;
use std::sync::Arc;

/// Value transform. `None` means "leave the value unchanged".
pub type Mapper = Box<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Predicate over a value. `Some(message)` reports an issue, `None` means no issue.
///
/// The [`TypeHint`] carries what the traverser knows about the field's Rust type
/// and the JSON form loses.
pub type Validator = Box<dyn Fn(&Value, TypeHint) -> Option<String> + Send + Sync>;

/// Factory turning token arguments into a [`Mapper`]
pub type MapperGenerator = Arc<dyn Fn(&[String]) -> ConfigResult<Mapper> + Send + Sync>;

/// Factory turning token arguments into a [`Validator`]
pub type ValidatorGenerator = Arc<dyn Fn(&[String]) -> ConfigResult<Validator> + Send + Sync>;

/// Type knowledge handed to validators alongside the value
///
/// A record serializes to the same JSON object shape as a map, so only the
/// traverser can tell whether an object is the zero value of its type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeHint {
    zero: Option<bool>,
}

impl TypeHint {
    /// No type knowledge; emptiness follows the JSON shape
    pub const UNKNOWN: Self = Self { zero: None };

    /// Hint for a value whose zero-ness was decided from its type
    pub const fn zero(is_zero: bool) -> Self {
        Self { zero: Some(is_zero) }
    }

    /// Zero-ness decided from the type, if any
    pub fn known_zero(&self) -> Option<bool> {
        self.zero
    }

    /// Whether `value` is the zero value of its type
    pub fn is_zero(&self, value: &Value) -> bool {
        self.zero.unwrap_or_else(|| is_empty_value(value))
    }
}
