//! Compiled per-field pipeline
//!
//! A [`FieldActor`] holds the mapper chain and validator list compiled from one
//! field's tag. Mappers compose: each stage sees the output of the previous
//! one. Validators do not: every validator sees the final mapped value.

use crate::registry::{Mapper, TypeHint, Validator};
use serde_json::Value;
use std::fmt;

/// Result of running an actor over one value
#[derive(Debug, Clone, PartialEq)]
pub struct ActorOutcome {
    /// Replacement value, if any mapper changed it
    pub mapped: Option<Value>,
    /// Messages of failed validators, in tag order
    pub messages: Vec<String>,
}

/// Mapper chain plus validator list for a single field
#[derive(Default)]
pub struct FieldActor {
    tag: Option<String>,
    mappers: Vec<(String, Mapper)>,
    validators: Vec<(String, Validator)>,
}

impl FieldActor {
    /// Actor for a field without annotation
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an actor from already generated functions
    pub fn new(
        tag: impl Into<String>,
        mappers: Vec<(String, Mapper)>,
        validators: Vec<(String, Validator)>,
    ) -> Self {
        Self {
            tag: Some(tag.into()),
            mappers,
            validators,
        }
    }

    /// Source tag, if the field was annotated
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Whether the actor neither maps nor validates
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty() && self.validators.is_empty()
    }

    pub fn has_mappers(&self) -> bool {
        !self.mappers.is_empty()
    }

    pub fn mapper_names(&self) -> impl Iterator<Item = &str> {
        self.mappers.iter().map(|(name, _)| name.as_str())
    }

    pub fn validator_names(&self) -> impl Iterator<Item = &str> {
        self.validators.iter().map(|(name, _)| name.as_str())
    }

    /// Run the mapper chain; `None` when no stage changed the value
    pub fn map(&self, value: &Value) -> Option<Value> {
        let mut current: Option<Value> = None;
        for (_, mapper) in &self.mappers {
            let input = current.as_ref().unwrap_or(value);
            if let Some(next) = mapper(input) {
                current = Some(next);
            }
        }
        current
    }

    /// Run every validator against `value`, dropping empty messages
    pub fn check(&self, value: &Value, hint: TypeHint) -> Vec<String> {
        self.validators
            .iter()
            .filter_map(|(_, validator)| validator(value, hint))
            .filter(|message| !message.is_empty())
            .collect()
    }

    /// Map, then validate the mapped value (or the original if unchanged)
    pub fn act(&self, value: &Value) -> ActorOutcome {
        self.act_with(value, TypeHint::UNKNOWN)
    }

    /// Like [`act`](Self::act), with type knowledge about the original value
    ///
    /// The hint is dropped once a mapper changes the value.
    pub fn act_with(&self, value: &Value, hint: TypeHint) -> ActorOutcome {
        let mapped = self.map(value);
        let (checked, hint) = match &mapped {
            Some(next) if next != value => (next, TypeHint::UNKNOWN),
            Some(next) => (next, hint),
            None => (value, hint),
        };
        let messages = self.check(checked, hint);
        ActorOutcome { mapped, messages }
    }
}

impl fmt::Debug for FieldActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldActor")
            .field("tag", &self.tag)
            .field("mappers", &self.mapper_names().collect::<Vec<_>>())
            .field("validators", &self.validator_names().collect::<Vec<_>>())
            .finish()
    }
}
