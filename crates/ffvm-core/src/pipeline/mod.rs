//! Per-type compiled pipelines
//!
//! A [`TypePipeline`] is the ordered list of [`FieldActor`]s of one record type,
//! index-aligned with the type's declared fields. Pipelines are built on first
//! use and memoized in a [`PipelineCache`] keyed by `TypeId`.

pub mod actor;
pub mod cache;


pub use actor::{ActorOutcome, FieldActor};
pub use cache::PipelineCache;

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::tag::compile_tag;
use crate::traversal::FieldSpec;

/// A declared field together with its compiled actor
#[derive(Debug)]
pub struct CompiledField {
    /// Declared field name
    pub name: &'static str,
    /// Display name supplied by the record declaration
    pub alias: Option<&'static str>,
    /// Compiled mapper chain and validators
    pub actor: FieldActor,
}

impl CompiledField {
    /// Path segment used in issue reports
    pub fn segment(&self, use_alias: bool) -> &'static str {
        match self.alias {
            Some(alias) if use_alias => alias,
            _ => self.name,
        }
    }
}

/// Ordered field actors of one record type
#[derive(Debug)]
pub struct TypePipeline {
    type_name: &'static str,
    fields: Vec<CompiledField>,
}

impl TypePipeline {
    /// Compile every annotated field of a record type
    ///
    /// Fields without a tag get an empty actor, so the result always has one
    /// entry per declared field.
    pub fn compile(type_name: &'static str, specs: &[FieldSpec], registry: &Registry) -> Result<Self> {
        let mut fields = Vec::with_capacity(specs.len());

        for spec in specs {
            let actor = match spec.tag {
                Some(tag) => compile_tag(tag, registry).map_err(|source| {
                    Error::configuration(format!("{}.{}", type_name, spec.name), source)
                })?,
                None => FieldActor::empty(),
            };

            fields.push(CompiledField {
                name: spec.name,
                alias: spec.alias,
                actor,
            });
        }

        Ok(Self { type_name, fields })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether no field maps or validates anything
    pub fn is_passthrough(&self) -> bool {
        self.fields.iter().all(|field| field.actor.is_empty())
    }
}
