//! Recursive walker applying type pipelines in place

use super::shape::{Actable, Field, Node, Record};
use crate::config::EngineConfig;
use crate::error::{ConfigError, Error, Result};
use crate::pipeline::{CompiledField, PipelineCache, TypePipeline};
use crate::registry::{Registry, TypeHint};
use crate::types::{display_value, index_path, join_path, Issue};
use std::cell::RefMut;

/// Everything one traversal collected
#[derive(Debug, Default)]
pub struct Report {
    pub issues: Vec<Issue>,
    /// Mapped values that did not fit their field; those fields kept their value
    pub rejected: Vec<ConfigError>,
}

impl Report {
    /// Issues of a clean run, or [`Error::Rejected`] carrying them
    pub fn into_result(self) -> Result<Vec<Issue>> {
        if self.rejected.is_empty() {
            Ok(self.issues)
        } else {
            Err(Error::Rejected {
                rejected: self.rejected,
                issues: self.issues,
            })
        }
    }
}

/// One traversal over a root value
///
/// Borrows the engine's parts for the duration of a single `run`.
pub struct Traverser<'e> {
    registry: &'e Registry,
    cache: &'e PipelineCache,
    config: &'e EngineConfig,
}

impl<'e> Traverser<'e> {
    pub fn new(registry: &'e Registry, cache: &'e PipelineCache, config: &'e EngineConfig) -> Self {
        Self {
            registry,
            cache,
            config,
        }
    }

    /// Walk `root`, mutating it in place, and return the collected issues
    ///
    /// `root_type` names the root for misuse reports.
    pub fn run(&self, root: &mut dyn Actable, root_type: &'static str) -> Result<Vec<Issue>> {
        let mut report = Report::default();
        let node = root.node();

        if let Node::Scalar = node {
            return Err(Error::misuse(
                format!("cannot validate scalar value of type {}; pass a record or container", root_type),
                root_type,
            ));
        }

        self.visit(node, "", 0, &mut report)?;
        report.into_result()
    }

    /// Visit any value at `path`
    pub fn act(&self, value: &mut dyn Actable, path: &str, depth: usize, report: &mut Report) -> Result<()> {
        self.visit(value.node(), path, depth, report)
    }

    fn check_depth(&self, path: &str, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::DepthExceeded {
                path: path.to_string(),
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    fn visit(&self, node: Node<'_>, path: &str, depth: usize, report: &mut Report) -> Result<()> {
        self.check_depth(path, depth)?;

        match node {
            Node::Scalar => Ok(()),
            Node::Optional(None) => Ok(()),
            Node::Optional(Some(inner)) | Node::Boxed(inner) => self.act(inner, path, depth + 1, report),
            Node::Shared { cell, type_name } => {
                let mut inner = borrow_shared(cell.try_borrow_mut(), path, type_name)?;
                self.act(&mut *inner, path, depth + 1, report)
            }
            Node::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    self.act(item, &index_path(path, index), depth + 1, report)?;
                }
                Ok(())
            }
            Node::Map(entries) => {
                for (key, value) in entries {
                    self.act(value, &join_path(path, &key), depth + 1, report)?;
                }
                Ok(())
            }
            Node::Record(record) => self.visit_record(record, path, depth, report),
        }
    }

    fn visit_record(&self, record: &mut dyn Record, path: &str, depth: usize, report: &mut Report) -> Result<()> {
        let type_name = record.type_name();
        let specs = record.fields();
        let pipeline = self
            .cache
            .get_or_compile(record.record_type(), || TypePipeline::compile(type_name, specs, self.registry))?;

        let slots = record.fields_mut();
        if slots.len() != pipeline.len() {
            return Err(Error::misuse(
                format!(
                    "{} declares {} fields but exposes {} for mutation",
                    type_name,
                    pipeline.len(),
                    slots.len()
                ),
                type_name,
            ));
        }

        for (compiled, slot) in pipeline.fields().iter().zip(slots) {
            let field_path = join_path(path, compiled.segment(self.config.use_display_names));

            if !compiled.actor.is_empty() {
                self.apply(type_name, compiled, slot, &field_path, depth + 1, report)?;
            }

            self.act(slot.as_actable(), &field_path, depth + 1, report)?;
        }

        Ok(())
    }

    /// Run one field actor: map, validate, write back
    ///
    /// A mapped value the field cannot hold is recorded in the report and the
    /// field keeps its value.
    fn apply(
        &self,
        type_name: &'static str,
        compiled: &CompiledField,
        slot: &mut dyn Field,
        field_path: &str,
        depth: usize,
        report: &mut Report,
    ) -> Result<()> {
        // the snapshot serializes everything reachable from the field
        self.guard(slot.as_actable(), field_path, depth)?;
        let hint = zero_hint(slot.as_actable(), field_path)?;

        let current = slot.snapshot().map_err(|err| {
            Error::configuration(
                format!("{}.{}", type_name, compiled.name),
                ConfigError::Snapshot {
                    field: field_path.to_string(),
                    type_name: slot.field_type(),
                    reason: err.to_string(),
                },
            )
        })?;

        let outcome = compiled.actor.act_with(&current, hint);
        tracing::trace!(
            field = field_path,
            mapped = outcome.mapped.is_some(),
            issues = outcome.messages.len(),
            "applied field actor"
        );

        let checked = outcome.mapped.as_ref().unwrap_or(&current);
        for message in outcome.messages {
            report.issues.push(Issue::new(message, field_path, checked.clone()));
        }

        if let Some(mapped) = outcome.mapped {
            if mapped != current {
                let rendered = display_value(&mapped);
                if let Err(err) = slot.assign(mapped) {
                    tracing::error!(
                        field = field_path,
                        field_type = slot.field_type(),
                        value = %rendered,
                        error = %err,
                        "mapped value does not fit field, keeping previous value"
                    );
                    report.rejected.push(ConfigError::IncompatibleMapperOutput {
                        field: field_path.to_string(),
                        type_name: slot.field_type(),
                        value: rendered,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Walk the structure below a field without acting on it
    ///
    /// Shared cells stay borrowed while their contents are walked, so a cell
    /// reached twice on one path, or one an ancestor is visiting, is a cycle.
    fn guard(&self, value: &mut dyn Actable, path: &str, depth: usize) -> Result<()> {
        self.check_depth(path, depth)?;

        match value.node() {
            Node::Scalar | Node::Optional(None) => Ok(()),
            Node::Optional(Some(inner)) | Node::Boxed(inner) => self.guard(inner, path, depth + 1),
            Node::Shared { cell, type_name } => {
                let mut inner = borrow_shared(cell.try_borrow_mut(), path, type_name)?;
                self.guard(&mut *inner, path, depth + 1)
            }
            Node::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    self.guard(item, &index_path(path, index), depth + 1)?;
                }
                Ok(())
            }
            Node::Map(entries) => {
                for (key, value) in entries {
                    self.guard(value, &join_path(path, &key), depth + 1)?;
                }
                Ok(())
            }
            Node::Record(record) => {
                let specs = record.fields();
                for (spec, slot) in specs.iter().zip(record.fields_mut()) {
                    let segment = match spec.alias {
                        Some(alias) if self.config.use_display_names => alias,
                        _ => spec.name,
                    };
                    self.guard(slot.as_actable(), &join_path(path, segment), depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

fn borrow_shared<'b, T: ?Sized>(
    borrowed: std::result::Result<RefMut<'b, T>, std::cell::BorrowMutError>,
    path: &str,
    type_name: &'static str,
) -> Result<RefMut<'b, T>> {
    borrowed.map_err(|_| Error::Cycle {
        path: path.to_string(),
        type_name,
    })
}

/// Type knowledge for a field value about to be checked
///
/// Records are zero when every field is zero. One level of option, box or
/// shared cell is looked through. Everything else is judged by its JSON form.
fn zero_hint(value: &mut dyn Actable, path: &str) -> Result<TypeHint> {
    match value.node() {
        Node::Record(record) => Ok(TypeHint::zero(record_is_zero(record, path)?)),
        Node::Optional(Some(inner)) | Node::Boxed(inner) => zero_hint(inner, path),
        Node::Shared { cell, type_name } => {
            let mut inner = borrow_shared(cell.try_borrow_mut(), path, type_name)?;
            zero_hint(&mut *inner, path)
        }
        _ => Ok(TypeHint::UNKNOWN),
    }
}

fn record_is_zero(record: &mut dyn Record, path: &str) -> Result<bool> {
    for slot in record.fields_mut() {
        if !field_is_zero(slot, path)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether a record field holds the zero value of its type
///
/// Options are zero only when absent. Sequences and maps are zero when empty.
/// Leaves fall back to their JSON form.
fn field_is_zero(slot: &mut dyn Field, path: &str) -> Result<bool> {
    if let Some(zero) = structural_zero(slot.as_actable(), path)? {
        return Ok(zero);
    }
    let snapshot = slot.snapshot().map_err(|err| {
        Error::configuration(
            path,
            ConfigError::Snapshot {
                field: path.to_string(),
                type_name: slot.field_type(),
                reason: err.to_string(),
            },
        )
    })?;
    Ok(TypeHint::UNKNOWN.is_zero(&snapshot))
}

fn structural_zero(value: &mut dyn Actable, path: &str) -> Result<Option<bool>> {
    match value.node() {
        Node::Record(record) => record_is_zero(record, path).map(Some),
        Node::Optional(inner) => Ok(Some(inner.is_none())),
        Node::Boxed(inner) => structural_zero(inner, path),
        Node::Shared { cell, type_name } => {
            let mut inner = borrow_shared(cell.try_borrow_mut(), path, type_name)?;
            structural_zero(&mut *inner, path)
        }
        Node::Sequence(items) => Ok(Some(items.is_empty())),
        Node::Map(entries) => Ok(Some(entries.is_empty())),
        Node::Scalar => Ok(None),
    }
}
