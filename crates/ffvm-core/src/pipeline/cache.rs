//! Memoized type pipelines
//!
//! Lookups take the read lock. A miss takes the write lock and checks again
//! before compiling, so concurrent first use of a type compiles it once.
//! Failed compilations are not cached.

use super::TypePipeline;
use crate::error::{Error, Result};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cache of compiled pipelines keyed by record type
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: RwLock<HashMap<TypeId, Arc<TypePipeline>>>,
}

impl PipelineCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached pipeline for `type_id`, if already compiled
    pub fn get(&self, type_id: TypeId) -> Result<Option<Arc<TypePipeline>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::internal("pipeline cache lock poisoned"))?;
        Ok(entries.get(&type_id).cloned())
    }

    /// Cached pipeline for `type_id`, compiling it with `build` on first use
    pub fn get_or_compile<F>(&self, type_id: TypeId, build: F) -> Result<Arc<TypePipeline>>
    where
        F: FnOnce() -> Result<TypePipeline>,
    {
        if let Some(pipeline) = self.get(type_id)? {
            return Ok(pipeline);
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::internal("pipeline cache lock poisoned"))?;

        if let Some(pipeline) = entries.get(&type_id) {
            return Ok(Arc::clone(pipeline));
        }

        let pipeline = Arc::new(build()?);
        tracing::debug!(
            type_name = pipeline.type_name(),
            fields = pipeline.len(),
            passthrough = pipeline.is_passthrough(),
            "compiled type pipeline"
        );
        entries.insert(type_id, Arc::clone(&pipeline));
        Ok(pipeline)
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(&type_id))
            .unwrap_or(false)
    }

    /// Number of compiled types
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
