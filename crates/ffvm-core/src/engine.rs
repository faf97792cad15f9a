//! Validation entry point
//!
//! An [`Engine`] owns a frozen [`Registry`], the pipeline cache and its
//! configuration. It is `Send + Sync` and is meant to be built once and shared.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::pipeline::{PipelineCache, TypePipeline};
use crate::registry::Registry;
use crate::traversal::{Actable, Record, Traverser};
use crate::types::Issue;
use std::sync::{Arc, OnceLock};

/// Mapping and validation engine
#[derive(Debug)]
pub struct Engine {
    registry: Registry,
    cache: PipelineCache,
    config: EngineConfig,
}

static DEFAULT_ENGINE: OnceLock<Engine> = OnceLock::new();

impl Engine {
    /// Create an engine from a populated registry
    pub fn new(registry: Registry, config: EngineConfig) -> Self {
        Self {
            registry,
            cache: PipelineCache::new(),
            config,
        }
    }

    /// Engine with the built-in generators and default configuration
    pub fn with_defaults() -> Self {
        Self::new(Registry::new(), EngineConfig::default())
    }

    /// Process-wide engine used by [`crate::validate`]
    ///
    /// Built on first use from the built-in registry and the default
    /// configuration with environment overrides applied.
    pub fn global() -> &'static Engine {
        DEFAULT_ENGINE.get_or_init(|| {
            let mut config = EngineConfig::default();
            config.merge_with_env();
            Engine::new(Registry::new(), config)
        })
    }

    /// Map and validate `value` in place, returning every issue found
    ///
    /// A mapped value that does not fit its field leaves the field unchanged;
    /// the run still completes and returns [`Error::Rejected`](crate::Error::Rejected)
    /// with the collected issues.
    pub fn validate<T: Actable>(&self, value: &mut T) -> Result<Vec<Issue>> {
        let type_name = std::any::type_name::<T>();
        let _span = tracing::debug_span!("validate", root = type_name).entered();

        let issues = Traverser::new(&self.registry, &self.cache, &self.config).run(value, type_name)?;
        tracing::debug!(issues = issues.len(), "validation finished");
        Ok(issues)
    }

    /// Compile and cache the pipeline of a record type ahead of first use
    pub fn precompile<R: Record>(&self, sample: &R) -> Result<Arc<TypePipeline>> {
        self.cache.get_or_compile(sample.record_type(), || {
            TypePipeline::compile(sample.type_name(), sample.fields(), &self.registry)
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &PipelineCache {
        &self.cache
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
