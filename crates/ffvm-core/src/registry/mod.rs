//! Named generator registry for mappers and validators
//!
//! Every token in an annotation tag names a generator. The registry maps those
//! names to factories that check their arguments eagerly and return the bound
//! function. A registry is filled before it is handed to an
//! [`Engine`](crate::Engine); the engine owns it from then on, so no registration
//! can race a validation call.
//!
//! # Example
//!
//! ```
//! use ffvm_core::registry::{built_in::expect_arity, Mapper, Registry};
//! use ffvm_core::{Arity, GeneratorKind};
//! use serde_json::Value;
//!
//! let mut registry = Registry::new();
//! registry.register_mapper_generator("trim", |args: &[String]| {
//!     expect_arity(GeneratorKind::Mapper, "trim", args, Arity::exactly(0))?;
//!     let mapper: Mapper = Box::new(|value: &Value| value.as_str().map(|s| Value::from(s.trim())));
//!     Ok(mapper)
//! });
//!
//! let trim = registry.generate_mapper("trim", &[]).unwrap();
//! assert_eq!(trim(&Value::from("  hi ")), Some(Value::from("hi")));
//! ```

pub mod built_in;
pub mod types;

#[cfg(test)]
mod tests;

pub use types::{Mapper, MapperGenerator, TypeHint, Validator, ValidatorGenerator};

use crate::error::{ConfigError, ConfigResult, GeneratorKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Table of mapper and validator generators
#[derive(Clone)]
pub struct Registry {
    mappers: HashMap<String, MapperGenerator>,
    validators: HashMap<String, ValidatorGenerator>,
}

impl Registry {
    /// Create a registry with the built-in generators installed
    pub fn new() -> Self {
        let mut registry = Self::empty();
        built_in::install(&mut registry);
        registry
    }

    /// Create a registry without any generator
    pub fn empty() -> Self {
        Self {
            mappers: HashMap::new(),
            validators: HashMap::new(),
        }
    }

    /// Register a mapper generator, replacing any previous one with the same name
    pub fn register_mapper_generator<F>(&mut self, name: impl Into<String>, generator: F) -> &mut Self
    where
        F: Fn(&[String]) -> ConfigResult<Mapper> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.mappers.insert(name.clone(), Arc::new(generator)).is_some() {
            tracing::debug!(mapper = %name, "replaced mapper generator");
        }
        self
    }

    /// Register a validator generator, replacing any previous one with the same name
    pub fn register_validator_generator<F>(
        &mut self,
        name: impl Into<String>,
        generator: F,
    ) -> &mut Self
    where
        F: Fn(&[String]) -> ConfigResult<Validator> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.validators.insert(name.clone(), Arc::new(generator)).is_some() {
            tracing::debug!(validator = %name, "replaced validator generator");
        }
        self
    }

    /// Make an existing mapper generator reachable under another name
    pub fn alias_mapper(&mut self, alias: impl Into<String>, target: &str) -> ConfigResult<&mut Self> {
        let generator = self
            .mappers
            .get(target)
            .cloned()
            .ok_or_else(|| ConfigError::unknown(GeneratorKind::Mapper, target))?;
        self.mappers.insert(alias.into(), generator);
        Ok(self)
    }

    /// Make an existing validator generator reachable under another name
    pub fn alias_validator(
        &mut self,
        alias: impl Into<String>,
        target: &str,
    ) -> ConfigResult<&mut Self> {
        let generator = self
            .validators
            .get(target)
            .cloned()
            .ok_or_else(|| ConfigError::unknown(GeneratorKind::Validator, target))?;
        self.validators.insert(alias.into(), generator);
        Ok(self)
    }

    /// Bind the named mapper generator to `args`
    pub fn generate_mapper(&self, name: &str, args: &[String]) -> ConfigResult<Mapper> {
        let generator = self
            .mappers
            .get(name)
            .ok_or_else(|| ConfigError::unknown(GeneratorKind::Mapper, name))?;
        generator(args)
    }

    /// Bind the named validator generator to `args`
    pub fn generate_validator(&self, name: &str, args: &[String]) -> ConfigResult<Validator> {
        let generator = self
            .validators
            .get(name)
            .ok_or_else(|| ConfigError::unknown(GeneratorKind::Validator, name))?;
        generator(args)
    }

    pub fn has_mapper(&self, name: &str) -> bool {
        self.mappers.contains_key(name)
    }

    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered mapper names, sorted
    pub fn mapper_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.mappers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered validator names, sorted
    pub fn validator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("mappers", &self.mapper_names())
            .field("validators", &self.validator_names())
            .finish()
    }
}
