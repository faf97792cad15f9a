//! Error types for the ffvm core library
//!
//! This module defines the error handling system for ffvm, using thiserror for
//! ergonomic error definitions and anyhow for flexible internal error contexts.
//!
//! Three families are kept apart:
//! - configuration errors ([`ConfigError`]) raised while compiling annotation tags
//!   or writing a mapped value back into its field (the latter reported with the
//!   issues of the completed run),
//! - traversal errors (misuse of the root value, cycles, runaway depth),
//! - loading errors for [`crate::EngineConfig`] files.
//!
//! Validation issues are never errors; they are returned as data.

use crate::types::Issue;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of generator a configuration error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Value transform applied before validation
    Mapper,
    /// Predicate applied after mapping
    Validator,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Mapper => write!(f, "mapper"),
            GeneratorKind::Validator => write!(f, "validator"),
        }
    }
}

/// Errors detected while building field pipelines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No generator registered under this name
    #[error("unknown {kind} '{name}'")]
    UnknownGenerator { kind: GeneratorKind, name: String },

    /// Generator called with the wrong number of arguments
    #[error("{kind} name={name} expects {expected} argument(s) but has {found} argument(s)")]
    Arity {
        kind: GeneratorKind,
        name: String,
        expected: Arity,
        found: usize,
    },

    /// Argument could not be parsed into what the generator needs
    #[error("{kind} name={name} got invalid argument '{argument}': {reason}")]
    InvalidArgument {
        kind: GeneratorKind,
        name: String,
        argument: String,
        reason: String,
    },

    /// Tag text does not follow the annotation grammar
    #[error("malformed tag '{tag}' at position {position}: {message}")]
    MalformedTag {
        tag: String,
        position: usize,
        message: String,
    },

    /// Mapper produced a value the field cannot hold
    #[error("mapped value {value} cannot be stored in field '{field}' of type {type_name}: {reason}")]
    IncompatibleMapperOutput {
        field: String,
        type_name: &'static str,
        value: String,
        reason: String,
    },

    /// Field value could not be snapshotted into the dynamic value model
    #[error("field '{field}' of type {type_name} cannot be inspected: {reason}")]
    Snapshot {
        field: String,
        type_name: &'static str,
        reason: String,
    },
}

/// Result type for generator and tag compilation
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Accepted argument count range of a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    /// Exactly `n` arguments
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// At least `n` arguments
    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    /// Whether `count` arguments are acceptable
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{}..={}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

impl ConfigError {
    /// Create an unknown generator error
    pub fn unknown(kind: GeneratorKind, name: impl Into<String>) -> Self {
        Self::UnknownGenerator {
            kind,
            name: name.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(
        kind: GeneratorKind,
        name: impl Into<String>,
        argument: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::InvalidArgument {
            kind,
            name: name.into(),
            argument: argument.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a malformed tag error
    pub fn malformed(tag: impl Into<String>, position: usize, message: impl Into<String>) -> Self {
        Self::MalformedTag {
            tag: tag.into(),
            position,
            message: message.into(),
        }
    }
}

/// Main error type for ffvm operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid annotation, generator usage or mapper output
    #[error("Configuration error in {context}: {source}")]
    Configuration {
        context: String,
        #[source]
        source: ConfigError,
    },

    /// Mapped values that did not fit their fields
    ///
    /// Each rejected field kept its previous value and the traversal went on,
    /// so `issues` holds everything the run collected.
    #[error("Configuration error: {}", rejection_summary(.rejected))]
    Rejected {
        rejected: Vec<ConfigError>,
        issues: Vec<Issue>,
    },

    /// The value handed to the engine cannot be traversed
    #[error("Traversal misuse: {message}")]
    Misuse {
        message: String,
        type_name: &'static str,
    },

    /// A shared node was reached again while it was still being visited
    #[error("Cycle detected at '{path}' while visiting {type_name}")]
    Cycle {
        path: String,
        type_name: &'static str,
    },

    /// Nesting deeper than the configured limit
    #[error("Maximum traversal depth {limit} exceeded at '{path}'")]
    DepthExceeded { path: String, limit: usize },

    /// Engine configuration could not be loaded or is invalid
    #[error("Invalid engine configuration{}: {message}", path_suffix(.path))]
    ConfigFile {
        message: String,
        path: Option<PathBuf>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {message}")]
    Toml {
        message: String,
        #[source]
        source: toml::de::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

fn rejection_summary(rejected: &[ConfigError]) -> String {
    match rejected {
        [] => "no mapped value rejected".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a configuration error with the place it was found
    pub fn configuration(context: impl Into<String>, source: ConfigError) -> Self {
        Self::Configuration {
            context: context.into(),
            source,
        }
    }

    /// Create a traversal misuse error
    pub fn misuse(message: impl Into<String>, type_name: &'static str) -> Self {
        Self::Misuse {
            message: message.into(),
            type_name,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Internal {
            source: anyhow::anyhow!(message.clone()),
            message,
        }
    }

    /// The configuration error behind this error, if any
    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            Error::Configuration { source, .. } => Some(source),
            Error::Rejected { rejected, .. } => rejected.first(),
            _ => None,
        }
    }

    /// Whether the error comes from annotation or generator configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. } | Error::Rejected { .. })
    }

    /// Issues collected before the error was returned, if the run completed
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            Error::Rejected { issues, .. } => Some(issues),
            _ => None,
        }
    }

    /// Whether the error was raised by the traverser
    pub fn is_traversal(&self) -> bool {
        matches!(
            self,
            Error::Misuse { .. } | Error::Cycle { .. } | Error::DepthExceeded { .. }
        )
    }
}

// Conversion implementations
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::configuration("registry", err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::exactly(1).to_string(), "1");
        assert_eq!(Arity::at_least(1).to_string(), "at least 1");
        assert_eq!(Arity { min: 1, max: Some(3) }.to_string(), "1..=3");
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::exactly(0).accepts(0));
        assert!(!Arity::exactly(1).accepts(2));
        assert!(!Arity::at_least(1).accepts(0));
        assert!(Arity::at_least(1).accepts(12));
    }

    #[test]
    fn test_arity_error_display() {
        let err = ConfigError::Arity {
            kind: GeneratorKind::Validator,
            name: "min_len".to_string(),
            expected: Arity::exactly(1),
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "validator name=min_len expects 1 argument(s) but has 2 argument(s)"
        );
    }

    #[test]
    fn test_configuration_wrapping() {
        let err: Error = ConfigError::unknown(GeneratorKind::Mapper, "title").into();
        assert!(err.is_configuration());
        assert!(!err.is_traversal());
        assert_eq!(
            err.config_error(),
            Some(&ConfigError::unknown(GeneratorKind::Mapper, "title"))
        );
        assert_eq!(err.to_string(), "Configuration error in registry: unknown mapper 'title'");
    }

    #[test]
    fn test_rejected_keeps_issues() {
        let rejection = |field: &str| ConfigError::IncompatibleMapperOutput {
            field: field.to_string(),
            type_name: "u32",
            value: "\"x\"".to_string(),
            reason: "invalid type".to_string(),
        };
        let err = Error::Rejected {
            rejected: vec![rejection("count"), rejection("total")],
            issues: vec![Issue::new("expected not empty value", "name", serde_json::json!(""))],
        };
        assert!(err.is_configuration());
        assert_eq!(err.config_error(), Some(&rejection("count")));
        assert_eq!(err.issues().map(|issues| issues.len()), Some(1));
        assert_eq!(
            err.to_string(),
            "Configuration error: mapped value \"x\" cannot be stored in field 'count' of type u32: invalid type (and 1 more)"
        );
        assert_eq!(Error::internal("boom").issues(), None);
    }

    #[test]
    fn test_config_file_display() {
        let err = Error::ConfigFile {
            message: "max_depth must be positive".to_string(),
            path: Some(PathBuf::from("ffvm.yaml")),
        };
        assert_eq!(
            err.to_string(),
            "Invalid engine configuration in ffvm.yaml: max_depth must be positive"
        );
    }
}
