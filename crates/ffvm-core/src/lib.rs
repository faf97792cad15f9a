//! ffvm Core - declarative field mapping and validation
//!
//! Each field of a record carries an annotation tag describing a chain of value
//! transforms ("mappers") followed by a set of predicates ("validators"). The
//! engine compiles the tag once per record type, applies the mappers in place,
//! runs the validators on the mapped value and reports failures as
//! path-qualified [`Issue`]s.
//!
//! # Main Components
//!
//! - **Registry**: named mapper and validator generators, built-ins included
//! - **Tag Compiler**: annotation grammar to [`FieldActor`]
//! - **Pipeline Cache**: per-type compiled actors, built once
//! - **Traverser**: walks records, optionals, sequences and maps
//!
//! # Example
//!
//! ```
//! use ffvm_core::record;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Line {
//!     sku: String,
//! }
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Order {
//!     status: String,
//!     lines: Vec<Line>,
//! }
//!
//! record!(Line { sku: "upper,len=5" });
//! record!(Order { status: "lower,enum=open&closed", lines });
//!
//! let mut order = Order {
//!     status: "OPEN".into(),
//!     lines: vec![Line { sku: "ab123".into() }, Line { sku: "x".into() }],
//! };
//!
//! let issues = ffvm_core::validate(&mut order).unwrap();
//! assert_eq!(order.status, "open");
//! assert_eq!(order.lines[0].sku, "AB123");
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].field, "lines[1].sku");
//! assert_eq!(issues[0].message, "expected len to be 5 but is 1");
//! ```

#[macro_use]
mod record;

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod tag;
pub mod traversal;
pub mod types;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Arity, ConfigError, ConfigResult, Error, GeneratorKind, Result};
pub use pipeline::{ActorOutcome, FieldActor, PipelineCache, TypePipeline};
pub use registry::{Mapper, Registry, TypeHint, Validator};
pub use tag::{compile_tag, parse_tag, TagSpec};
pub use traversal::{Actable, Field, FieldSpec, Node, Record};
pub use types::Issue;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Map and validate `value` with the process-wide default engine
///
/// Use an [`Engine`] directly to register custom generators or change the
/// configuration.
pub fn validate<T: Actable>(value: &mut T) -> Result<Vec<Issue>> {
    Engine::global().validate(value)
}
