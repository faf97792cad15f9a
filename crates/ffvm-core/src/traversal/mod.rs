//! Traversal of nested values
//!
//! The [`Traverser`] dispatches on the [`Node`] a value exposes:
//!
//! - records run their [`TypePipeline`](crate::pipeline::TypePipeline) field
//!   by field, then descend into every field,
//! - optionals, boxes and shared cells descend with the same path,
//! - sequences descend with `path[i]`,
//! - maps descend with `path.key` in sorted key order,
//! - scalars stop.
//!
//! Issue paths are built on the way down, so a failure three levels deep is
//! reported as `orders[2].lines.sku` without re-prefixing on the way up.
//!
//! Before an annotated field is serialized for its actor, the structure below
//! it is walked once with every shared cell borrowed, so a reference cycle is
//! reported as [`Error::Cycle`](crate::Error::Cycle) instead of recursing
//! forever. The same walk decides whether a record-typed field holds its zero
//! value, which the `empty` and `required` validators need.

pub mod shape;
pub mod walker;


pub use shape::{Actable, Field, FieldSpec, Node, Record};
pub use walker::{Report, Traverser};
