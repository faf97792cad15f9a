//! Annotation tag compiler
//!
//! Turns a field annotation such as `upper;lower,min_len=3;enum=a&b` into a
//! [`FieldActor`](crate::pipeline::FieldActor): the part before the first comma
//! is the mapper chain, the part after it the validator list.
//!
//! - [`parser`] - grammar and tokenization
//! - [`compiler`] - generator resolution through the [`Registry`](crate::Registry)
//!
//! # Example
//!
//! ```
//! use ffvm_core::tag::compile_tag;
//! use ffvm_core::Registry;
//! use serde_json::json;
//!
//! let actor = compile_tag("upper,len=5", &Registry::new()).unwrap();
//! let outcome = actor.act(&json!("ab"));
//! assert_eq!(outcome.mapped, Some(json!("AB")));
//! assert_eq!(outcome.messages, vec!["expected len to be 5 but is 2".to_string()]);
//! ```

pub mod compiler;
pub mod parser;

#[cfg(test)]
mod tests;

pub use compiler::{compile_spec, compile_tag};
pub use parser::{parse_tag, TagParser, TagSpec, Token};
