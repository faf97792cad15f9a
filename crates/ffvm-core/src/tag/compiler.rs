//! Resolution of parsed tags through the registry
//!
//! Every token is bound to its generator here, once per field, so unknown
//! names and bad arguments surface when the type pipeline is built.

use super::parser::{parse_tag, TagSpec};
use crate::error::ConfigResult;
use crate::pipeline::FieldActor;
use crate::registry::Registry;

/// Parse and compile a tag into a field actor
pub fn compile_tag(tag: &str, registry: &Registry) -> ConfigResult<FieldActor> {
    let spec = parse_tag(tag)?;
    compile_spec(tag, &spec, registry)
}

/// Compile an already parsed tag
pub fn compile_spec(tag: &str, spec: &TagSpec, registry: &Registry) -> ConfigResult<FieldActor> {
    let mut mappers = Vec::with_capacity(spec.mappers.len());
    for token in &spec.mappers {
        let mapper = registry.generate_mapper(&token.name, &token.args)?;
        mappers.push((token.name.clone(), mapper));
    }

    let mut validators = Vec::with_capacity(spec.validators.len());
    for token in &spec.validators {
        let validator = registry.generate_validator(&token.name, &token.args)?;
        validators.push((token.name.clone(), validator));
    }

    Ok(FieldActor::new(tag, mappers, validators))
}
