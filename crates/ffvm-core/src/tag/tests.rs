//! Tests for tag parsing and compilation

use super::*;
use crate::error::{ConfigError, GeneratorKind};
use crate::registry::Registry;
use proptest::prelude::*;
use serde_json::json;

fn names(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn test_parse_mappers_and_validators() {
    let spec = parse_tag("upper;lower,min_len=3;enum=a&b").unwrap();
    assert_eq!(names(&spec.mappers), vec!["upper", "lower"]);
    assert_eq!(names(&spec.validators), vec!["min_len", "enum"]);
    assert_eq!(spec.validators[0].args, vec!["3"]);
    assert_eq!(spec.validators[1].args, vec!["a", "b"]);
}

#[test]
fn test_tag_without_comma_is_validator_only() {
    let spec = parse_tag("required;max_len=10").unwrap();
    assert!(spec.mappers.is_empty());
    assert_eq!(names(&spec.validators), vec!["required", "max_len"]);
}

#[test]
fn test_mapper_only_tag() {
    let spec = parse_tag("lower,").unwrap();
    assert_eq!(names(&spec.mappers), vec!["lower"]);
    assert!(spec.validators.is_empty());
}

#[test]
fn test_empty_tokens_are_skipped() {
    let spec = parse_tag(";upper;;, ;not_nil;").unwrap();
    assert_eq!(names(&spec.mappers), vec!["upper"]);
    assert_eq!(names(&spec.validators), vec!["not_nil"]);
    assert!(parse_tag("").unwrap().is_empty());
    assert!(parse_tag(",").unwrap().is_empty());
}

#[test]
fn test_only_first_comma_splits() {
    let spec = parse_tag(",regex=^[a-z]{1,3}$").unwrap();
    assert_eq!(spec.validators.len(), 1);
    assert_eq!(spec.validators[0].args, vec!["^[a-z]{1,3}$"]);
}

#[test]
fn test_token_positions() {
    let spec = parse_tag("upper, len=5").unwrap();
    assert_eq!(spec.mappers[0].position, 0);
    assert_eq!(spec.validators[0].position, 7);
}

#[test]
fn test_missing_name_is_malformed() {
    let err = parse_tag(",=3").unwrap_err();
    assert!(matches!(err, ConfigError::MalformedTag { position: 1, .. }), "{:?}", err);
}

#[test]
fn test_whitespace_in_name_is_malformed() {
    let err = parse_tag("max len=3").unwrap_err();
    assert!(matches!(err, ConfigError::MalformedTag { position: 3, .. }), "{:?}", err);
}

#[test]
fn test_compile_composition_example() {
    let actor = compile_tag("upper;lower,min_len=3", &Registry::new()).unwrap();
    let outcome = actor.act(&json!("Amir"));
    assert_eq!(outcome.mapped, Some(json!("amir")));
    assert!(outcome.messages.is_empty());
}

#[test]
fn test_validators_do_not_chain() {
    let actor = compile_tag("upper,upper;len=2;enum=AB", &Registry::new()).unwrap();
    let outcome = actor.act(&json!("ab"));
    assert_eq!(outcome.mapped, Some(json!("AB")));
    assert!(outcome.messages.is_empty());

    let outcome = actor.act(&json!("abc"));
    assert_eq!(
        outcome.messages,
        vec![
            "expected len to be 2 but is 3".to_string(),
            "expected valid enum, be: ABC, expected one of: [AB]".to_string(),
        ]
    );
}

#[test]
fn test_unchanged_value_is_not_reported_as_mapped() {
    let actor = compile_tag("upper,not_nil", &Registry::new()).unwrap();
    let outcome = actor.act(&json!(42));
    assert_eq!(outcome.mapped, None);
    assert!(outcome.messages.is_empty());
}

#[test]
fn test_compile_unknown_generator() {
    let err = compile_tag("title,required", &Registry::new()).err();
    assert_eq!(err, Some(ConfigError::unknown(GeneratorKind::Mapper, "title")));

    let err = compile_tag("positive", &Registry::new()).err();
    assert_eq!(err, Some(ConfigError::unknown(GeneratorKind::Validator, "positive")));
}

#[test]
fn test_compile_checks_arity_eagerly() {
    let registry = Registry::new();
    assert!(matches!(
        compile_tag("min_len=1&2", &registry).err(),
        Some(ConfigError::Arity { found: 2, .. })
    ));
    assert!(matches!(
        compile_tag("min_len", &registry).err(),
        Some(ConfigError::Arity { found: 0, .. })
    ));
}

#[test]
fn test_actor_metadata() {
    let actor = compile_tag("upper,not_nil;len=2", &Registry::new()).unwrap();
    assert_eq!(actor.tag(), Some("upper,not_nil;len=2"));
    assert!(actor.has_mappers());
    assert_eq!(actor.validator_names().collect::<Vec<_>>(), vec!["not_nil", "len"]);
}

proptest! {
    /// Property: parsing never panics on arbitrary input
    #[test]
    fn prop_parse_never_panics(tag in "\\PC{0,60}") {
        let _ = parse_tag(&tag);
    }

    /// Property: well-formed token lists survive parsing in order
    #[test]
    fn prop_token_order_preserved(
        names in proptest::collection::vec("[a-z_]{1,8}", 0..6)
    ) {
        let tag = format!(",{}", names.join(";"));
        let spec = parse_tag(&tag).unwrap();
        let parsed: Vec<String> = spec.validators.iter().map(|t| t.name.clone()).collect();
        prop_assert_eq!(parsed, names);
    }
}
