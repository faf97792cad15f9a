//! Tests for the registry and the built-in generators

use super::built_in::{as_f64, is_empty_value, measure_len};
use super::*;
use crate::error::{Arity, ConfigError, GeneratorKind};
use proptest::prelude::*;
use serde_json::{json, Value};

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn check(registry: &Registry, name: &str, arguments: &[&str], value: Value) -> Option<String> {
    let validator = registry
        .generate_validator(name, &args(arguments))
        .expect("validator should compile");
    validator(&value, TypeHint::UNKNOWN)
}

fn check_hinted(registry: &Registry, name: &str, value: Value, hint: TypeHint) -> Option<String> {
    let validator = registry
        .generate_validator(name, &[])
        .expect("validator should compile");
    validator(&value, hint)
}

#[test]
fn test_builtins_installed() {
    let registry = Registry::new();
    assert_eq!(registry.mapper_names(), vec!["len", "lower", "upper"]);
    for name in [
        "not_nil", "nil", "empty", "not_empty", "required", "upper", "lower", "max_len",
        "min_len", "len", "max", "min", "regex", "enum",
    ] {
        assert!(registry.has_validator(name), "missing validator {}", name);
    }
}

#[test]
fn test_empty_registry_rejects_lookups() {
    let registry = Registry::empty();
    let err = registry.generate_mapper("upper", &[]).err();
    assert_eq!(err, Some(ConfigError::unknown(GeneratorKind::Mapper, "upper")));

    let err = registry.generate_validator("enum", &args(&["a"])).err();
    assert_eq!(err, Some(ConfigError::unknown(GeneratorKind::Validator, "enum")));
}

#[test]
fn test_custom_generator_registration() {
    let mut registry = Registry::empty();
    registry.register_validator_generator("even", |args: &[String]| {
        built_in::expect_arity(GeneratorKind::Validator, "even", args, Arity::exactly(0))?;
        let validator: Validator = Box::new(|value: &Value, _: TypeHint| match value.as_i64() {
            Some(n) if n % 2 != 0 => Some(format!("expected even number but was {}", n)),
            _ => None,
        });
        Ok(validator)
    });

    assert!(registry.has_validator("even"));
    assert_eq!(check(&registry, "even", &[], json!(4)), None);
    assert_eq!(
        check(&registry, "even", &[], json!(3)),
        Some("expected even number but was 3".to_string())
    );
}

#[test]
fn test_alias_validator() {
    let mut registry = Registry::new();
    registry.alias_validator("present", "not_nil").unwrap();
    assert_eq!(
        check(&registry, "present", &[], Value::Null),
        Some("expected not nil value".to_string())
    );

    let err = registry.alias_validator("x", "missing").err();
    assert_eq!(err, Some(ConfigError::unknown(GeneratorKind::Validator, "missing")));
}

#[test]
fn test_alias_mapper() {
    let mut registry = Registry::new();
    registry.alias_mapper("shout", "upper").unwrap();
    let mapper = registry.generate_mapper("shout", &[]).unwrap();
    assert_eq!(mapper(&json!("hey")), Some(json!("HEY")));
}

#[test]
fn test_case_mappers() {
    let registry = Registry::new();
    let upper = registry.generate_mapper("upper", &[]).unwrap();
    let lower = registry.generate_mapper("lower", &[]).unwrap();

    assert_eq!(upper(&json!("Amir")), Some(json!("AMIR")));
    assert_eq!(lower(&json!("Amir")), Some(json!("amir")));
    assert_eq!(upper(&json!(10)), None);
    assert_eq!(lower(&Value::Null), None);
}

#[test]
fn test_len_mapper() {
    let registry = Registry::new();
    let len = registry.generate_mapper("len", &[]).unwrap();

    assert_eq!(len(&json!("héllo")), Some(json!(5)));
    assert_eq!(len(&json!([1, 2, 3])), Some(json!(3)));
    assert_eq!(len(&json!({"a": 1})), Some(json!(1)));
    assert_eq!(len(&json!(true)), None);
}

#[test]
fn test_mapper_arity_is_checked() {
    let registry = Registry::new();
    let err = registry.generate_mapper("upper", &args(&["x"])).err();
    assert_eq!(
        err,
        Some(ConfigError::Arity {
            kind: GeneratorKind::Mapper,
            name: "upper".to_string(),
            expected: Arity::exactly(0),
            found: 1,
        })
    );
}

#[test]
fn test_min_len_arity_is_checked() {
    let registry = Registry::new();
    for bad in [args(&[]), args(&["1", "2"])] {
        let err = registry.generate_validator("min_len", &bad).err();
        assert!(
            matches!(err, Some(ConfigError::Arity { ref name, found, .. }) if name == "min_len" && found == bad.len()),
            "unexpected result for {:?}: {:?}",
            bad,
            err
        );
    }
}

#[test]
fn test_nil_validators() {
    let registry = Registry::new();
    assert_eq!(check(&registry, "not_nil", &[], json!("x")), None);
    assert_eq!(
        check(&registry, "not_nil", &[], Value::Null),
        Some("expected not nil value".to_string())
    );
    assert_eq!(check(&registry, "nil", &[], Value::Null), None);
    assert_eq!(
        check(&registry, "nil", &[], json!(4)),
        Some("expected nil value but was 4".to_string())
    );
}

#[test]
fn test_empty_validators() {
    let registry = Registry::new();
    for empty in [json!(""), json!(0), json!(0.0), json!(false), json!([]), json!({}), Value::Null] {
        assert_eq!(check(&registry, "empty", &[], empty.clone()), None, "{}", empty);
        assert_eq!(
            check(&registry, "required", &[], empty),
            Some("expected not empty value".to_string())
        );
    }
    assert_eq!(
        check(&registry, "empty", &[], json!("x")),
        Some("expected empty value but was x".to_string())
    );
    assert_eq!(check(&registry, "not_empty", &[], json!([0])), None);
}

#[test]
fn test_emptiness_follows_type_hint() {
    let registry = Registry::new();
    let zero_record = json!({"x": 0, "y": 0});

    // without type knowledge an object is a map with entries
    assert_eq!(
        check(&registry, "empty", &[], zero_record.clone()),
        Some("expected empty value but was {\"x\":0,\"y\":0}".to_string())
    );
    assert_eq!(check(&registry, "required", &[], zero_record.clone()), None);

    assert_eq!(check_hinted(&registry, "empty", zero_record.clone(), TypeHint::zero(true)), None);
    assert_eq!(
        check_hinted(&registry, "required", zero_record.clone(), TypeHint::zero(true)),
        Some("expected not empty value".to_string())
    );
    assert_eq!(check_hinted(&registry, "not_empty", zero_record, TypeHint::zero(false)), None);
    assert_eq!(
        check_hinted(&registry, "empty", json!({"x": 1, "y": 0}), TypeHint::zero(false)),
        Some("expected empty value but was {\"x\":1,\"y\":0}".to_string())
    );
}

#[test]
fn test_type_hint_falls_back_to_json_shape() {
    assert!(TypeHint::UNKNOWN.is_zero(&json!("")));
    assert!(!TypeHint::UNKNOWN.is_zero(&json!({"k": 0})));
    assert!(TypeHint::zero(true).is_zero(&json!({"k": 0})));
    assert!(!TypeHint::zero(false).is_zero(&json!({})));
    assert_eq!(TypeHint::default(), TypeHint::UNKNOWN);
    assert_eq!(TypeHint::zero(true).known_zero(), Some(true));
}

#[test]
fn test_case_validators() {
    let registry = Registry::new();
    assert_eq!(check(&registry, "upper", &[], json!("ABC")), None);
    assert_eq!(
        check(&registry, "upper", &[], json!("AbC")),
        Some("expected upper case".to_string())
    );
    assert_eq!(check(&registry, "upper", &[], json!(12)), None);
    assert_eq!(
        check(&registry, "lower", &[], json!("Abc")),
        Some("expected lower case string, but found Abc".to_string())
    );
}

#[test]
fn test_length_validators() {
    let registry = Registry::new();
    assert_eq!(check(&registry, "max_len", &["3"], json!("abc")), None);
    assert_eq!(
        check(&registry, "max_len", &["3"], json!("abcd")),
        Some("max len exceeded, expected max len 3 but is 4".to_string())
    );
    assert_eq!(
        check(&registry, "min_len", &["2"], json!([1])),
        Some("less than min len, expected min len 2 but is 1".to_string())
    );
    assert_eq!(
        check(&registry, "len", &["5"], json!("AB")),
        Some("expected len to be 5 but is 2".to_string())
    );
    // not measurable
    assert_eq!(check(&registry, "len", &["5"], json!(12)), None);
}

#[test]
fn test_length_argument_must_be_integer() {
    let registry = Registry::new();
    let err = registry.generate_validator("max_len", &args(&["ten"])).err();
    assert!(matches!(
        err,
        Some(ConfigError::InvalidArgument { ref name, ref argument, .. }) if name == "max_len" && argument == "ten"
    ));
}

#[test]
fn test_numeric_bounds() {
    let registry = Registry::new();
    assert_eq!(check(&registry, "max", &["10"], json!(10)), None);
    assert_eq!(
        check(&registry, "max", &["10"], json!(10.5)),
        Some("expected not to be more than 10 but it was 10.5".to_string())
    );
    assert_eq!(
        check(&registry, "min", &["18"], json!("17")),
        Some("expected not to be less than 18 but it was 17".to_string())
    );
    assert_eq!(check(&registry, "min", &["18"], json!("n/a")), None);
    assert_eq!(check(&registry, "min", &["-1.5"], json!(-1)), None);

    let err = registry.generate_validator("min", &args(&["low"])).err();
    assert!(matches!(err, Some(ConfigError::InvalidArgument { .. })));
}

#[test]
fn test_regex_validator() {
    let registry = Registry::new();
    assert_eq!(check(&registry, "regex", &["^[a-z]+$"], json!("abc")), None);
    assert_eq!(
        check(&registry, "regex", &["^[a-z]+$"], json!("ab1")),
        Some("expected match string with regex=^[a-z]+$".to_string())
    );
    assert_eq!(check(&registry, "regex", &["^[a-z]+$"], json!(1)), None);

    let err = registry.generate_validator("regex", &args(&["(unclosed"])).err();
    assert!(matches!(err, Some(ConfigError::InvalidArgument { ref name, .. }) if name == "regex"));
}

#[test]
fn test_enum_validator() {
    let registry = Registry::new();
    let colors = ["red", "green", "blue"];
    for ok in colors {
        assert_eq!(check(&registry, "enum", &colors, json!(ok)), None);
    }
    assert_eq!(
        check(&registry, "enum", &colors, json!("Red")),
        Some("expected valid enum, be: Red, expected one of: [red, green, blue]".to_string())
    );
    assert_eq!(check(&registry, "enum", &["1", "2"], json!(2)), None);

    let err = registry.generate_validator("enum", &[]).err();
    assert!(matches!(err, Some(ConfigError::Arity { found: 0, .. })));
}

#[test]
fn test_value_helpers() {
    assert_eq!(measure_len(&json!("abc")), Some(3));
    assert_eq!(measure_len(&json!(3)), None);
    assert_eq!(as_f64(&json!(" 2.5 ")), Some(2.5));
    assert_eq!(as_f64(&json!(true)), None);
    assert!(is_empty_value(&json!(0)));
    assert!(!is_empty_value(&json!(-1)));
}

proptest! {
    /// Property: upper-casing is idempotent
    #[test]
    fn prop_upper_mapper_idempotent(input in "\\PC{0,40}") {
        let registry = Registry::new();
        let upper = registry.generate_mapper("upper", &[]).unwrap();
        let once = upper(&Value::String(input)).unwrap();
        let twice = upper(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Property: the len mapper agrees with the len validator
    #[test]
    fn prop_len_mapper_matches_validator(input in "[a-zA-Z0-9 ]{0,30}") {
        let registry = Registry::new();
        let len = registry.generate_mapper("len", &[]).unwrap();
        let measured = len(&Value::String(input.clone())).unwrap();
        let n = measured.as_u64().unwrap().to_string();
        let validator = registry.generate_validator("len", &[n]).unwrap();
        prop_assert_eq!(validator(&Value::String(input), TypeHint::UNKNOWN), None);
    }
}
