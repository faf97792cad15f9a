//! Built-in mapper and validator generators
//!
//! Installed by [`Registry::new`]. Each generator checks its argument count and
//! parses its arguments when the tag is compiled, so a bad annotation fails
//! once, at pipeline build time, instead of on every call.
//!
//! Values a generator does not understand (an `upper` mapper fed a number, a
//! `max_len` validator fed a boolean) pass through without an issue.

use super::types::{Mapper, TypeHint, Validator};
use super::Registry;
use crate::error::{Arity, ConfigError, ConfigResult, GeneratorKind};
use crate::types::display_value;
use regex::Regex;
use serde_json::Value;

/// Install every built-in generator into `registry`
pub fn install(registry: &mut Registry) {
    registry
        .register_mapper_generator("upper", upper_mapper)
        .register_mapper_generator("lower", lower_mapper)
        .register_mapper_generator("len", len_mapper);

    registry
        .register_validator_generator("not_nil", not_nil_validator)
        .register_validator_generator("nil", nil_validator)
        .register_validator_generator("empty", empty_validator)
        .register_validator_generator("not_empty", not_empty_validator)
        .register_validator_generator("required", not_empty_validator)
        .register_validator_generator("upper", upper_validator)
        .register_validator_generator("lower", lower_validator)
        .register_validator_generator("max_len", max_len_validator)
        .register_validator_generator("min_len", min_len_validator)
        .register_validator_generator("len", len_validator)
        .register_validator_generator("max", max_validator)
        .register_validator_generator("min", min_validator)
        .register_validator_generator("regex", regex_validator)
        .register_validator_generator("enum", enum_validator);
}

/// Fail with an arity error unless `args` fits `arity`
pub fn expect_arity(
    kind: GeneratorKind,
    name: &str,
    args: &[String],
    arity: Arity,
) -> ConfigResult<()> {
    if arity.accepts(args.len()) {
        Ok(())
    } else {
        Err(ConfigError::Arity {
            kind,
            name: name.to_string(),
            expected: arity,
            found: args.len(),
        })
    }
}

/// Measured length of strings (in characters), sequences and maps
pub fn measure_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(entries) => Some(entries.len()),
        _ => None,
    }
}

/// Best-effort numeric view of a value
///
/// Numbers convert directly and strings are parsed; anything else has no
/// numeric form.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Whether a value is empty judging by its JSON shape alone
///
/// Objects follow the map rule (no entries). Records need a [`TypeHint`] from
/// the traverser, since a zero-valued record still serializes its fields.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
    }
}

fn parse_len_arg(name: &str, arg: &str) -> ConfigResult<usize> {
    arg.trim().parse::<usize>().map_err(|e| {
        ConfigError::invalid_argument(
            GeneratorKind::Validator,
            name,
            arg,
            format!("expected argument to be a valid integer, err={}", e),
        )
    })
}

fn parse_bound_arg(name: &str, arg: &str) -> ConfigResult<f64> {
    arg.trim().parse::<f64>().map_err(|e| {
        ConfigError::invalid_argument(
            GeneratorKind::Validator,
            name,
            arg,
            format!("expected argument to be a valid float, err={}", e),
        )
    })
}

fn string_mapper(name: &str, args: &[String], fold: fn(&str) -> String) -> ConfigResult<Mapper> {
    expect_arity(GeneratorKind::Mapper, name, args, Arity::exactly(0))?;
    Ok(Box::new(move |value: &Value| {
        value.as_str().map(|s| Value::String(fold(s)))
    }))
}

pub fn upper_mapper(args: &[String]) -> ConfigResult<Mapper> {
    string_mapper("upper", args, str::to_uppercase)
}

pub fn lower_mapper(args: &[String]) -> ConfigResult<Mapper> {
    string_mapper("lower", args, str::to_lowercase)
}

pub fn len_mapper(args: &[String]) -> ConfigResult<Mapper> {
    expect_arity(GeneratorKind::Mapper, "len", args, Arity::exactly(0))?;
    Ok(Box::new(|value: &Value| {
        measure_len(value).map(|len| Value::from(len as u64))
    }))
}

pub fn not_nil_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "not_nil", args, Arity::exactly(0))?;
    Ok(Box::new(|value: &Value, _: TypeHint| {
        value.is_null().then(|| "expected not nil value".to_string())
    }))
}

pub fn nil_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "nil", args, Arity::exactly(0))?;
    Ok(Box::new(|value: &Value, _: TypeHint| {
        (!value.is_null()).then(|| format!("expected nil value but was {}", display_value(value)))
    }))
}

pub fn empty_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "empty", args, Arity::exactly(0))?;
    Ok(Box::new(|value: &Value, hint: TypeHint| {
        (!hint.is_zero(value))
            .then(|| format!("expected empty value but was {}", display_value(value)))
    }))
}

pub fn not_empty_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "not_empty", args, Arity::exactly(0))?;
    Ok(Box::new(|value: &Value, hint: TypeHint| {
        hint.is_zero(value).then(|| "expected not empty value".to_string())
    }))
}

pub fn upper_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "upper", args, Arity::exactly(0))?;
    Ok(Box::new(|value: &Value, _: TypeHint| match value.as_str() {
        Some(s) if s != s.to_uppercase() => Some("expected upper case".to_string()),
        _ => None,
    }))
}

pub fn lower_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "lower", args, Arity::exactly(0))?;
    Ok(Box::new(|value: &Value, _: TypeHint| match value.as_str() {
        Some(s) if s != s.to_lowercase() => {
            Some(format!("expected lower case string, but found {}", s))
        }
        _ => None,
    }))
}

pub fn max_len_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "max_len", args, Arity::exactly(1))?;
    let max_len = parse_len_arg("max_len", &args[0])?;
    Ok(Box::new(move |value: &Value, _: TypeHint| match measure_len(value) {
        Some(len) if len > max_len => Some(format!(
            "max len exceeded, expected max len {} but is {}",
            max_len, len
        )),
        _ => None,
    }))
}

pub fn min_len_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "min_len", args, Arity::exactly(1))?;
    let min_len = parse_len_arg("min_len", &args[0])?;
    Ok(Box::new(move |value: &Value, _: TypeHint| match measure_len(value) {
        Some(len) if len < min_len => Some(format!(
            "less than min len, expected min len {} but is {}",
            min_len, len
        )),
        _ => None,
    }))
}

pub fn len_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "len", args, Arity::exactly(1))?;
    let expected = parse_len_arg("len", &args[0])?;
    Ok(Box::new(move |value: &Value, _: TypeHint| match measure_len(value) {
        Some(len) if len != expected => {
            Some(format!("expected len to be {} but is {}", expected, len))
        }
        _ => None,
    }))
}

pub fn max_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "max", args, Arity::exactly(1))?;
    let max = parse_bound_arg("max", &args[0])?;
    let shown = args[0].trim().to_string();
    Ok(Box::new(move |value: &Value, _: TypeHint| match as_f64(value) {
        Some(n) if n > max => Some(format!(
            "expected not to be more than {} but it was {}",
            shown,
            display_value(value)
        )),
        _ => None,
    }))
}

pub fn min_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "min", args, Arity::exactly(1))?;
    let min = parse_bound_arg("min", &args[0])?;
    let shown = args[0].trim().to_string();
    Ok(Box::new(move |value: &Value, _: TypeHint| match as_f64(value) {
        Some(n) if n < min => Some(format!(
            "expected not to be less than {} but it was {}",
            shown,
            display_value(value)
        )),
        _ => None,
    }))
}

pub fn regex_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "regex", args, Arity::exactly(1))?;
    let pattern = args[0].clone();
    let regex = Regex::new(&pattern).map_err(|e| {
        ConfigError::invalid_argument(
            GeneratorKind::Validator,
            "regex",
            &pattern,
            format!("expected argument to be a valid regex, err={}", e),
        )
    })?;
    Ok(Box::new(move |value: &Value, _: TypeHint| match value.as_str() {
        Some(s) if !regex.is_match(s) => {
            Some(format!("expected match string with regex={}", pattern))
        }
        _ => None,
    }))
}

pub fn enum_validator(args: &[String]) -> ConfigResult<Validator> {
    expect_arity(GeneratorKind::Validator, "enum", args, Arity::at_least(1))?;
    let candidates = args.to_vec();
    Ok(Box::new(move |value: &Value, _: TypeHint| {
        let actual = display_value(value);
        if candidates.iter().any(|candidate| *candidate == actual) {
            None
        } else {
            Some(format!(
                "expected valid enum, be: {}, expected one of: [{}]",
                actual,
                candidates.join(", ")
            ))
        }
    }))
}
