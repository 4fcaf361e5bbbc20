//! Derives the untyped `serde_yaml::Value` from a composed tree.
//!
//! Plain scalars resolve with the YAML 1.2 core schema; everything else stays
//! a string. Mapping keys are always the key's scalar text.

use crate::config::DuplicateKeyPolicy;
use crate::error::StructureViolation;
use crate::node::YamlNode;
use serde_yaml::{Mapping, Number, Value as YamlValue};

pub(crate) fn to_loose_value(
    node: &YamlNode,
    duplicates: DuplicateKeyPolicy,
) -> Result<YamlValue, StructureViolation> {
    match node {
        YamlNode::Mapping { entries, .. } => {
            let mut mapping = Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                let key_text = key
                    .as_scalar()
                    .ok_or(StructureViolation::NonScalarKey { mark: key.mark() })?;
                let value = to_loose_value(value, duplicates)?;
                let previous = mapping.insert(YamlValue::String(key_text.to_string()), value);
                if previous.is_some() && duplicates == DuplicateKeyPolicy::Reject {
                    return Err(StructureViolation::DuplicateKey {
                        key: key_text.to_string(),
                        mark: key.mark(),
                    });
                }
            }
            Ok(YamlValue::Mapping(mapping))
        }
        YamlNode::Sequence { items, .. } => items
            .iter()
            .map(|item| to_loose_value(item, duplicates))
            .collect::<Result<Vec<_>, _>>()
            .map(YamlValue::Sequence),
        YamlNode::Scalar { value, plain, .. } => Ok(if *plain {
            resolve_plain(value)
        } else {
            YamlValue::String(value.clone())
        }),
    }
}

/// Core schema resolution of a plain scalar
fn resolve_plain(text: &str) -> YamlValue {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return YamlValue::Null,
        "true" | "True" | "TRUE" => return YamlValue::Bool(true),
        "false" | "False" | "FALSE" => return YamlValue::Bool(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return YamlValue::Number(Number::from(f64::INFINITY))
        }
        "-.inf" | "-.Inf" | "-.INF" => return YamlValue::Number(Number::from(f64::NEG_INFINITY)),
        ".nan" | ".NaN" | ".NAN" => return YamlValue::Number(Number::from(f64::NAN)),
        _ => {}
    }

    if let Some(number) = parse_integer(text) {
        return YamlValue::Number(number);
    }

    if is_float_literal(text) {
        if let Ok(f) = text.parse::<f64>() {
            return YamlValue::Number(Number::from(f));
        }
    }

    YamlValue::String(text.to_string())
}

fn parse_integer(text: &str) -> Option<Number> {
    if let Some(hex) = text.strip_prefix("0x") {
        return u64::from_str_radix(hex, 16).ok().map(Number::from);
    }
    if let Some(octal) = text.strip_prefix("0o") {
        return u64::from_str_radix(octal, 8).ok().map(Number::from);
    }

    let digits = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    digits
        .parse::<u64>()
        .ok()
        .filter(|_| !text.starts_with('-'))
        .map(Number::from)
}

/// `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`
fn is_float_literal(text: &str) -> bool {
    let body = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    let (mantissa, exponent) = match body.find(&['e', 'E'][..]) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match fraction {
        Some(fraction) => {
            all_digits(whole) && all_digits(fraction) && !(whole.is_empty() && fraction.is_empty())
        }
        None => !whole.is_empty() && all_digits(whole),
    };

    let exponent_ok = match exponent {
        Some(exp) => {
            let digits = exp.strip_prefix(&['-', '+'][..]).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
        None => true,
    };

    mantissa_ok && exponent_ok
}
