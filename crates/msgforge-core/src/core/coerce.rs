// msgforge-core/src/core/coerce.rs
// ============================================================================
// Module: Value Coercion Engine
// Description: Conversion of raw command-line tokens into typed field values.
// Purpose: Coerce scalar, enum, record, repeated, and map input per schema kind.
// Dependencies: base64, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Coercion converts raw textual input for one bound flag or positional slot
//! into a typed [`Value`] matching its schema kind, recursively for nested
//! records. Every error names the flag or positional slot implicated, since
//! the command surface is generated rather than hand-documented. Coercion is
//! collect-then-assemble: callers coerce every binding before touching the
//! request, so a failing field never leaves a partially mutated request
//! behind.
//!
//! Canonical encodings: bytes are base64 (STANDARD alphabet); timestamps are
//! RFC 3339 or integer Unix seconds; durations are integer seconds or
//! `10s`/`500ms`/`3m`/`2h` suffix forms; nested records supplied whole are
//! JSON objects decoded field by field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value as Json;
use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::schema::EnumDescriptor;
use crate::core::schema::FieldKind;
use crate::core::schema::RecordSchema;
use crate::core::schema::ScalarKind;
use crate::core::value::RecordValue;
use crate::core::value::Value;

// ============================================================================
// SECTION: Coercion Errors
// ============================================================================

/// Errors raised while coercing raw input into typed values.
///
/// Every variant carries the flag or positional label it applies to, so the
/// invoking user sees exactly which generated argument was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// No raw value was supplied for a binding that requires one.
    #[error("`{label}`: missing value")]
    MissingValue {
        /// Flag or positional label.
        label: String,
    },
    /// A signed integer token was malformed or out of range.
    #[error("`{label}`: invalid integer `{value}`")]
    InvalidInt {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
    },
    /// An unsigned integer token was malformed or out of range.
    #[error("`{label}`: invalid unsigned integer `{value}`")]
    InvalidUint {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
    },
    /// A boolean token was not in the accepted alias set.
    #[error("`{label}`: invalid boolean `{value}` (expected true/false, yes/no, on/off, 1/0)")]
    InvalidBool {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
    },
    /// A bytes token was not valid base64.
    #[error("`{label}`: invalid base64 bytes `{value}`")]
    InvalidBytes {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
    },
    /// An enum token matched neither a member name nor an ordinal.
    #[error("`{label}`: invalid enum value `{value}` (expected one of: {expected})")]
    InvalidEnum {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
        /// Comma-separated declared member names.
        expected: String,
    },
    /// A duration token was not a recognized duration form.
    #[error("`{label}`: invalid duration `{value}` (expected seconds or 10s/500ms/3m/2h)")]
    InvalidDuration {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
    },
    /// A timestamp token was neither RFC 3339 nor Unix seconds.
    #[error("`{label}`: invalid timestamp `{value}` (expected RFC 3339 or Unix seconds)")]
    InvalidTimestamp {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
    },
    /// A nested-record token was not a decodable JSON object.
    #[error("`{label}`: invalid record value: {reason}")]
    InvalidRecord {
        /// Flag or positional label.
        label: String,
        /// Decoder failure reason.
        reason: String,
    },
    /// A map token was not a `key=value` pair.
    #[error("`{label}`: invalid map entry `{value}` (expected key=value)")]
    InvalidMapEntry {
        /// Flag or positional label.
        label: String,
        /// Offending token.
        value: String,
    },
    /// A JSON object key did not name a declared record field.
    #[error("`{label}`: unknown field (record `{record}` declares no such field)")]
    UnknownField {
        /// Dotted label of the unknown field.
        label: String,
        /// Record schema name.
        record: String,
    },
    /// The field kind cannot be coerced from command-line tokens.
    #[error("`{label}`: unsupported input for {kind} field")]
    Unsupported {
        /// Flag or positional label.
        label: String,
        /// Field kind label.
        kind: &'static str,
    },
}

// ============================================================================
// SECTION: List Splitting Policy
// ============================================================================

/// Splitting policy for repeated values.
///
/// Repeated flags accept a single comma-separated token list; varargs
/// positional tokens are never inner-split, so each residual token becomes
/// exactly one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSplit {
    /// Split each scalar/enum token on commas.
    Comma,
    /// Treat each token as one element.
    None,
}

// ============================================================================
// SECTION: Field Coercion
// ============================================================================

/// Coerces the raw tokens bound to one flag or positional slot.
///
/// Non-repeated bindings use the last supplied token (later occurrences
/// override earlier ones). Repeated bindings consume every token, expanded
/// per the [`ListSplit`] policy for scalar and enum elements.
///
/// # Errors
///
/// Returns [`CoercionError`] naming `label` when any token is malformed for
/// the field kind.
pub fn coerce_field(
    kind: &FieldKind,
    label: &str,
    tokens: &[String],
    split: ListSplit,
) -> Result<Value, CoercionError> {
    match kind {
        FieldKind::Scalar(scalar) => coerce_scalar(*scalar, label, last_token(label, tokens)?),
        FieldKind::Enum(descriptor) => coerce_enum(descriptor, label, last_token(label, tokens)?),
        FieldKind::Record(schema) => {
            let raw = last_token(label, tokens)?;
            let json: Json = serde_json::from_str(raw).map_err(|err| CoercionError::InvalidRecord {
                label: label.to_string(),
                reason: err.to_string(),
            })?;
            record_from_json(schema, label, &json).map(Value::Record)
        }
        FieldKind::Repeated(element) => coerce_repeated(element, label, tokens, split),
        FieldKind::Map {
            key,
            value,
        } => coerce_map(*key, value, label, tokens),
    }
}

/// Returns the last supplied token for a single-valued binding.
fn last_token<'a>(label: &str, tokens: &'a [String]) -> Result<&'a str, CoercionError> {
    tokens.last().map(String::as_str).ok_or_else(|| CoercionError::MissingValue {
        label: label.to_string(),
    })
}

/// Coerces a repeated field from its raw tokens.
fn coerce_repeated(
    element: &FieldKind,
    label: &str,
    tokens: &[String],
    split: ListSplit,
) -> Result<Value, CoercionError> {
    let mut items = Vec::new();
    match element {
        FieldKind::Scalar(_) | FieldKind::Enum(_) => {
            for token in tokens {
                match split {
                    ListSplit::Comma => {
                        for part in token.split(',') {
                            items.push(coerce_element(element, label, part)?);
                        }
                    }
                    ListSplit::None => items.push(coerce_element(element, label, token)?),
                }
            }
        }
        FieldKind::Record(schema) => {
            for token in tokens {
                let json: Json =
                    serde_json::from_str(token).map_err(|err| CoercionError::InvalidRecord {
                        label: label.to_string(),
                        reason: err.to_string(),
                    })?;
                items.push(record_from_json(schema, label, &json).map(Value::Record)?);
            }
        }
        FieldKind::Repeated(_)
        | FieldKind::Map {
            ..
        } => {
            return Err(CoercionError::Unsupported {
                label: label.to_string(),
                kind: element.label(),
            });
        }
    }
    Ok(Value::List(items))
}

/// Coerces one scalar or enum repeated element.
fn coerce_element(element: &FieldKind, label: &str, raw: &str) -> Result<Value, CoercionError> {
    match element {
        FieldKind::Scalar(scalar) => coerce_scalar(*scalar, label, raw),
        FieldKind::Enum(descriptor) => coerce_enum(descriptor, label, raw),
        _ => Err(CoercionError::Unsupported {
            label: label.to_string(),
            kind: element.label(),
        }),
    }
}

/// Coerces a map field from repeated `key=value` tokens.
fn coerce_map(
    key_kind: ScalarKind,
    value_kind: &FieldKind,
    label: &str,
    tokens: &[String],
) -> Result<Value, CoercionError> {
    let mut entries = std::collections::BTreeMap::new();
    for token in tokens {
        let (key, value) = token.split_once('=').ok_or_else(|| CoercionError::InvalidMapEntry {
            label: label.to_string(),
            value: token.clone(),
        })?;
        // Validate the key against its declared scalar kind, then store the
        // raw key text as the map key.
        coerce_scalar(key_kind, label, key)?;
        let coerced = match value_kind {
            FieldKind::Scalar(scalar) => coerce_scalar(*scalar, label, value)?,
            FieldKind::Enum(descriptor) => coerce_enum(descriptor, label, value)?,
            _ => {
                return Err(CoercionError::Unsupported {
                    label: label.to_string(),
                    kind: value_kind.label(),
                });
            }
        };
        entries.insert(key.to_string(), coerced);
    }
    Ok(Value::Map(entries))
}

// ============================================================================
// SECTION: Scalar Coercion
// ============================================================================

/// Accepted truthy boolean aliases.
const TRUE_ALIASES: [&str; 6] = ["true", "t", "yes", "y", "on", "1"];
/// Accepted falsy boolean aliases.
const FALSE_ALIASES: [&str; 6] = ["false", "f", "no", "n", "off", "0"];

/// Coerces one raw token into a scalar value.
///
/// # Errors
///
/// Returns [`CoercionError`] naming `label` when the token is malformed for
/// the scalar kind.
pub fn coerce_scalar(kind: ScalarKind, label: &str, raw: &str) -> Result<Value, CoercionError> {
    match kind {
        ScalarKind::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| CoercionError::InvalidInt {
            label: label.to_string(),
            value: raw.to_string(),
        }),
        ScalarKind::Uint => {
            raw.parse::<u64>().map(Value::Uint).map_err(|_| CoercionError::InvalidUint {
                label: label.to_string(),
                value: raw.to_string(),
            })
        }
        ScalarKind::String => Ok(Value::Str(raw.to_string())),
        ScalarKind::Bool => {
            if TRUE_ALIASES.iter().any(|alias| raw.eq_ignore_ascii_case(alias)) {
                Ok(Value::Bool(true))
            } else if FALSE_ALIASES.iter().any(|alias| raw.eq_ignore_ascii_case(alias)) {
                Ok(Value::Bool(false))
            } else {
                Err(CoercionError::InvalidBool {
                    label: label.to_string(),
                    value: raw.to_string(),
                })
            }
        }
        ScalarKind::Bytes => BASE64.decode(raw).map(Value::Bytes).map_err(|_| {
            CoercionError::InvalidBytes {
                label: label.to_string(),
                value: raw.to_string(),
            }
        }),
        ScalarKind::Duration => {
            parse_duration(raw).map(Value::Duration).ok_or_else(|| CoercionError::InvalidDuration {
                label: label.to_string(),
                value: raw.to_string(),
            })
        }
        ScalarKind::Timestamp => {
            parse_timestamp(raw).map(Value::Timestamp).ok_or_else(|| {
                CoercionError::InvalidTimestamp {
                    label: label.to_string(),
                    value: raw.to_string(),
                }
            })
        }
    }
}

/// Parses a duration token: integer seconds, fractional `1.5s`, or one of
/// the `ms`/`s`/`m`/`h` suffix forms.
fn parse_duration(raw: &str) -> Option<Duration> {
    if let Ok(seconds) = raw.parse::<i64>() {
        return Some(Duration::seconds(seconds));
    }
    if let Some(number) = raw.strip_suffix("ms") {
        return number.parse::<i64>().ok().map(Duration::milliseconds);
    }
    if let Some(number) = raw.strip_suffix('s') {
        return parse_fractional_seconds(number);
    }
    if let Some(number) = raw.strip_suffix('m') {
        return number.parse::<i64>().ok().map(Duration::minutes);
    }
    if let Some(number) = raw.strip_suffix('h') {
        return number.parse::<i64>().ok().map(Duration::hours);
    }
    None
}

/// Parses `SS` or `SS.mmm` seconds text into a duration without floats.
fn parse_fractional_seconds(number: &str) -> Option<Duration> {
    match number.split_once('.') {
        None => number.parse::<i64>().ok().map(Duration::seconds),
        Some((whole, frac)) => {
            if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|byte| byte.is_ascii_digit())
            {
                return None;
            }
            let seconds = whole.parse::<i64>().ok()?;
            let mut millis: i64 = frac.parse().ok()?;
            for _ in frac.len() .. 3 {
                millis *= 10;
            }
            if seconds < 0 {
                millis = -millis;
            }
            Some(Duration::seconds(seconds) + Duration::milliseconds(millis))
        }
    }
}

/// Parses a timestamp token: RFC 3339 text or integer Unix seconds.
fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    raw.parse::<i64>().ok().and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
}

// ============================================================================
// SECTION: Enum Coercion
// ============================================================================

/// Coerces one raw token into an enum value by name or ordinal.
///
/// # Errors
///
/// Returns [`CoercionError::InvalidEnum`] when the token matches no declared
/// member.
pub fn coerce_enum(
    descriptor: &EnumDescriptor,
    label: &str,
    raw: &str,
) -> Result<Value, CoercionError> {
    let member = raw
        .parse::<i32>()
        .ok()
        .and_then(|ordinal| descriptor.member_by_ordinal(ordinal))
        .or_else(|| descriptor.member_by_name(raw));
    member.map_or_else(
        || {
            let expected = descriptor
                .members
                .iter()
                .map(|member| member.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CoercionError::InvalidEnum {
                label: label.to_string(),
                value: raw.to_string(),
                expected,
            })
        },
        |member| {
            Ok(Value::Enum {
                name: member.name.clone(),
                ordinal: member.ordinal,
            })
        },
    )
}

// ============================================================================
// SECTION: Record Decoding
// ============================================================================

/// Decodes a JSON object into a record value, field by field recursively.
///
/// Unaddressed fields stay at their schema zero value; unknown keys are
/// rejected so typos surface instead of silently dropping input.
///
/// # Errors
///
/// Returns [`CoercionError`] when a key is unknown or a value is malformed
/// for its field kind.
pub fn record_from_json(
    schema: &RecordSchema,
    label: &str,
    json: &Json,
) -> Result<RecordValue, CoercionError> {
    let Json::Object(object) = json else {
        return Err(CoercionError::InvalidRecord {
            label: label.to_string(),
            reason: format!("expected a JSON object for record `{}`", schema.name),
        });
    };
    let mut record = RecordValue::zero(schema);
    for (key, value) in object {
        let child_label = format!("{label}.{key}");
        let field = schema.field(key).ok_or_else(|| CoercionError::UnknownField {
            label: child_label.clone(),
            record: schema.name.clone(),
        })?;
        record.set(key.clone(), value_from_json(&field.kind, &child_label, value)?);
    }
    Ok(record)
}

/// Decodes one JSON value into a typed value for a field kind.
fn value_from_json(kind: &FieldKind, label: &str, json: &Json) -> Result<Value, CoercionError> {
    match kind {
        FieldKind::Scalar(scalar) => scalar_from_json(*scalar, label, json),
        FieldKind::Enum(descriptor) => match json {
            Json::String(text) => coerce_enum(descriptor, label, text),
            Json::Number(number) => coerce_enum(descriptor, label, &number.to_string()),
            other => Err(invalid_json(label, "enum name or ordinal", other)),
        },
        FieldKind::Record(schema) => record_from_json(schema, label, json).map(Value::Record),
        FieldKind::Repeated(element) => match json {
            Json::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(value_from_json(element, label, item)?);
                }
                Ok(Value::List(values))
            }
            other => Err(invalid_json(label, "array", other)),
        },
        FieldKind::Map {
            value, ..
        } => match json {
            Json::Object(object) => {
                let mut entries = std::collections::BTreeMap::new();
                for (key, item) in object {
                    let child_label = format!("{label}.{key}");
                    entries.insert(key.clone(), value_from_json(value, &child_label, item)?);
                }
                Ok(Value::Map(entries))
            }
            other => Err(invalid_json(label, "object", other)),
        },
    }
}

/// Decodes one JSON value into a scalar.
fn scalar_from_json(kind: ScalarKind, label: &str, json: &Json) -> Result<Value, CoercionError> {
    match (kind, json) {
        (ScalarKind::String, Json::String(text)) => Ok(Value::Str(text.clone())),
        (ScalarKind::Bool, Json::Bool(flag)) => Ok(Value::Bool(*flag)),
        (ScalarKind::Int, Json::Number(number)) => number.as_i64().map(Value::Int).ok_or_else(
            || invalid_json(label, "signed integer", json),
        ),
        (ScalarKind::Uint, Json::Number(number)) => number.as_u64().map(Value::Uint).ok_or_else(
            || invalid_json(label, "unsigned integer", json),
        ),
        (ScalarKind::Timestamp, Json::Number(number)) => number
            .as_i64()
            .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
            .map(Value::Timestamp)
            .ok_or_else(|| invalid_json(label, "Unix seconds", json)),
        (ScalarKind::Duration, Json::Number(number)) => number
            .as_i64()
            .map(|seconds| Value::Duration(Duration::seconds(seconds)))
            .ok_or_else(|| invalid_json(label, "seconds", json)),
        (_, Json::String(text)) => coerce_scalar(kind, label, text),
        _ => Err(invalid_json(label, kind.label(), json)),
    }
}

/// Builds the record-decoder error for a mismatched JSON value.
fn invalid_json(label: &str, expected: &str, json: &Json) -> CoercionError {
    CoercionError::InvalidRecord {
        label: label.to_string(),
        reason: format!("expected {expected}, got `{json}`"),
    }
}
