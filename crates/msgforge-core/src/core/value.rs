// msgforge-core/src/core/value.rs
// ============================================================================
// Module: Dynamic Values
// Description: Runtime value store mirroring the schema field kinds.
// Purpose: Provide zero values, dotted-path assignment, and canonical JSON rendering.
// Dependencies: base64, serde_json, time
// ============================================================================

//! ## Overview
//! Values are a closed variant mirroring [`FieldKind`]. A request under
//! assembly is a [`RecordValue`] initialized to schema zero values; the single
//! generic set-by-path operation defined here is the only way coerced values
//! enter a request. Rendering to JSON is canonical: bytes as base64,
//! timestamps as RFC 3339, durations as suffixed seconds, enums by symbolic
//! name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value as Json;
use serde_json::json;
use time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::schema::FieldKind;
use crate::core::schema::RecordSchema;
use crate::core::schema::ScalarKind;

// ============================================================================
// SECTION: Value Variant
// ============================================================================

/// Runtime value for one schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    Uint(u64),
    /// String value.
    Str(String),
    /// Boolean value.
    Bool(bool),
    /// Byte string value.
    Bytes(Vec<u8>),
    /// Enum value carrying both symbolic name and ordinal.
    Enum {
        /// Symbolic member name.
        name: String,
        /// Integer ordinal.
        ordinal: i32,
    },
    /// Duration value.
    Duration(Duration),
    /// Timestamp value.
    Timestamp(OffsetDateTime),
    /// Nested record value.
    Record(RecordValue),
    /// Repeated value with homogeneous elements.
    List(Vec<Value>),
    /// Map value keyed by the rendered key scalar.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the schema zero value for a field kind.
    ///
    /// Enum zero is the member with ordinal zero when declared, else the
    /// first declared member, else an unnamed zero-ordinal placeholder for
    /// degenerate memberless enums.
    #[must_use]
    pub fn zero(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(scalar) => Self::zero_scalar(*scalar),
            FieldKind::Enum(descriptor) => descriptor.zero_member().map_or(
                Self::Enum {
                    name: String::new(),
                    ordinal: 0,
                },
                |member| Self::Enum {
                    name: member.name.clone(),
                    ordinal: member.ordinal,
                },
            ),
            FieldKind::Record(schema) => Self::Record(RecordValue::zero(schema)),
            FieldKind::Repeated(_) => Self::List(Vec::new()),
            FieldKind::Map {
                ..
            } => Self::Map(BTreeMap::new()),
        }
    }

    /// Returns the schema zero value for a scalar kind.
    #[must_use]
    pub fn zero_scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int => Self::Int(0),
            ScalarKind::Uint => Self::Uint(0),
            ScalarKind::String => Self::Str(String::new()),
            ScalarKind::Bool => Self::Bool(false),
            ScalarKind::Bytes => Self::Bytes(Vec::new()),
            ScalarKind::Duration => Self::Duration(Duration::ZERO),
            ScalarKind::Timestamp => Self::Timestamp(OffsetDateTime::UNIX_EPOCH),
        }
    }

    /// Returns true when the value's variant matches the field kind.
    ///
    /// The check is shallow for lists and maps; element conformance is
    /// guaranteed by coercion, which is the only producer of typed values.
    #[must_use]
    pub fn conforms_to(&self, kind: &FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::Int(_), FieldKind::Scalar(ScalarKind::Int))
                | (Self::Uint(_), FieldKind::Scalar(ScalarKind::Uint))
                | (Self::Str(_), FieldKind::Scalar(ScalarKind::String))
                | (Self::Bool(_), FieldKind::Scalar(ScalarKind::Bool))
                | (Self::Bytes(_), FieldKind::Scalar(ScalarKind::Bytes))
                | (Self::Duration(_), FieldKind::Scalar(ScalarKind::Duration))
                | (Self::Timestamp(_), FieldKind::Scalar(ScalarKind::Timestamp))
                | (Self::Enum { .. }, FieldKind::Enum(_))
                | (Self::Record(_), FieldKind::Record(_))
                | (Self::List(_), FieldKind::Repeated(_))
                | (Self::Map(_), FieldKind::Map { .. })
        )
    }

    /// Renders the value as canonical JSON.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Int(value) => json!(value),
            Self::Uint(value) => json!(value),
            Self::Str(value) => json!(value),
            Self::Bool(value) => json!(value),
            Self::Bytes(bytes) => json!(BASE64.encode(bytes)),
            Self::Enum {
                name, ..
            } => json!(name),
            Self::Duration(duration) => json!(format_duration(*duration)),
            Self::Timestamp(timestamp) => {
                // RFC 3339 formatting of a valid OffsetDateTime cannot fail
                // for in-range years; fall back to the Unix form if it does.
                timestamp
                    .format(&Rfc3339)
                    .map_or_else(|_| json!(timestamp.unix_timestamp()), |text| json!(text))
            }
            Self::Record(record) => record.to_json(),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => {
                let mut object = serde_json::Map::new();
                for (key, value) in entries {
                    object.insert(key.clone(), value.to_json());
                }
                Json::Object(object)
            }
        }
    }
}

/// Formats a duration as suffixed seconds, e.g. `90s` or `1.500s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.whole_seconds();
    let millis = duration.subsec_milliseconds().abs();
    if millis == 0 {
        format!("{seconds}s")
    } else {
        format!("{seconds}.{millis:03}s")
    }
}

// ============================================================================
// SECTION: Record Values
// ============================================================================

/// Runtime instance of a record schema.
///
/// Fields are keyed by name; a zero-initialized record carries every declared
/// field at its zero value, so assembly only ever replaces existing entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordValue {
    /// Field values keyed by field name.
    fields: BTreeMap<String, Value>,
}

impl RecordValue {
    /// Creates a zero-valued instance of a record schema.
    #[must_use]
    pub fn zero(schema: &RecordSchema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| (field.name.clone(), Value::zero(&field.kind)))
            .collect();
        Self {
            fields,
        }
    }

    /// Returns a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a mutable field value by name.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Replaces a field value by name, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Reads the value at a dotted path, descending through nested records.
    #[must_use]
    pub fn get_path(&self, segments: &[String]) -> Option<&Value> {
        let (first, rest) = segments.split_first()?;
        let value = self.fields.get(first)?;
        if rest.is_empty() {
            return Some(value);
        }
        match value {
            Value::Record(record) => record.get_path(rest),
            _ => None,
        }
    }

    /// Writes a value at a dotted path, descending through nested records.
    ///
    /// Returns false when a segment is missing or a non-final segment is not
    /// a nested record; the record is left unchanged in that case.
    pub fn set_path(&mut self, segments: &[String], value: Value) -> bool {
        let Some((first, rest)) = segments.split_first() else {
            return false;
        };
        let Some(slot) = self.fields.get_mut(first) else {
            return false;
        };
        if rest.is_empty() {
            *slot = value;
            return true;
        }
        match slot {
            Value::Record(record) => record.set_path(rest, value),
            _ => false,
        }
    }

    /// Renders the record as canonical JSON.
    #[must_use]
    pub fn to_json(&self) -> Json {
        let mut object = serde_json::Map::new();
        for (name, value) in &self.fields {
            object.insert(name.clone(), value.to_json());
        }
        Json::Object(object)
    }

    /// Iterates field name/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}
