// msgforge-core/src/core/schema.rs
// ============================================================================
// Module: Schema Descriptors
// Description: Descriptor tree for RPC services, methods, records, and fields.
// Purpose: Provide the immutable schema model the command synthesizer reflects over.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the descriptor tree consumed by the command
//! synthesizer: services own methods, methods reference input/output record
//! schemas, and records own typed fields. Descriptors are plain data loaded
//! once at process start and never mutated. Method annotations (signer field,
//! minimum version) are inspected as data, never modeled through trait
//! hierarchies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Schema Errors
// ============================================================================

/// Errors raised while resolving names or paths against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A dotted field path was empty or contained an empty segment.
    #[error("field path `{path}` is empty or malformed")]
    MalformedPath {
        /// The offending path text.
        path: String,
    },
    /// A path segment did not name a field of the record it was applied to.
    #[error("record `{record}` has no field `{field}`")]
    UnknownField {
        /// Record schema name.
        record: String,
        /// The missing field name.
        field: String,
    },
    /// A path descended through a field that is not a nested record.
    #[error("field `{field}` of record `{record}` is not a nested record")]
    NotARecord {
        /// Record schema name.
        record: String,
        /// The non-record field name.
        field: String,
    },
}

// ============================================================================
// SECTION: Application Version
// ============================================================================

/// Declared version of the running application, used for method version gates.
///
/// The version is always passed explicitly into option resolution and tree
/// construction; it is never read from ambient process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppVersion {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
    /// Patch version component.
    pub patch: u32,
}

impl AppVersion {
    /// Creates a version from explicit components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error raised when an application version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid application version `{value}`: expected `major.minor.patch`")]
pub struct VersionError {
    /// The unparseable version text.
    pub value: String,
}

impl FromStr for AppVersion {
    type Err = VersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let error = || VersionError {
            value: value.to_string(),
        };
        let mut parts = value.split('.');
        let major = parts.next().ok_or_else(error)?;
        let minor = parts.next().unwrap_or("0");
        let patch = parts.next().unwrap_or("0");
        if parts.next().is_some() {
            return Err(error());
        }
        Ok(Self {
            major: major.parse().map_err(|_| error())?,
            minor: minor.parse().map_err(|_| error())?,
            patch: patch.parse().map_err(|_| error())?,
        })
    }
}

// ============================================================================
// SECTION: Field Paths
// ============================================================================

/// Dotted path addressing a field, optionally inside nested records.
///
/// Paths are parsed once and validated against a concrete schema at
/// build time; traversal descends only through nested-record fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Parses a dotted path such as `permissions.level`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MalformedPath`] when the path is empty or
    /// contains an empty segment.
    pub fn parse(path: &str) -> Result<Self, SchemaError> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(SchemaError::MalformedPath {
                path: path.to_string(),
            });
        }
        Ok(Self(segments))
    }

    /// Builds a path from a single top-level field name.
    #[must_use]
    pub fn single(field: impl Into<String>) -> Self {
        Self(vec![field.into()])
    }

    /// Returns the ordered path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the first path segment (the top-level field name).
    #[must_use]
    pub fn root(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// Returns the final path segment (the addressed leaf field name).
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

// ============================================================================
// SECTION: Field Kinds
// ============================================================================

/// Scalar field kinds with their canonical textual encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    /// Signed 64-bit integer, strict base-10.
    Int,
    /// Unsigned 64-bit integer, strict base-10.
    Uint,
    /// UTF-8 string, passed through verbatim.
    String,
    /// Boolean accepting `true`/`false` and common aliases, case-insensitive.
    Bool,
    /// Byte string encoded as base64 (STANDARD alphabet).
    Bytes,
    /// Duration accepting integer seconds or `10s`/`500ms`/`3m`/`2h` forms.
    Duration,
    /// Timestamp accepting RFC 3339 text or integer Unix seconds.
    Timestamp,
}

impl ScalarKind {
    /// Returns the human-readable kind label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Uint => "uint",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::Duration => "duration",
            Self::Timestamp => "timestamp",
        }
    }
}

/// One declared member of an enum schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    /// Symbolic member name.
    pub name: String,
    /// Integer ordinal for the member.
    pub ordinal: i32,
}

/// Enum schema with its declared members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Enum type name.
    pub name: String,
    /// Declared members in schema order.
    pub members: Vec<EnumMember>,
}

impl EnumDescriptor {
    /// Creates an enum descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// Looks up a member by symbolic name, case-insensitively.
    #[must_use]
    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|member| member.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a member by integer ordinal.
    #[must_use]
    pub fn member_by_ordinal(&self, ordinal: i32) -> Option<&EnumMember> {
        self.members.iter().find(|member| member.ordinal == ordinal)
    }

    /// Returns the zero member: ordinal zero when declared, else the first.
    #[must_use]
    pub fn zero_member(&self) -> Option<&EnumMember> {
        self.member_by_ordinal(0).or_else(|| self.members.first())
    }
}

/// Closed variant over all supported field kinds.
///
/// Coercion and assembly dispatch over this variant; new kinds are added
/// here, next to the schema model, rather than through scattered type
/// switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Scalar value with a well-known textual encoding.
    Scalar(ScalarKind),
    /// Enum value validated against declared members.
    Enum(EnumDescriptor),
    /// Nested record with its own schema.
    Record(Arc<RecordSchema>),
    /// Repeated field with a homogeneous element kind.
    Repeated(Box<FieldKind>),
    /// Map with a scalar key kind and an arbitrary value kind.
    Map {
        /// Key kind; restricted to scalars.
        key: ScalarKind,
        /// Value kind.
        value: Box<FieldKind>,
    },
}

impl FieldKind {
    /// Returns true when the kind is repeated.
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated(_))
    }

    /// Returns the human-readable kind label used in diagnostics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.label(),
            Self::Enum(_) => "enum",
            Self::Record(_) => "record",
            Self::Repeated(_) => "repeated",
            Self::Map {
                ..
            } => "map",
        }
    }
}

// ============================================================================
// SECTION: Fields And Records
// ============================================================================

/// One named, typed slot within a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared by the schema.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Creates a field descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Record schema: an ordered set of named fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Record type name.
    pub name: String,
    /// Declared fields in schema order.
    pub fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Creates a record schema.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Looks up a top-level field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Resolves a dotted path to the descriptor of its leaf field.
    ///
    /// Traversal descends only through nested-record fields; reaching a
    /// non-record field before the final segment is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a segment names a missing field or
    /// descends through a non-record field.
    pub fn leaf_field(&self, path: &FieldPath) -> Result<&FieldDescriptor, SchemaError> {
        let mut record = self;
        let segments = path.segments();
        let last = segments.len().saturating_sub(1);
        for (index, segment) in segments.iter().enumerate() {
            let field = record.field(segment).ok_or_else(|| SchemaError::UnknownField {
                record: record.name.clone(),
                field: segment.clone(),
            })?;
            if index == last {
                return Ok(field);
            }
            record = match &field.kind {
                FieldKind::Record(nested) => nested,
                _ => {
                    return Err(SchemaError::NotARecord {
                        record: record.name.clone(),
                        field: segment.clone(),
                    });
                }
            };
        }
        Err(SchemaError::MalformedPath {
            path: path.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Methods And Services
// ============================================================================

/// Method classification used at invocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    /// Read-only, idempotent query.
    Query,
    /// State-changing transaction requiring a signer.
    Transaction,
}

/// Annotations attached to a method descriptor, inspected as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodAnnotations {
    /// Method classification.
    pub kind: MethodKind,
    /// Declared signer field names; more than one is a build-time error.
    pub signer_fields: Vec<String>,
    /// Minimum application version required for the method, when gated.
    pub since: Option<AppVersion>,
}

impl MethodAnnotations {
    /// Creates query annotations with no signer and no version gate.
    #[must_use]
    pub const fn query() -> Self {
        Self {
            kind: MethodKind::Query,
            signer_fields: Vec::new(),
            since: None,
        }
    }

    /// Creates transaction annotations with one declared signer field.
    #[must_use]
    pub fn transaction(signer_field: impl Into<String>) -> Self {
        Self {
            kind: MethodKind::Transaction,
            signer_fields: vec![signer_field.into()],
            since: None,
        }
    }

    /// Returns a copy with the minimum-version gate set.
    #[must_use]
    pub const fn since(mut self, version: AppVersion) -> Self {
        self.since = Some(version);
        self
    }
}

/// Descriptor for one RPC method with its input and output schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name as declared by the service.
    pub name: String,
    /// Input record schema.
    pub input: Arc<RecordSchema>,
    /// Output record schema.
    pub output: Arc<RecordSchema>,
    /// Method annotations.
    pub annotations: MethodAnnotations,
}

impl MethodDescriptor {
    /// Creates a method descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        input: Arc<RecordSchema>,
        output: Arc<RecordSchema>,
        annotations: MethodAnnotations,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            annotations,
        }
    }
}

/// Descriptor for one RPC service and its ordered methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name.
    pub name: String,
    /// Methods in declaration order.
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    /// Creates a service descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, methods: Vec<MethodDescriptor>) -> Self {
        Self {
            name: name.into(),
            methods,
        }
    }

    /// Returns the dispatch identifier for one of this service's methods.
    #[must_use]
    pub fn method_id(&self, method: &MethodDescriptor) -> String {
        format!("{}.{}", self.name, method.name)
    }
}
