// msgforge-core/src/core/assemble.rs
// ============================================================================
// Module: Request Assembler
// Description: Assembly of coerced values into a schema-conformant request.
// Purpose: Build a zero-valued request instance and set each coerced value by path.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Assembly starts from a zero-valued instance of the method's input schema
//! and writes each coerced value at its dotted field path, traversing
//! zero-initialized intermediate records. Fields never bound to any flag,
//! positional, or default remain at the schema zero value. Assembly runs only
//! after every binding coerced successfully, so a request is either complete
//! or never constructed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::schema::FieldPath;
use crate::core::schema::RecordSchema;
use crate::core::schema::SchemaError;
use crate::core::value::RecordValue;
use crate::core::value::Value;

// ============================================================================
// SECTION: Assembly Errors
// ============================================================================

/// Errors raised while assembling a request from coerced values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// A field path did not resolve against the input schema.
    #[error("request assembly failed: {0}")]
    Schema(#[from] SchemaError),
    /// A coerced value did not match the kind declared at its path.
    #[error("request assembly failed: value at `{path}` does not match the `{expected}` field")]
    KindMismatch {
        /// Dotted path of the mismatched field.
        path: String,
        /// Declared kind label.
        expected: &'static str,
    },
    /// A path write failed against the zero-initialized instance.
    #[error("request assembly failed: path `{path}` is not writable")]
    Unwritable {
        /// Dotted path of the failed write.
        path: String,
    },
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Assembles a request instance from coerced path/value pairs.
///
/// # Errors
///
/// Returns [`AssemblyError`] when a path does not resolve against the schema
/// or a value does not conform to the kind declared at its path.
pub fn assemble(
    schema: &RecordSchema,
    values: impl IntoIterator<Item = (FieldPath, Value)>,
) -> Result<RecordValue, AssemblyError> {
    let mut request = RecordValue::zero(schema);
    for (path, value) in values {
        let field = schema.leaf_field(&path)?;
        if !value.conforms_to(&field.kind) {
            return Err(AssemblyError::KindMismatch {
                path: path.to_string(),
                expected: field.kind.label(),
            });
        }
        if !request.set_path(path.segments(), value) {
            return Err(AssemblyError::Unwritable {
                path: path.to_string(),
            });
        }
    }
    Ok(request)
}
