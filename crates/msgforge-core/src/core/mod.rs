// msgforge-core/src/core/mod.rs
// ============================================================================
// Module: Msgforge Core Types
// Description: Schema model, dynamic values, coercion, and request assembly.
// Purpose: Provide the stable data model the command synthesizer operates on.
// Dependencies: base64, serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Core types define the descriptor tree reflected over at build time, the
//! dynamic value store populated at invocation time, the coercion engine that
//! turns raw tokens into typed values, and the assembler that produces a
//! schema-conformant request. These types are the canonical source of truth
//! for every generated command surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod assemble;
pub mod coerce;
pub mod schema;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assemble::AssemblyError;
pub use assemble::assemble;
pub use coerce::CoercionError;
pub use coerce::ListSplit;
pub use coerce::coerce_enum;
pub use coerce::coerce_field;
pub use coerce::coerce_scalar;
pub use coerce::record_from_json;
pub use schema::AppVersion;
pub use schema::EnumDescriptor;
pub use schema::EnumMember;
pub use schema::FieldDescriptor;
pub use schema::FieldKind;
pub use schema::FieldPath;
pub use schema::MethodAnnotations;
pub use schema::MethodDescriptor;
pub use schema::MethodKind;
pub use schema::RecordSchema;
pub use schema::ScalarKind;
pub use schema::SchemaError;
pub use schema::ServiceDescriptor;
pub use schema::VersionError;
pub use value::RecordValue;
pub use value::Value;
pub use value::format_duration;
