// msgforge-core/src/lib.rs
// ============================================================================
// Module: Msgforge Core Root
// Description: Public API surface for the command-synthesizer core.
// Purpose: Wire together the core model, interfaces, and runtime modules.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! msgforge-core owns the schema-facing half of the command synthesizer: the
//! descriptor model reflected over at build time, token coercion and request
//! assembly at invocation time, signer resolution, governance-proposal
//! wrapping, and dispatch/rendering. Command-tree synthesis itself lives in
//! `msgforge-gen`, which builds on these types.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use interfaces::Address;
pub use interfaces::AddressError;
pub use interfaces::ExecutionError;
pub use interfaces::Keyring;
pub use interfaces::KeyringError;
pub use interfaces::RequestExecutor;

pub use crate::core::AppVersion;
pub use crate::core::AssemblyError;
pub use crate::core::CoercionError;
pub use crate::core::EnumDescriptor;
pub use crate::core::EnumMember;
pub use crate::core::FieldDescriptor;
pub use crate::core::FieldKind;
pub use crate::core::FieldPath;
pub use crate::core::ListSplit;
pub use crate::core::MethodAnnotations;
pub use crate::core::MethodDescriptor;
pub use crate::core::MethodKind;
pub use crate::core::RecordSchema;
pub use crate::core::RecordValue;
pub use crate::core::ScalarKind;
pub use crate::core::SchemaError;
pub use crate::core::ServiceDescriptor;
pub use crate::core::Value;
pub use crate::core::VersionError;
pub use crate::core::assemble;
pub use crate::core::coerce_enum;
pub use crate::core::coerce_field;
pub use crate::core::coerce_scalar;
pub use crate::core::format_duration;
pub use crate::core::record_from_json;
pub use crate::runtime::FormatError;
pub use crate::runtime::OutputFormat;
pub use crate::runtime::SUBMIT_PROPOSAL_METHOD_ID;
pub use crate::runtime::SignerError;
pub use crate::runtime::dispatch;
pub use crate::runtime::format_response;
pub use crate::runtime::proposal_schema;
pub use crate::runtime::resolve_signer;
pub use crate::runtime::wrap_proposal;
