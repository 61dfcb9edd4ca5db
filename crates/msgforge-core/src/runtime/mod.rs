// msgforge-core/src/runtime/mod.rs
// ============================================================================
// Module: Msgforge Runtime
// Description: Per-invocation runtime: signer resolution, wrapping, dispatch.
// Purpose: Provide the invocation-time operations applied to assembled requests.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime operations run strictly sequentially within one command
//! invocation: signer resolution for transactions, optional proposal
//! wrapping, then dispatch and response rendering. Per-invocation state is
//! created fresh and discarded after dispatch.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod dispatch;
pub mod proposal;
pub mod signer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatch::FormatError;
pub use dispatch::OutputFormat;
pub use dispatch::dispatch;
pub use dispatch::format_response;
pub use proposal::PROPOSAL_MESSAGES_FIELD;
pub use proposal::PROPOSAL_PROPOSER_FIELD;
pub use proposal::PROPOSAL_TYPE_FIELD;
pub use proposal::SUBMIT_PROPOSAL_METHOD_ID;
pub use proposal::proposal_schema;
pub use proposal::wrap_proposal;
pub use signer::SignerError;
pub use signer::resolve_signer;
