// msgforge-core/src/runtime/proposal.rs
// ============================================================================
// Module: Proposal Wrapper
// Description: Governance-envelope wrapping for transactional requests.
// Purpose: Re-wrap an assembled request as the single message of a submit-proposal envelope.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Methods marked governance-wrappable are dispatched as the single contained
//! message of a generic submit-proposal envelope unless the invocation passes
//! the `--no-proposal` opt-out. Each contained message carries a `@type` tag
//! naming its record schema so the receiving end can route it. Wrapping is
//! purely structural: the envelope's proposer is the already-resolved signer
//! address, and no proposal content beyond the enclosing schema is validated
//! here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::schema::FieldDescriptor;
use crate::core::schema::FieldKind;
use crate::core::schema::RecordSchema;
use crate::core::schema::ScalarKind;
use crate::core::value::RecordValue;
use crate::core::value::Value;

// ============================================================================
// SECTION: Envelope Schema
// ============================================================================

/// Dispatch identifier for the governance submit-proposal method.
pub const SUBMIT_PROPOSAL_METHOD_ID: &str = "gov.v1.SubmitProposal";

/// Envelope field holding the wrapped messages.
pub const PROPOSAL_MESSAGES_FIELD: &str = "messages";

/// Envelope field holding the proposer address.
pub const PROPOSAL_PROPOSER_FIELD: &str = "proposer";

/// Message field tagging each wrapped message with its record schema name.
pub const PROPOSAL_TYPE_FIELD: &str = "@type";

/// Extends a wrapped message schema with the leading `@type` tag field.
fn tagged_message_schema(message_schema: &Arc<RecordSchema>) -> Arc<RecordSchema> {
    let mut fields = vec![FieldDescriptor::new(
        PROPOSAL_TYPE_FIELD,
        FieldKind::Scalar(ScalarKind::String),
    )];
    fields.extend(message_schema.fields.iter().cloned());
    Arc::new(RecordSchema::new(message_schema.name.clone(), fields))
}

/// Builds the submit-proposal envelope schema for a wrapped message schema.
///
/// The messages list carries the tagged form of the wrapped schema, with
/// `@type` prepended to the message's own fields.
#[must_use]
pub fn proposal_schema(message_schema: &Arc<RecordSchema>) -> Arc<RecordSchema> {
    Arc::new(RecordSchema::new("SubmitProposal", vec![
        FieldDescriptor::new(
            PROPOSAL_MESSAGES_FIELD,
            FieldKind::Repeated(Box::new(FieldKind::Record(tagged_message_schema(
                message_schema,
            )))),
        ),
        FieldDescriptor::new(PROPOSAL_PROPOSER_FIELD, FieldKind::Scalar(ScalarKind::String)),
        FieldDescriptor::new("metadata", FieldKind::Scalar(ScalarKind::String)),
        FieldDescriptor::new("title", FieldKind::Scalar(ScalarKind::String)),
        FieldDescriptor::new("summary", FieldKind::Scalar(ScalarKind::String)),
    ]))
}

// ============================================================================
// SECTION: Wrapping
// ============================================================================

/// Wraps an assembled request inside a submit-proposal envelope.
///
/// Returns the envelope schema and the envelope instance containing the
/// request as its single message, tagged with the message schema's name and
/// with the proposer field populated.
#[must_use]
pub fn wrap_proposal(
    request: RecordValue,
    message_schema: &Arc<RecordSchema>,
    proposer: &str,
) -> (Arc<RecordSchema>, RecordValue) {
    let schema = proposal_schema(message_schema);
    let mut message = request;
    message.set(PROPOSAL_TYPE_FIELD, Value::Str(message_schema.name.clone()));
    let mut envelope = RecordValue::zero(&schema);
    envelope.set(PROPOSAL_MESSAGES_FIELD, Value::List(vec![Value::Record(message)]));
    envelope.set(PROPOSAL_PROPOSER_FIELD, Value::Str(proposer.to_string()));
    (schema, envelope)
}
