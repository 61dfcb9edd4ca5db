// msgforge-core/tests/runtime.rs
// ============================================================================
// Module: Runtime Tests
// Description: Tests for signer resolution, proposal wrapping, and rendering.
// Purpose: Ensure the invocation-time half of the core behaves as declared.
// ============================================================================
//! ## Overview
//! Integration tests covering signer resolution through the keyring
//! capability, governance-envelope wrapping, dispatch passthrough, and the
//! three response renderings.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::str::FromStr;
use std::sync::Arc;

use msgforge_core::Address;
use msgforge_core::ExecutionError;
use msgforge_core::FieldDescriptor;
use msgforge_core::FieldKind;
use msgforge_core::FormatError;
use msgforge_core::Keyring;
use msgforge_core::KeyringError;
use msgforge_core::OutputFormat;
use msgforge_core::RecordSchema;
use msgforge_core::RecordValue;
use msgforge_core::RequestExecutor;
use msgforge_core::ScalarKind;
use msgforge_core::SignerError;
use msgforge_core::Value;
use msgforge_core::dispatch;
use msgforge_core::format_response;
use msgforge_core::resolve_signer;
use msgforge_core::wrap_proposal;
use support::TestResult;
use support::ensure;
use support::ensure_eq;

/// A literal address with a valid shape.
const ALICE_ADDRESS: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";

/// Keyring with a fixed set of named keys; duplicates trigger ambiguity.
struct FixedKeyring {
    /// Known name/address pairs.
    keys: Vec<(&'static str, &'static str)>,
}

impl Keyring for FixedKeyring {
    fn resolve(&self, name: &str) -> Result<Address, KeyringError> {
        let mut matched = self.keys.iter().filter(|(key, _)| *key == name);
        let Some((_, address)) = matched.next() else {
            return Err(KeyringError::NotFound(name.to_string()));
        };
        if matched.next().is_some() {
            return Err(KeyringError::Ambiguous(name.to_string()));
        }
        address.parse().map_err(|_| KeyringError::Signing("bad fixture address".to_string()))
    }

    fn sign(&self, _address: &Address, payload: &[u8]) -> Result<Vec<u8>, KeyringError> {
        Ok(payload.to_vec())
    }
}

/// Executor that always fails with a remote error.
struct FailingExecutor;

impl RequestExecutor for FailingExecutor {
    fn execute(
        &self,
        _method_id: &str,
        _request: &RecordValue,
    ) -> Result<RecordValue, ExecutionError> {
        Err(ExecutionError::Remote("boom".to_string()))
    }
}

/// Builds a message schema with a string signer field.
fn msg_schema() -> Arc<RecordSchema> {
    Arc::new(RecordSchema::new("MsgTrip", vec![
        FieldDescriptor::new("authority", FieldKind::Scalar(ScalarKind::String)),
        FieldDescriptor::new(
            "urls",
            FieldKind::Repeated(Box::new(FieldKind::Scalar(ScalarKind::String))),
        ),
    ]))
}

/// Builds a request with the signer field bound to the given text.
fn request_with_signer(text: &str) -> RecordValue {
    let mut request = RecordValue::zero(&msg_schema());
    request.set("authority", Value::Str(text.to_string()));
    request
}

// ============================================================================
// SECTION: Signer Resolution Tests
// ============================================================================

#[test]
fn test_literal_address_needs_no_keyring() -> TestResult {
    let mut request = request_with_signer(ALICE_ADDRESS);
    let address = resolve_signer(&mut request, "authority", None)?;
    ensure(address.as_str() == ALICE_ADDRESS, "Expected the literal address back")?;
    ensure(
        request.get("authority") == Some(&Value::Str(ALICE_ADDRESS.to_string())),
        "Expected the signer field to keep the address",
    )?;
    Ok(())
}

#[test]
fn test_key_name_resolves_through_keyring() -> TestResult {
    let keyring = FixedKeyring {
        keys: vec![("alice", ALICE_ADDRESS)],
    };
    let mut request = request_with_signer("alice");
    let address = resolve_signer(&mut request, "authority", Some(&keyring))?;
    ensure(address.as_str() == ALICE_ADDRESS, "Expected the keyring-resolved address")?;
    ensure(
        request.get("authority") == Some(&Value::Str(ALICE_ADDRESS.to_string())),
        "Expected the resolved address written back into the field",
    )?;
    ensure(keyring.sign(&address, b"payload")? == b"payload".to_vec(), "Expected fixture signing")?;
    Ok(())
}

#[test]
fn test_key_name_without_keyring_is_distinct() -> TestResult {
    let mut request = request_with_signer("alice");
    let error = resolve_signer(&mut request, "authority", None).unwrap_err();
    ensure(
        error
            == SignerError::NoKeyring {
                name: "alice".to_string(),
            },
        "Expected the missing-keyring error",
    )?;
    Ok(())
}

#[test]
fn test_unknown_key_name_is_not_found() -> TestResult {
    let keyring = FixedKeyring {
        keys: vec![("bob", ALICE_ADDRESS)],
    };
    let mut request = request_with_signer("alice");
    let error = resolve_signer(&mut request, "authority", Some(&keyring)).unwrap_err();
    ensure(
        matches!(error, SignerError::NotFound { name } if name == "alice"),
        "Expected a not-found error naming the key",
    )?;
    Ok(())
}

#[test]
fn test_ambiguous_key_name_is_rejected_not_guessed() -> TestResult {
    let keyring = FixedKeyring {
        keys: vec![("alice", ALICE_ADDRESS), ("alice", ALICE_ADDRESS)],
    };
    let mut request = request_with_signer("alice");
    let error = resolve_signer(&mut request, "authority", Some(&keyring)).unwrap_err();
    ensure(
        matches!(error, SignerError::Ambiguous { name } if name == "alice"),
        "Expected ambiguity to be rejected",
    )?;
    ensure(
        request.get("authority") == Some(&Value::Str("alice".to_string())),
        "Expected the request untouched on failure",
    )?;
    Ok(())
}

#[test]
fn test_empty_signer_field_is_missing_value() -> TestResult {
    let mut request = request_with_signer("");
    let error = resolve_signer(&mut request, "authority", None).unwrap_err();
    ensure(
        matches!(error, SignerError::MissingValue { field } if field == "authority"),
        "Expected a missing-value error naming the field",
    )?;
    Ok(())
}

#[test]
fn test_non_string_signer_field_is_rejected() -> TestResult {
    let mut request = RecordValue::zero(&msg_schema());
    request.set("authority", Value::Int(7));
    let error = resolve_signer(&mut request, "authority", None).unwrap_err();
    ensure(
        matches!(error, SignerError::NotAStringField { .. }),
        "Expected a non-string signer field to be rejected",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Proposal Wrapping Tests
// ============================================================================

#[test]
fn test_wrap_places_tagged_request_as_single_message() -> TestResult {
    let schema = msg_schema();
    let request = request_with_signer(ALICE_ADDRESS);
    let (envelope_schema, envelope) = wrap_proposal(request.clone(), &schema, ALICE_ADDRESS);
    ensure_eq(envelope_schema.name.as_str(), "SubmitProposal", "envelope schema name")?;
    let mut tagged = request;
    tagged.set("@type", Value::Str("MsgTrip".to_string()));
    ensure(
        envelope.get("messages") == Some(&Value::List(vec![Value::Record(tagged)])),
        "Expected the tagged request as the single contained message",
    )?;
    ensure(
        envelope.get("proposer") == Some(&Value::Str(ALICE_ADDRESS.to_string())),
        "Expected the proposer populated from the signer",
    )?;
    ensure(
        envelope.get("metadata") == Some(&Value::Str(String::new())),
        "Expected unpopulated envelope fields at zero",
    )?;
    Ok(())
}

#[test]
fn test_wrapped_message_type_tag_names_the_message_schema() -> TestResult {
    let schema = msg_schema();
    let request = request_with_signer(ALICE_ADDRESS);
    let (envelope_schema, envelope) = wrap_proposal(request, &schema, ALICE_ADDRESS);
    let messages_field = envelope_schema
        .fields
        .iter()
        .find(|field| field.name == "messages")
        .ok_or("missing messages field in the envelope schema")?;
    ensure(
        matches!(
            &messages_field.kind,
            FieldKind::Repeated(inner)
                if matches!(
                    inner.as_ref(),
                    FieldKind::Record(record) if record.fields.first()
                        .is_some_and(|field| field.name == "@type")
                )
        ),
        "Expected the envelope schema to carry the leading type tag field",
    )?;
    let Some(Value::List(messages)) = envelope.get("messages") else {
        return ensure(false, "Expected a messages list in the envelope");
    };
    let Some(Value::Record(message)) = messages.first() else {
        return ensure(false, "Expected a record as the first message");
    };
    ensure(
        message.get("@type") == Some(&Value::Str("MsgTrip".to_string())),
        "Expected the type tag to name the wrapped message schema",
    )?;
    ensure(
        message.get("authority") == Some(&Value::Str(ALICE_ADDRESS.to_string())),
        "Expected the original fields preserved alongside the tag",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Dispatch And Rendering Tests
// ============================================================================

#[test]
fn test_dispatch_surfaces_executor_errors_verbatim() -> TestResult {
    let request = request_with_signer(ALICE_ADDRESS);
    let error = dispatch(&FailingExecutor, "circuit.v1.Msg.Trip", &request).unwrap_err();
    ensure(
        error == ExecutionError::Remote("boom".to_string()),
        "Expected the remote error untouched",
    )?;
    Ok(())
}

#[test]
fn test_output_format_parses_case_insensitively() -> TestResult {
    ensure(OutputFormat::from_str("JSON")? == OutputFormat::Json, "Expected json")?;
    ensure(OutputFormat::from_str("yaml")? == OutputFormat::Yaml, "Expected yaml")?;
    ensure(OutputFormat::from_str("Text")? == OutputFormat::Text, "Expected text")?;
    let error = OutputFormat::from_str("xml").unwrap_err();
    ensure(
        matches!(error, FormatError::UnknownFormat { value } if value == "xml"),
        "Expected an unknown-format error",
    )?;
    Ok(())
}

#[test]
fn test_json_rendering_is_parseable() -> TestResult {
    let mut response = request_with_signer(ALICE_ADDRESS);
    response.set("urls", Value::List(vec![Value::Str("/a.Msg".to_string())]));
    let rendered = format_response(&response, OutputFormat::Json)?;
    let json: serde_json::Value = serde_json::from_str(&rendered)?;
    ensure(json["authority"] == ALICE_ADDRESS, "Expected the signer field in JSON")?;
    ensure(json["urls"][0] == "/a.Msg", "Expected the list element in JSON")?;
    Ok(())
}

#[test]
fn test_yaml_rendering_contains_fields() -> TestResult {
    let response = request_with_signer(ALICE_ADDRESS);
    let rendered = format_response(&response, OutputFormat::Yaml)?;
    ensure(rendered.contains("authority:"), "Expected a YAML mapping key")?;
    Ok(())
}

#[test]
fn test_text_rendering_flattens_paths_and_indices() -> TestResult {
    let mut response = request_with_signer(ALICE_ADDRESS);
    response.set(
        "urls",
        Value::List(vec![Value::Str("/a.Msg".to_string()), Value::Str("/b.Msg".to_string())]),
    );
    let rendered = format_response(&response, OutputFormat::Text)?;
    ensure(
        rendered.contains(&format!("authority: \"{ALICE_ADDRESS}\"")),
        "Expected a flattened scalar line",
    )?;
    ensure(rendered.contains("urls[0]: \"/a.Msg\""), "Expected indexed list lines")?;
    ensure(rendered.contains("urls[1]: \"/b.Msg\""), "Expected indexed list lines")?;
    Ok(())
}
