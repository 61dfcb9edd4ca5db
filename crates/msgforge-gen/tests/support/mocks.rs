// msgforge-gen/tests/support/mocks.rs
// ============================================================================
// Module: Test Mocks
// Description: Mock service descriptors, keyrings, and executors.
// Purpose: Drive the invocation pipeline without external systems.
// ============================================================================
//! ## Overview
//! Shared fixtures for invocation tests: a circuit-breaker service with
//! positional, varargs, and governance-wrappable commands, plus in-memory
//! keyring and executor implementations.

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

use std::sync::Arc;

use msgforge_core::Address;
use msgforge_core::ExecutionError;
use msgforge_core::FieldDescriptor;
use msgforge_core::FieldKind;
use msgforge_core::Keyring;
use msgforge_core::KeyringError;
use msgforge_core::MethodAnnotations;
use msgforge_core::MethodDescriptor;
use msgforge_core::RecordSchema;
use msgforge_core::RecordValue;
use msgforge_core::RequestExecutor;
use msgforge_core::ScalarKind;
use msgforge_core::ServiceDescriptor;
use msgforge_gen::PositionalArgDescriptor;
use msgforge_gen::RpcCommandOptions;
use msgforge_gen::ServiceCommandDescriptor;

/// A literal address with a valid shape for signer fixtures.
pub const ALICE: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";

/// Builds a string field descriptor.
fn string_field(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKind::Scalar(ScalarKind::String))
}

/// Builds a repeated-string field descriptor.
fn string_list_field(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(
        name,
        FieldKind::Repeated(Box::new(FieldKind::Scalar(ScalarKind::String))),
    )
}

/// Builds the circuit-breaker fixture service.
///
/// Authorize binds two positionals and a trailing varargs slot; Trip is
/// governance-wrappable with a varargs slot; Reset keeps its repeated field
/// as a flag; Accounts is a plain query.
pub fn circuit_descriptor() -> ServiceCommandDescriptor {
    let authorize_input = Arc::new(RecordSchema::new("MsgAuthorizeCircuitBreaker", vec![
        string_field("granter"),
        string_field("grantee"),
        FieldDescriptor::new(
            "permissions",
            FieldKind::Record(Arc::new(RecordSchema::new("Permissions", vec![
                string_field("level"),
                string_list_field("limit_type_urls"),
            ]))),
        ),
    ]));
    let trip_input = Arc::new(RecordSchema::new("MsgTripCircuitBreaker", vec![
        string_field("authority"),
        string_list_field("msg_type_urls"),
    ]));
    let reset_input = Arc::new(RecordSchema::new("MsgResetCircuitBreaker", vec![
        string_field("authority"),
        string_list_field("msg_type_urls"),
    ]));
    let accounts_input = Arc::new(RecordSchema::new("QueryAccountsRequest", vec![
        FieldDescriptor::new("limit", FieldKind::Scalar(ScalarKind::Uint)),
    ]));

    let service = ServiceDescriptor::new("circuit.v1.Msg", vec![
        MethodDescriptor::new(
            "AuthorizeCircuitBreaker",
            authorize_input,
            Arc::new(RecordSchema::new("MsgAuthorizeCircuitBreakerResponse", Vec::new())),
            MethodAnnotations::transaction("granter"),
        ),
        MethodDescriptor::new(
            "TripCircuitBreaker",
            trip_input,
            Arc::new(RecordSchema::new("MsgTripCircuitBreakerResponse", Vec::new())),
            MethodAnnotations::transaction("authority"),
        ),
        MethodDescriptor::new(
            "ResetCircuitBreaker",
            reset_input,
            Arc::new(RecordSchema::new("MsgResetCircuitBreakerResponse", Vec::new())),
            MethodAnnotations::transaction("authority"),
        ),
        MethodDescriptor::new(
            "Accounts",
            accounts_input,
            Arc::new(RecordSchema::new("QueryAccountsResponse", Vec::new())),
            MethodAnnotations::query(),
        ),
    ]);

    ServiceCommandDescriptor::new(service).with_options(vec![
        RpcCommandOptions::new("AuthorizeCircuitBreaker").with_positionals(vec![
            PositionalArgDescriptor::new("grantee"),
            PositionalArgDescriptor::new("permissions.level"),
            PositionalArgDescriptor::new("permissions.limit_type_urls").varargs(),
        ]),
        RpcCommandOptions::new("TripCircuitBreaker")
            .with_positionals(vec![PositionalArgDescriptor::new("msg_type_urls").varargs()])
            .governance_wrappable(),
    ])
}

// ========================================================================
// Keyring And Executor Mocks
// ========================================================================

/// Keyring backed by name/address pairs; duplicates surface as ambiguity.
pub struct NameKeyring {
    /// Known name/address pairs.
    pub keys: Vec<(&'static str, &'static str)>,
}

impl Keyring for NameKeyring {
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

    fn sign(&self, _address: &Address, _payload: &[u8]) -> Result<Vec<u8>, KeyringError> {
        Err(KeyringError::Signing("fixture keyring does not sign".to_string()))
    }
}

/// Executor that echoes the assembled request back as the response.
pub struct EchoExecutor;

impl RequestExecutor for EchoExecutor {
    fn execute(
        &self,
        _method_id: &str,
        request: &RecordValue,
    ) -> Result<RecordValue, ExecutionError> {
        Ok(request.clone())
    }
}

/// Executor that always fails with a remote error.
pub struct FailingExecutor;

impl RequestExecutor for FailingExecutor {
    fn execute(
        &self,
        _method_id: &str,
        _request: &RecordValue,
    ) -> Result<RecordValue, ExecutionError> {
        Err(ExecutionError::Remote("boom".to_string()))
    }
}
