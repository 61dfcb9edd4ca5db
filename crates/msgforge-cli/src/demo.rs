// msgforge-cli/src/demo.rs
// ============================================================================
// Module: Demo Service Wiring
// Description: Sample circuit-breaker service, keyring, and dry-run executor.
// Purpose: Exercise the full generated command surface end to end.
// Dependencies: msgforge-core, msgforge-gen
// ============================================================================

//! ## Overview
//! The demo wires a circuit-breaker service through the synthesizer: three
//! transactional methods with signer annotations plus one query, an
//! in-memory keyring seeded from `--key name=address` pairs, and a dry-run
//! executor that echoes the assembled request so invocations can be
//! inspected without a network.

// ============================================================================
// SECTION: Imports
// ============================================================================

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

// ============================================================================
// SECTION: Schemas
// ============================================================================

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

/// Builds the nested permissions record schema.
fn permissions_schema() -> Arc<RecordSchema> {
    Arc::new(RecordSchema::new("Permissions", vec![
        string_field("level"),
        string_list_field("limit_type_urls"),
    ]))
}

/// Builds an empty response schema.
fn empty_response(name: &str) -> Arc<RecordSchema> {
    Arc::new(RecordSchema::new(name, Vec::new()))
}

/// Builds the circuit-breaker service command descriptor.
#[must_use]
pub fn circuit_service() -> ServiceCommandDescriptor {
    let permissions = permissions_schema();

    let authorize_input = Arc::new(RecordSchema::new("MsgAuthorizeCircuitBreaker", vec![
        string_field("granter"),
        string_field("grantee"),
        FieldDescriptor::new("permissions", FieldKind::Record(Arc::clone(&permissions))),
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
        FieldDescriptor::new("offset", FieldKind::Scalar(ScalarKind::Uint)),
    ]));
    let accounts_output = Arc::new(RecordSchema::new("QueryAccountsResponse", vec![
        FieldDescriptor::new(
            "accounts",
            FieldKind::Repeated(Box::new(FieldKind::Record(Arc::new(RecordSchema::new(
                "GenesisAccountPermissions",
                vec![
                    string_field("address"),
                    FieldDescriptor::new("permissions", FieldKind::Record(permissions)),
                ],
            ))))),
        ),
    ]));

    let service = ServiceDescriptor::new("circuit.v1.Msg", vec![
        MethodDescriptor::new(
            "AuthorizeCircuitBreaker",
            authorize_input,
            empty_response("MsgAuthorizeCircuitBreakerResponse"),
            MethodAnnotations::transaction("granter"),
        ),
        MethodDescriptor::new(
            "TripCircuitBreaker",
            trip_input,
            empty_response("MsgTripCircuitBreakerResponse"),
            MethodAnnotations::transaction("authority"),
        ),
        MethodDescriptor::new(
            "ResetCircuitBreaker",
            reset_input,
            empty_response("MsgResetCircuitBreakerResponse"),
            MethodAnnotations::transaction("authority"),
        ),
        MethodDescriptor::new(
            "Accounts",
            accounts_input,
            accounts_output,
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

// ============================================================================
// SECTION: Keyring
// ============================================================================

/// In-memory keyring seeded from `name=address` pairs.
#[derive(Debug, Default)]
pub struct StaticKeyring {
    /// Known keys; duplicate names are kept to surface ambiguity.
    keys: Vec<(String, Address)>,
}

impl StaticKeyring {
    /// Parses `name=address` pairs into a keyring.
    ///
    /// # Errors
    ///
    /// Returns a rendered message for a malformed pair or address.
    pub fn from_pairs(pairs: &[String]) -> Result<Self, String> {
        let mut keys = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let (name, address) = pair
                .split_once('=')
                .ok_or_else(|| format!("invalid --key `{pair}`: expected name=address"))?;
            let address =
                address.parse::<Address>().map_err(|err| format!("invalid --key: {err}"))?;
            keys.push((name.to_string(), address));
        }
        Ok(Self {
            keys,
        })
    }

    /// Returns true when the keyring holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Keyring for StaticKeyring {
    fn resolve(&self, name: &str) -> Result<Address, KeyringError> {
        let mut matches = self.keys.iter().filter(|(key, _)| key == name);
        let Some((_, address)) = matches.next() else {
            return Err(KeyringError::NotFound(name.to_string()));
        };
        if matches.next().is_some() {
            return Err(KeyringError::Ambiguous(name.to_string()));
        }
        Ok(address.clone())
    }

    fn sign(&self, address: &Address, _payload: &[u8]) -> Result<Vec<u8>, KeyringError> {
        Err(KeyringError::Signing(format!("demo keyring cannot sign for {address}")))
    }
}

// ============================================================================
// SECTION: Dry-Run Executor
// ============================================================================

/// Executor that echoes the assembled request instead of broadcasting it.
#[derive(Debug, Default)]
pub struct DryRunExecutor;

impl RequestExecutor for DryRunExecutor {
    fn execute(
        &self,
        _method_id: &str,
        request: &RecordValue,
    ) -> Result<RecordValue, ExecutionError> {
        Ok(request.clone())
    }
}
