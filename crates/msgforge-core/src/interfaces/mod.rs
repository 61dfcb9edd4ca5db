// msgforge-core/src/interfaces/mod.rs
// ============================================================================
// Module: Msgforge Interfaces
// Description: Backend-agnostic interfaces for key management and execution.
// Purpose: Define the capability surfaces the command synthesizer consumes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how generated commands reach external systems without
//! embedding backend details. The keyring capability may be absent, in which
//! case only commands that need no signer resolution function. Executors are
//! used identically for queries and transactions; this crate never retries or
//! reinterprets their failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::value::RecordValue;

// ============================================================================
// SECTION: Addresses
// ============================================================================

/// Opaque account address with a validated textual shape.
///
/// The shape check is deliberately light: a lowercase human-readable prefix,
/// the `1` separator, and a data part of at least sixteen characters. Full
/// checksum verification belongs to the keyring backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error raised when text does not have the address shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{value}` is not a valid address")]
pub struct AddressError {
    /// The rejected text.
    pub value: String,
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let error = || AddressError {
            value: value.to_string(),
        };
        let (prefix, data) = value.rsplit_once('1').ok_or_else(error)?;
        let prefix_ok =
            !prefix.is_empty() && prefix.bytes().all(|byte| byte.is_ascii_lowercase());
        let data_ok = data.len() >= 16
            && data.bytes().all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit());
        if prefix_ok && data_ok {
            Ok(Self(value.to_string()))
        } else {
            Err(error())
        }
    }
}

// ============================================================================
// SECTION: Keyring
// ============================================================================

/// Keyring capability errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyringError {
    /// No key matches the requested name.
    #[error("key `{0}` not found in keyring")]
    NotFound(String),
    /// More than one key matches the requested name.
    #[error("key name `{0}` is ambiguous")]
    Ambiguous(String),
    /// The backend failed to produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Key-management capability: name resolution and byte signing.
///
/// Concurrency safety of implementations is the keyring's own contract;
/// this crate only ever reads through a shared reference.
pub trait Keyring {
    /// Resolves a human-readable key name to an address.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::NotFound`] when no key matches and
    /// [`KeyringError::Ambiguous`] when more than one does.
    fn resolve(&self, name: &str) -> Result<Address, KeyringError>;

    /// Signs a byte payload with the key behind an address.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError`] when the address is unknown or the backend
    /// fails to sign.
    fn sign(&self, address: &Address, payload: &[u8]) -> Result<Vec<u8>, KeyringError>;
}

// ============================================================================
// SECTION: Request Executor
// ============================================================================

/// Execution errors surfaced verbatim from the external executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The remote service rejected or failed the request.
    #[error("remote execution failed: {0}")]
    Remote(String),
    /// The transport could not deliver the request.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Request execution capability, used identically for queries and
/// transactions. Transaction execution implies signer resolution already
/// populated the request's signer field.
pub trait RequestExecutor {
    /// Executes an assembled request against the remote service.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the remote service or transport
    /// fails; this layer never retries.
    fn execute(&self, method_id: &str, request: &RecordValue)
    -> Result<RecordValue, ExecutionError>;
}
