// msgforge-core/src/runtime/signer.rs
// ============================================================================
// Module: Signer Resolver
// Description: Resolution of the signer field to an account address.
// Purpose: Bind key names or literal addresses to the request's signer field.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Each transactional method declares exactly one signer field. At invocation
//! time the value bound to that field is either a literal address, used
//! directly, or a key name resolved through the keyring capability. Ambiguous
//! matches are rejected rather than guessed, and a missing keyring fails with
//! a distinct error so non-signing commands remain unaffected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::interfaces::Address;
use crate::interfaces::Keyring;
use crate::interfaces::KeyringError;
use crate::core::value::RecordValue;
use crate::core::value::Value;

// ============================================================================
// SECTION: Signer Errors
// ============================================================================

/// Errors raised while resolving the signer for a transactional request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// No keyring capability was supplied to the process.
    #[error("no keyring configured; cannot resolve signer `{name}`")]
    NoKeyring {
        /// The key name that required resolution.
        name: String,
    },
    /// The keyring holds no key with the supplied name.
    #[error("signer not found: no key named `{name}`")]
    NotFound {
        /// The unresolved key name.
        name: String,
    },
    /// The keyring matched more than one key for the supplied name.
    #[error("signer name `{name}` is ambiguous; pass a literal address instead")]
    Ambiguous {
        /// The ambiguous key name.
        name: String,
    },
    /// The signer field carried no usable value.
    #[error("signer field `{field}` is empty; pass a key name or address")]
    MissingValue {
        /// Signer field name.
        field: String,
    },
    /// The signer field does not exist or is not a string field.
    #[error("signer field `{field}` is missing from the request or not a string field")]
    NotAStringField {
        /// Signer field name.
        field: String,
    },
    /// The keyring backend failed while resolving the name.
    #[error("keyring failure while resolving `{name}`: {reason}")]
    Backend {
        /// The key name under resolution.
        name: String,
        /// Backend failure reason.
        reason: String,
    },
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the signer field of an assembled request to an address.
///
/// The bound value is used directly when it already has the address shape;
/// otherwise it is treated as a key name and resolved through the keyring.
/// On success the resolved address is written back into the signer field.
///
/// # Errors
///
/// Returns [`SignerError`] when the field is empty, the keyring is absent,
/// the name is unknown, or resolution is ambiguous. No partial signing
/// occurs: the request is only updated on success.
pub fn resolve_signer(
    request: &mut RecordValue,
    signer_field: &str,
    keyring: Option<&dyn Keyring>,
) -> Result<Address, SignerError> {
    let bound = match request.get(signer_field) {
        Some(Value::Str(text)) => text.clone(),
        Some(_) | None => {
            return Err(SignerError::NotAStringField {
                field: signer_field.to_string(),
            });
        }
    };
    if bound.is_empty() {
        return Err(SignerError::MissingValue {
            field: signer_field.to_string(),
        });
    }
    let address = if let Ok(literal) = bound.parse::<Address>() {
        literal
    } else {
        let keyring = keyring.ok_or_else(|| SignerError::NoKeyring {
            name: bound.clone(),
        })?;
        keyring.resolve(&bound).map_err(|err| match err {
            KeyringError::NotFound(name) => SignerError::NotFound {
                name,
            },
            KeyringError::Ambiguous(name) => SignerError::Ambiguous {
                name,
            },
            KeyringError::Signing(reason) => SignerError::Backend {
                name: bound.clone(),
                reason,
            },
        })?
    };
    request.set(signer_field, Value::Str(address.as_str().to_string()));
    Ok(address)
}
