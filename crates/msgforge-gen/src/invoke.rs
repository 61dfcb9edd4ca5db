// msgforge-gen/src/invoke.rs
// ============================================================================
// Module: Invocation Pipeline
// Description: Execution of one matched generated command.
// Purpose: Coerce, assemble, resolve the signer, wrap, dispatch, and render.
// Dependencies: clap, msgforge-core, thiserror
// ============================================================================

//! ## Overview
//! One generated command runs as a single sequential flow: raw flag and
//! positional tokens are coerced into typed values, the request is assembled
//! from schema zero values, transactions resolve their signer, governance
//! wrapping applies unless opted out, and the response is dispatched and
//! rendered. Per-invocation state is created fresh and discarded after
//! dispatch; every error names the command that failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::ArgMatches;
use msgforge_core::AssemblyError;
use msgforge_core::CoercionError;
use msgforge_core::ExecutionError;
use msgforge_core::FieldPath;
use msgforge_core::FormatError;
use msgforge_core::Keyring;
use msgforge_core::ListSplit;
use msgforge_core::MethodKind;
use msgforge_core::OutputFormat;
use msgforge_core::RequestExecutor;
use msgforge_core::SUBMIT_PROPOSAL_METHOD_ID;
use msgforge_core::SignerError;
use msgforge_core::Value;
use msgforge_core::assemble;
use msgforge_core::coerce_field;
use msgforge_core::dispatch;
use msgforge_core::format_response;
use msgforge_core::resolve_signer;
use msgforge_core::wrap_proposal;
use thiserror::Error;

use crate::builder::CommandTree;
use crate::builder::GeneratedCommand;
use crate::builder::NO_PROPOSAL_FLAG;
use crate::builder::OUTPUT_FLAG;

// ============================================================================
// SECTION: Invocation Errors
// ============================================================================

/// Errors raised while executing one generated command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    /// The matched subcommand path does not correspond to an attached
    /// generated leaf: either no leaf exists at the path, or a host-defined
    /// command occupies it and shadows the generated one.
    #[error("unknown command path `{path}`")]
    UnknownCommand {
        /// Space-joined command path.
        path: String,
    },
    /// A bound flag or positional value failed coercion.
    #[error("command `{command}`: {source}")]
    Coercion {
        /// Failing command path.
        command: String,
        /// Underlying coercion failure.
        #[source]
        source: CoercionError,
    },
    /// The coerced values could not be assembled into a request.
    #[error("command `{command}`: {source}")]
    Assembly {
        /// Failing command path.
        command: String,
        /// Underlying assembly failure.
        #[source]
        source: AssemblyError,
    },
    /// Signer resolution failed before dispatch.
    #[error("command `{command}`: {source}")]
    Signer {
        /// Failing command path.
        command: String,
        /// Underlying signer failure.
        #[source]
        source: SignerError,
    },
    /// The external executor reported a failure, surfaced verbatim.
    #[error("command `{command}`: {source}")]
    Execution {
        /// Failing command path.
        command: String,
        /// Underlying execution failure.
        #[source]
        source: ExecutionError,
    },
    /// Response rendering failed.
    #[error("command `{command}`: {source}")]
    Format {
        /// Failing command path.
        command: String,
        /// Underlying formatting failure.
        #[source]
        source: FormatError,
    },
}

// ============================================================================
// SECTION: Invocation Context
// ============================================================================

/// External capabilities supplied by the host for one invocation.
#[derive(Clone, Copy)]
pub struct InvocationContext<'a> {
    /// Key-management capability; absent when the host has no keyring.
    pub keyring: Option<&'a dyn Keyring>,
    /// Request executor for queries and transactions.
    pub executor: &'a dyn RequestExecutor,
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Executes the generated command selected by the parsed matches.
///
/// `matches` must be the matches of the node the tree was attached to, so
/// the matched subcommand path lines up with the tree's leaf registry.
///
/// # Errors
///
/// Returns [`InvokeError`] naming the command for any coercion, assembly,
/// signer, execution, or rendering failure.
pub fn run(
    tree: &CommandTree,
    matches: &ArgMatches,
    context: &InvocationContext<'_>,
) -> Result<String, InvokeError> {
    let (key, leaf_matches) = match_leaf(matches);
    let Some(leaf) = tree.leaves.get(&key) else {
        return Err(InvokeError::UnknownCommand {
            path: key,
        });
    };
    execute_leaf(leaf, &key, leaf_matches, context)
}

/// Walks the matched subcommand chain down to the leaf.
fn match_leaf(matches: &ArgMatches) -> (String, &ArgMatches) {
    let mut path = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        path.push(name.to_string());
        current = sub;
    }
    (path.join(" "), current)
}

/// Runs the coerce/assemble/sign/wrap/dispatch/render pipeline for one leaf.
fn execute_leaf(
    leaf: &GeneratedCommand,
    command: &str,
    matches: &ArgMatches,
    context: &InvocationContext<'_>,
) -> Result<String, InvokeError> {
    // Coerce every binding before the request exists, so a failing field
    // never leaves a partially populated request behind.
    let mut coerced: Vec<(FieldPath, Value)> = Vec::new();
    collect_flags(leaf, command, matches, &mut coerced)?;
    collect_positionals(leaf, command, matches, &mut coerced)?;

    let mut request =
        assemble(&leaf.method.input, coerced).map_err(|source| InvokeError::Assembly {
            command: command.to_string(),
            source,
        })?;

    let mut method_id = leaf.method_id.clone();
    if leaf.method.annotations.kind == MethodKind::Transaction
        && let Some(signer_field) = &leaf.options.signer_field
    {
        let address = resolve_signer(&mut request, signer_field, context.keyring).map_err(
            |source| InvokeError::Signer {
                command: command.to_string(),
                source,
            },
        )?;
        if leaf.options.governance_wrappable && !proposal_opt_out(matches, command)? {
            let (_, envelope) = wrap_proposal(request, &leaf.method.input, address.as_str());
            request = envelope;
            method_id = SUBMIT_PROPOSAL_METHOD_ID.to_string();
        }
    }

    let response =
        dispatch(context.executor, &method_id, &request).map_err(|source| {
            InvokeError::Execution {
                command: command.to_string(),
                source,
            }
        })?;

    let requested = match matches.try_get_one::<String>(OUTPUT_FLAG) {
        Ok(value) => value.map_or("json", String::as_str),
        Err(_) => return Err(shadowed(command)),
    };
    let format = requested.parse::<OutputFormat>().map_err(|source| InvokeError::Format {
        command: command.to_string(),
        source,
    })?;
    format_response(&response, format).map_err(|source| InvokeError::Format {
        command: command.to_string(),
        source,
    })
}

/// Builds the error for a leaf path occupied by a host-defined command.
///
/// The additive merge leaves host commands in place, so a matched path can
/// name a generated leaf whose arguments were never attached. Reads go
/// through clap's fallible accessors and any definition mismatch resolves
/// to this error instead of a panic.
fn shadowed(command: &str) -> InvokeError {
    InvokeError::UnknownCommand {
        path: command.to_string(),
    }
}

/// Reads the raw tokens bound to one argument id of the matched command.
fn raw_tokens(
    matches: &ArgMatches,
    id: &str,
    command: &str,
) -> Result<Vec<String>, InvokeError> {
    match matches.try_get_many::<String>(id) {
        Ok(values) => Ok(values.map(|tokens| tokens.cloned().collect()).unwrap_or_default()),
        Err(_) => Err(shadowed(command)),
    }
}

/// Reads the governance opt-out flag of the matched command.
fn proposal_opt_out(matches: &ArgMatches, command: &str) -> Result<bool, InvokeError> {
    match matches.try_get_one::<bool>(NO_PROPOSAL_FLAG) {
        Ok(flag) => Ok(flag.copied().unwrap_or(false)),
        Err(_) => Err(shadowed(command)),
    }
}

/// Coerces every supplied flag value into the collected set.
fn collect_flags(
    leaf: &GeneratedCommand,
    command: &str,
    matches: &ArgMatches,
    coerced: &mut Vec<(FieldPath, Value)>,
) -> Result<(), InvokeError> {
    for flag in &leaf.flags {
        let tokens = raw_tokens(matches, &flag.name, command)?;
        if tokens.is_empty() {
            continue;
        }
        let label = format!("--{}", flag.name);
        let value = coerce_field(&flag.kind, &label, &tokens, ListSplit::Comma).map_err(
            |source| InvokeError::Coercion {
                command: command.to_string(),
                source,
            },
        )?;
        coerced.push((flag.path.clone(), value));
    }
    Ok(())
}

/// Coerces every supplied positional value into the collected set.
///
/// A varargs slot consumes all residual tokens, one element per token with
/// no inner delimiter splitting; zero residual tokens leave the repeated
/// field empty, which is valid. Single-token positionals bound to repeated
/// fields use the comma-separated list rule instead.
fn collect_positionals(
    leaf: &GeneratedCommand,
    command: &str,
    matches: &ArgMatches,
    coerced: &mut Vec<(FieldPath, Value)>,
) -> Result<(), InvokeError> {
    for positional in &leaf.positionals {
        let split = if positional.varargs { ListSplit::None } else { ListSplit::Comma };
        let tokens = raw_tokens(matches, &positional.id, command)?;
        if tokens.is_empty() {
            continue;
        }
        let value = coerce_field(&positional.kind, &positional.id, &tokens, split).map_err(
            |source| InvokeError::Coercion {
                command: command.to_string(),
                source,
            },
        )?;
        coerced.push((positional.path.clone(), value));
    }
    Ok(())
}
