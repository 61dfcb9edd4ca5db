// msgforge-gen/src/options.rs
// ============================================================================
// Module: Option Resolver
// Description: Per-method customization records and their resolution.
// Purpose: Merge default generation behavior with caller-supplied overrides.
// Dependencies: msgforge-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Each schema owner supplies at most one [`RpcCommandOptions`] record per
//! method at startup. Resolution merges those overrides with the derived
//! defaults (kebab-case command and flag names, one flag per top-level field)
//! into an [`EffectiveOptions`] value, or omits the method entirely for skip
//! flags and unmet version gates. Invalid combinations are configuration
//! errors surfaced at build time, never at invocation time, and always name
//! the offending method.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use msgforge_core::AppVersion;
use msgforge_core::FieldKind;
use msgforge_core::FieldPath;
use msgforge_core::MethodDescriptor;
use msgforge_core::MethodKind;
use msgforge_core::ScalarKind;
use msgforge_core::ServiceDescriptor;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Build-time configuration errors for generated commands.
///
/// These abort tree construction for the offending command; they are never
/// deferred to invocation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A varargs positional descriptor was not the last descriptor.
    #[error("method `{method}`: varargs positional must be last")]
    VarargsNotLast {
        /// Offending method name.
        method: String,
    },
    /// More than one positional descriptor declared varargs.
    #[error("method `{method}`: at most one varargs positional is allowed")]
    MultipleVarargs {
        /// Offending method name.
        method: String,
    },
    /// A varargs descriptor targets a field that is not repeated.
    #[error("method `{method}`: varargs positional `{field}` must target a repeated field")]
    VarargsNotRepeated {
        /// Offending method name.
        method: String,
        /// Targeted field path.
        field: String,
    },
    /// A positional descriptor path did not resolve against the input schema.
    #[error("method `{method}`: positional `{field}` does not resolve: {reason}")]
    UnknownPositionalField {
        /// Offending method name.
        method: String,
        /// Unresolvable field path.
        field: String,
        /// Schema resolution failure.
        reason: String,
    },
    /// A flag override names a field the input schema does not declare.
    #[error("method `{method}`: flag override targets unknown field `{field}`")]
    UnknownFlagField {
        /// Offending method name.
        method: String,
        /// Unknown field name.
        field: String,
    },
    /// The method declares more than one signer field.
    #[error("method `{method}`: more than one signer field declared")]
    MultipleSigners {
        /// Offending method name.
        method: String,
    },
    /// The declared signer field is missing or not a string field.
    #[error("method `{method}`: signer field `{field}` must be a declared string field")]
    InvalidSignerField {
        /// Offending method name.
        method: String,
        /// Declared signer field name.
        field: String,
    },
    /// Governance wrapping was requested for a method without a signer.
    #[error("method `{method}`: governance wrapping requires a transactional method with a signer")]
    GovernanceRequiresSigner {
        /// Offending method name.
        method: String,
    },
}

// ============================================================================
// SECTION: Customization Records
// ============================================================================

/// Per-field flag overrides, applied during flag synthesis only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlagOptions {
    /// Override flag name (replaces the kebab-case default).
    pub name: Option<String>,
    /// Single-character shorthand.
    pub shorthand: Option<char>,
    /// Usage text shown in help output.
    pub usage: Option<String>,
    /// Default value applied when the flag is not supplied.
    pub default_value: Option<String>,
}

/// One positional argument bound to a (possibly nested) schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalArgDescriptor {
    /// Dotted field path into the input schema.
    pub field: String,
    /// True when the positional may be omitted.
    pub optional: bool,
    /// True when the positional consumes all remaining tokens.
    pub varargs: bool,
}

impl PositionalArgDescriptor {
    /// Creates a required, non-varargs positional for a field path.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            optional: false,
            varargs: false,
        }
    }

    /// Marks the positional optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the positional as the trailing varargs slot.
    #[must_use]
    pub const fn varargs(mut self) -> Self {
        self.varargs = true;
        self
    }
}

/// Per-method override record supplied once by the owning module at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcCommandOptions {
    /// Name of the RPC method these options apply to.
    pub rpc_method: String,
    /// Override for the derived command invocation string.
    pub invocation: Option<String>,
    /// Short help text.
    pub short: Option<String>,
    /// Long help text.
    pub long: Option<String>,
    /// Ordered positional bindings; fields listed here never become flags.
    pub positional_args: Vec<PositionalArgDescriptor>,
    /// Flag overrides keyed by top-level field name.
    pub flag_options: BTreeMap<String, FlagOptions>,
    /// True to emit no command for this method.
    pub skip: bool,
    /// True to wrap the request in a governance proposal by default.
    pub governance_wrappable: bool,
    /// True to add generated children alongside an existing custom command.
    pub enhance_custom_command: bool,
}

impl RpcCommandOptions {
    /// Creates default options for a method.
    #[must_use]
    pub fn new(rpc_method: impl Into<String>) -> Self {
        Self {
            rpc_method: rpc_method.into(),
            invocation: None,
            short: None,
            long: None,
            positional_args: Vec::new(),
            flag_options: BTreeMap::new(),
            skip: false,
            governance_wrappable: false,
            enhance_custom_command: false,
        }
    }

    /// Returns a copy with the invocation string overridden.
    #[must_use]
    pub fn with_invocation(mut self, invocation: impl Into<String>) -> Self {
        self.invocation = Some(invocation.into());
        self
    }

    /// Returns a copy with positional bindings set.
    #[must_use]
    pub fn with_positionals(mut self, positional_args: Vec<PositionalArgDescriptor>) -> Self {
        self.positional_args = positional_args;
        self
    }

    /// Returns a copy with one flag override added.
    #[must_use]
    pub fn with_flag(mut self, field: impl Into<String>, options: FlagOptions) -> Self {
        self.flag_options.insert(field.into(), options);
        self
    }

    /// Returns a copy with the skip flag set.
    #[must_use]
    pub const fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Returns a copy marked governance-wrappable.
    #[must_use]
    pub const fn governance_wrappable(mut self) -> Self {
        self.governance_wrappable = true;
        self
    }

    /// Returns a copy marked to enhance an existing custom command.
    #[must_use]
    pub const fn enhancing(mut self) -> Self {
        self.enhance_custom_command = true;
        self
    }
}

/// Tree node combining a service, its per-method options, and named
/// sub-groups of further service command descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCommandDescriptor {
    /// Service whose methods become leaf commands of this node.
    pub service: ServiceDescriptor,
    /// Per-method customization records.
    pub rpc_options: Vec<RpcCommandOptions>,
    /// Explicit subcommand grouping, keyed by group command name.
    pub sub_commands: BTreeMap<String, ServiceCommandDescriptor>,
}

impl ServiceCommandDescriptor {
    /// Creates a descriptor with no overrides and no sub-groups.
    #[must_use]
    pub fn new(service: ServiceDescriptor) -> Self {
        Self {
            service,
            rpc_options: Vec::new(),
            sub_commands: BTreeMap::new(),
        }
    }

    /// Returns a copy with the per-method options set.
    #[must_use]
    pub fn with_options(mut self, rpc_options: Vec<RpcCommandOptions>) -> Self {
        self.rpc_options = rpc_options;
        self
    }

    /// Returns a copy with one named sub-group added.
    #[must_use]
    pub fn with_sub_command(mut self, name: impl Into<String>, child: Self) -> Self {
        self.sub_commands.insert(name.into(), child);
        self
    }

    /// Returns the options record for a method, when one was supplied.
    #[must_use]
    pub fn options_for(&self, method: &str) -> Option<&RpcCommandOptions> {
        self.rpc_options.iter().find(|options| options.rpc_method == method)
    }
}

// ============================================================================
// SECTION: Effective Options
// ============================================================================

/// A positional binding with its path parsed and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPositional {
    /// Validated field path.
    pub path: FieldPath,
    /// True when the positional may be omitted.
    pub optional: bool,
    /// True for the trailing varargs slot.
    pub varargs: bool,
}

/// Fully merged generation options for one method.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveOptions {
    /// Leaf command name.
    pub command_name: String,
    /// Short help text.
    pub short: Option<String>,
    /// Long help text.
    pub long: Option<String>,
    /// Validated positional bindings in declaration order.
    pub positional_args: Vec<ResolvedPositional>,
    /// Flag overrides keyed by top-level field name.
    pub flag_options: BTreeMap<String, FlagOptions>,
    /// True when requests wrap into a governance proposal by default.
    pub governance_wrappable: bool,
    /// True to add generated children alongside an existing custom command.
    pub enhance_custom_command: bool,
    /// The method's single signer field, when transactional.
    pub signer_field: Option<String>,
}

// ============================================================================
// SECTION: Name Derivation
// ============================================================================

/// Derives a kebab-case command or flag name from an identifier.
///
/// Separators are inserted at case-transition boundaries and underscores,
/// then the result is lower-cased: `AuthorizeCircuitBreaker` becomes
/// `authorize-circuit-breaker` and `limit_type_urls` becomes
/// `limit-type-urls`.
#[must_use]
pub fn kebab_case(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let chars: Vec<char> = identifier.chars().collect();
    for (index, &current) in chars.iter().enumerate() {
        if current == '_' {
            out.push('-');
            continue;
        }
        if current.is_ascii_uppercase() {
            let prev_lower =
                index > 0 && chars.get(index - 1).is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
            let next_lower =
                chars.get(index + 1).is_some_and(|c| c.is_ascii_lowercase());
            if (prev_lower || (index > 0 && next_lower)) && !out.ends_with('-') {
                out.push('-');
            }
            out.push(current.to_ascii_lowercase());
        } else {
            out.push(current);
        }
    }
    out
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Merges defaults with caller overrides for one method.
///
/// Returns `Ok(None)` when the method is skipped or its minimum-version
/// annotation exceeds the running application version; both silently omit
/// the command from the tree.
///
/// # Errors
///
/// Returns [`ConfigError`] naming the method for any invalid positional
/// combination, unknown override target, signer misdeclaration, or
/// governance wrapping without a signer.
pub fn resolve(
    method: &MethodDescriptor,
    options: Option<&RpcCommandOptions>,
    app_version: AppVersion,
) -> Result<Option<EffectiveOptions>, ConfigError> {
    if method.annotations.signer_fields.len() > 1 {
        return Err(ConfigError::MultipleSigners {
            method: method.name.clone(),
        });
    }
    if method.annotations.since.is_some_and(|since| since > app_version) {
        return Ok(None);
    }
    if options.is_some_and(|options| options.skip) {
        return Ok(None);
    }

    let signer_field = resolve_signer_field(method)?;
    let mut positional_args = Vec::new();
    if let Some(options) = options {
        validate_flag_overrides(method, options)?;
        positional_args = resolve_positionals(method, options)?;
        if options.governance_wrappable
            && (method.annotations.kind != MethodKind::Transaction || signer_field.is_none())
        {
            return Err(ConfigError::GovernanceRequiresSigner {
                method: method.name.clone(),
            });
        }
    }

    let command_name = options
        .and_then(|options| options.invocation.as_deref())
        .and_then(|invocation| invocation.split_whitespace().next())
        .map_or_else(|| kebab_case(&method.name), str::to_string);

    Ok(Some(EffectiveOptions {
        command_name,
        short: options.and_then(|options| options.short.clone()),
        long: options.and_then(|options| options.long.clone()),
        positional_args,
        flag_options: options.map(|options| options.flag_options.clone()).unwrap_or_default(),
        governance_wrappable: options.is_some_and(|options| options.governance_wrappable),
        enhance_custom_command: options.is_some_and(|options| options.enhance_custom_command),
        signer_field,
    }))
}

/// Validates the declared signer field against the input schema.
fn resolve_signer_field(method: &MethodDescriptor) -> Result<Option<String>, ConfigError> {
    let Some(name) = method.annotations.signer_fields.first() else {
        return Ok(None);
    };
    let valid = method
        .input
        .field(name)
        .is_some_and(|field| field.kind == FieldKind::Scalar(ScalarKind::String));
    if valid {
        Ok(Some(name.clone()))
    } else {
        Err(ConfigError::InvalidSignerField {
            method: method.name.clone(),
            field: name.clone(),
        })
    }
}

/// Validates flag overrides against the input schema's top-level fields.
fn validate_flag_overrides(
    method: &MethodDescriptor,
    options: &RpcCommandOptions,
) -> Result<(), ConfigError> {
    for field in options.flag_options.keys() {
        if method.input.field(field).is_none() {
            return Err(ConfigError::UnknownFlagField {
                method: method.name.clone(),
                field: field.clone(),
            });
        }
    }
    Ok(())
}

/// Parses and validates the positional descriptors for one method.
fn resolve_positionals(
    method: &MethodDescriptor,
    options: &RpcCommandOptions,
) -> Result<Vec<ResolvedPositional>, ConfigError> {
    let varargs_count =
        options.positional_args.iter().filter(|descriptor| descriptor.varargs).count();
    if varargs_count > 1 {
        return Err(ConfigError::MultipleVarargs {
            method: method.name.clone(),
        });
    }
    let last = options.positional_args.len().saturating_sub(1);
    let mut resolved = Vec::with_capacity(options.positional_args.len());
    for (index, descriptor) in options.positional_args.iter().enumerate() {
        let path = FieldPath::parse(&descriptor.field).map_err(|err| {
            ConfigError::UnknownPositionalField {
                method: method.name.clone(),
                field: descriptor.field.clone(),
                reason: err.to_string(),
            }
        })?;
        let field =
            method.input.leaf_field(&path).map_err(|err| ConfigError::UnknownPositionalField {
                method: method.name.clone(),
                field: descriptor.field.clone(),
                reason: err.to_string(),
            })?;
        if descriptor.varargs {
            if index != last {
                return Err(ConfigError::VarargsNotLast {
                    method: method.name.clone(),
                });
            }
            if !field.kind.is_repeated() {
                return Err(ConfigError::VarargsNotRepeated {
                    method: method.name.clone(),
                    field: descriptor.field.clone(),
                });
            }
        }
        resolved.push(ResolvedPositional {
            path,
            optional: descriptor.optional,
            varargs: descriptor.varargs,
        });
    }
    Ok(resolved)
}
