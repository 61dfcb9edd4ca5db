// msgforge-gen/src/builder.rs
// ============================================================================
// Module: Command Tree Builder
// Description: Synthesis of the clap command tree from service descriptors.
// Purpose: Build one leaf command per non-skipped method with bound flags and positionals.
// Dependencies: clap, msgforge-core
// ============================================================================

//! ## Overview
//! The builder runs once at process start and produces an immutable
//! [`CommandTree`]: a `clap` command hierarchy mirroring service groupings,
//! plus a path-keyed registry of [`GeneratedCommand`] leaves that the
//! invocation pipeline reads back at run time. Binding rule: fields targeted
//! by a positional descriptor are removed from flag candidacy; every
//! remaining top-level field becomes a flag. The signer field binds to the
//! dedicated `--from` flag unless a positional already targets it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use clap::Arg;
use clap::ArgAction;
use clap::Command;
use msgforge_core::AppVersion;
use msgforge_core::FieldKind;
use msgforge_core::FieldPath;
use msgforge_core::MethodDescriptor;
use msgforge_core::ScalarKind;

use crate::options::ConfigError;
use crate::options::EffectiveOptions;
use crate::options::FlagOptions;
use crate::options::ServiceCommandDescriptor;
use crate::options::kebab_case;
use crate::options::resolve;

// ============================================================================
// SECTION: Reserved Flags
// ============================================================================

/// Dedicated transaction-signer flag name.
pub const SIGNER_FLAG: &str = "from";

/// Universal opt-out flag disabling governance wrapping for one invocation.
pub const NO_PROPOSAL_FLAG: &str = "no-proposal";

/// Output format selection flag.
pub const OUTPUT_FLAG: &str = "output";

// ============================================================================
// SECTION: Bindings
// ============================================================================

/// One synthesized flag bound to a schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagBinding {
    /// Flag long name, also used as the clap argument id.
    pub name: String,
    /// Field path the flag writes to.
    pub path: FieldPath,
    /// Field kind used for coercion.
    pub kind: FieldKind,
}

/// One synthesized positional slot bound to a schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalBinding {
    /// Clap argument id (the dotted field path).
    pub id: String,
    /// Field path the slot writes to.
    pub path: FieldPath,
    /// Field kind used for coercion.
    pub kind: FieldKind,
    /// True when the slot may be omitted.
    pub optional: bool,
    /// True for the trailing varargs slot.
    pub varargs: bool,
}

/// Immutable leaf produced at build time, owned by the command tree.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCommand {
    /// Command path below the tree root.
    pub path: Vec<String>,
    /// Dispatch identifier for the method.
    pub method_id: String,
    /// Method descriptor backing the command.
    pub method: MethodDescriptor,
    /// Merged generation options.
    pub options: EffectiveOptions,
    /// Bound flags in synthesis order.
    pub flags: Vec<FlagBinding>,
    /// Bound positional slots in declaration order.
    pub positionals: Vec<PositionalBinding>,
}

// ============================================================================
// SECTION: Command Tree
// ============================================================================

/// The built command tree: a clap hierarchy plus its leaf registry.
///
/// Built once, then only read; safe for concurrent read-only traversal.
#[derive(Debug, Clone)]
pub struct CommandTree {
    /// Root command holding the generated hierarchy.
    pub command: Command,
    /// Generated leaves keyed by space-joined command path.
    pub leaves: BTreeMap<String, GeneratedCommand>,
    /// Paths whose options request enhancement of existing custom commands.
    pub enhance_paths: BTreeSet<String>,
}

/// Builds the full command tree for a service command descriptor.
///
/// # Errors
///
/// Returns [`ConfigError`] when any method carries an invalid customization
/// record; the error names the offending method.
pub fn build_tree(
    root_name: &str,
    descriptor: &ServiceCommandDescriptor,
    app_version: AppVersion,
) -> Result<CommandTree, ConfigError> {
    let mut leaves = BTreeMap::new();
    let mut enhance_paths = BTreeSet::new();
    let command = build_node(
        Command::new(root_name.to_string()),
        descriptor,
        app_version,
        &[],
        &mut leaves,
        &mut enhance_paths,
    )?;
    Ok(CommandTree {
        command,
        leaves,
        enhance_paths,
    })
}

/// Builds one tree node: leaf commands for the node's methods, then child
/// nodes for its explicit sub-groups.
fn build_node(
    node: Command,
    descriptor: &ServiceCommandDescriptor,
    app_version: AppVersion,
    path: &[String],
    leaves: &mut BTreeMap<String, GeneratedCommand>,
    enhance_paths: &mut BTreeSet<String>,
) -> Result<Command, ConfigError> {
    let mut node = node.subcommand_required(true).arg_required_else_help(true);
    for method in &descriptor.service.methods {
        let options = descriptor.options_for(&method.name);
        let Some(effective) = resolve(method, options, app_version)? else {
            continue;
        };
        let mut leaf_path = path.to_vec();
        leaf_path.push(effective.command_name.clone());
        let key = leaf_path.join(" ");
        if effective.enhance_custom_command {
            enhance_paths.insert(key.clone());
        }
        let generated = build_leaf(descriptor, method, effective, leaf_path);
        node = node.subcommand(leaf_command(&generated));
        leaves.insert(key, generated);
    }
    for (name, child) in &descriptor.sub_commands {
        let mut child_path = path.to_vec();
        child_path.push(name.clone());
        let built = build_node(
            Command::new(name.clone()),
            child,
            app_version,
            &child_path,
            leaves,
            enhance_paths,
        )?;
        node = node.subcommand(built);
    }
    Ok(node)
}

// ============================================================================
// SECTION: Leaf Synthesis
// ============================================================================

/// Derives the bindings for one generated leaf command.
fn build_leaf(
    descriptor: &ServiceCommandDescriptor,
    method: &MethodDescriptor,
    options: EffectiveOptions,
    path: Vec<String>,
) -> GeneratedCommand {
    // Fields whose top-level root is claimed by a positional slot leave
    // flag candidacy entirely.
    let positional_roots: BTreeSet<&str> =
        options.positional_args.iter().map(|positional| positional.path.root()).collect();

    let mut positionals = Vec::with_capacity(options.positional_args.len());
    for resolved in &options.positional_args {
        // Paths were validated during option resolution.
        let kind = method
            .input
            .leaf_field(&resolved.path)
            .map(|field| field.kind.clone())
            .unwrap_or(FieldKind::Scalar(ScalarKind::String));
        positionals.push(PositionalBinding {
            id: resolved.path.to_string(),
            path: resolved.path.clone(),
            kind,
            optional: resolved.optional,
            varargs: resolved.varargs,
        });
    }

    let mut flags = Vec::new();
    if let Some(signer) = &options.signer_field
        && !positional_roots.contains(signer.as_str())
        && let Some(field) = method.input.field(signer)
    {
        flags.push(FlagBinding {
            name: SIGNER_FLAG.to_string(),
            path: FieldPath::single(signer.clone()),
            kind: field.kind.clone(),
        });
    }
    for field in &method.input.fields {
        if positional_roots.contains(field.name.as_str()) {
            continue;
        }
        if options.signer_field.as_deref() == Some(field.name.as_str()) {
            continue;
        }
        let name = options
            .flag_options
            .get(&field.name)
            .and_then(|overrides| overrides.name.clone())
            .unwrap_or_else(|| kebab_case(&field.name));
        flags.push(FlagBinding {
            name,
            path: FieldPath::single(field.name.clone()),
            kind: field.kind.clone(),
        });
    }

    GeneratedCommand {
        path,
        method_id: descriptor.service.method_id(method),
        method: method.clone(),
        options,
        flags,
        positionals,
    }
}

/// Renders one generated leaf as a clap command.
fn leaf_command(generated: &GeneratedCommand) -> Command {
    let mut command = Command::new(generated.options.command_name.clone());
    if let Some(short) = &generated.options.short {
        command = command.about(short.clone());
    }
    if let Some(long) = &generated.options.long {
        command = command.long_about(long.clone());
    }
    for positional in &generated.positionals {
        let mut arg = Arg::new(positional.id.clone())
            .value_name(positional.path.leaf().to_ascii_uppercase())
            .required(!positional.optional && !positional.varargs);
        if positional.varargs {
            arg = arg.num_args(0 ..).action(ArgAction::Append);
        }
        command = command.arg(arg);
    }
    for flag in &generated.flags {
        command = command.arg(flag_arg(generated, flag));
    }
    if generated.options.governance_wrappable {
        command = command.arg(
            Arg::new(NO_PROPOSAL_FLAG)
                .long(NO_PROPOSAL_FLAG)
                .action(ArgAction::SetTrue)
                .help("Submit the message directly instead of as a governance proposal"),
        );
    }
    command.arg(
        Arg::new(OUTPUT_FLAG)
            .long(OUTPUT_FLAG)
            .short('o')
            .default_value("json")
            .value_name("FORMAT")
            .help("Output format (json, yaml, text)"),
    )
}

/// Renders one flag binding as a clap argument.
fn flag_arg(generated: &GeneratedCommand, flag: &FlagBinding) -> Arg {
    let overrides = generated.options.flag_options.get(flag.path.root());
    let repeated = matches!(
        flag.kind,
        FieldKind::Repeated(_)
            | FieldKind::Map {
                ..
            }
    );
    let mut arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .value_name(flag.path.leaf().to_ascii_uppercase())
        .action(if repeated { ArgAction::Append } else { ArgAction::Set });
    if flag.name == SIGNER_FLAG {
        arg = arg.help("Name or address of the transaction signer");
    }
    if let Some(overrides) = overrides {
        arg = apply_flag_overrides(arg, overrides);
    }
    arg
}

/// Applies shorthand, usage, and default overrides to a flag argument.
fn apply_flag_overrides(mut arg: Arg, overrides: &FlagOptions) -> Arg {
    if let Some(shorthand) = overrides.shorthand {
        arg = arg.short(shorthand);
    }
    if let Some(usage) = &overrides.usage {
        arg = arg.help(usage.clone());
    }
    if let Some(default) = &overrides.default_value {
        arg = arg.default_value(default.clone());
    }
    arg
}
