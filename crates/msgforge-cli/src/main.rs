// msgforge-cli/src/main.rs
// ============================================================================
// Module: Msgforge CLI Entry Point
// Description: Host binary attaching a generated command tree to a root command.
// Purpose: Demonstrate the synthesizer end to end with a sample service.
// Dependencies: clap, msgforge-core, msgforge-gen
// ============================================================================

//! ## Overview
//! The msgforge binary is deliberately thin: all command surface below the
//! root is synthesized from the demo service descriptors. The host only owns
//! the root command, the `--key` registration flag for the in-memory
//! keyring, and process exit codes.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod demo;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write as _;
use std::process::ExitCode;

use clap::Arg;
use clap::ArgAction;
use clap::Command;
use msgforge_core::AppVersion;
use msgforge_core::Keyring;
use msgforge_gen::InvocationContext;
use msgforge_gen::attach;
use msgforge_gen::build_tree;
use msgforge_gen::run;

use crate::demo::DryRunExecutor;
use crate::demo::StaticKeyring;
use crate::demo::circuit_service;

// ============================================================================
// SECTION: Root Command
// ============================================================================

/// Builds the host-owned root command.
fn root_command() -> Command {
    Command::new("msgforge")
        .about("Schema-driven command-line client for RPC services")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("key")
                .long("key")
                .action(ArgAction::Append)
                .value_name("NAME=ADDRESS")
                .global(true)
                .help("Register an in-memory key, repeatable"),
        )
}

/// Returns the running application version used for method version gates.
fn app_version() -> AppVersion {
    env!("CARGO_PKG_VERSION").parse().unwrap_or(AppVersion::new(0, 1, 0))
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
fn main() -> ExitCode {
    match run_cli() {
        Ok(rendered) => {
            let mut stdout = std::io::stdout();
            let _ = writeln!(stdout, "{rendered}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the tree, parses arguments, and executes the matched command.
fn run_cli() -> Result<String, String> {
    let tree = build_tree("msgforge", &circuit_service(), app_version())
        .map_err(|err| err.to_string())?;
    let root = attach(root_command(), &tree);
    let matches = root.get_matches();

    let pairs: Vec<String> = matches
        .get_many::<String>("key")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let keyring = StaticKeyring::from_pairs(&pairs)?;
    let executor = DryRunExecutor;
    let context = InvocationContext {
        keyring: (!keyring.is_empty()).then(|| &keyring as &dyn Keyring),
        executor: &executor,
    };
    run(&tree, &matches, &context).map_err(|err| err.to_string())
}
