// msgforge-gen/src/merge.rs
// ============================================================================
// Module: Additive Tree Merge
// Description: Attachment of the generated tree to a host command hierarchy.
// Purpose: Add generated commands without removing or overriding existing nodes.
// Dependencies: clap
// ============================================================================

//! ## Overview
//! Attaching is a pure tree merge: node paths already occupied by
//! user-defined commands are left untouched, and the generator only adds
//! command names that do not already exist at a path. When a generated leaf
//! beneath an occupied path carries `enhance_custom_command`, the generated
//! children are added alongside the pre-existing ones instead of being
//! dropped; existing children are never replaced either way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use clap::Command;

use crate::builder::CommandTree;

// ============================================================================
// SECTION: Attachment
// ============================================================================

/// Additively attaches the generated tree's children to a host root command.
///
/// The host root is returned with generated subcommands added at every path
/// not already occupied; occupied paths are preserved as-is unless a
/// generated descendant opted into enhancement.
#[must_use]
pub fn attach(root: Command, tree: &CommandTree) -> Command {
    merge_children(root, &tree.command, &tree.enhance_paths, &[])
}

/// Merges the generated node's children into the existing node.
fn merge_children(
    existing: Command,
    generated: &Command,
    enhance_paths: &BTreeSet<String>,
    path: &[String],
) -> Command {
    let mut merged = existing;
    for sub in generated.get_subcommands() {
        let name = sub.get_name().to_string();
        let mut child_path = path.to_vec();
        child_path.push(name.clone());
        if merged.find_subcommand(&name).is_some() {
            if wants_enhancement(enhance_paths, &child_path) {
                merged = merged.mut_subcommand(&name, |existing_child| {
                    merge_children(existing_child, sub, enhance_paths, &child_path)
                });
            }
        } else {
            merged = merged.subcommand(sub.clone());
        }
    }
    merged
}

/// Returns true when any generated leaf at or below the path opted into
/// enhancing an existing custom command.
fn wants_enhancement(enhance_paths: &BTreeSet<String>, path: &[String]) -> bool {
    let key = path.join(" ");
    let prefix = format!("{key} ");
    enhance_paths.iter().any(|leaf| leaf == &key || leaf.starts_with(&prefix))
}
