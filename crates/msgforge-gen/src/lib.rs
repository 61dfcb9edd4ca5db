// msgforge-gen/src/lib.rs
// ============================================================================
// Module: Msgforge Gen Root
// Description: Public API surface for command-tree synthesis.
// Purpose: Wire together option resolution, tree building, merge, and invocation.
// Dependencies: crate::{builder, invoke, merge, options}
// ============================================================================

//! ## Overview
//! msgforge-gen turns a [`options::ServiceCommandDescriptor`] into a full
//! `clap` command tree: one leaf command per non-skipped method, one flag or
//! positional per input field. Hosts build the tree once at startup with
//! [`builder::build_tree`], attach it additively with [`merge::attach`], and
//! execute matched invocations with [`invoke::run`].

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod builder;
pub mod invoke;
pub mod merge;
pub mod options;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::CommandTree;
pub use builder::FlagBinding;
pub use builder::GeneratedCommand;
pub use builder::NO_PROPOSAL_FLAG;
pub use builder::OUTPUT_FLAG;
pub use builder::PositionalBinding;
pub use builder::SIGNER_FLAG;
pub use builder::build_tree;
pub use invoke::InvocationContext;
pub use invoke::InvokeError;
pub use invoke::run;
pub use merge::attach;
pub use options::ConfigError;
pub use options::EffectiveOptions;
pub use options::FlagOptions;
pub use options::PositionalArgDescriptor;
pub use options::ResolvedPositional;
pub use options::RpcCommandOptions;
pub use options::ServiceCommandDescriptor;
pub use options::kebab_case;
pub use options::resolve;
