// msgforge-core/src/runtime/dispatch.rs
// ============================================================================
// Module: Dispatcher And Formatter
// Description: Request forwarding and structured response rendering.
// Purpose: Send assembled requests to the executor and render typed responses.
// Dependencies: serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Dispatch forwards a finished request to the external executor and surfaces
//! its result verbatim; retry and backoff, if any, belong to the executor.
//! Formatting renders the typed response as pretty JSON, YAML, or flattened
//! `path: value` text lines. The representation is a per-invocation
//! configuration choice, not a constraint of this core.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::str::FromStr;

use serde_json::Value as Json;
use thiserror::Error;

use crate::core::value::RecordValue;
use crate::interfaces::ExecutionError;
use crate::interfaces::RequestExecutor;

// ============================================================================
// SECTION: Output Format
// ============================================================================

/// Supported response renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML document.
    Yaml,
    /// Flattened `path: value` text lines.
    Text,
}

/// Errors raised while rendering a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The requested output format is not recognized.
    #[error("unknown output format `{value}` (expected json, yaml, or text)")]
    UnknownFormat {
        /// The rejected format name.
        value: String,
    },
    /// The renderer failed to serialize the response.
    #[error("failed to render response: {0}")]
    Render(String),
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "text" => Ok(Self::Text),
            _ => Err(FormatError::UnknownFormat {
                value: value.to_string(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Forwards an assembled request to the external executor.
///
/// # Errors
///
/// Returns [`ExecutionError`] verbatim from the executor; this layer never
/// retries or reinterprets it.
pub fn dispatch(
    executor: &dyn RequestExecutor,
    method_id: &str,
    request: &RecordValue,
) -> Result<RecordValue, ExecutionError> {
    executor.execute(method_id, request)
}

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Renders a typed response in the requested output format.
///
/// # Errors
///
/// Returns [`FormatError::Render`] when serialization fails.
pub fn format_response(
    response: &RecordValue,
    format: OutputFormat,
) -> Result<String, FormatError> {
    let json = response.to_json();
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json)
            .map_err(|err| FormatError::Render(err.to_string())),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&json).map_err(|err| FormatError::Render(err.to_string()))
        }
        OutputFormat::Text => {
            let mut rendered = String::new();
            flatten_text(&json, "", &mut rendered);
            Ok(rendered)
        }
    }
}

/// Appends flattened `path: value` lines for one JSON node.
fn flatten_text(json: &Json, path: &str, out: &mut String) {
    match json {
        Json::Object(object) => {
            for (key, value) in object {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_text(value, &child, out);
            }
        }
        Json::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten_text(value, &format!("{path}[{index}]"), out);
            }
        }
        leaf => {
            let _ = writeln!(out, "{path}: {leaf}");
        }
    }
}
