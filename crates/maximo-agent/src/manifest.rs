//! The static tool manifest shared by the bridge and the chat front-end.
//!
//! The bridge serves the manifest verbatim at `/tools`; the front-end
//! fetches it once per session and checks every model-issued call against
//! the descriptor's parameter schema before anything is dispatched.

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One entry of the tool manifest: a name, a human description and a
/// JSON-schema-shaped parameter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Convert the descriptor into the provider-facing tool definition
    pub fn to_tool(&self) -> Tool {
        Tool::new(&self.name, &self.description, self.parameters.clone())
    }

    fn properties(&self) -> Option<&serde_json::Map<String, Value>> {
        self.parameters.get("properties")?.as_object()
    }

    fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(|r| r.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Read and parse the manifest file
pub fn load_manifest(path: &Path) -> Result<Vec<ToolDescriptor>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Malformed manifest at {}", path.display()))
}

/// Find the descriptor a tool call refers to
pub fn find_descriptor<'a>(
    manifest: &'a [ToolDescriptor],
    call: &ToolCall,
) -> AgentResult<&'a ToolDescriptor> {
    manifest
        .iter()
        .find(|descriptor| descriptor.name == call.name)
        .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))
}

/// Check a model-issued call against a descriptor's parameter schema.
///
/// Arguments must be an object, every required parameter must be present,
/// no unknown parameters are accepted, and each value must match the
/// declared primitive type.
pub fn validate_call(descriptor: &ToolDescriptor, call: &ToolCall) -> AgentResult<()> {
    let arguments = call.arguments.as_object().ok_or_else(|| {
        AgentError::InvalidParameters(format!(
            "Arguments for '{}' must be a JSON object",
            call.name
        ))
    })?;

    let empty = serde_json::Map::new();
    let properties = descriptor.properties().unwrap_or(&empty);

    for name in descriptor.required() {
        if !arguments.contains_key(name) {
            return Err(AgentError::InvalidParameters(format!(
                "Missing required parameter '{}' for '{}'",
                name, call.name
            )));
        }
    }

    for (name, value) in arguments {
        let schema = properties.get(name).ok_or_else(|| {
            AgentError::InvalidParameters(format!(
                "Unknown parameter '{}' for '{}'",
                name, call.name
            ))
        })?;
        if let Some(expected) = schema.get("type").and_then(|t| t.as_str()) {
            if !type_matches(expected, value) {
                return Err(AgentError::InvalidParameters(format!(
                    "Parameter '{}' for '{}' must be of type {}",
                    name, call.name, expected
                )));
            }
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}
