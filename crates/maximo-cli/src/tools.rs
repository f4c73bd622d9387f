use maximo_agent::errors::{AgentError, AgentResult};
use maximo_agent::manifest::{self, ToolDescriptor};
use maximo_agent::models::tool::ToolCall;
use serde_json::Value;

pub const GET_ASSET: &str = "get_asset";
pub const LIST_ASSETS: &str = "list_assets";

/// A model-issued call after validation against the manifest: one variant
/// per tool the bridge implements. Anything that does not parse into this
/// union is never dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    GetAsset {
        asset_id: String,
    },
    ListAssets {
        where_clause: Option<String>,
        page_size: Option<u32>,
        page_num: Option<u32>,
    },
}

impl BridgeCall {
    /// Validate a raw tool call against its manifest descriptor and parse
    /// it into a known call shape.
    pub fn from_tool_call(manifest: &[ToolDescriptor], call: &ToolCall) -> AgentResult<Self> {
        let descriptor = manifest::find_descriptor(manifest, call)?;
        manifest::validate_call(descriptor, call)?;

        match call.name.as_str() {
            GET_ASSET => {
                let asset_id = call
                    .arguments
                    .get("asset_id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        AgentError::InvalidParameters(
                            "Missing required parameter 'asset_id' for 'get_asset'".to_string(),
                        )
                    })?
                    .to_string();
                Ok(BridgeCall::GetAsset { asset_id })
            }
            LIST_ASSETS => Ok(BridgeCall::ListAssets {
                where_clause: call
                    .arguments
                    .get("where")
                    .and_then(Value::as_str)
                    .map(String::from),
                page_size: call
                    .arguments
                    .get("page_size")
                    .and_then(Value::as_u64)
                    .map(|v| v as u32),
                page_num: call
                    .arguments
                    .get("page_num")
                    .and_then(Value::as_u64)
                    .map(|v| v as u32),
            }),
            // The manifest may describe tools this client does not implement
            other => Err(AgentError::ToolNotFound(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BridgeCall::GetAsset { .. } => GET_ASSET,
            BridgeCall::ListAssets { .. } => LIST_ASSETS,
        }
    }
}

/// The outcome of dispatching one bridge call: the payload for the model,
/// or a failure the session reports to the user directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> Vec<ToolDescriptor> {
        serde_json::from_value(json!([
            {
                "name": "get_asset",
                "description": "Gets details for a specific asset by its ID.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "asset_id": {"type": "string", "description": "The asset ID."}
                    },
                    "required": ["asset_id"]
                }
            },
            {
                "name": "list_assets",
                "description": "Lists assets.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "where": {"type": "string"},
                        "page_size": {"type": "integer"},
                        "page_num": {"type": "integer"}
                    }
                }
            }
        ]))
        .unwrap()
    }

    #[test]
    fn parses_get_asset() {
        let call = ToolCall::new("get_asset", json!({"asset_id": "A-100"}));
        let parsed = BridgeCall::from_tool_call(&manifest(), &call).unwrap();
        assert_eq!(
            parsed,
            BridgeCall::GetAsset {
                asset_id: "A-100".to_string()
            }
        );
    }

    #[test]
    fn parses_list_assets_with_optional_arguments() {
        let call = ToolCall::new(
            "list_assets",
            json!({"where": "status=\"OPERATING\"", "page_size": 5}),
        );
        let parsed = BridgeCall::from_tool_call(&manifest(), &call).unwrap();
        assert_eq!(
            parsed,
            BridgeCall::ListAssets {
                where_clause: Some("status=\"OPERATING\"".to_string()),
                page_size: Some(5),
                page_num: None,
            }
        );
    }

    #[test]
    fn rejects_unknown_tool() {
        let call = ToolCall::new("delete_asset", json!({}));
        assert!(matches!(
            BridgeCall::from_tool_call(&manifest(), &call).unwrap_err(),
            AgentError::ToolNotFound(_)
        ));
    }

    #[test]
    fn rejects_arguments_failing_schema_validation() {
        let call = ToolCall::new("list_assets", json!({"page_size": "five"}));
        assert!(matches!(
            BridgeCall::from_tool_call(&manifest(), &call).unwrap_err(),
            AgentError::InvalidParameters(_)
        ));
    }
}
