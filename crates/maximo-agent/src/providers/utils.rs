use anyhow::{anyhow, Result};
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::errors::AgentError;
use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

/// Convert internal Message format to OpenAI's API message specification
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut converted = json!({
            "role": message.role
        });

        let mut output = Vec::new();

        for content in &message.content {
            match content {
                MessageContent::Text(text) => {
                    if !text.text.is_empty() {
                        converted["content"] = json!(text.text);
                    }
                }
                MessageContent::ToolRequest(request) => match &request.tool_call {
                    Ok(tool_call) => {
                        let sanitized_name = sanitize_function_name(&tool_call.name);
                        let tool_calls = converted
                            .as_object_mut()
                            .unwrap()
                            .entry("tool_calls")
                            .or_insert(json!([]));

                        tool_calls.as_array_mut().unwrap().push(json!({
                            "id": request.id,
                            "type": "function",
                            "function": {
                                "name": sanitized_name,
                                "arguments": tool_call.arguments.to_string(),
                            }
                        }));
                    }
                    Err(e) => {
                        output.push(json!({
                            "role": "tool",
                            "content": format!("Error: {}", e),
                            "tool_call_id": request.id
                        }));
                    }
                },
                MessageContent::ToolResponse(response) => match &response.tool_result {
                    Ok(result) => {
                        output.push(json!({
                            "role": "tool",
                            "content": result.to_string(),
                            "tool_call_id": response.id
                        }));
                    }
                    Err(e) => {
                        output.push(json!({
                            "role": "tool",
                            "content": format!("The tool call returned the following error:\n{}", e),
                            "tool_call_id": response.id
                        }));
                    }
                },
            }
        }

        if converted.get("content").is_some() || converted.get("tool_calls").is_some() {
            output.insert(0, converted);
        }
        messages_spec.extend(output);
    }

    messages_spec
}

/// Convert internal Tool format to OpenAI's API tool specification
pub fn tools_to_openai_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.input_schema,
            }
        }));
    }

    Ok(result)
}

/// Convert OpenAI's API response to internal Message format
pub fn openai_response_to_message(response: Value) -> Result<Message> {
    let original = response["choices"][0]["message"].clone();
    let mut content = Vec::new();

    if let Some(text) = original.get("content") {
        if let Some(text_str) = text.as_str() {
            content.push(MessageContent::text(text_str));
        }
    }

    if let Some(tool_calls) = original.get("tool_calls") {
        if let Some(tool_calls_array) = tool_calls.as_array() {
            for tool_call in tool_calls_array {
                let id = tool_call["id"].as_str().unwrap_or_default().to_string();
                let function_name = tool_call["function"]["name"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                let arguments = tool_call["function"]["arguments"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();

                if !is_valid_function_name(&function_name) {
                    let error = AgentError::ToolNotFound(format!(
                        "The provided function name '{}' had invalid characters, it must match this regex [a-zA-Z0-9_-]+",
                        function_name
                    ));
                    content.push(MessageContent::tool_request(id, Err(error)));
                } else {
                    match serde_json::from_str::<Value>(&arguments) {
                        Ok(params) => {
                            content.push(MessageContent::tool_request(
                                id,
                                Ok(ToolCall::new(&function_name, params)),
                            ));
                        }
                        Err(e) => {
                            let error = AgentError::InvalidParameters(format!(
                                "Could not interpret tool use parameters for id {}: {}",
                                id, e
                            ));
                            content.push(MessageContent::tool_request(id, Err(error)));
                        }
                    }
                }
            }
        }
    }

    Ok(Message {
        role: Role::Assistant,
        created: chrono::Utc::now().timestamp(),
        content,
    })
}

/// Convert internal Message format to Gemini's generateContent content list.
///
/// Gemini has no tool-call ids; function responses are keyed by function
/// name, so the name is recovered from the originating request with the
/// matching id.
pub fn messages_to_gemini_spec(messages: &[Message]) -> Vec<Value> {
    let mut contents = Vec::new();
    let mut call_names: HashMap<String, String> = HashMap::new();

    for message in messages {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "model",
        };

        let mut parts = Vec::new();
        for content in &message.content {
            match content {
                MessageContent::Text(text) => {
                    if !text.text.is_empty() {
                        parts.push(json!({"text": text.text}));
                    }
                }
                MessageContent::ToolRequest(request) => match &request.tool_call {
                    Ok(tool_call) => {
                        call_names.insert(request.id.clone(), tool_call.name.clone());
                        parts.push(json!({
                            "functionCall": {
                                "name": sanitize_function_name(&tool_call.name),
                                "args": tool_call.arguments,
                            }
                        }));
                    }
                    Err(e) => {
                        parts.push(json!({"text": format!("Error: {}", e)}));
                    }
                },
                MessageContent::ToolResponse(response) => {
                    let name = call_names
                        .get(&response.id)
                        .cloned()
                        .unwrap_or_else(|| response.id.clone());
                    let payload = match &response.tool_result {
                        Ok(result) if result.is_object() => result.clone(),
                        Ok(result) => json!({"result": result}),
                        Err(e) => json!({"error": e.to_string()}),
                    };
                    parts.push(json!({
                        "functionResponse": {
                            "name": name,
                            "response": payload,
                        }
                    }));
                }
            }
        }

        if !parts.is_empty() {
            contents.push(json!({"role": role, "parts": parts}));
        }
    }

    contents
}

/// Convert internal Tool format to Gemini function declarations
pub fn tools_to_gemini_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.input_schema,
        }));
    }

    Ok(result)
}

/// Convert Gemini's generateContent response to internal Message format.
///
/// Gemini does not assign ids to function calls, so requests are given a
/// name-index id that stays stable for the duration of the turn.
pub fn gemini_response_to_message(response: Value) -> Result<Message> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    let mut content = Vec::new();
    for (index, part) in parts.iter().enumerate() {
        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            content.push(MessageContent::text(text));
        } else if let Some(call) = part.get("functionCall") {
            let function_name = call["name"].as_str().unwrap_or_default().to_string();
            let id = format!("{}-{}", function_name, index);
            if !is_valid_function_name(&function_name) {
                let error = AgentError::ToolNotFound(format!(
                    "The provided function name '{}' had invalid characters, it must match this regex [a-zA-Z0-9_-]+",
                    function_name
                ));
                content.push(MessageContent::tool_request(id, Err(error)));
            } else {
                let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
                content.push(MessageContent::tool_request(
                    id,
                    Ok(ToolCall::new(&function_name, args)),
                ));
            }
        }
    }

    Ok(Message {
        role: Role::Assistant,
        created: chrono::Utc::now().timestamp(),
        content,
    })
}

pub fn sanitize_function_name(name: &str) -> String {
    let re = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
    re.replace_all(name, "_").to_string()
}

pub fn is_valid_function_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    re.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_function_name() {
        assert_eq!(sanitize_function_name("hello-world"), "hello-world");
        assert_eq!(sanitize_function_name("hello world"), "hello_world");
        assert_eq!(sanitize_function_name("hello?world"), "hello_world");
    }

    #[test]
    fn test_is_valid_function_name() {
        assert!(is_valid_function_name("hello-world"));
        assert!(is_valid_function_name("get_asset"));
        assert!(!is_valid_function_name("hello world"));
        assert!(!is_valid_function_name("hello?world"));
    }

    #[test]
    fn openai_spec_includes_tool_round_trip() {
        let messages = vec![
            Message::user().with_text("show asset A-100"),
            Message::assistant().with_tool_request(
                "call_1",
                Ok(ToolCall::new("get_asset", json!({"asset_id": "A-100"}))),
            ),
            Message::user().with_tool_response("call_1", Ok(json!({"status": "OPERATING"}))),
        ];

        let spec = messages_to_openai_spec(&messages);
        assert_eq!(spec.len(), 3);
        assert_eq!(spec[0]["role"], "user");
        assert_eq!(spec[1]["tool_calls"][0]["function"]["name"], "get_asset");
        assert_eq!(spec[2]["role"], "tool");
        assert_eq!(spec[2]["tool_call_id"], "call_1");
    }

    #[test]
    fn openai_response_parses_tool_calls() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_asset",
                            "arguments": "{\"asset_id\":\"A-100\"}"
                        }
                    }]
                }
            }]
        });

        let message = openai_response_to_message(response).unwrap();
        let requests = message.tool_requests();
        assert_eq!(requests.len(), 1);
        let call = requests[0].tool_call.as_ref().unwrap();
        assert_eq!(call.name, "get_asset");
        assert_eq!(call.arguments, json!({"asset_id": "A-100"}));
    }

    #[test]
    fn openai_response_flags_invalid_function_name() {
        let response = json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_1",
                        "function": {"name": "invalid name", "arguments": "{}"}
                    }]
                }
            }]
        });

        let message = openai_response_to_message(response).unwrap();
        let requests = message.tool_requests();
        assert!(matches!(
            requests[0].tool_call,
            Err(AgentError::ToolNotFound(_))
        ));
    }

    #[test]
    fn gemini_spec_maps_roles_and_function_responses() {
        let messages = vec![
            Message::user().with_text("show asset A-100"),
            Message::assistant().with_tool_request(
                "get_asset-0",
                Ok(ToolCall::new("get_asset", json!({"asset_id": "A-100"}))),
            ),
            Message::user().with_tool_response("get_asset-0", Ok(json!({"status": "OPERATING"}))),
        ];

        let contents = messages_to_gemini_spec(&messages);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(
            contents[1]["parts"][0]["functionCall"]["name"],
            "get_asset"
        );
        let response_part = &contents[2]["parts"][0]["functionResponse"];
        assert_eq!(response_part["name"], "get_asset");
        assert_eq!(response_part["response"]["status"], "OPERATING");
    }

    #[test]
    fn gemini_spec_wraps_non_object_results() {
        let messages = vec![
            Message::assistant()
                .with_tool_request("list_assets-0", Ok(ToolCall::new("list_assets", json!({})))),
            Message::user().with_tool_response("list_assets-0", Ok(json!([1, 2, 3]))),
        ];

        let contents = messages_to_gemini_spec(&messages);
        let response_part = &contents[1]["parts"][0]["functionResponse"];
        assert_eq!(response_part["response"]["result"], json!([1, 2, 3]));
    }

    #[test]
    fn gemini_response_parses_text_and_calls() {
        let response = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Let me look that up."},
                        {"functionCall": {"name": "get_asset", "args": {"asset_id": "A-100"}}}
                    ]
                }
            }]
        });

        let message = gemini_response_to_message(response).unwrap();
        assert_eq!(message.text(), "Let me look that up.");
        let requests = message.tool_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, "get_asset-1");
        assert_eq!(
            requests[0].tool_call.as_ref().unwrap().arguments,
            json!({"asset_id": "A-100"})
        );
    }

    #[test]
    fn test_tools_to_openai_spec_duplicate_names() {
        let tools = vec![
            Tool::new("get_asset", "a", json!({})),
            Tool::new("get_asset", "b", json!({})),
        ];
        assert!(tools_to_openai_spec(&tools).is_err());
    }
}
