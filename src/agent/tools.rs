//! Bridging MCP tools into the chat completions API.
//!
//! The GitHub MCP server advertises its tools over the protocol; this
//! module translates those declarations into the `tools` array of a chat
//! request and routes the model's tool calls back to the server.

use anyhow::{Context, Result};
use rmcp::model::{CallToolRequestParams, CallToolResult};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::mcp::ToolServerConnection;

/// Function-tool declaration in the shape the chat completions API expects.
pub fn tool_definition(name: &str, description: Option<&str>, parameters: &Value) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": name,
            "description": description.unwrap_or(""),
            "parameters": parameters,
        }
    })
}

/// Convert the server's advertised tools into chat `tools` entries.
pub fn tool_definitions(tools: &[rmcp::model::Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            let schema = Value::Object((*tool.input_schema).clone());
            tool_definition(&tool.name, tool.description.as_deref(), &schema)
        })
        .collect()
}

/// Parse a model-produced argument string (JSON object) into MCP call
/// arguments. Empty or non-object payloads become "no arguments".
pub fn parse_arguments(raw: &str) -> Option<Map<String, Value>> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| value.as_object().cloned())
}

/// Flatten a tool result's text content blocks into one string.
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| content.as_text().map(|text| text.text.clone()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute one tool call against the server.
///
/// Tool-level errors (`is_error`) are rendered as text so the model can
/// react to them; only protocol failures abort the run.
pub async fn dispatch(
    connection: &ToolServerConnection,
    name: &str,
    raw_arguments: &str,
) -> Result<String> {
    debug!(tool = name, "Calling MCP tool");

    let result = connection
        .call_tool(CallToolRequestParams {
            meta: None,
            name: name.to_string().into(),
            arguments: parse_arguments(raw_arguments),
            task: None,
        })
        .await
        .with_context(|| format!("Tool call '{}' failed", name))?;

    let text = result_text(&result);
    if result.is_error.unwrap_or(false) {
        Ok(format!("Tool '{}' returned an error: {}", name, text))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;

    #[test]
    fn test_tool_definition_shape() {
        let parameters = json!({
            "type": "object",
            "properties": { "repo": { "type": "string" } }
        });
        let def = tool_definition("list_issues", Some("List issues"), &parameters);

        assert_eq!(def["type"], "function");
        assert_eq!(def["function"]["name"], "list_issues");
        assert_eq!(def["function"]["description"], "List issues");
        assert_eq!(def["function"]["parameters"], parameters);
    }

    #[test]
    fn test_tool_definition_without_description() {
        let def = tool_definition("ping", None, &json!({"type": "object"}));
        assert_eq!(def["function"]["description"], "");
    }

    #[test]
    fn test_parse_arguments() {
        assert!(parse_arguments("").is_none());
        assert!(parse_arguments("   ").is_none());
        // Non-object payloads are dropped rather than passed through
        assert!(parse_arguments("42").is_none());

        let args = parse_arguments(r#"{"repo": "rust-lang/rust", "state": "open"}"#).unwrap();
        assert_eq!(args["repo"], "rust-lang/rust");
        assert_eq!(args["state"], "open");
    }

    #[test]
    fn test_result_text_joins_blocks() {
        let result = CallToolResult::success(vec![
            Content::text("first"),
            Content::text("second"),
        ]);
        assert_eq!(result_text(&result), "first\nsecond");
    }
}
