//! The GitHub assistant agent loop.
//!
//! One query becomes one conversation: the model receives the user's
//! question plus the tool declarations advertised by the MCP server, and
//! every tool call it makes is executed against that server until it
//! settles on a textual answer. All reasoning and tool selection belong
//! to the model; this loop only ferries messages.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::agent::tools;
use crate::config::ModelConfig;
use crate::mcp::ToolServerConnection;

/// Fixed instruction set for the assistant.
const AGENT_INSTRUCTIONS: &str = "\
You are a GitHub assistant. Help users explore repositories and their activity.
- Provide organized, concise insights about the repository
- Focus on facts and data from the GitHub API
- Use markdown formatting for better readability
- Present numerical data in tables when appropriate
- Include links to relevant GitHub pages when helpful";

/// Message in the chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool(call_id: &str, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id.to_string()),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, exactly as the API delivers it.
    pub arguments: String,
}

/// Chat completions request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "<[Value]>::is_empty")]
    tools: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat completions response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallMessage>>,
}

/// The GitHub assistant agent for a single query.
pub struct GithubAgent {
    config: ModelConfig,
    api_key: String,
    http_client: reqwest::Client,
    messages: Vec<ChatMessage>,
}

impl GithubAgent {
    /// Create an agent with the fixed instruction set.
    ///
    /// The HTTP client carries no request timeout; the caller bounds the
    /// whole run instead.
    pub fn new(config: &ModelConfig, api_key: &str) -> Self {
        Self {
            config: config.clone(),
            api_key: api_key.to_string(),
            http_client: reqwest::Client::new(),
            messages: vec![ChatMessage::system(AGENT_INSTRUCTIONS)],
        }
    }

    /// Submit one query and drive the tool-call loop to a final answer.
    pub async fn run(&mut self, connection: &ToolServerConnection, query: &str) -> Result<String> {
        let listed = connection
            .list_tools(Default::default())
            .await
            .context("Failed to list tools from the MCP server")?;
        let tool_defs = tools::tool_definitions(&listed.tools);
        info!(tools = listed.tools.len(), "Tool server ready");

        self.messages.push(ChatMessage::user(query));

        for iteration in 0..self.config.max_iterations {
            debug!(iteration = iteration + 1, "Agent round-trip");

            let reply = self.chat(&tool_defs).await?;

            match reply.tool_calls {
                Some(calls) if !calls.is_empty() => {
                    self.messages.push(ChatMessage {
                        role: "assistant".to_string(),
                        content: reply.content,
                        tool_calls: Some(calls.clone()),
                        tool_call_id: None,
                    });

                    for call in &calls {
                        let output = tools::dispatch(
                            connection,
                            &call.function.name,
                            &call.function.arguments,
                        )
                        .await?;
                        self.messages.push(ChatMessage::tool(&call.id, output));
                    }
                }
                _ => return Ok(reply.content.unwrap_or_default()),
            }
        }

        bail!(
            "No final answer after {} tool rounds",
            self.config.max_iterations
        )
    }

    /// One chat completions round-trip.
    async fn chat(&self, tool_defs: &[Value]) -> Result<ResponseMessage> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        let request = ChatRequest {
            model: &self.config.name,
            messages: &self.messages,
            tools: tool_defs,
            temperature: self.config.temperature,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    anyhow!("Cannot connect to the model API at {}", self.config.api_base)
                } else {
                    anyhow!("Failed to send chat request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Model API error {}: {}", status, body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat response")?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| anyhow!("Model API returned no choices"))
    }
}
