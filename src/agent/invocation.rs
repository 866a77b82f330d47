//! The bounded query invocation.
//!
//! Exactly one request per call: validate credentials locally, launch the
//! tool server, run the agent under a timeout, release the connection on
//! every exit path, and collapse the outcome to a single string.

use std::time::Duration;
use tokio::time::error::Elapsed;
use tracing::warn;

use crate::agent::agent_loop::GithubAgent;
use crate::config::Config;
use crate::env::Credentials;
use crate::mcp::ToolServerLaunch;

/// Returned when the GitHub access token is absent.
pub const MISSING_GITHUB_TOKEN: &str = "Error: GitHub token not provided";

/// Returned when the OpenAI API key is absent.
pub const MISSING_OPENAI_KEY: &str = "Error: OpenAI API key not provided";

/// Run one natural-language query against GitHub.
///
/// The call is atomic from the caller's perspective: it returns exactly
/// one string. Success yields the agent's markdown answer unmodified;
/// every failure class yields its message. No retries, no streaming.
pub async fn run_github_agent(config: &Config, credentials: &Credentials, query: &str) -> String {
    // Local validation first: nothing launches without both secrets
    let Some(token) = credentials.github_token.as_deref() else {
        return MISSING_GITHUB_TOKEN.to_string();
    };
    let Some(api_key) = credentials.openai_api_key.as_deref() else {
        return MISSING_OPENAI_KEY.to_string();
    };

    let connection = match ToolServerLaunch::github(token).connect().await {
        Ok(connection) => connection,
        Err(e) => return format!("Error: {:#}", e),
    };

    let mut agent = GithubAgent::new(&config.model, api_key);
    let timeout = Duration::from_secs(config.model.timeout_seconds);
    let outcome = tokio::time::timeout(timeout, agent.run(&connection, query)).await;

    // Release the tool server before reporting anything, on every path
    if let Err(e) = connection.cancel().await {
        warn!("Failed to shut down the tool server cleanly: {}", e);
    }

    describe_outcome(outcome, config.model.timeout_seconds)
}

/// Collapse the three possible call outcomes into one string.
fn describe_outcome(
    outcome: Result<anyhow::Result<String>, Elapsed>,
    timeout_seconds: u64,
) -> String {
    match outcome {
        Ok(Ok(answer)) => answer,
        Ok(Err(e)) => format!("Error: {:#}", e),
        Err(_) => format!("Error: Request timed out after {} seconds", timeout_seconds),
    }
}
