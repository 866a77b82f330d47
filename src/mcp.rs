//! Launching and connecting to the GitHub MCP tool server.
//!
//! The server itself is the pre-built `github-mcp-server` image run in
//! Docker; this module only assembles the launch parameters and opens an
//! MCP client session over the child process's stdio. The server's
//! behavior is opaque here; no retries, no health checks.

use anyhow::{Context, Result};
use rmcp::service::RunningService;
use rmcp::transport::TokioChildProcess;
use rmcp::{RoleClient, ServiceExt};
use tokio::process::Command;
use tracing::debug;

/// Official GitHub MCP server container image.
pub const GITHUB_MCP_IMAGE: &str = "ghcr.io/github/github-mcp-server";

/// Toolsets granted to the server for one session.
pub const GITHUB_TOOLSETS: &str = "repos,issues,pull_requests";

/// Environment variable the server reads its access token from.
pub const SERVER_TOKEN_VAR: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";

/// Environment variable the server reads its toolset list from.
pub const SERVER_TOOLSETS_VAR: &str = "GITHUB_TOOLSETS";

/// A running MCP client session talking to the tool server.
pub type ToolServerConnection = RunningService<RoleClient, ()>;

/// Process-launch description for an MCP tool server: command, argument
/// list, and environment entries injected on top of the inherited
/// environment.
#[derive(Debug, Clone)]
pub struct ToolServerLaunch {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl ToolServerLaunch {
    /// Describe an arbitrary stdio MCP server process.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env: Vec::new(),
        }
    }

    /// Add an environment entry for the launched process.
    ///
    /// Injected entries always win over values inherited from the parent
    /// environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Launch description for the GitHub MCP server in Docker: interactive,
    /// removed on exit, with the access token and the fixed toolset list
    /// passed through the container boundary.
    pub fn github(token: &str) -> Self {
        Self::new(
            "docker",
            vec![
                "run".to_string(),
                "-i".to_string(),
                "--rm".to_string(),
                "-e".to_string(),
                SERVER_TOKEN_VAR.to_string(),
                "-e".to_string(),
                SERVER_TOOLSETS_VAR.to_string(),
                GITHUB_MCP_IMAGE.to_string(),
            ],
        )
        .env(SERVER_TOKEN_VAR, token)
        .env(SERVER_TOOLSETS_VAR, GITHUB_TOOLSETS)
    }

    /// Render the descriptor as a runnable command.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// Spawn the server process and complete the MCP initialize handshake.
    ///
    /// The returned connection owns the child process; releasing it goes
    /// through `cancel()` on the connection.
    pub async fn connect(&self) -> Result<ToolServerConnection> {
        debug!(program = %self.program, "Starting MCP tool server");

        let transport = TokioChildProcess::new(self.command())
            .with_context(|| format!("Failed to start tool server process: {}", self.program))?;

        let connection = ()
            .serve(transport)
            .await
            .context("MCP handshake with the tool server failed")?;

        debug!("MCP tool server session established");
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_launch_descriptor() {
        let launch = ToolServerLaunch::github("ghp_token");
        let cmd = launch.command();
        let std_cmd = cmd.as_std();

        assert_eq!(std_cmd.get_program(), "docker");

        let args: Vec<String> = std_cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "run",
                "-i",
                "--rm",
                "-e",
                "GITHUB_PERSONAL_ACCESS_TOKEN",
                "-e",
                "GITHUB_TOOLSETS",
                "ghcr.io/github/github-mcp-server",
            ]
        );
    }

    #[test]
    fn test_github_launch_injects_env() {
        let launch = ToolServerLaunch::github("ghp_token");
        let cmd = launch.command();

        let envs: Vec<(String, String)> = cmd
            .as_std()
            .get_envs()
            .filter_map(|(k, v)| {
                v.map(|v| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
            })
            .collect();

        assert!(envs.contains(&(
            "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
            "ghp_token".to_string()
        )));
        assert!(envs.contains(&(
            "GITHUB_TOOLSETS".to_string(),
            "repos,issues,pull_requests".to_string()
        )));
    }

    #[test]
    fn test_explicit_env_wins_over_inherited() {
        // The injected value must shadow whatever the parent process carries
        let launch =
            ToolServerLaunch::new("true", vec![]).env("GITHUB_TOOLSETS", "repos");
        let cmd = launch.command();

        let injected: Vec<(String, String)> = cmd
            .as_std()
            .get_envs()
            .filter_map(|(k, v)| {
                v.map(|v| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
            })
            .collect();

        assert_eq!(
            injected,
            vec![("GITHUB_TOOLSETS".to_string(), "repos".to_string())]
        );
    }

    #[tokio::test]
    async fn test_connect_fails_for_missing_program() {
        let launch = ToolServerLaunch::new("octoquery-no-such-binary", vec![]);
        let err = launch.connect().await.unwrap_err();
        assert!(err.to_string().contains("octoquery-no-such-binary"));
    }
}
