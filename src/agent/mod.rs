//! The AI agent behind a query.
//!
//! One invocation wires three pieces together: the MCP tool server
//! connection, the chat-completions loop that drives it, and the bounded
//! call that wraps both in a timeout and maps outcomes to plain strings.

pub mod agent_loop;
pub mod invocation;
pub mod tools;

pub use invocation::{run_github_agent, MISSING_GITHUB_TOKEN, MISSING_OPENAI_KEY};
