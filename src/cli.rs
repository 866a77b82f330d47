//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

use crate::query::QueryType;

/// Octoquery - ask GitHub repositories questions in natural language
///
/// An AI agent answers your question by calling the official GitHub MCP
/// server (run in Docker). Requires GITHUB_TOKEN and OPENAI_API_KEY in the
/// environment or a .env file.
///
/// Examples:
///   octoquery --repo rust-lang/rust "What PRs need review?"
///   octoquery --repo rust-lang/rust --query-type issues
///   octoquery "Show me issues labeled bug in rust-lang/rust"
///   octoquery --check-env
///   octoquery --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Freeform query text
    ///
    /// Optional when --query-type selects a pre-built template.
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Repository to ask about
    ///
    /// Format: owner/repo. Appended to the query automatically when the
    /// query doesn't mention it.
    #[arg(short, long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Pre-built query template to use when no query text is given
    #[arg(long, default_value = "custom", value_name = "TYPE")]
    pub query_type: QueryType,

    /// Model used by the agent
    ///
    /// Can also be set via OPENAI_MODEL env var or .octoquery.toml config.
    #[arg(short, long, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", value_name = "URL")]
    pub api_base: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .octoquery.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How long to wait for an answer, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Temperature for model responses (0.0 - 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the masked credential status and exit
    ///
    /// Exit code 1 when a required variable is missing.
    #[arg(long)]
    pub check_env: bool,

    /// Generate a default .octoquery.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Utility flags skip query validation
        if self.init_config || self.check_env {
            return Ok(());
        }

        if let Some(ref repo) = self.repo {
            if !crate::query::valid_repo_id(repo) {
                return Err(format!("Repository must be in owner/repo format: {}", repo));
            }
        }

        if let Some(ref query) = self.query {
            if query.trim().is_empty() {
                return Err("Please enter a query".to_string());
            }
        } else if self.query_type == QueryType::Custom {
            return Err("Provide a query, or pick a template with --query-type".to_string());
        }

        if self.query.is_none() && self.repo.is_none() {
            return Err("--query-type templates need --repo".to_string());
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 1.0".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref api_base) = self.api_base {
            if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// The query text to dispatch: explicit text wins, otherwise the
    /// selected template filled with the repository.
    pub fn effective_query(&self) -> Option<String> {
        if let Some(ref query) = self.query {
            return Some(query.clone());
        }
        self.query_type
            .template(self.repo.as_deref().unwrap_or_default())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}


#[cfg(test)]
mod tests {
    use super::tests_support::make_args;
    use super::*;

    #[test]
    fn test_validation_accepts_baseline() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_repo() {
        let mut args = make_args();
        args.repo = Some("not-a-repo-id".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_custom_requires_query() {
        let mut args = make_args();
        args.query = None;
        args.query_type = QueryType::Custom;
        assert!(args.validate().is_err());

        args.query_type = QueryType::Issues;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_query() {
        let mut args = make_args();
        args.query = Some("   ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_template_requires_repo() {
        let mut args = make_args();
        args.query = None;
        args.query_type = QueryType::PullRequests;
        args.repo = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_temperature_range() {
        let mut args = make_args();
        args.temperature = Some(1.5);
        assert!(args.validate().is_err());

        args.temperature = Some(0.2);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_effective_query_prefers_explicit_text() {
        let mut args = make_args();
        args.query_type = QueryType::Issues;
        assert_eq!(
            args.effective_query().as_deref(),
            Some("What PRs need review?")
        );
    }

    #[test]
    fn test_effective_query_falls_back_to_template() {
        let mut args = make_args();
        args.query = None;
        args.query_type = QueryType::Issues;
        assert_eq!(
            args.effective_query().as_deref(),
            Some("Find issues labeled as bugs in rust-lang/rust")
        );
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
