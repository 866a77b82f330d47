//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.octoquery.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,
}

/// Settings for the AI model behind the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name passed to the chat completions API.
    #[serde(default = "default_model")]
    pub name: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Sampling temperature; omitted from requests when unset.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// How long to wait for one query to complete, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Upper bound on model/tool round-trips within one query.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            api_base: default_api_base(),
            temperature: None,
            timeout_seconds: default_timeout(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_max_iterations() -> usize {
    20
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
    /// can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".octoquery.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and their env-var fallbacks) take precedence over
    /// config file settings; only explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref api_base) = args.api_base {
            self.model.api_base = api_base.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = Some(temperature);
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.name, "gpt-4o");
        assert_eq!(config.model.api_base, "https://api.openai.com/v1");
        assert_eq!(config.model.timeout_seconds, 120);
        assert_eq!(config.model.max_iterations, 20);
        assert!(config.model.temperature.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[model]
name = "gpt-4o-mini"
api_base = "http://localhost:8080/v1"
temperature = 0.2
timeout_seconds = 60
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.model.name, "gpt-4o-mini");
        assert_eq!(config.model.api_base, "http://localhost:8080/v1");
        assert_eq!(config.model.temperature, Some(0.2));
        assert_eq!(config.model.timeout_seconds, 60);
        // Unset fields keep their defaults
        assert_eq!(config.model.max_iterations, 20);
    }

    #[test]
    fn test_merge_with_args_cli_wins() {
        let mut config = Config::default();
        config.model.name = "from-file".to_string();

        let mut args = crate::cli::tests_support::make_args();
        args.model = Some("from-cli".to_string());
        args.timeout = Some(30);

        config.merge_with_args(&args);
        assert_eq!(config.model.name, "from-cli");
        assert_eq!(config.model.timeout_seconds, 30);
        // Untouched when the CLI provides nothing
        assert_eq!(config.model.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[model]"));
        assert!(toml_str.contains("gpt-4o"));
    }
}
