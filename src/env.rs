//! Environment variable resolution and credential handling.
//!
//! Credentials and model settings arrive as ambient environment variables,
//! optionally seeded from a `.env` file discovered near the working
//! directory. Resolution happens once at startup; the resolved values are
//! passed down as immutable data.

use std::path::PathBuf;

/// Environment variable holding the GitHub personal access token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Variables that must be present before a query can run.
pub const REQUIRED_VARS: &[&str] = &[GITHUB_TOKEN_VAR, OPENAI_API_KEY_VAR];

/// Errors from environment variable resolution.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// A single required variable is absent or empty.
    #[error("{0} not found in environment variables. Set it in your .env file or environment.")]
    Missing(String),

    /// One or more required variables are absent. Always carries the full
    /// list, not just the first one encountered.
    #[error("Missing required environment variables: {}. Set them in your .env file or environment.", .0.join(", "))]
    MissingMany(Vec<String>),
}

/// Load a `.env` file into the process environment.
///
/// Searches the current directory and up to two parent directories for
/// `file_name`. Values already present in the environment are never
/// overwritten by file contents.
///
/// Returns the path of the file that was applied, or `None` if no usable
/// file was found. A missing file is not an error; the caller decides
/// whether to log it.
pub fn load_dotenv(file_name: &str) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;

    for _ in 0..3 {
        let candidate = dir.join(file_name);
        if candidate.is_file() {
            // dotenvy::from_path skips keys that are already set
            return dotenvy::from_path(&candidate).ok().map(|_| candidate);
        }
        if !dir.pop() {
            break;
        }
    }

    None
}

/// Look up a required variable, treating empty values as missing.
pub fn required_var(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(EnvError::Missing(name.to_string())),
    }
}

/// Look up an optional variable, treating empty values as unset.
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Look up a variable, falling back to a default when unset or empty.
#[allow(dead_code)] // Utility for optional settings with fixed fallbacks
pub fn var_or(name: &str, default: &str) -> String {
    optional_var(name).unwrap_or_else(|| default.to_string())
}

/// Validate that every named variable is set.
///
/// Collects all absent names before failing so the user can fix their
/// environment in one pass instead of replaying the command per variable.
pub fn require_all(names: &[&str]) -> Result<(), EnvError> {
    let missing: Vec<String> = names
        .iter()
        .filter(|name| required_var(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EnvError::MissingMany(missing))
    }
}

/// Render a secret for display without exposing it.
///
/// Short values collapse to a fixed placeholder; longer values keep the
/// first and last four characters. Presentation only; the full value
/// still lives in the environment.
pub fn mask(value: &str) -> String {
    if value.is_empty() {
        return "not set".to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        "***".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// The two secrets a query needs, resolved once per run.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// GitHub personal access token (`GITHUB_TOKEN`).
    pub github_token: Option<String>,
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: Option<String>,
}

impl Credentials {
    /// Resolve both credentials from the environment.
    pub fn from_env() -> Self {
        Self {
            github_token: optional_var(GITHUB_TOKEN_VAR),
            openai_api_key: optional_var(OPENAI_API_KEY_VAR),
        }
    }

    /// Masked one-line-per-credential summary, safe for logs and terminals.
    pub fn masked_summary(&self) -> String {
        format!(
            "{}: {}\n{}: {}",
            GITHUB_TOKEN_VAR,
            mask(self.github_token.as_deref().unwrap_or("")),
            OPENAI_API_KEY_VAR,
            mask(self.openai_api_key.as_deref().unwrap_or("")),
        )
    }
}
