//! Query types, templates, and composition.
//!
//! A query is a plain natural-language string; the only structure this
//! module adds is the canned template per query type and the rule that
//! scopes a query to a repository.

use std::fmt;

/// The kind of question being asked, mirroring the preset choices of the
/// query form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum QueryType {
    /// Issues in the repository
    Issues,
    /// Pull requests in the repository
    PullRequests,
    /// Overall repository activity
    Activity,
    /// Freeform query written by the user (default)
    #[default]
    Custom,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Issues => write!(f, "Issues"),
            QueryType::PullRequests => write!(f, "Pull Requests"),
            QueryType::Activity => write!(f, "Repository Activity"),
            QueryType::Custom => write!(f, "Custom"),
        }
    }
}

impl QueryType {
    /// Pre-filled query text for this type, or `None` for custom queries.
    pub fn template(&self, repo: &str) -> Option<String> {
        match self {
            QueryType::Issues => Some(format!("Find issues labeled as bugs in {}", repo)),
            QueryType::PullRequests => Some(format!("Show me recent merged PRs in {}", repo)),
            QueryType::Activity => Some(format!("Analyze code quality trends in {}", repo)),
            QueryType::Custom => None,
        }
    }
}

/// Scope a query to a repository.
///
/// When `repo` is non-empty and not already mentioned verbatim in the query,
/// append it once as `"{query} in {repo}"`. No parsing of the query text
/// happens here.
pub fn compose_query(query: &str, repo: &str) -> String {
    if !repo.is_empty() && !query.contains(repo) {
        format!("{} in {}", query, repo)
    } else {
        query.to_string()
    }
}

/// Check that a repository identifier looks like `owner/repo`.
pub fn valid_repo_id(repo: &str) -> bool {
    let mut parts = repo.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) => {
            !owner.is_empty() && !name.is_empty() && !name.contains('/') && !repo.contains(char::is_whitespace)
        }
        _ => false,
    }
}
