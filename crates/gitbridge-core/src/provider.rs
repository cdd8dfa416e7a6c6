//! Provider contract for git hosting services.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::{Issue, IssueRequest};

/// Issue operations every git hosting provider (GitHub, GitLab, ...) supports.
///
/// Implementations hold only a token and a transport handle, so one instance
/// can serve concurrent calls. Every operation is a single round trip and
/// names its repository explicitly.
#[async_trait]
pub trait IssueProvider: Send + Sync {
    /// Provider identity used to tag returned issues (e.g., "GitHub", "GitLab").
    fn service_type(&self) -> &'static str;

    /// Fetch a single issue.
    async fn get_issue(&self, owner: &str, repo: &str, issue_id: &str) -> Result<Issue>;

    /// List issues. `page` is floored to 1 and `per_page` clamped into
    /// `[1, 100]` before the provider is asked.
    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Issue>>;

    /// Create an issue and return it as reported by the create response.
    async fn create_issue(&self, owner: &str, repo: &str, request: &IssueRequest)
        -> Result<Issue>;

    /// Replace title and description of an existing issue.
    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        issue_id: &str,
        request: &IssueRequest,
    ) -> Result<Issue>;

    /// Close an issue.
    async fn close_issue(&self, owner: &str, repo: &str, issue_id: &str) -> Result<Issue>;

    /// Check whether the configured credentials authenticate.
    ///
    /// Never fails: any error collapses to `false`.
    async fn validate_credentials(&self) -> bool;
}

/// Reject an empty path component before it reaches a provider URL.
pub fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}

/// Reject a value that cannot stand as exactly one URL path segment: empty,
/// containing `/`, or a `.`/`..` dot segment.
pub fn require_segment(what: &str, value: &str) -> Result<()> {
    require(what, value)?;
    if value.contains('/') || matches!(value.trim(), "." | "..") {
        return Err(Error::InvalidArgument(format!(
            "{} must be a single path segment, got '{}'",
            what, value
        )));
    }
    Ok(())
}

/// Reject an empty repository owner or name.
pub fn require_repository(owner: &str, repo: &str) -> Result<()> {
    require("repository owner", owner)?;
    require("repository name", repo)
}
