//! Common types used across providers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical state of an open issue.
pub const STATE_OPEN: &str = "open";

/// Canonical state of a closed issue.
pub const STATE_CLOSED: &str = "closed";

/// Author name used when a provider does not report one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Largest page size any provider is asked for.
pub const MAX_PER_PAGE: u32 = 100;

// =============================================================================
// Issue
// =============================================================================

/// Represents an issue from a git hosting service.
///
/// `None` in an optional field always means the provider did not supply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Provider-native issue number, stringified
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// `"open"` or `"closed"`; unrecognised provider states pass through
    pub state: String,
    pub repository_owner: String,
    pub repository_name: String,
    /// Provider that produced this issue (e.g., "GitHub", "GitLab")
    pub service_type: String,
    /// Author display name
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Check whether the issue is in the canonical open state.
    pub fn is_open(&self) -> bool {
        self.state == STATE_OPEN
    }

    /// Check whether the issue is in the canonical closed state.
    pub fn is_closed(&self) -> bool {
        self.state == STATE_CLOSED
    }
}

/// Input for creating or replacing an issue.
///
/// Carries no identifier: creation assigns one, update and close take it
/// separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repository_owner: String,
    #[serde(default)]
    pub repository_name: String,
}

impl IssueRequest {
    /// Create a request with a title and optional description.
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            ..Default::default()
        }
    }

    /// Set the target repository.
    pub fn for_repository(mut self, owner: impl Into<String>, name: impl Into<String>) -> Self {
        self.repository_owner = owner.into();
        self.repository_name = name.into();
        self
    }
}

/// Fallback values applied when a provider response omits a field.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueDefaults<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub state: &'a str,
}

impl<'a> IssueDefaults<'a> {
    /// Defaults for a response describing the issue `id`.
    pub fn for_id(id: &'a str) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Defaults for a response to a create or update carrying `request`.
    pub fn from_request(id: &'a str, request: &'a IssueRequest) -> Self {
        Self {
            id,
            title: &request.title,
            description: request.description.as_deref(),
            state: STATE_OPEN,
        }
    }

    /// Override the fallback state.
    pub fn with_state(mut self, state: &'a str) -> Self {
        self.state = state;
        self
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Page coordinates as sent to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Floor `page` to 1 and clamp `per_page` into `[1, MAX_PER_PAGE]`.
    pub fn clamped(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamped() {
        assert_eq!(Pagination::clamped(0, 0), Pagination { page: 1, per_page: 1 });
        assert_eq!(
            Pagination::clamped(3, 500),
            Pagination {
                page: 3,
                per_page: 100
            }
        );
        assert_eq!(
            Pagination::clamped(1, 100),
            Pagination {
                page: 1,
                per_page: 100
            }
        );
        assert_eq!(Pagination::default().per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_issue_defaults_from_request() {
        let request = IssueRequest::new("Title", Some("Body".to_string()));
        let defaults = IssueDefaults::from_request("7", &request);
        assert_eq!(defaults.id, "7");
        assert_eq!(defaults.title, "Title");
        assert_eq!(defaults.description, Some("Body"));
        assert_eq!(defaults.state, STATE_OPEN);

        let closed = IssueDefaults::for_id("7").with_state(STATE_CLOSED);
        assert_eq!(closed.title, "");
        assert_eq!(closed.state, STATE_CLOSED);
    }

    #[test]
    fn test_issue_request_deserialize_minimal() {
        let request: IssueRequest = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        assert_eq!(request.title, "Only title");
        assert!(request.description.is_none());
        assert!(request.repository_owner.is_empty());
    }
}
