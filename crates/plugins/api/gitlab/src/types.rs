//! GitLab API request types.
//!
//! These are the outbound payloads for GitLab REST API v4. Responses are
//! read as untyped JSON and mapped field by field.

use serde::Serialize;

/// Request body for creating an issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for replacing an issue's title and description.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateIssueRequest {
    pub title: String,
    pub description: String,
}

/// Request body for a state transition.
///
/// GitLab drives issue state through events (`close`, `reopen`) rather than
/// by assigning the state itself.
#[derive(Debug, Clone, Serialize)]
pub struct StateEventRequest {
    pub state_event: String,
}
