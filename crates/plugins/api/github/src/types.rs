//! GitHub API request types.
//!
//! Responses are read as untyped JSON and mapped field by field; only the
//! outbound payloads are typed.

use serde::Serialize;

/// Request body for creating an issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Request body for replacing an issue's title and body.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateIssueRequest {
    pub title: String,
    pub body: String,
}

/// Request body for changing an issue's state.
#[derive(Debug, Clone, Serialize)]
pub struct StateUpdateRequest {
    pub state: String,
}
