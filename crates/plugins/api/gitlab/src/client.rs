//! GitLab API client implementation.

use async_trait::async_trait;
use gitbridge_core::provider::{require_repository, require_segment};
use gitbridge_core::{
    parse_body, Error, Issue, IssueDefaults, IssueProvider, IssueRequest, JsonFields, Pagination,
    Result, STATE_CLOSED, STATE_OPEN, UNKNOWN_AUTHOR,
};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{CreateIssueRequest, StateEventRequest, UpdateIssueRequest};
use crate::{DEFAULT_GITLAB_URL, SERVICE_TYPE};

/// GitLab's name for the open state.
const GITLAB_STATE_OPENED: &str = "opened";

/// GitLab API client.
pub struct GitLabClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl GitLabClient {
    /// Create a new GitLab client.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_GITLAB_URL, token)
    }

    /// Create a new GitLab client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_http_client(base_url, token, client))
    }

    /// Create a new GitLab client on a caller-configured transport.
    pub fn with_http_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Build request with common headers.
    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if self.token.is_empty() {
            builder
        } else {
            builder.header("PRIVATE-TOKEN", &self.token)
        }
    }

    /// Get the API URL for the given path segments (non-project-scoped).
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::InvalidArgument(format!("Invalid GitLab URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                Error::InvalidArgument(format!("Invalid GitLab URL '{}'", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "v4"])
            .extend(segments);

        Ok(url)
    }

    /// Get the project-scoped API URL. `owner/repo` travels as a single,
    /// percent-encoded path segment (`owner%2Frepo`).
    fn project_url(&self, owner: &str, repo: &str, segments: &[&str]) -> Result<Url> {
        let project_id = format!("{}/{}", owner, repo);
        let mut path = vec!["projects", project_id.as_str()];
        path.extend_from_slice(segments);
        self.api_url(&path)
    }

    /// Make an authenticated GET request.
    async fn get(&self, mut url: Url, query: &[(&str, String)]) -> Result<Value> {
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        debug!(url = %url, "GitLab GET request");

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request.
    async fn post<B: serde::Serialize>(&self, url: Url, body: &B) -> Result<Value> {
        debug!(url = %url, "GitLab POST request");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Make an authenticated PUT request.
    async fn put<B: serde::Serialize>(&self, url: Url, body: &B) -> Result<Value> {
        debug!(url = %url, "GitLab PUT request");

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Handle response and map errors.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "GitLab API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;
        Ok(parse_body(&body))
    }
}

// =============================================================================
// Mapping functions: GitLab JSON -> Unified types
// =============================================================================

/// Translate a GitLab issue state into the canonical vocabulary.
///
/// `opened` becomes `open`, `closed` stays `closed`, anything else passes
/// through unchanged.
pub fn map_state(state: &str) -> String {
    if state.eq_ignore_ascii_case(GITLAB_STATE_OPENED) {
        STATE_OPEN.to_string()
    } else if state.eq_ignore_ascii_case(STATE_CLOSED) {
        STATE_CLOSED.to_string()
    } else {
        state.to_string()
    }
}

/// Author display name: `author.name`, then `author.username`.
fn map_author(raw: &Value) -> String {
    raw.nested_string(&["author", "name"])
        .or_else(|| raw.nested_string(&["author", "username"]))
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

fn map_issue(raw: &Value, owner: &str, repo: &str, defaults: IssueDefaults<'_>) -> Issue {
    Issue {
        id: raw.string_or("iid", defaults.id),
        title: raw.string_or("title", defaults.title),
        description: raw
            .optional_string("description")
            .or_else(|| defaults.description.map(str::to_string)),
        state: map_state(&raw.string_or("state", defaults.state)),
        repository_owner: owner.to_string(),
        repository_name: repo.to_string(),
        service_type: SERVICE_TYPE.to_string(),
        created_by: map_author(raw),
        created_at: raw.datetime_or("created_at", None),
        updated_at: raw.datetime_or("updated_at", None),
        closed_at: raw.datetime_or("closed_at", None),
    }
}

/// A `/user` response identifies a user by `id` or a non-empty `username`.
fn is_authenticated_user(raw: &Value) -> bool {
    raw.field("id").is_some()
        || raw
            .optional_string("username")
            .is_some_and(|username| !username.is_empty())
}

fn map_issues(raw: &Value, owner: &str, repo: &str) -> Vec<Issue> {
    raw.as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| map_issue(item, owner, repo, IssueDefaults::default()))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Trait implementation
// =============================================================================

#[async_trait]
impl IssueProvider for GitLabClient {
    fn service_type(&self) -> &'static str {
        SERVICE_TYPE
    }

    async fn get_issue(&self, owner: &str, repo: &str, issue_id: &str) -> Result<Issue> {
        require_repository(owner, repo)?;
        require_segment("issue id", issue_id)?;

        let url = self.project_url(owner, repo, &["issues", issue_id])?;
        let raw = self.get(url, &[]).await?;
        if raw.is_null() {
            return Err(Error::NotFound(format!(
                "issue {} in {}/{}",
                issue_id, owner, repo
            )));
        }
        Ok(map_issue(&raw, owner, repo, IssueDefaults::for_id(issue_id)))
    }

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Issue>> {
        require_repository(owner, repo)?;

        let pagination = Pagination::clamped(page, per_page);
        let query = [
            ("page", pagination.page.to_string()),
            ("per_page", pagination.per_page.to_string()),
            ("state", GITLAB_STATE_OPENED.to_string()),
        ];

        let url = self.project_url(owner, repo, &["issues"])?;
        let raw = self.get(url, &query).await?;
        Ok(map_issues(&raw, owner, repo))
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        request: &IssueRequest,
    ) -> Result<Issue> {
        require_repository(owner, repo)?;

        let body = CreateIssueRequest {
            title: request.title.clone(),
            description: request.description.clone(),
        };

        let url = self.project_url(owner, repo, &["issues"])?;
        let raw = self.post(url, &body).await?;
        Ok(map_issue(
            &raw,
            owner,
            repo,
            IssueDefaults::from_request("", request),
        ))
    }

    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        issue_id: &str,
        request: &IssueRequest,
    ) -> Result<Issue> {
        require_repository(owner, repo)?;
        require_segment("issue id", issue_id)?;

        let body = UpdateIssueRequest {
            title: request.title.clone(),
            description: request.description.clone().unwrap_or_default(),
        };

        let url = self.project_url(owner, repo, &["issues", issue_id])?;
        let raw = self.put(url, &body).await?;
        Ok(map_issue(
            &raw,
            owner,
            repo,
            IssueDefaults::from_request(issue_id, request),
        ))
    }

    async fn close_issue(&self, owner: &str, repo: &str, issue_id: &str) -> Result<Issue> {
        require_repository(owner, repo)?;
        require_segment("issue id", issue_id)?;

        let body = StateEventRequest {
            state_event: "close".to_string(),
        };

        let url = self.project_url(owner, repo, &["issues", issue_id])?;
        let raw = self.put(url, &body).await?;
        Ok(map_issue(
            &raw,
            owner,
            repo,
            IssueDefaults::for_id(issue_id).with_state(STATE_CLOSED),
        ))
    }

    async fn validate_credentials(&self) -> bool {
        let url = match self.api_url(&["user"]) {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e, "GitLab credential check failed");
                return false;
            }
        };
        debug!(url = %url, "GitLab credential check");

        let response = match self.request(reqwest::Method::GET, url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "GitLab credential check failed");
                return false;
            }
        };

        if !response.status().is_success() {
            debug!(
                status = response.status().as_u16(),
                "GitLab rejected credentials"
            );
            return false;
        }

        match response.text().await {
            Ok(body) => {
                let valid = is_authenticated_user(&parse_body(&body));
                if !valid {
                    debug!("GitLab credential check returned no user identity");
                }
                valid
            }
            Err(e) => {
                debug!(error = %e, "GitLab credential check failed");
                false
            }
        }
    }
}
