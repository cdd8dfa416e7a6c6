//! GitHub API client implementation.

use async_trait::async_trait;
use gitbridge_core::provider::{require_repository, require_segment};
use gitbridge_core::{
    parse_body, Error, Issue, IssueDefaults, IssueProvider, IssueRequest, JsonFields, Pagination,
    Result, STATE_CLOSED, UNKNOWN_AUTHOR,
};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{CreateIssueRequest, StateUpdateRequest, UpdateIssueRequest};
use crate::{DEFAULT_GITHUB_URL, SERVICE_TYPE};

/// GitHub REST API version pinned in every request.
const API_VERSION: &str = "2022-11-28";

/// User agent sent with every request; GitHub rejects requests without one.
const USER_AGENT: &str = concat!("gitbridge/", env!("CARGO_PKG_VERSION"));

/// GitHub API client.
pub struct GitHubClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_GITHUB_URL, token)
    }

    /// Create a new GitHub client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_http_client(base_url, token, client))
    }

    /// Create a new GitHub client on a caller-configured transport
    /// (timeouts, proxies, connection pooling).
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
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    /// Get the API URL for the given path segments. Each segment is
    /// percent-encoded on its own, so caller input cannot add path levels.
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::InvalidArgument(format!("Invalid GitHub URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                Error::InvalidArgument(format!("Invalid GitHub URL '{}'", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn issues_url(&self, owner: &str, repo: &str) -> Result<Url> {
        require_segment("repository owner", owner)?;
        require_segment("repository name", repo)?;
        self.api_url(&["repos", owner, repo, "issues"])
    }

    fn issue_url(&self, owner: &str, repo: &str, issue_id: &str) -> Result<Url> {
        require_segment("repository owner", owner)?;
        require_segment("repository name", repo)?;
        require_segment("issue id", issue_id)?;
        self.api_url(&["repos", owner, repo, "issues", issue_id])
    }

    /// Make an authenticated GET request.
    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<Value> {
        debug!(url = %url, "GitHub GET request");

        let response = self
            .request(reqwest::Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request.
    async fn post<B: serde::Serialize>(&self, url: Url, body: &B) -> Result<Value> {
        debug!(url = %url, "GitHub POST request");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Make an authenticated PATCH request.
    async fn patch<B: serde::Serialize>(&self, url: Url, body: &B) -> Result<Value> {
        debug!(url = %url, "GitHub PATCH request");

        let response = self
            .request(reqwest::Method::PATCH, url)
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
                "GitHub API error response"
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
// Mapping functions: GitHub JSON -> Unified types
// =============================================================================

fn map_issue(raw: &Value, owner: &str, repo: &str, defaults: IssueDefaults<'_>) -> Issue {
    Issue {
        id: raw.string_or("number", defaults.id),
        title: raw.string_or("title", defaults.title),
        description: raw
            .optional_string("body")
            .or_else(|| defaults.description.map(str::to_string)),
        state: raw.string_or("state", defaults.state),
        repository_owner: owner.to_string(),
        repository_name: repo.to_string(),
        service_type: SERVICE_TYPE.to_string(),
        created_by: raw.nested_string_or(&["user", "login"], UNKNOWN_AUTHOR),
        created_at: raw.datetime_or("created_at", None),
        updated_at: raw.datetime_or("updated_at", None),
        closed_at: raw.datetime_or("closed_at", None),
    }
}

/// A `/user` response identifies a user by a non-empty `login`.
fn is_authenticated_user(raw: &Value) -> bool {
    raw.optional_string("login")
        .is_some_and(|login| !login.is_empty())
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
impl IssueProvider for GitHubClient {
    fn service_type(&self) -> &'static str {
        SERVICE_TYPE
    }

    async fn get_issue(&self, owner: &str, repo: &str, issue_id: &str) -> Result<Issue> {
        require_repository(owner, repo)?;

        let raw = self.get(self.issue_url(owner, repo, issue_id)?, &[]).await?;
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
        ];

        let raw = self.get(self.issues_url(owner, repo)?, &query).await?;
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
            body: request.description.clone(),
        };

        let raw = self.post(self.issues_url(owner, repo)?, &body).await?;
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

        let body = UpdateIssueRequest {
            title: request.title.clone(),
            body: request.description.clone().unwrap_or_default(),
        };

        let raw = self
            .patch(self.issue_url(owner, repo, issue_id)?, &body)
            .await?;
        Ok(map_issue(
            &raw,
            owner,
            repo,
            IssueDefaults::from_request(issue_id, request),
        ))
    }

    async fn close_issue(&self, owner: &str, repo: &str, issue_id: &str) -> Result<Issue> {
        require_repository(owner, repo)?;

        let body = StateUpdateRequest {
            state: STATE_CLOSED.to_string(),
        };

        let raw = self
            .patch(self.issue_url(owner, repo, issue_id)?, &body)
            .await?;
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
                debug!(error = %e, "GitHub credential check failed");
                return false;
            }
        };
        debug!(url = %url, "GitHub credential check");

        let response = match self.request(reqwest::Method::GET, url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "GitHub credential check failed");
                return false;
            }
        };

        if !response.status().is_success() {
            debug!(
                status = response.status().as_u16(),
                "GitHub rejected credentials"
            );
            return false;
        }

        match response.text().await {
            Ok(body) => {
                let valid = is_authenticated_user(&parse_body(&body));
                if !valid {
                    debug!("GitHub credential check returned no user identity");
                }
                valid
            }
            Err(e) => {
                debug!(error = %e, "GitHub credential check failed");
                false
            }
        }
    }
}
