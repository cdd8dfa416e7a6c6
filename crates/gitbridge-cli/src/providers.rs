//! Built-in provider wiring.
//!
//! Registers the GitHub and GitLab clients with a [`ProviderRegistry`],
//! resolving base URLs, tokens, and transport settings from [`Config`] and
//! the environment.

use gitbridge_core::config::Config;
use gitbridge_core::{Error, IssueProvider, ProviderRegistry, Result};
use gitbridge_github::{GitHubClient, DEFAULT_GITHUB_URL};
use gitbridge_gitlab::GitLabClient;
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable holding the GitLab token.
pub const GITLAB_TOKEN_VAR: &str = "GITLAB_TOKEN";

/// Build a registry holding every built-in provider.
pub fn build_registry(config: &Config) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    let timeout = config.http.timeout();

    let github = config.github.clone().unwrap_or_default();
    let github_url = github
        .base_url
        .unwrap_or_else(|| DEFAULT_GITHUB_URL.to_string());
    let github_token = resolve_token(GITHUB_TOKEN_VAR, github.token.as_deref());
    registry.register("github", move || {
        let client = http_client(timeout)?;
        Ok(Box::new(GitHubClient::with_http_client(
            github_url.as_str(),
            github_token.as_str(),
            client,
        )) as Box<dyn IssueProvider>)
    })?;

    let gitlab = config.gitlab.clone().unwrap_or_default();
    let gitlab_url = gitlab.url;
    let gitlab_token = resolve_token(GITLAB_TOKEN_VAR, gitlab.token.as_deref());
    registry.register("gitlab", move || {
        let client = http_client(timeout)?;
        Ok(Box::new(GitLabClient::with_http_client(
            gitlab_url.as_str(),
            gitlab_token.as_str(),
            client,
        )) as Box<dyn IssueProvider>)
    })?;

    debug!(providers = ?registry.names(), "Provider registry ready");
    Ok(registry)
}

/// Token from `env_var` if set and non-empty, else the configured one, else
/// empty (anonymous requests).
pub fn resolve_token(env_var: &str, configured: Option<&str>) -> String {
    std::env::var(env_var)
        .ok()
        .filter(|token| !token.is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_default()
}

fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| Error::transport(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitbridge_core::config::GitLabConfig;

    #[test]
    fn test_builtin_providers_resolve_in_any_case() {
        let registry = build_registry(&Config::default()).unwrap();

        for (name, service_type) in [
            ("github", "GitHub"),
            ("GitHub", "GitHub"),
            ("GITHUB", "GitHub"),
            ("gitlab", "GitLab"),
            ("GitLab", "GitLab"),
            ("GITLAB", "GitLab"),
        ] {
            let provider = registry.resolve(name).unwrap();
            assert_eq!(provider.service_type(), service_type);
        }
        assert_eq!(registry.names(), vec!["github", "gitlab"]);
    }

    #[test]
    fn test_unknown_and_empty_names() {
        let registry = build_registry(&Config::default()).unwrap();

        assert!(matches!(
            registry.resolve("unknown").err().unwrap(),
            Error::UnsupportedProvider(_)
        ));
        assert!(matches!(
            registry.resolve("").err().unwrap(),
            Error::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_configured_gitlab_resolves() {
        let config = Config {
            gitlab: Some(GitLabConfig {
                url: "https://gitlab.example.com".to_string(),
                token: Some("configured".to_string()),
            }),
            ..Default::default()
        };
        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.resolve("gitlab").unwrap().service_type(), "GitLab");
    }

    #[test]
    fn test_resolve_token_precedence() {
        let var = "GITBRIDGE_TEST_TOKEN_PRECEDENCE";

        std::env::remove_var(var);
        assert_eq!(resolve_token(var, Some("from-config")), "from-config");
        assert_eq!(resolve_token(var, None), "");

        std::env::set_var(var, "from-env");
        assert_eq!(resolve_token(var, Some("from-config")), "from-env");

        std::env::set_var(var, "");
        assert_eq!(resolve_token(var, Some("from-config")), "from-config");
        std::env::remove_var(var);
    }

    #[test]
    fn test_http_client_with_timeout() {
        assert!(http_client(Some(Duration::from_secs(5))).is_ok());
        assert!(http_client(None).is_ok());
    }
}
