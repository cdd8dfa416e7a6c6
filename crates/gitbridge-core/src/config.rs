//! Configuration management for gitbridge.
//!
//! Handles loading and saving configuration from TOML files.
//! Config files are stored in platform-specific locations:
//!
//! - **macOS/Linux**: `~/.config/gitbridge/config.toml`
//! - **Windows**: `%APPDATA%\gitbridge\config.toml`
//!
//! # Example
//!
//! ```ignore
//! use gitbridge_core::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("gitlab.url", "https://gitlab.example.com")?;
//! config.save()?;
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "gitbridge";

// =============================================================================
// Configuration structures
// =============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubConfig>,

    /// GitLab configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab: Option<GitLabConfig>,

    /// HTTP transport settings
    #[serde(default, skip_serializing_if = "HttpConfig::is_default")]
    pub http: HttpConfig,
}

/// GitHub provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API base URL (for GitHub Enterprise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// GitLab provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabConfig {
    /// GitLab instance URL
    #[serde(default = "default_gitlab_url")]
    pub url: String,
    /// Personal access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: default_gitlab_url(),
            token: None,
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds; unset leaves the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    /// Request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn is_default(&self) -> bool {
        self == &Self::default()
    }
}

fn default_gitlab_url() -> String {
    "https://gitlab.com".to_string()
}

// =============================================================================
// Config implementation
// =============================================================================

impl Config {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        debug!(path = ?path, "Saving config");

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        info!(path = ?path, "Config saved successfully");
        Ok(())
    }

    /// Get a list of configured provider names.
    pub fn configured_providers(&self) -> Vec<&'static str> {
        let mut providers = Vec::new();
        if self.github.is_some() {
            providers.push("github");
        }
        if self.gitlab.is_some() {
            providers.push("gitlab");
        }
        providers
    }

    /// Set a configuration value by key path.
    ///
    /// Key format: `section.field` (e.g., `github.base_url`, `http.timeout_secs`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = split_key(key)?;

        match section {
            "github" => {
                let config = self.github.get_or_insert_with(GitHubConfig::default);
                match field {
                    "base_url" | "url" => config.base_url = Some(value.to_string()),
                    "token" => config.token = Some(value.to_string()),
                    _ => return Err(unknown_field("GitHub", field)),
                }
            }
            "gitlab" => {
                let config = self.gitlab.get_or_insert_with(GitLabConfig::default);
                match field {
                    "url" | "base_url" => config.url = value.to_string(),
                    "token" => config.token = Some(value.to_string()),
                    _ => return Err(unknown_field("GitLab", field)),
                }
            }
            "http" => match field {
                "timeout_secs" | "timeout" => {
                    let secs = value.parse::<u64>().map_err(|_| {
                        Error::Config(format!("Invalid timeout '{}': expected seconds", value))
                    })?;
                    self.http.timeout_secs = Some(secs);
                }
                _ => return Err(unknown_field("HTTP", field)),
            },
            _ => {
                return Err(Error::Config(format!("Unknown config section: {}", section)));
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path.
    ///
    /// Key format: `section.field` (e.g., `github.base_url`, `gitlab.url`)
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let (section, field) = split_key(key)?;

        match section {
            "github" => {
                let Some(config) = &self.github else {
                    return Ok(None);
                };
                match field {
                    "base_url" | "url" => Ok(config.base_url.clone()),
                    "token" => Ok(config.token.clone()),
                    _ => Err(unknown_field("GitHub", field)),
                }
            }
            "gitlab" => {
                let Some(config) = &self.gitlab else {
                    return Ok(None);
                };
                match field {
                    "url" | "base_url" => Ok(Some(config.url.clone())),
                    "token" => Ok(config.token.clone()),
                    _ => Err(unknown_field("GitLab", field)),
                }
            }
            "http" => match field {
                "timeout_secs" | "timeout" => Ok(self.http.timeout_secs.map(|s| s.to_string())),
                _ => Err(unknown_field("HTTP", field)),
            },
            _ => Err(Error::Config(format!("Unknown config section: {}", section))),
        }
    }
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    match key.split('.').collect::<Vec<_>>()[..] {
        [section, field] => Ok((section, field)),
        _ => Err(Error::Config(format!(
            "Invalid config key '{}'. Expected format: section.field",
            key
        ))),
    }
}

fn unknown_field(section: &str, field: &str) -> Error {
    Error::Config(format!("Unknown {} config field: {}", section, field))
}

// =============================================================================
// Tests
// =============================================================================
