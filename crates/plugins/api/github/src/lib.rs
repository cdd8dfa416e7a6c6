//! GitHub provider implementation for gitbridge.
//!
//! This crate maps GitHub's REST issue API onto the canonical
//! [`gitbridge_core::Issue`] model.

mod client;
mod types;

pub use client::GitHubClient;
pub use types::*;

/// Default GitHub API URL.
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

/// Service type reported by [`GitHubClient`].
pub const SERVICE_TYPE: &str = "GitHub";
