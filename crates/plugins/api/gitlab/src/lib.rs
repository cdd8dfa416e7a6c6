//! GitLab provider implementation for gitbridge.
//!
//! This crate maps GitLab's REST API v4 issue endpoints onto the canonical
//! [`gitbridge_core::Issue`] model.

mod client;
mod types;

pub use client::{map_state, GitLabClient};
pub use types::*;

/// Default GitLab API URL.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Service type reported by [`GitLabClient`].
pub const SERVICE_TYPE: &str = "GitLab";
