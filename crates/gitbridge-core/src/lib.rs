//! Core traits, types, and error handling for gitbridge.
//!
//! This crate provides the provider-agnostic issue model, the contract every
//! provider client implements, defensive JSON field extraction, and the
//! registry that resolves a provider client by name.

pub mod config;
pub mod error;
pub mod extract;
pub mod provider;
pub mod registry;
pub mod types;

pub use error::{Error, Result};
pub use extract::{parse_body, JsonFields};
pub use provider::IssueProvider;
pub use registry::{ProviderConstructor, ProviderRegistry};
pub use types::{
    Issue, IssueDefaults, IssueRequest, Pagination, DEFAULT_PER_PAGE, MAX_PER_PAGE, STATE_CLOSED,
    STATE_OPEN, UNKNOWN_AUTHOR,
};
