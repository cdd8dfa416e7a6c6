//! Name-keyed registry of provider constructors.
//!
//! Built once at startup with [`ProviderRegistry::register`], then shared
//! (typically behind an `Arc`) and read through [`ProviderRegistry::resolve`].
//! Registration needs `&mut self`, so it cannot race with resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::IssueProvider;

/// Builds a fresh provider client.
pub type ProviderConstructor = Box<dyn Fn() -> Result<Box<dyn IssueProvider>> + Send + Sync>;

/// Maps case-insensitive provider names to client constructors.
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: HashMap<String, ProviderConstructor>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, constructor: F) -> Result<()>
    where
        F: Fn() -> Result<Box<dyn IssueProvider>> + Send + Sync + 'static,
    {
        let key = normalize(name)?;
        debug!(provider = %key, "Registering provider");
        self.constructors.insert(key, Box::new(constructor));
        Ok(())
    }

    /// Construct the client registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn IssueProvider>> {
        let key = normalize(name)?;
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| Error::UnsupportedProvider(name.to_string()))?;
        constructor()
    }

    /// Check whether a provider is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        normalize(name).is_ok_and(|key| self.constructors.contains_key(&key))
    }

    /// Registered provider names, lower-cased and sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

fn normalize(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument(
            "provider name must not be empty".to_string(),
        ));
    }
    Ok(name.to_lowercase())
}
