//! Menu: lazily built, memoized capability chains

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use freelunch_config::{CapabilityConfig, CapabilityKind, Credentials, MenuConfig};

use crate::chain::{CapabilityChain, ModelEntry};
use crate::error::RouterError;
use crate::provider;

/// Turns a declarative menu into callable capability chains
///
/// The configuration is loaded once and immutable thereafter. Chains are
/// built on first access and cached for the Menu's lifetime: one chain
/// instance per capability name, shared across calls.
pub struct Menu {
    config: MenuConfig,
    credentials: Credentials,
    chains: DashMap<String, Arc<CapabilityChain>>,
}

impl Menu {
    /// Load a menu file, resolving credentials from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] if the menu file is missing,
    /// malformed, or invalid.
    pub fn load(config_path: &Path) -> Result<Self, RouterError> {
        let config = MenuConfig::load(config_path)?;
        Ok(Self::from_parts(config, Credentials::from_env()))
    }

    /// Load a menu file plus an env file with credential fallbacks
    ///
    /// An absent env file is tolerated; variables already set in the
    /// process environment always win over file values.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] if either file is unreadable or the
    /// menu is invalid.
    pub fn load_with_env(config_path: &Path, env_path: &Path) -> Result<Self, RouterError> {
        let credentials = Credentials::load(env_path)?;
        let config = MenuConfig::load(config_path)?;
        Ok(Self::from_parts(config, credentials))
    }

    /// Build a menu from an already-loaded configuration
    pub fn from_config(config: MenuConfig) -> Self {
        Self::from_parts(config, Credentials::from_env())
    }

    /// Build a menu from a configuration and explicit credentials
    pub fn with_credentials(config: MenuConfig, credentials: Credentials) -> Self {
        Self::from_parts(config, credentials)
    }

    fn from_parts(config: MenuConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            chains: DashMap::new(),
        }
    }

    /// Configured capability names in declaration order
    pub fn capabilities(&self) -> impl Iterator<Item = &str> {
        self.config.capabilities.keys().map(String::as_str)
    }

    /// Get the chain for a named capability, building it on first access
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownCapability`] if the name is not in
    /// the menu.
    pub fn capability(&self, name: &str) -> Result<Arc<CapabilityChain>, RouterError> {
        if let Some(chain) = self.chains.get(name) {
            return Ok(Arc::clone(&chain));
        }

        let Some(capability) = self.config.capabilities.get(name) else {
            return Err(RouterError::UnknownCapability { name: name.to_owned() });
        };

        let chain = self
            .chains
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(self.build_chain(name, capability)))
            .clone();

        Ok(chain)
    }

    fn build_chain(&self, name: &str, capability: &CapabilityConfig) -> CapabilityChain {
        // Only one integration style exists today
        match capability.kind {
            CapabilityKind::Chat => {}
        }

        let entries = capability
            .models
            .iter()
            .map(|spec| {
                let settings = self.config.providers.get(&spec.id.provider);
                let adapter = provider::build(spec, settings, &self.credentials);
                ModelEntry::new(spec.id.clone(), spec.params.clone(), adapter)
            })
            .collect();

        tracing::debug!(capability = name, models = capability.models.len(), "built capability chain");

        CapabilityChain::new(name.to_owned(), capability.timeout, entries)
    }
}
