//! Declarative menu configuration for the freelunch router
//!
//! A menu file maps capability names to ordered lists of `provider::model`
//! candidates. Order is fallback priority: the router tries candidates
//! first to last. Credentials are resolved per provider from the process
//! environment, optionally backed by a local env file.

#![allow(clippy::must_use_candidate)]

mod credentials;
mod error;
mod loader;
mod menu;
mod params;

pub use credentials::Credentials;
pub use error::ConfigError;
pub use menu::{CapabilityConfig, CapabilityKind, MenuConfig, ModelId, ModelSpec, ProviderKind, ProviderSettings};
pub use params::GenerationParams;
