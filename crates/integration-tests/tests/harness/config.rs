//! Menu configuration builder for integration tests

use std::io::Write;
use std::time::Duration;

use freelunch_config::{
    CapabilityConfig, CapabilityKind, Credentials, MenuConfig, ModelSpec, ProviderKind, ProviderSettings,
};
use freelunch_router::Menu;
use indexmap::IndexMap;

/// Builds a one-capability menu pointed at mock providers
pub struct ConfigBuilder {
    capability: String,
    timeout: Duration,
    models: Vec<ModelSpec>,
    providers: IndexMap<ProviderKind, ProviderSettings>,
}

impl ConfigBuilder {
    pub fn new(capability: &str) -> Self {
        Self {
            capability: capability.to_owned(),
            timeout: Duration::from_secs(30),
            models: Vec::new(),
            providers: IndexMap::new(),
        }
    }

    /// Add a model candidate (e.g. `"groq::mock-model-1"`)
    #[must_use]
    pub fn with_model(mut self, id: &str) -> Self {
        self.models.push(ModelSpec {
            id: id.parse().unwrap(),
            params: freelunch_config::GenerationParams::default(),
        });
        self
    }

    /// Point a provider at a mock base URL
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderKind, base_url: &str) -> Self {
        self.providers.insert(
            provider,
            ProviderSettings {
                base_url: Some(base_url.parse().unwrap()),
            },
        );
        self
    }

    /// Override the per-attempt timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> MenuConfig {
        let mut capabilities = IndexMap::new();
        capabilities.insert(
            self.capability,
            CapabilityConfig {
                kind: CapabilityKind::Chat,
                timeout: self.timeout,
                models: self.models,
            },
        );

        MenuConfig {
            capabilities,
            providers: self.providers,
        }
    }

    /// Build a [`Menu`] with dummy keys for every provider
    pub fn build_menu(self) -> Menu {
        Menu::with_credentials(self.build(), test_credentials())
    }
}

/// Credentials with a dummy key for each supported provider
pub fn test_credentials() -> Credentials {
    credentials_for(&ProviderKind::ALL)
}

/// Credentials with dummy keys for the given providers only
pub fn credentials_for(providers: &[ProviderKind]) -> Credentials {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for provider in providers {
        writeln!(file, "{}=test-key", provider.credential_var()).unwrap();
    }
    Credentials::load(file.path()).unwrap()
}
