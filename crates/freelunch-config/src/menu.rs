use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::params::GenerationParams;

/// Default per-attempt timeout when a capability does not configure one
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Top-level menu configuration
///
/// Capability declaration order is preserved; within a capability, model
/// order is fallback priority.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    /// Capability definitions keyed by name
    #[serde(default)]
    pub capabilities: IndexMap<String, CapabilityConfig>,
    /// Optional per-provider overrides
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub providers: IndexMap<ProviderKind, ProviderSettings>,
}

/// Overrides for a single provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Base URL override (e.g. a proxy or a test double)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<url::Url>,
}

/// Configuration for a single named capability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityConfig {
    /// Integration style for this capability
    #[serde(rename = "type")]
    pub kind: CapabilityKind,
    /// Per-attempt timeout (e.g. "30s", "2m")
    #[serde(
        default = "default_timeout",
        deserialize_with = "deserialize_timeout",
        serialize_with = "serialize_timeout"
    )]
    pub timeout: Duration,
    /// Candidate models in fallback priority order
    pub models: Vec<ModelSpec>,
}

/// Supported capability integration styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Standard chat-completion capability
    Chat,
}

/// A single configured `provider::model` candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    /// Provider and provider-specific model identifier
    pub id: ModelId,
    /// Generation parameters applied to every call through this candidate
    #[serde(default, skip_serializing_if = "GenerationParams::is_empty")]
    pub params: GenerationParams,
}

/// A parsed `provider::model` identifier
///
/// The `::` separator splits the provider tag from the provider-specific
/// model id; the model half is kept verbatim (it may itself contain
/// slashes or colons, as OpenRouter ids do).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId {
    /// Hosting provider
    pub provider: ProviderKind,
    /// Provider-specific model identifier
    pub model: String,
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((provider, model)) = s.split_once("::") else {
            return Err(format!("invalid model id `{s}`: expected `provider::model`"));
        };
        if provider.is_empty() || model.is_empty() {
            return Err(format!("invalid model id `{s}`: expected `provider::model`"));
        }
        let provider = ProviderKind::from_str(provider)?;
        Ok(Self {
            provider,
            model: model.to_owned(),
        })
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.provider, self.model)
    }
}

impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Supported hosted inference providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq (OpenAI-compatible API)
    Groq,
    /// Google Generative Language API
    Google,
    /// OpenRouter (OpenAI-compatible API)
    OpenRouter,
}

impl ProviderKind {
    /// All supported providers
    pub const ALL: [Self; 3] = [Self::Groq, Self::Google, Self::OpenRouter];

    /// Fixed string tag used in `provider::model` identifiers
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Google => "google",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Environment variable holding this provider's API key
    pub const fn credential_var(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groq" => Ok(Self::Groq),
            "google" => Ok(Self::Google),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(format!(
                "unknown provider `{other}` (supported: groq, google, openrouter)"
            )),
        }
    }
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Parse a human-readable duration string (e.g. "30s", "2m")
fn deserialize_timeout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| D::Error::custom(format!("invalid timeout '{raw}': {e}")))
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_timeout<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{}ms", timeout.as_millis()))
}
