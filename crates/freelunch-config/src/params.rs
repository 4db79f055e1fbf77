use serde::{Deserialize, Serialize};

/// Generation parameters for a chat-completion call
///
/// Well-known parameters get typed fields; anything else is carried
/// through untyped in `extra` and handed to the provider verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Random seed for deterministic generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Reasoning effort hint for reasoning-capable models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
    /// Additional provider-specific parameters, passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GenerationParams {
    /// Whether every field is unset
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge call-time overrides over these configured parameters
    ///
    /// Overrides win per key; unset override fields keep the configured
    /// value. `extra` maps are merged key-wise the same way.
    pub fn merged_with(&self, overrides: &Self) -> Self {
        let mut extra = self.extra.clone();
        for (key, value) in &overrides.extra {
            extra.insert(key.clone(), value.clone());
        }

        Self {
            temperature: overrides.temperature.or(self.temperature),
            top_p: overrides.top_p.or(self.top_p),
            max_tokens: overrides.max_tokens.or(self.max_tokens),
            stop: overrides.stop.clone().or_else(|| self.stop.clone()),
            seed: overrides.seed.or(self.seed),
            reasoning_effort: overrides
                .reasoning_effort
                .clone()
                .or_else(|| self.reasoning_effort.clone()),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationParams;

    #[test]
    fn call_time_overrides_win() {
        let configured = GenerationParams {
            temperature: Some(0.2),
            max_tokens: Some(1024),
            ..GenerationParams::default()
        };
        let overrides = GenerationParams {
            temperature: Some(0.9),
            ..GenerationParams::default()
        };

        let merged = configured.merged_with(&overrides);
        assert_eq!(merged.temperature, Some(0.9));
        assert_eq!(merged.max_tokens, Some(1024));
    }

    #[test]
    fn extra_keys_merge_with_override_precedence() {
        let mut configured = GenerationParams::default();
        configured
            .extra
            .insert("top_k".to_owned(), serde_json::json!(40));
        configured
            .extra
            .insert("repeat_penalty".to_owned(), serde_json::json!(1.1));

        let mut overrides = GenerationParams::default();
        overrides
            .extra
            .insert("top_k".to_owned(), serde_json::json!(10));

        let merged = configured.merged_with(&overrides);
        assert_eq!(merged.extra["top_k"], serde_json::json!(10));
        assert_eq!(merged.extra["repeat_penalty"], serde_json::json!(1.1));
    }

    #[test]
    fn unknown_toml_keys_land_in_extra() {
        let params: GenerationParams =
            toml::from_str("temperature = 0.5\nmin_p = 0.05").unwrap();
        assert_eq!(params.temperature, Some(0.5));
        assert_eq!(params.extra["min_p"], serde_json::json!(0.05));
    }
}
