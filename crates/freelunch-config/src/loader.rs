use std::path::Path;

use crate::error::ConfigError;
use crate::menu::MenuConfig;

impl MenuConfig {
    /// Load a menu from a TOML file
    ///
    /// Reads the file, deserializes it, then validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid
    /// TOML, contains a malformed `provider::model` id or unknown
    /// capability type, or fails semantic validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source: Box::new(source),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the menu is internally consistent
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any capability has an empty
    /// model list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, capability) in &self.capabilities {
            if capability.models.is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("capability `{name}` has no models configured"),
                });
            }
        }
        Ok(())
    }
}
