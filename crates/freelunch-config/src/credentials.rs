use std::collections::HashMap;
use std::path::Path;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::menu::ProviderKind;

/// Provider API keys, resolved from the process environment with an
/// optional env-file fallback
///
/// The process environment always wins over file values, and a key is only
/// looked up when its provider is actually invoked — a missing variable is
/// not an error at load time. Values are held as [`SecretString`] so they
/// never appear in Debug output or error messages.
#[derive(Debug, Default)]
pub struct Credentials {
    file_vars: HashMap<String, SecretString>,
}

impl Credentials {
    /// Credentials backed by the process environment only
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Load `KEY=value` lines from an env file as fallback values
    ///
    /// An absent file is not an error (the environment alone may hold every
    /// key). Blank lines and `#` comments are skipped; values may be
    /// wrapped in single or double quotes. Loading is idempotent: file
    /// values never shadow variables already set in the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "env file not found, using process environment only");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        let mut file_vars = HashMap::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::debug!(path = %path.display(), "skipping malformed env file line");
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            file_vars.insert(key.to_owned(), SecretString::from(unquote(value.trim())));
        }

        tracing::debug!(path = %path.display(), count = file_vars.len(), "loaded env file");

        Ok(Self { file_vars })
    }

    /// Resolve the API key for a provider
    ///
    /// The process environment takes precedence; the env file is only
    /// consulted when the variable is unset.
    pub fn resolve(&self, provider: ProviderKind) -> Option<SecretString> {
        let var = provider.credential_var();
        match std::env::var(var) {
            Ok(value) => Some(SecretString::from(value)),
            Err(_) => self.file_vars.get(var).cloned(),
        }
    }
}

/// Strip one pair of matching surrounding quotes, if present
fn unquote(value: &str) -> String {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value).to_owned()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::Credentials;
    use crate::menu::ProviderKind;

    fn write_env(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_value_used_when_env_unset() {
        let file = write_env("GROQ_API_KEY=gsk_from_file\n");
        let credentials = Credentials::load(file.path()).unwrap();

        temp_env::with_var_unset("GROQ_API_KEY", || {
            let key = credentials.resolve(ProviderKind::Groq).unwrap();
            assert_eq!(key.expose_secret(), "gsk_from_file");
        });
    }

    #[test]
    fn environment_takes_precedence_over_file() {
        let file = write_env("GROQ_API_KEY=x\n");
        let credentials = Credentials::load(file.path()).unwrap();

        temp_env::with_var("GROQ_API_KEY", Some("y"), || {
            let key = credentials.resolve(ProviderKind::Groq).unwrap();
            assert_eq!(key.expose_secret(), "y");
        });
    }

    #[test]
    fn missing_variable_resolves_to_none() {
        let credentials = Credentials::from_env();
        temp_env::with_var_unset("OPENROUTER_API_KEY", || {
            assert!(credentials.resolve(ProviderKind::OpenRouter).is_none());
        });
    }

    #[test]
    fn absent_file_is_not_an_error() {
        let credentials = Credentials::load(std::path::Path::new("/nonexistent/.env")).unwrap();
        temp_env::with_var("GOOGLE_API_KEY", Some("from-env"), || {
            let key = credentials.resolve(ProviderKind::Google).unwrap();
            assert_eq!(key.expose_secret(), "from-env");
        });
    }

    #[test]
    fn comments_quotes_and_blank_lines_handled() {
        let file = write_env("# free-tier keys\n\nGOOGLE_API_KEY=\"quoted value\"\nnot a kv line\n");
        let credentials = Credentials::load(file.path()).unwrap();

        temp_env::with_var_unset("GOOGLE_API_KEY", || {
            let key = credentials.resolve(ProviderKind::Google).unwrap();
            assert_eq!(key.expose_secret(), "quoted value");
        });
    }

    #[test]
    fn debug_output_never_contains_values() {
        let file = write_env("GROQ_API_KEY=super-secret\n");
        let credentials = Credentials::load(file.path()).unwrap();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret"));
    }
}
