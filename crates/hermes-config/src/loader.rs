//! Layered configuration loading.
//!
//! Later layers override earlier ones:
//! 1. Defaults (or a preset)
//! 2. A TOML or JSON file, chosen by extension
//! 3. Environment variables named `PREFIX_SECTION_FIELD`

use std::env;
use std::fs;
use std::path::Path;

use hermes_telemetry::LogFormat;

use crate::{ConfigError, ConfigResult, HermesConfig};

/// Builds a [`HermesConfig`] from layered sources.
///
/// # Example
///
/// ```no_run
/// use hermes_config::ConfigLoader;
///
/// # fn main() -> Result<(), hermes_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("hermes.toml")?
///     .with_dotenv()
///     .with_env_prefix("HERMES")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: HermesConfig,
    env_prefix: Option<String>,
    file_loaded: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader seeded with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HermesConfig::default(),
            env_prefix: None,
            file_loaded: false,
        }
    }

    /// Resets to default values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = HermesConfig::default();
        self
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = HermesConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = HermesConfig::production();
        self
    }

    /// Loads a `.toml` or `.json` file.
    ///
    /// Sections present in the file replace the current ones; sections the
    /// file omits are reset to their defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or unreadable, has an unknown extension,
    /// or does not parse (including unknown keys).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        self.config = parse(&content, format)?;
        self.file_loaded = true;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file) but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration text in the given format (`toml` or `json`).
    ///
    /// ```
    /// use hermes_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[server]\nhttp_addr = \"127.0.0.1:3000\"\n", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> ConfigResult<Self> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Enables overrides from `PREFIX_SECTION_FIELD` variables.
    ///
    /// With prefix `HERMES`, `HERMES_SERVER_HTTP_ADDR=127.0.0.1:9000` sets
    /// `server.http_addr`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file into the process environment, if one exists.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Whether a file layer was applied.
    #[must_use]
    pub fn file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Fails if an override does not parse or the result is invalid.
    pub fn load(mut self) -> ConfigResult<HermesConfig> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> HermesConfig {
        self.config
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> ConfigResult<()> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(key, _)| key.starts_with(prefix))
            .collect();
        vars.sort();
        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> ConfigResult<()> {
        let Some(field) = key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
        else {
            return Ok(());
        };

        match field {
            "SERVER_HTTP_ADDR" => {
                self.config.server.http_addr = value.to_string();
            }
            "SERVER_SHUTDOWN_TIMEOUT_SECS" => {
                self.config.server.shutdown_timeout_secs = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            "SERVER_REQUEST_TIMEOUT_SECS" => {
                self.config.server.request_timeout_secs = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            "SERVER_TRUST_REQUEST_ID" => {
                self.config.server.trust_request_id = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            "LOGGING_LEVEL" => {
                self.config.logging.level = value.to_string();
            }
            "LOGGING_FORMAT" => {
                self.config.logging.format = value.parse::<LogFormat>().map_err(|_| {
                    ConfigError::env_parse_error(key, "expected 'json', 'pretty' or 'compact'")
                })?;
            }
            "DOCS_ENABLED" => {
                self.config.docs.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            // Unrelated variables sharing the prefix.
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> ConfigResult<HermesConfig> {
    match format.to_ascii_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, HermesConfig::default());
    }

    #[test]
    fn test_loader_presets() {
        let dev = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(dev.logging.level, "debug");

        let prod = ConfigLoader::new().with_production().with_defaults().load_unvalidated();
        assert!(!prod.server.trust_request_id);
    }

    #[test]
    fn test_with_string_json() {
        let config = ConfigLoader::new()
            .with_string(r#"{"docs": {"enabled": false}}"#, "json")
            .unwrap()
            .load()
            .unwrap();
        assert!(!config.docs.enabled);
    }

    #[test]
    fn test_with_string_unknown_format() {
        let err = ConfigLoader::new().with_string("", "yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref f) if f == "yaml"));
    }

    #[test]
    fn test_with_file_not_found() {
        let err = ConfigLoader::new()
            .with_file("/nonexistent/hermes.toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_with_optional_file_not_found() {
        let loader = ConfigLoader::new()
            .with_optional_file("/nonexistent/hermes.toml")
            .unwrap();
        assert!(!loader.file_loaded());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Overrides are applied through `apply_env_var` directly; mutating the
    // process environment would race with other tests.

    #[test]
    fn test_apply_env_var_server() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST_SERVER_HTTP_ADDR", "127.0.0.1:9000", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST_SERVER_TRUST_REQUEST_ID", "yes", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST_SERVER_REQUEST_TIMEOUT_SECS", "5", "TEST")
            .unwrap();
        assert_eq!(loader.config.server.http_addr, "127.0.0.1:9000");
        assert!(loader.config.server.trust_request_id);
        assert_eq!(loader.config.server.request_timeout_secs, 5);
    }

    #[test]
    fn test_apply_env_var_logging_and_docs() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST_LOGGING_LEVEL", "warn", "TEST").unwrap();
        loader.apply_env_var("TEST_LOGGING_FORMAT", "Compact", "TEST").unwrap();
        loader.apply_env_var("TEST_DOCS_ENABLED", "off", "TEST").unwrap();
        assert_eq!(loader.config.logging.level, "warn");
        assert_eq!(loader.config.logging.format, LogFormat::Compact);
        assert!(!loader.config.docs.enabled);
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        let err = loader
            .apply_env_var("TEST_SERVER_SHUTDOWN_TIMEOUT_SECS", "soon", "TEST")
            .unwrap_err();
        assert!(err.to_string().contains("TEST_SERVER_SHUTDOWN_TIMEOUT_SECS"));
        assert!(loader
            .apply_env_var("TEST_LOGGING_FORMAT", "xml", "TEST")
            .is_err());
        assert!(loader
            .apply_env_var("TEST_DOCS_ENABLED", "maybe", "TEST")
            .is_err());
    }

    #[test]
    fn test_apply_env_var_ignores_unrelated() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST_HOME", "/root", "TEST").unwrap();
        loader.apply_env_var("TESTING_SERVER_HTTP_ADDR", "x", "TEST").unwrap();
        assert_eq!(loader.config, HermesConfig::default());
    }
}
