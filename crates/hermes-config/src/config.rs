//! Configuration types.
//!
//! [`HermesConfig`] is the root of the tree. Every section has defaults, so an
//! empty file is a valid configuration; unknown keys are rejected.

use hermes_telemetry::{create_env_filter, LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::{ConfigError, ConfigResult};

/// Complete Hermes server configuration.
///
/// # Example
///
/// ```
/// use hermes_config::HermesConfig;
///
/// let config = HermesConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.docs.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    /// Listener and request handling.
    #[serde(default)]
    pub server: ServerSettings,

    /// Structured logging.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Documentation routes.
    #[serde(default)]
    pub docs: DocsSettings,
}

impl HermesConfig {
    /// Checks values that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the listen address is not a
    /// socket address, a timeout is zero, or the log level is not a valid
    /// filter directive.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.socket_addr()?;

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }
        if let Err(e) = create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Preset for local development: pretty debug logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingSettings {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
            },
            ..Self::default()
        }
    }

    /// Preset for production: JSON logs at `info`, client request ids trusted.
    #[must_use]
    pub fn production() -> Self {
        Self {
            server: ServerSettings {
                trust_request_id: true,
                ..ServerSettings::default()
            },
            ..Self::default()
        }
    }

    /// Builds the logging bootstrap configuration from the `logging` section.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let base = match self.logging.format {
            LogFormat::Pretty => LogConfig::development(),
            LogFormat::Json | LogFormat::Compact => LogConfig::production(),
        };
        LogConfig {
            level: self.logging.level.clone(),
            format: self.logging.format,
            ..base
        }
    }
}

/// Listener and request handling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct ServerSettings {
    /// Address to bind, e.g. `0.0.0.0:8080`.
    pub http_addr: String,

    /// Seconds to wait for in-flight connections on shutdown.
    pub shutdown_timeout_secs: u64,

    /// Seconds allowed for reading a request body.
    pub request_timeout_secs: u64,

    /// Use a valid incoming `x-request-id` as the correlation id.
    pub trust_request_id: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            shutdown_timeout_secs: 30,
            request_timeout_secs: 30,
            trust_request_id: false,
        }
    }
}

impl ServerSettings {
    /// Parses [`http_addr`](Self::http_addr).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if it is not a socket address.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        self.http_addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.http_addr),
            )
        })
    }

    /// Shutdown drain deadline.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Body read deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `hermes_server=debug,info`.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Documentation route settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct DocsSettings {
    /// Serve `/docs.json` and `/docs.html`.
    pub enabled: bool,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HermesConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.shutdown_timeout(), Duration::from_secs(30));
        assert!(!config.server.trust_request_id);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_addr() {
        let mut config = HermesConfig::default();
        config.server.http_addr = "localhost".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_invalid_level() {
        let mut config = HermesConfig::default();
        config.logging.level = "hermes=notalevel".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "logging.level"
        ));

        config.logging.level = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_request_timeout() {
        let mut config = HermesConfig::default();
        config.server.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets() {
        let dev = HermesConfig::development();
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert_eq!(dev.log_config().level, "debug");

        let prod = HermesConfig::production();
        assert!(prod.server.trust_request_id);
        assert_eq!(prod.log_config().format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<HermesConfig, _> = toml::from_str("[server]\nport = 80\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: HermesConfig = toml::from_str("[server]\ntrust_request_id = true\n").unwrap();
        assert!(config.server.trust_request_id);
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    }
}
