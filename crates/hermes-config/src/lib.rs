//! # Hermes Config
//!
//! Layered, typed configuration for Hermes servers.
//!
//! ```
//! use hermes_config::{ConfigLoader, HermesConfig};
//!
//! let config = ConfigLoader::new()
//!     .with_string("[logging]\nlevel = \"debug\"\n", "toml")
//!     .unwrap()
//!     .load()
//!     .unwrap();
//!
//! assert_eq!(config.logging.level, "debug");
//! assert_eq!(config.server, HermesConfig::default().server);
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{DocsSettings, HermesConfig, LoggingSettings, ServerSettings};
pub use error::{ConfigError, ConfigResult};
pub use hermes_telemetry::LogFormat;
pub use loader::ConfigLoader;
