//! Structured logging for Hermes services.
//!
//! - [`init_logging`] installs a `tracing-subscriber` registry driven by a
//!   [`LogConfig`] (filter directive plus JSON, pretty or compact output)
//! - [`fields`] names the structured fields Hermes crates log with
//! - [`log_request_start!`], [`log_request_complete!`] and
//!   [`log_request_rejected!`] emit the standard request events
//!
//! # Example
//!
//! ```rust,no_run
//! use hermes_telemetry::{init_logging, LogConfig, LogFormat};
//!
//! let config = LogConfig {
//!     format: LogFormat::Compact,
//!     ..LogConfig::default()
//! };
//! init_logging(&config).expect("logging already initialized");
//! tracing::info!("service starting");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};
