//! # Hermes Docs
//!
//! Read-only documentation projection of a Hermes API.
//!
//! An [`ApiDoc`] is assembled from endpoint metadata and each parameter's
//! [`ParamInfo`](hermes_extract::ParamInfo); it is served as JSON at
//! `/docs.json` and rendered by [`render_html`] at `/docs.html`.
//!
//! ```rust
//! use hermes_docs::{render_html, ApiDoc, ApiInfo};
//!
//! let doc = ApiDoc::new(&ApiInfo::new("Items API").version("0.2.0"), "/");
//! let json = doc.to_json().unwrap();
//! assert!(json.contains("\"title\":\"Items API\""));
//! assert!(render_html(&doc).contains("Items API"));
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod html;
mod model;

pub use error::{DocsError, DocsResult};
pub use html::{html_escape, render_html, DEFAULT_SUMMARY, DEFAULT_TITLE, DEFAULT_VERSION};
pub use model::{ApiDoc, ApiInfo, EndpointDoc, ParameterDoc, SchemaDoc};
