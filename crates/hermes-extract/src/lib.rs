//! # Hermes Extract
//!
//! Typed, named request parameters with request-scoped caching and
//! validation.
//!
//! A parameter is declared once with a [`ParamSpec`] and bound to an
//! endpoint, which yields a [`Param<T>`] handle. For every request the
//! endpoint *uses* each parameter in declaration order (extract, coerce,
//! validate), invokes the handler only if all succeed, and finally
//! *disposes* every cached value for that request.
//!
//! | Constructor | Source | Declared type |
//! |-------------|--------|---------------|
//! | [`ParamSpec::query`] | query string | any [`Scalar`] |
//! | [`ParamSpec::path`] | route variable | any [`Scalar`] |
//! | [`ParamSpec::header`] | first header value | any [`Scalar`] |
//! | [`ParamSpec::form`] | url-encoded form field | any [`Scalar`] |
//! | [`ParamSpec::body`] | raw body text | `String` |
//! | [`ParamSpec::json`] | JSON-decoded body | any `DeserializeOwned` |
//!
//! ## Example
//!
//! ```rust
//! use hermes_core::Request;
//! use hermes_extract::{Param, ParamSpec};
//!
//! let limit = Param::new(
//!     ParamSpec::<u32>::query("limit")
//!         .optional()
//!         .validate(|v| if *v <= 100 { Ok(()) } else { Err("limit too large".into()) }),
//! );
//!
//! let request = Request::builder().uri("/items?limit=500").build();
//! let err = limit.use_value(&request).unwrap_err();
//! assert_eq!(err.to_string(), "limit too large (query:limit)");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod error;
mod param;
mod scalar;
mod source;
mod spec;

pub use cache::ValueCache;
pub use error::{ParamError, ParamErrorKind, RegistrationError};
pub use param::{Param, ParamInfo, Parameter};
pub use scalar::Scalar;
pub use source::{Kind, Source};
pub use spec::{ParamSpec, Validator};
