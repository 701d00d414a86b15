//! # Hermes Core
//!
//! Core types shared by every Hermes crate:
//!
//! - [`RequestId`] - UUID v7 identity of one in-flight request
//! - [`Request`] - the buffered request passed through middleware into handlers
//! - [`RawSource`] - read access to raw query, path, header, form and body values
//! - [`Response`] and [`IntoResponse`] - the response type and its builders

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod raw;
mod request;
mod request_id;
pub mod response;

pub use raw::RawSource;
pub use request::{Request, RequestBuilder};
pub use request_id::RequestId;
pub use response::{HtmlResponse, IntoResponse, JsonResponse, Response, TextResponse};

/// Header used to propagate request ids.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
