//! # Hermes Test
//!
//! Drive a built [`App`](hermes_server::App) in memory: no sockets, no
//! runtime configuration, just requests in and buffered responses out.
//!
//! ```rust
//! use hermes_docs::ApiInfo;
//! use hermes_extract::ParamSpec;
//! use hermes_server::Api;
//! use hermes_test::TestClient;
//! use http::StatusCode;
//!
//! # tokio_test::block_on(async {
//! let mut api = Api::new(ApiInfo::new("Greeter"));
//! let mut greet = api.get("/greet");
//! let name = greet.param(ParamSpec::<String>::query("name"));
//! greet.handle(move |request| {
//!     let name = name.value(&request);
//!     async move { format!("hello {name}") }
//! });
//!
//! let client = TestClient::new(api.build());
//! client
//!     .get("/greet?name=ada")
//!     .send()
//!     .await
//!     .assert_status(StatusCode::OK)
//!     .assert_body_contains("hello ada");
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestRequest};
pub use error::TestError;
pub use response::TestResponse;
