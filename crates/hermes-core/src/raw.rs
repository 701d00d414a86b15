//! Raw request data access.
//!
//! [`RawSource`] is the only way parameter extraction reads a request. The
//! production implementation is [`Request`](crate::Request); tests swap in
//! stubs that count reads.

use std::borrow::Cow;

use crate::RequestId;

/// Read access to the raw, uncoerced values of one in-flight request.
///
/// Lookups return `None` when the value is absent. Present-but-empty values
/// (e.g. `?q=`) are returned as `Some("")`.
pub trait RawSource {
    /// Identity of the request, unique among in-flight requests.
    fn request_id(&self) -> RequestId;

    /// First query-string value for `name`.
    fn query_value(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Matched route variable `name`.
    fn path_value(&self, name: &str) -> Option<Cow<'_, str>>;

    /// First value of header `name`, matched case-insensitively.
    ///
    /// The inner `Err` carries a description when the value is present but
    /// not valid UTF-8.
    fn header_value(&self, name: &str) -> Option<Result<Cow<'_, str>, String>>;

    /// First url-encoded form field `name`.
    fn form_value(&self, name: &str) -> Option<Cow<'_, str>>;

    /// The complete request body.
    fn body_bytes(&self) -> &[u8];
}
