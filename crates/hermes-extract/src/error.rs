//! Parameter error types.
//!
//! [`ParamError`] is the request-time failure of one parameter and is always
//! turned into a client response by the endpoint. [`RegistrationError`] is a
//! setup-time programming mistake and halts route registration.

use http::StatusCode;
use std::fmt;
use thiserror::Error;

use crate::{Kind, Source};

/// Why a parameter could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamErrorKind {
    /// A required raw value is absent.
    Missing,
    /// The raw value could not be coerced into the declared kind.
    Coercion,
    /// The JSON body could not be decoded.
    Decode,
    /// A validator rejected the coerced value.
    Validation,
}

/// Request-time failure of a single parameter.
///
/// Renders as `<detail> (<source>:<name>)`.
///
/// # Example
///
/// ```rust
/// use hermes_extract::{ParamError, Source};
/// use http::StatusCode;
///
/// let err = ParamError::missing(Source::Query, "q");
/// assert_eq!(err.to_string(), "missing required parameter q (query:q)");
/// assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
/// assert_eq!(err.error_code(), "MISSING_PARAMETER");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    source: Source,
    name: String,
    kind: ParamErrorKind,
    detail: String,
}

impl ParamError {
    /// A required value is absent.
    #[must_use]
    pub fn missing(source: Source, name: impl Into<String>) -> Self {
        let name = name.into();
        let detail = match source {
            Source::Body => format!("missing required body {name}"),
            _ => format!("missing required parameter {name}"),
        };
        Self {
            source,
            name,
            kind: ParamErrorKind::Missing,
            detail,
        }
    }

    /// The raw value did not parse into the declared kind.
    #[must_use]
    pub fn coercion(source: Source, name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            kind: ParamErrorKind::Coercion,
            detail: detail.into(),
        }
    }

    /// The body was not valid JSON for the declared type.
    #[must_use]
    pub fn decode(source: Source, name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            kind: ParamErrorKind::Decode,
            detail: detail.into(),
        }
    }

    /// A validator rejected the value.
    #[must_use]
    pub fn validation(source: Source, name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            kind: ParamErrorKind::Validation,
            detail: detail.into(),
        }
    }

    /// Returns the parameter source.
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ParamErrorKind {
        self.kind
    }

    /// Returns the message without the `(source:name)` suffix.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Every parameter failure is reported as `422 Unprocessable Entity`.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    /// Returns a stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self.kind {
            ParamErrorKind::Missing => "MISSING_PARAMETER",
            ParamErrorKind::Coercion => "INVALID_PARAMETER",
            ParamErrorKind::Decode => "INVALID_JSON_BODY",
            ParamErrorKind::Validation => "VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.detail, self.source, self.name)
    }
}

impl std::error::Error for ParamError {}

/// A parameter declaration that can never work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The declared type cannot be read from the source.
    #[error("parameter '{name}': {location} parameters cannot be declared as {kind}")]
    UnsupportedKind {
        /// Parameter source.
        location: Source,
        /// Parameter name.
        name: String,
        /// Declared kind.
        kind: Kind,
    },

    /// The parameter name is empty.
    #[error("{location} parameter name must not be empty")]
    EmptyName {
        /// Parameter source.
        location: Source,
    },

    /// A path parameter does not appear in the route pattern.
    #[error("path parameter '{name}' does not appear in route {path}")]
    UnknownPathVariable {
        /// Parameter name.
        name: String,
        /// Route pattern.
        path: String,
    },

    /// The same source and name were declared twice on one endpoint.
    #[error("{location} parameter '{name}' is declared more than once")]
    Duplicate {
        /// Parameter source.
        location: Source,
        /// Parameter name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_body_message() {
        let err = ParamError::missing(Source::Body, "payload");
        assert_eq!(err.to_string(), "missing required body payload (body:payload)");
        assert_eq!(err.kind(), ParamErrorKind::Missing);
    }

    #[test]
    fn test_coercion_carries_source_and_name() {
        let err = ParamError::coercion(Source::Query, "timestamp", "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "invalid digit found in string (query:timestamp)"
        );
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(err.detail(), "invalid digit found in string");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ParamError::decode(Source::JsonBody, "item", "eof").error_code(),
            "INVALID_JSON_BODY"
        );
        assert_eq!(
            ParamError::validation(Source::Query, "name", "admin is not allowed").to_string(),
            "admin is not allowed (query:name)"
        );
    }

    #[test]
    fn test_registration_error_display() {
        let err = RegistrationError::UnsupportedKind {
            location: Source::Body,
            name: "count".into(),
            kind: Kind::SignedInteger,
        };
        assert_eq!(
            err.to_string(),
            "parameter 'count': body parameters cannot be declared as int"
        );
    }
}
