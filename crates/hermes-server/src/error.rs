//! Server and API assembly errors.

use std::io;

use hermes_extract::RegistrationError;
use hermes_router::InsertError;
use thiserror::Error;

/// Errors raised while assembling an API or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A parameter declaration was rejected.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A route could not be added to the router.
    #[error(transparent)]
    Route(#[from] InsertError),

    /// The listen address does not parse.
    #[error("invalid listen address '{addr}'")]
    InvalidAddress {
        /// Address as configured.
        addr: String,
    },

    /// Binding the listener failed.
    #[error("failed to bind {addr}")]
    Bind {
        /// Address that could not be bound.
        addr: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_extract::Source;
    use http::Method;

    #[test]
    fn test_registration_error_is_transparent() {
        let err = ServerError::from(RegistrationError::EmptyName {
            location: Source::Query,
        });
        assert_eq!(err.to_string(), "query parameter name must not be empty");
    }

    #[test]
    fn test_route_conflict_message() {
        let err = ServerError::from(InsertError::Conflict {
            method: Method::GET,
            path: "/items".into(),
        });
        assert!(err.to_string().contains("GET /items"));
    }

    #[test]
    fn test_bind_error_has_source() {
        use std::error::Error as _;
        let err = ServerError::Bind {
            addr: "127.0.0.1:80".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("127.0.0.1:80"));
    }
}
