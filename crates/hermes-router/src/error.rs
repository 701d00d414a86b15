//! Router error types.

use http::Method;
use thiserror::Error;

/// Error raised when a route cannot be added to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The method is already registered for this path.
    #[error("route {method} {path} is already registered")]
    Conflict {
        /// Conflicting method.
        method: Method,
        /// Route pattern.
        path: String,
    },

    /// Two routes name the variable at the same position differently.
    #[error("path variable '{name}' in {path} conflicts with existing variable '{existing}'")]
    ParamNameConflict {
        /// Variable already in the tree.
        existing: String,
        /// Variable the new route tried to use.
        name: String,
        /// Route pattern.
        path: String,
    },

    /// A catch-all segment was followed by more segments.
    #[error("wildcard must be the last segment in {path}")]
    WildcardNotLast {
        /// Route pattern.
        path: String,
    },

    /// A `{` segment without a closing `}` or without a name.
    #[error("malformed segment '{segment}' in {path}")]
    MalformedSegment {
        /// Offending segment.
        segment: String,
        /// Route pattern.
        path: String,
    },
}

/// Reason a lookup produced no route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// No route matches the path.
    NotFound,
    /// The path matches but not for this method.
    MethodNotAllowed {
        /// Methods registered for the path.
        allowed: Vec<Method>,
    },
}
