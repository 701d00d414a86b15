//! Parameter sources and coercion kinds.

use serde::Serialize;
use std::fmt;

/// Where a parameter's raw value is read from.
///
/// | Source | Raw location | Required/optional applies |
/// |--------|--------------|---------------------------|
/// | `Query` | URL query string, by key | yes |
/// | `Path` | matched route variable, by name | yes |
/// | `Header` | first value of the named header | yes |
/// | `Form` | url-encoded form field, by name | yes |
/// | `Body` | entire raw body as text | yes (empty counts as absent) |
/// | `JsonBody` | entire body, JSON-decoded | no |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// URL query string.
    Query,
    /// Matched route variable.
    Path,
    /// HTTP header.
    Header,
    /// Url-encoded form field.
    Form,
    /// Raw request body.
    Body,
    /// JSON-decoded request body.
    JsonBody,
}

impl Source {
    /// Returns the lowercase wire name of the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::Form => "form",
            Self::Body => "body",
            Self::JsonBody => "jsonbody",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The coercion target of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    /// Base-10 signed integer.
    #[serde(rename = "int")]
    SignedInteger,
    /// Base-10 unsigned integer.
    #[serde(rename = "uint")]
    UnsignedInteger,
    /// Floating point number.
    #[serde(rename = "float")]
    Float,
    /// Text, passed through unchanged.
    #[serde(rename = "string")]
    String,
    /// A JSON document decoded into a record type.
    #[serde(rename = "struct")]
    Structured,
}

impl Kind {
    /// Returns the short name used in documentation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignedInteger => "int",
            Self::UnsignedInteger => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Structured => "struct",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display_matches_serde() {
        for source in [
            Source::Query,
            Source::Path,
            Source::Header,
            Source::Form,
            Source::Body,
            Source::JsonBody,
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{source}\""));
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::SignedInteger.to_string(), "int");
        assert_eq!(Kind::Structured.to_string(), "struct");
        assert_eq!(serde_json::to_string(&Kind::Float).unwrap(), "\"float\"");
    }
}
