//! Registration-time parameter declarations.

use serde::de::DeserializeOwned;
use std::fmt;

use crate::{Kind, RegistrationError, Scalar, Source};

/// A predicate run against a coerced value. `Err` carries the message shown
/// to the client.
pub type Validator<T> = Box<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

/// How raw request data becomes a `T`.
pub(crate) enum Decoder<T> {
    /// Textual sources: coerce a raw string, or fall back to the zero value.
    Text {
        coerce: fn(&str) -> Result<T, String>,
        zero: fn() -> T,
    },
    /// The whole body decoded as JSON.
    Json(fn(&[u8]) -> Result<T, String>),
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_json::from_slice(body).map_err(|e| e.to_string())
}

/// Declaration of one named, sourced, typed parameter.
///
/// A `ParamSpec` is inert until bound to an endpoint, which turns it into a
/// [`Param`](crate::Param) handle. Configuration methods consume and return
/// the builder.
///
/// # Example
///
/// ```rust
/// use hermes_extract::{ParamSpec, Source};
///
/// let spec = ParamSpec::<i64>::query("limit")
///     .description("Maximum number of items")
///     .optional()
///     .validate(|v: &i64| {
///         if *v > 100 {
///             Err("limit must be at most 100".to_string())
///         } else {
///             Ok(())
///         }
///     });
///
/// assert_eq!(spec.source(), Source::Query);
/// assert!(spec.is_optional());
/// ```
pub struct ParamSpec<T> {
    pub(crate) source: Source,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) optional: bool,
    pub(crate) kind: Kind,
    pub(crate) format: &'static str,
    pub(crate) decoder: Decoder<T>,
    pub(crate) validators: Vec<Validator<T>>,
}

impl<T: Scalar> ParamSpec<T> {
    fn text(source: Source, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            description: String::new(),
            optional: false,
            kind: T::KIND,
            format: T::FORMAT,
            decoder: Decoder::Text {
                coerce: T::coerce,
                zero: T::zero,
            },
            validators: Vec::new(),
        }
    }

    /// A query-string parameter.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::text(Source::Query, name)
    }

    /// A route variable.
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self::text(Source::Path, name)
    }

    /// A header, matched case-insensitively.
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        Self::text(Source::Header, name)
    }

    /// A field of an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form(name: impl Into<String>) -> Self {
        Self::text(Source::Form, name)
    }

    /// Declares a parameter for any source.
    ///
    /// `JsonBody` decodes the body as JSON into `T`; every other source
    /// coerces the raw text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::UnsupportedKind`] when a `Body` parameter
    /// is not a `String`, and [`RegistrationError::EmptyName`] for an empty name.
    pub fn register(source: Source, name: impl Into<String>) -> Result<Self, RegistrationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistrationError::EmptyName { location: source });
        }
        match source {
            Source::Body if T::KIND != Kind::String => Err(RegistrationError::UnsupportedKind {
                location: source,
                name,
                kind: T::KIND,
            }),
            Source::JsonBody => Ok(Self {
                decoder: Decoder::Json(decode_json::<T>),
                ..Self::text(source, name)
            }),
            _ => Ok(Self::text(source, name)),
        }
    }
}

impl ParamSpec<String> {
    /// The raw request body as text. An empty body counts as absent.
    #[must_use]
    pub fn body(name: impl Into<String>) -> Self {
        Self::text(Source::Body, name)
    }
}

impl<T: DeserializeOwned> ParamSpec<T> {
    /// The request body decoded as JSON into `T`.
    ///
    /// Decoding failures are always errors; [`optional`](Self::optional) has
    /// no effect on JSON bodies.
    #[must_use]
    pub fn json(name: impl Into<String>) -> Self {
        Self {
            source: Source::JsonBody,
            name: name.into(),
            description: String::new(),
            optional: false,
            kind: Kind::Structured,
            format: "json",
            decoder: Decoder::Json(decode_json::<T>),
            validators: Vec::new(),
        }
    }
}

impl<T> ParamSpec<T> {
    /// Sets the free-text description shown in documentation.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the parameter optional; an absent value yields the zero value.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Replaces the validator set with a single validator.
    #[must_use]
    pub fn validate<F>(self, validator: F) -> Self
    where
        F: Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators([Box::new(validator) as Validator<T>])
    }

    /// Replaces the validator set. Validators run in iteration order and the
    /// first failure stops the chain.
    #[must_use]
    pub fn validators<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = Validator<T>>,
    {
        self.validators = validators.into_iter().collect();
        self
    }

    /// Returns the source.
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the coercion kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns true if the parameter is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the number of attached validators.
    #[must_use]
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }
}

impl<T> fmt::Debug for ParamSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSpec")
            .field("source", &self.source)
            .field("name", &self.name)
            .field("optional", &self.optional)
            .field("kind", &self.kind)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_source_and_kind() {
        assert_eq!(ParamSpec::<i64>::path("item_id").kind(), Kind::SignedInteger);
        assert_eq!(ParamSpec::<u8>::header("x-n").source(), Source::Header);
        assert_eq!(ParamSpec::<f64>::form("ratio").kind(), Kind::Float);
        assert_eq!(ParamSpec::body("raw").kind(), Kind::String);

        #[derive(serde::Deserialize)]
        struct Item {
            _name: String,
        }
        let json = ParamSpec::<Item>::json("item");
        assert_eq!(json.source(), Source::JsonBody);
        assert_eq!(json.kind(), Kind::Structured);
    }

    #[test]
    fn test_validate_replaces_previous_set() {
        let first: Validator<String> = Box::new(|_| Ok(()));
        let second: Validator<String> = Box::new(|_| Ok(()));
        let spec = ParamSpec::<String>::query("name").validators([first, second]);
        assert_eq!(spec.validator_count(), 2);

        let spec = spec.validate(|_| Err("nope".to_string()));
        assert_eq!(spec.validator_count(), 1);
    }

    #[test]
    fn test_register_rejects_non_string_body() {
        let err = ParamSpec::<i64>::register(Source::Body, "count").unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::UnsupportedKind {
                location: Source::Body,
                kind: Kind::SignedInteger,
                ..
            }
        ));
        assert!(ParamSpec::<String>::register(Source::Body, "raw").is_ok());
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let err = ParamSpec::<String>::register(Source::Query, "").unwrap_err();
        assert_eq!(err, RegistrationError::EmptyName { location: Source::Query });
    }

    #[test]
    fn test_register_json_body_uses_json_decoder() {
        let spec = ParamSpec::<i64>::register(Source::JsonBody, "n").unwrap();
        assert!(matches!(spec.decoder, Decoder::Json(_)));
        let query = ParamSpec::<i64>::register(Source::Query, "n").unwrap();
        assert!(matches!(query.decoder, Decoder::Text { .. }));
    }
}
