//! Bound parameter descriptors and the Use/Dispose lifecycle.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use hermes_core::{RawSource, RequestId};
use serde::Serialize;
use tracing::debug;

use crate::spec::{Decoder, Validator};
use crate::{Kind, ParamError, ParamSpec, Source, ValueCache};

/// Read-only metadata of a descriptor, as consumed by documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamInfo {
    /// Where the value is read from.
    #[serde(rename = "in")]
    pub source: Source,
    /// Parameter name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Whether absence is allowed.
    pub optional: bool,
    /// Coercion kind.
    pub kind: Kind,
    /// Concrete type name (e.g. `int64`, `json`).
    pub format: &'static str,
}

/// The per-request capabilities every descriptor exposes, independent of its
/// value type. Endpoints drive their descriptors through this trait.
pub trait Parameter: Send + Sync {
    /// Returns the descriptor's metadata.
    fn info(&self) -> &ParamInfo;

    /// Resolves the value for the request and runs the validators in order.
    ///
    /// # Errors
    ///
    /// Returns the extraction error, or the first validator failure.
    fn use_value(&self, request: &dyn RawSource) -> Result<(), ParamError>;

    /// Drops the cached value for the request, if any.
    fn dispose(&self, id: RequestId);

    /// Returns the number of requests with a cached value.
    fn live_entries(&self) -> usize;
}

struct Descriptor<T> {
    info: ParamInfo,
    decoder: Decoder<T>,
    validators: Vec<Validator<T>>,
    cache: ValueCache<T>,
}

impl<T: Clone + Send + Sync + 'static> Descriptor<T> {
    fn resolve<R: RawSource + ?Sized>(&self, request: &R) -> Result<T, ParamError> {
        let id = request.request_id();
        if let Some(value) = self.cache.get(id) {
            return Ok(value);
        }
        match self.extract(request) {
            Ok(value) => Ok(self.cache.insert_if_absent(id, value)),
            Err(err) => {
                debug!(
                    request_id = %id,
                    param.source = %self.info.source,
                    param.name = %self.info.name,
                    error = %err,
                    "parameter extraction failed"
                );
                Err(err)
            }
        }
    }

    fn extract<R: RawSource + ?Sized>(&self, request: &R) -> Result<T, ParamError> {
        let ParamInfo {
            source,
            ref name,
            optional,
            ..
        } = self.info;

        let (coerce, zero) = match self.decoder {
            Decoder::Json(decode) => {
                return decode(request.body_bytes())
                    .map_err(|detail| ParamError::decode(source, name.as_str(), detail));
            }
            Decoder::Text { coerce, zero } => (coerce, zero),
        };

        let raw: Option<Cow<'_, str>> = match source {
            Source::Query => request.query_value(name),
            Source::Path => request.path_value(name),
            Source::Form => request.form_value(name),
            Source::Header => match request.header_value(name) {
                Some(Ok(value)) => Some(value),
                Some(Err(detail)) => return Err(ParamError::coercion(source, name.as_str(), detail)),
                None => None,
            },
            Source::Body | Source::JsonBody => {
                let body = request.body_bytes();
                if body.is_empty() {
                    None
                } else {
                    let text = std::str::from_utf8(body).map_err(|e| {
                        ParamError::coercion(source, name.as_str(), format!("body is not valid UTF-8: {e}"))
                    })?;
                    Some(Cow::Borrowed(text))
                }
            }
        };

        match raw {
            Some(raw) => coerce(&raw).map_err(|detail| ParamError::coercion(source, name.as_str(), detail)),
            None if optional => Ok(zero()),
            None => Err(ParamError::missing(source, name.as_str())),
        }
    }

    fn validate(&self, value: &T) -> Result<(), ParamError> {
        for validator in &self.validators {
            validator(value).map_err(|detail| {
                ParamError::validation(self.info.source, self.info.name.as_str(), detail)
            })?;
        }
        Ok(())
    }
}

impl<T: Clone + Send + Sync + 'static> Parameter for Descriptor<T> {
    fn info(&self) -> &ParamInfo {
        &self.info
    }

    fn use_value(&self, request: &dyn RawSource) -> Result<(), ParamError> {
        let value = self.resolve(request)?;
        self.validate(&value)
    }

    fn dispose(&self, id: RequestId) {
        if self.cache.remove(id).is_some() {
            debug!(
                request_id = %id,
                param.source = %self.info.source,
                param.name = %self.info.name,
                "parameter value disposed"
            );
        }
    }

    fn live_entries(&self) -> usize {
        self.cache.len()
    }
}

/// Handle to a descriptor bound to an endpoint.
///
/// Cloning is cheap; all clones share the descriptor and its cache. Handlers
/// capture the handle and read the value resolved for their request.
///
/// # Example
///
/// ```rust
/// use hermes_core::Request;
/// use hermes_extract::{Param, ParamSpec};
///
/// let q: Param<String> = Param::new(ParamSpec::query("q").optional());
///
/// let request = Request::builder().uri("/items?q=hello").build();
/// assert_eq!(q.value_or_error(&request).unwrap(), "hello");
/// assert_eq!(q.value(&request), "hello");
///
/// q.dispose(request.id());
/// assert_eq!(q.try_value(&request), None);
/// ```
pub struct Param<T> {
    inner: Arc<Descriptor<T>>,
}

impl<T: Clone + Send + Sync + 'static> Param<T> {
    /// Creates a descriptor with its own empty cache.
    #[must_use]
    pub fn new(spec: ParamSpec<T>) -> Self {
        let info = ParamInfo {
            source: spec.source,
            name: spec.name,
            description: spec.description,
            optional: spec.optional,
            kind: spec.kind,
            format: spec.format,
        };
        Self {
            inner: Arc::new(Descriptor {
                info,
                decoder: spec.decoder,
                validators: spec.validators,
                cache: ValueCache::new(),
            }),
        }
    }

    /// Returns the value resolved for this request.
    ///
    /// # Panics
    ///
    /// Panics if the value was not resolved for this request yet. Inside a
    /// handler the endpoint has always resolved every parameter; elsewhere use
    /// [`value_or_error`](Self::value_or_error) or [`try_value`](Self::try_value).
    #[must_use]
    pub fn value<R: RawSource + ?Sized>(&self, request: &R) -> T {
        match self.inner.cache.get(request.request_id()) {
            Some(value) => value,
            None => panic!(
                "parameter {}:{} read before it was resolved for request {}",
                self.inner.info.source,
                self.inner.info.name,
                request.request_id()
            ),
        }
    }

    /// Returns the cached value, resolving and caching it on first use.
    ///
    /// Validators are not run here; they run when the endpoint uses the
    /// parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] when the value is missing, cannot be coerced,
    /// or the JSON body does not decode.
    pub fn value_or_error<R: RawSource + ?Sized>(&self, request: &R) -> Result<T, ParamError> {
        self.inner.resolve(request)
    }

    /// Returns the cached value without resolving it.
    #[must_use]
    pub fn try_value<R: RawSource + ?Sized>(&self, request: &R) -> Option<T> {
        self.inner.cache.get(request.request_id())
    }

    /// Resolves the value and runs the validators in order.
    ///
    /// # Errors
    ///
    /// Returns the extraction error, or the first validator failure.
    pub fn use_value<R: RawSource + ?Sized>(&self, request: &R) -> Result<(), ParamError> {
        let value = self.inner.resolve(request)?;
        self.inner.validate(&value)
    }

    /// Drops the cached value for the request, if any.
    pub fn dispose(&self, id: RequestId) {
        Parameter::dispose(&*self.inner, id);
    }

    /// Returns true if a value is cached for the request.
    #[must_use]
    pub fn is_cached(&self, id: RequestId) -> bool {
        self.inner.cache.contains(id)
    }

    /// Returns the number of requests with a cached value.
    #[must_use]
    pub fn live_entries(&self) -> usize {
        self.inner.cache.len()
    }

    /// Returns the descriptor metadata.
    #[must_use]
    pub fn info(&self) -> &ParamInfo {
        &self.inner.info
    }

    /// Returns the descriptor as a type-erased [`Parameter`].
    #[must_use]
    pub fn as_parameter(&self) -> Arc<dyn Parameter> {
        self.inner.clone()
    }
}

impl<T> Clone for Param<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("info", &self.inner.info)
            .field("validators", &self.inner.validators.len())
            .finish_non_exhaustive()
    }
}
