//! Radix tree node implementation.
//!
//! Each node owns one path segment. Lookup walks the request path segment by
//! segment, preferring static children over `{param}` children over a
//! trailing `*wildcard`, and backtracks when a preferred branch dead-ends.

use std::borrow::Cow;

use http::Method;

use crate::error::InsertError;
use crate::method_router::MethodRouter;
use crate::params::Params;

/// Type of path segment in the radix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment (e.g. `items`)
    Static,
    /// Named variable (e.g. `{item_id}`)
    Param(String),
    /// Catch-all capturing the rest of the path (e.g. `*path`)
    Wildcard(String),
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    segment: String,
    kind: SegmentKind,
    methods: Option<MethodRouter<T>>,
    // Sorted by segment for binary search.
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn with_kind(segment: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            segment: segment.into(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root node of a tree.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind("", SegmentKind::Static)
    }

    /// Returns the raw segment text of this node.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Returns the segment kind of this node.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Registers `value` for `method` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError`] if the pattern is malformed or already taken.
    pub fn insert(&mut self, path: &str, method: Method, value: T) -> Result<(), InsertError> {
        let segments = parse_path(path)?;
        self.insert_segments(path, &segments, method, value)
    }

    fn insert_segments(
        &mut self,
        path: &str,
        segments: &[(String, SegmentKind)],
        method: Method,
        value: T,
    ) -> Result<(), InsertError> {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            let methods = self.methods.get_or_insert_with(MethodRouter::new);
            return match methods.insert(method.clone(), value) {
                None => Ok(()),
                Some(_) => Err(InsertError::Conflict {
                    method,
                    path: path.to_string(),
                }),
            };
        };

        match kind {
            SegmentKind::Static => {
                let idx = match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(idx) => idx,
                    Err(idx) => {
                        self.static_children
                            .insert(idx, Node::with_kind(segment.clone(), SegmentKind::Static));
                        idx
                    }
                };
                self.static_children[idx].insert_segments(path, remaining, method, value)
            }
            SegmentKind::Param(name) => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::with_kind(segment.clone(), kind.clone())));
                if let SegmentKind::Param(existing) = &child.kind {
                    if existing != name {
                        return Err(InsertError::ParamNameConflict {
                            existing: existing.clone(),
                            name: name.clone(),
                            path: path.to_string(),
                        });
                    }
                }
                child.insert_segments(path, remaining, method, value)
            }
            SegmentKind::Wildcard(_) => {
                if !remaining.is_empty() {
                    return Err(InsertError::WildcardNotLast {
                        path: path.to_string(),
                    });
                }
                let child = self
                    .wildcard_child
                    .get_or_insert_with(|| Box::new(Node::with_kind(segment.clone(), kind.clone())));
                if child.kind != *kind {
                    return Err(InsertError::ParamNameConflict {
                        existing: child.segment.clone(),
                        name: segment.clone(),
                        path: path.to_string(),
                    });
                }
                child.insert_segments(path, remaining, method, value)
            }
        }
    }

    /// Matches a request path, returning the method table and captured variables.
    ///
    /// Each segment is percent-decoded after splitting, so an encoded `%2F`
    /// stays inside its segment.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let decoded: Vec<Cow<'_, str>> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_segment)
            .collect();
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments(&self, segments: &[&str], params: &mut Params) -> Option<&MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref().filter(|m| !m.is_empty());
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), *segment);
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                params.push(name.clone(), segments.join("/"));
                return child.methods.as_ref();
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node<T>> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

// Segments that are not valid UTF-8 once decoded are matched as sent.
fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Splits a route pattern into typed segments.
pub(crate) fn parse_path(path: &str) -> Result<Vec<(String, SegmentKind)>, InsertError> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if let Some(inner) = s.strip_prefix('{') {
                let name = inner.strip_suffix('}').filter(|n| !n.is_empty()).ok_or_else(|| {
                    InsertError::MalformedSegment {
                        segment: s.to_string(),
                        path: path.to_string(),
                    }
                })?;
                Ok((s.to_string(), SegmentKind::Param(name.to_string())))
            } else if let Some(name) = s.strip_prefix('*') {
                Ok((s.to_string(), SegmentKind::Wildcard(name.to_string())))
            } else {
                Ok((s.to_string(), SegmentKind::Static))
            }
        })
        .collect()
}
