//! The documentation model served at `/docs.json`.
//!
//! Everything here is built from registration-time metadata. Nothing reads a
//! live request or touches a value cache.

use hermes_extract::ParamInfo;
use serde::{Deserialize, Serialize};

use crate::DocsResult;

/// Descriptive metadata of an API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Title shown at the top of the docs.
    #[serde(default)]
    pub title: String,
    /// One-line summary.
    #[serde(default)]
    pub summary: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// API version string.
    #[serde(default)]
    pub version: String,
}

impl ApiInfo {
    /// Creates info with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Type information of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDoc {
    /// Coercion kind (`int`, `uint`, `float`, `string`, `struct`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Concrete type name (e.g. `int64`).
    pub format: String,
}

/// One documented parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDoc {
    /// Source (`query`, `path`, `header`, `form`, `body`, `jsonbody`).
    #[serde(rename = "in")]
    pub location: String,
    /// Parameter name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Whether the parameter may be absent.
    #[serde(default)]
    pub optional: bool,
    /// Type information.
    pub schema: SchemaDoc,
}

impl From<&ParamInfo> for ParameterDoc {
    fn from(info: &ParamInfo) -> Self {
        Self {
            location: info.source.to_string(),
            name: info.name.clone(),
            description: info.description.clone(),
            optional: info.optional,
            schema: SchemaDoc {
                kind: info.kind.to_string(),
                format: info.format.to_string(),
            },
        }
    }
}

/// One documented endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDoc {
    /// HTTP method.
    pub method: String,
    /// Full route pattern.
    pub path: String,
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDoc>,
}

/// The documentation of an API or of one of its groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDoc {
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Summary.
    #[serde(default)]
    pub summary: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Version.
    #[serde(default)]
    pub version: String,
    /// Mount path (`/` for the root API).
    pub path: String,
    /// Endpoints registered directly on this API.
    #[serde(default)]
    pub endpoints: Vec<EndpointDoc>,
    /// Mounted groups.
    #[serde(default)]
    pub subroutes: Vec<ApiDoc>,
}

impl ApiDoc {
    /// Creates an empty document for an API mounted at `path`.
    #[must_use]
    pub fn new(info: &ApiInfo, path: impl Into<String>) -> Self {
        Self {
            title: info.title.clone(),
            summary: info.summary.clone(),
            description: info.description.clone(),
            version: info.version.clone(),
            path: path.into(),
            endpoints: Vec::new(),
            subroutes: Vec::new(),
        }
    }

    /// Returns the number of endpoints, including those in groups.
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
            + self
                .subroutes
                .iter()
                .map(ApiDoc::endpoint_count)
                .sum::<usize>()
    }

    /// Serializes the document as JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the document as indented JSON.
    pub fn to_json_pretty(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_extract::{Param, ParamSpec};

    #[test]
    fn test_parameter_doc_from_info() {
        let param = Param::new(
            ParamSpec::<u64>::path("id")
                .description("The ID of the user"),
        );
        let doc = ParameterDoc::from(param.info());

        assert_eq!(doc.location, "path");
        assert_eq!(doc.name, "id");
        assert_eq!(doc.description, "The ID of the user");
        assert!(!doc.optional);
        assert_eq!(doc.schema.kind, "uint");
        assert_eq!(doc.schema.format, "uint64");
    }

    #[test]
    fn test_json_shape() {
        let mut doc = ApiDoc::new(&ApiInfo::new("Users API").version("0.0.1"), "/");
        doc.endpoints.push(EndpointDoc {
            method: "GET".into(),
            path: "/users/{id}".into(),
            name: String::new(),
            description: "Fetch a user".into(),
            parameters: vec![ParameterDoc {
                location: "path".into(),
                name: "id".into(),
                description: String::new(),
                optional: false,
                schema: SchemaDoc {
                    kind: "uint".into(),
                    format: "uint64".into(),
                },
            }],
        });

        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value["title"], "Users API");
        assert_eq!(value["path"], "/");
        assert_eq!(value["endpoints"][0]["parameters"][0]["in"], "path");
        assert_eq!(value["endpoints"][0]["parameters"][0]["schema"]["type"], "uint");
        assert!(value["subroutes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_count_includes_groups() {
        let mut root = ApiDoc::new(&ApiInfo::default(), "/");
        let mut group = ApiDoc::new(&ApiInfo::default(), "/users");
        let endpoint = EndpointDoc {
            method: "GET".into(),
            path: "/users".into(),
            name: String::new(),
            description: String::new(),
            parameters: Vec::new(),
        };
        group.endpoints.push(endpoint.clone());
        root.endpoints.push(endpoint);
        root.subroutes.push(group);
        assert_eq!(root.endpoint_count(), 2);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let doc = ApiDoc::new(&ApiInfo::new("A").summary("s"), "/");
        let parsed: ApiDoc = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }
}
