//! HTML rendering of an [`ApiDoc`], served at `/docs.html`.

use std::fmt::Write;

use crate::{ApiDoc, EndpointDoc};

/// Title used when the API has none.
pub const DEFAULT_TITLE: &str = "Hermes API";
/// Summary used when the API has none.
pub const DEFAULT_SUMMARY: &str = "API Documentation for the Hermes API";
/// Version used when the API has none.
pub const DEFAULT_VERSION: &str = "1.0.0";

const STYLE: &str = r"
        body { font-family: Arial, sans-serif; margin: auto; padding: 20px; max-width: 800px; }
        h1 { color: #333; }
        h2 { color: #555; }
        h3 { color: #777; }
        .endpoint { margin-bottom: 20px; margin-left: 1em; }
        .method { font-weight: bold; color: #007BFF; }
        .parameters { margin-left: 20px; }
        .parameters li { margin-bottom: 5px; }
        .param-name { font-weight: bold; }
        .param-type { color: #555; font-style: italic; }
        .optional { color: #999; }
";

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Renders a standalone HTML page documenting the API.
///
/// All text taken from the document is HTML-escaped.
///
/// # Example
///
/// ```rust
/// use hermes_docs::{render_html, ApiDoc, ApiInfo};
///
/// let doc = ApiDoc::new(&ApiInfo::new("Items <API>"), "/");
/// let html = render_html(&doc);
/// assert!(html.contains("<h1>Items &lt;API&gt;</h1>"));
/// assert!(html.contains("1.0.0"));
/// ```
#[must_use]
pub fn render_html(doc: &ApiDoc) -> String {
    let title = html_escape(or_default(&doc.title, DEFAULT_TITLE));
    let summary = html_escape(or_default(&doc.summary, DEFAULT_SUMMARY));
    let version = html_escape(or_default(&doc.version, DEFAULT_VERSION));

    let mut out = String::with_capacity(4096);
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title} - API Documentation</title>
    <style>{STYLE}    </style>
</head>
<body>
    <h1>{title}</h1>
    <p>{summary}</p>
"#
    );
    if !doc.description.is_empty() {
        let _ = writeln!(out, "    <p>{}</p>", html_escape(&doc.description));
    }
    let _ = writeln!(out, "    <p><strong>Version:</strong> {version}</p>");
    out.push_str("    <h2>Routes</h2>\n");

    for endpoint in &doc.endpoints {
        render_endpoint(&mut out, endpoint);
    }
    for group in &doc.subroutes {
        render_group(&mut out, group);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_group(out: &mut String, group: &ApiDoc) {
    let _ = writeln!(out, "    <h3>Path: {}</h3>", html_escape(&group.path));
    for endpoint in &group.endpoints {
        render_endpoint(out, endpoint);
    }
    for nested in &group.subroutes {
        render_group(out, nested);
    }
}

fn render_endpoint(out: &mut String, endpoint: &EndpointDoc) {
    out.push_str("    <div class=\"endpoint\">\n");
    let _ = writeln!(
        out,
        "        <p class=\"method\">{} {}</p>",
        html_escape(&endpoint.method),
        html_escape(&endpoint.path)
    );
    if !endpoint.name.is_empty() {
        let _ = writeln!(out, "        <p><em>{}</em></p>", html_escape(&endpoint.name));
    }
    if !endpoint.description.is_empty() {
        let _ = writeln!(out, "        <p>{}</p>", html_escape(&endpoint.description));
    }
    if !endpoint.parameters.is_empty() {
        out.push_str("        <p><strong>Parameters:</strong></p>\n");
        out.push_str("        <ul class=\"parameters\">\n");
        for param in &endpoint.parameters {
            let optional = if param.optional {
                " <span class=\"optional\">(optional)</span>"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "            <li><span class=\"param-name\">{}</span> (in {}) - {} <span class=\"param-type\">[{}]</span>{optional}</li>",
                html_escape(&param.name),
                html_escape(&param.location),
                html_escape(&param.description),
                html_escape(&param.schema.kind),
            );
        }
        out.push_str("        </ul>\n");
    }
    out.push_str("    </div>\n");
}

/// Escapes text for inclusion in HTML element content and attributes.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiInfo, ParameterDoc, SchemaDoc};

    fn endpoint(path: &str) -> EndpointDoc {
        EndpointDoc {
            method: "GET".into(),
            path: path.into(),
            name: "read_item".into(),
            description: "Read one item".into(),
            parameters: vec![ParameterDoc {
                location: "query".into(),
                name: "q".into(),
                description: "search <term>".into(),
                optional: true,
                schema: SchemaDoc {
                    kind: "string".into(),
                    format: "string".into(),
                },
            }],
        }
    }

    #[test]
    fn test_defaults_when_info_is_empty() {
        let html = render_html(&ApiDoc::new(&ApiInfo::default(), "/"));
        assert!(html.contains("<title>Hermes API - API Documentation</title>"));
        assert!(html.contains(DEFAULT_SUMMARY));
        assert!(html.contains("<strong>Version:</strong> 1.0.0"));
    }

    #[test]
    fn test_endpoints_and_parameters_are_listed() {
        let mut doc = ApiDoc::new(&ApiInfo::new("Items").version("2.1.0"), "/");
        doc.endpoints.push(endpoint("/items/{item_id}"));

        let html = render_html(&doc);
        assert!(html.contains("GET /items/{item_id}"));
        assert!(html.contains("Read one item"));
        assert!(html.contains("search &lt;term&gt;"));
        assert!(html.contains("[string]"));
        assert!(html.contains("(optional)"));
        assert!(html.contains("2.1.0"));
    }

    #[test]
    fn test_groups_are_rendered_recursively() {
        let mut root = ApiDoc::new(&ApiInfo::default(), "/");
        let mut users = ApiDoc::new(&ApiInfo::default(), "/users");
        let mut admin = ApiDoc::new(&ApiInfo::default(), "/users/admin");
        admin.endpoints.push(endpoint("/users/admin/audit"));
        users.subroutes.push(admin);
        root.subroutes.push(users);

        let html = render_html(&root);
        assert!(html.contains("<h3>Path: /users</h3>"));
        assert!(html.contains("<h3>Path: /users/admin</h3>"));
        assert!(html.contains("GET /users/admin/audit"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }
}
