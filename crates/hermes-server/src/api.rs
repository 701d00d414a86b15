//! API assembly: endpoints, groups and documentation.

use std::sync::Arc;

use hermes_config::HermesConfig;
use hermes_docs::{ApiDoc, ApiInfo};
use hermes_router::Router;
use http::Method;

use crate::app::{App, Target};
use crate::endpoint::{Endpoint, EndpointBuilder};
use crate::ServerResult;

/// A set of endpoints under a common path prefix.
///
/// The root API has an empty prefix; [`group`](Self::group) creates nested
/// APIs whose endpoints are routed at `prefix + path` once
/// [`mount`](Self::mount)ed. [`build`](Self::build) turns the root into an
/// [`App`].
///
/// ```ignore
/// let mut api = Api::new(ApiInfo::new("Users API"));
///
/// let mut users = api.group("/users");
/// let mut get_user = users.get("/{id}");
/// let id = get_user.param(ParamSpec::<u64>::path("id"));
/// get_user.handle(move |request| {
///     let id = id.value(&request);
///     async move { format!("user {id}") }
/// });
/// api.mount(users);
///
/// let app = api.build();
/// ```
pub struct Api {
    info: ApiInfo,
    prefix: String,
    router: Router<Target>,
    endpoints: Vec<Arc<Endpoint>>,
    doc: ApiDoc,
}

impl Api {
    /// Creates a root API.
    #[must_use]
    pub fn new(info: ApiInfo) -> Self {
        let doc = ApiDoc::new(&info, "/");
        Self {
            info,
            prefix: String::new(),
            router: Router::new(),
            endpoints: Vec::new(),
            doc,
        }
    }

    /// API metadata.
    #[must_use]
    pub fn info(&self) -> &ApiInfo {
        &self.info
    }

    /// Path prefix of this API (empty for the root).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Routed endpoints, including those of mounted groups.
    #[must_use]
    pub fn endpoints(&self) -> &[Arc<Endpoint>] {
        &self.endpoints
    }

    /// Documentation collected so far.
    #[must_use]
    pub fn doc(&self) -> &ApiDoc {
        &self.doc
    }

    /// Declares a `GET` endpoint.
    pub fn get(&mut self, path: &str) -> EndpointBuilder<'_> {
        self.method(Method::GET, path)
    }

    /// Declares a `POST` endpoint.
    pub fn post(&mut self, path: &str) -> EndpointBuilder<'_> {
        self.method(Method::POST, path)
    }

    /// Declares a `PUT` endpoint.
    pub fn put(&mut self, path: &str) -> EndpointBuilder<'_> {
        self.method(Method::PUT, path)
    }

    /// Declares a `PATCH` endpoint.
    pub fn patch(&mut self, path: &str) -> EndpointBuilder<'_> {
        self.method(Method::PATCH, path)
    }

    /// Declares a `DELETE` endpoint.
    pub fn delete(&mut self, path: &str) -> EndpointBuilder<'_> {
        self.method(Method::DELETE, path)
    }

    /// Declares an endpoint for any method.
    pub fn method(&mut self, method: Method, path: &str) -> EndpointBuilder<'_> {
        let path = join_path(&self.prefix, path);
        EndpointBuilder::new(self, method, path)
    }

    /// Creates a group nested under this API's prefix.
    ///
    /// The group is routed only after it is passed to [`mount`](Self::mount).
    #[must_use]
    pub fn group(&self, prefix: &str) -> Api {
        let prefix = join_path(&self.prefix, prefix);
        let info = ApiInfo::default();
        Self {
            doc: ApiDoc::new(&info, prefix.clone()),
            info,
            prefix,
            router: Router::new(),
            endpoints: Vec::new(),
        }
    }

    /// Routes every endpoint of `group` and lists it under `subroutes` in the
    /// documentation.
    ///
    /// # Panics
    ///
    /// Panics if a route of the group conflicts with an existing route.
    pub fn mount(&mut self, group: Api) {
        let prefix = group.prefix.clone();
        if let Err(err) = self.try_mount(group) {
            panic!("mounting {prefix}: {err}");
        }
    }

    /// Fallible [`mount`](Self::mount).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Route`](crate::ServerError::Route) on a route
    /// conflict. On error nothing from the group is routed or documented.
    pub fn try_mount(&mut self, group: Api) -> ServerResult<()> {
        let mut router = self.router.clone();
        for (offset, endpoint) in group.endpoints.iter().enumerate() {
            let index = self.endpoints.len() + offset;
            router.insert(endpoint.method().clone(), endpoint.path(), Target::Endpoint(index))?;
        }

        self.router = router;
        self.endpoints.extend(group.endpoints);
        self.doc.subroutes.push(group.doc);
        Ok(())
    }

    /// Builds the application with default settings.
    #[must_use]
    pub fn build(self) -> App {
        self.build_with(&HermesConfig::default())
    }

    /// Builds the application with the given settings.
    #[must_use]
    pub fn build_with(self, config: &HermesConfig) -> App {
        App::new(
            self.router,
            self.endpoints,
            self.doc,
            config.docs.enabled,
            config.server.trust_request_id,
        )
    }

    pub(crate) fn add_endpoint(&mut self, endpoint: Endpoint) -> ServerResult<()> {
        let index = self.endpoints.len();
        self.router
            .insert(endpoint.method().clone(), endpoint.path(), Target::Endpoint(index))?;
        self.doc.endpoints.push(endpoint.doc());
        self.endpoints.push(Arc::new(endpoint));
        Ok(())
    }
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("info", &self.info)
            .field("prefix", &self.prefix)
            .field("endpoints", &self.endpoints.len())
            .finish_non_exhaustive()
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => prefix.to_string(),
        _ => format!("{prefix}/{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerError;
    use hermes_extract::ParamSpec;
    use hermes_router::InsertError;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "/items"), "/items");
        assert_eq!(join_path("", "/"), "/");
        assert_eq!(join_path("/users", "/{id}"), "/users/{id}");
        assert_eq!(join_path("/users/", "/"), "/users");
        assert_eq!(join_path("/users", "operations"), "/users/operations");
    }

    #[test]
    fn test_method_shortcuts() {
        let mut api = Api::new(ApiInfo::new("Shortcuts"));
        api.get("/a").handle(|_request| async { "get" });
        api.post("/a").handle(|_request| async { "post" });
        api.put("/a").handle(|_request| async { "put" });
        api.patch("/a").handle(|_request| async { "patch" });
        api.delete("/a").handle(|_request| async { "delete" });
        api.method(Method::OPTIONS, "/a")
            .handle(|_request| async { "options" });

        let methods: Vec<_> = api.endpoints().iter().map(|e| e.method().clone()).collect();
        assert_eq!(
            methods,
            vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS
            ]
        );
        assert_eq!(api.doc().endpoints.len(), 6);
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let mut api = Api::new(ApiInfo::default());
        api.get("/items").handle(|_request| async { "first" });
        let err = api
            .get("/items")
            .try_handle(|_request| async { "second" })
            .unwrap_err();
        assert!(matches!(err, ServerError::Route(InsertError::Conflict { .. })));
        assert_eq!(api.endpoints().len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_route_panics() {
        let mut api = Api::new(ApiInfo::default());
        api.get("/items").handle(|_request| async { "first" });
        api.get("/items").handle(|_request| async { "second" });
    }

    #[test]
    fn test_nested_groups() {
        let mut api = Api::new(ApiInfo::new("Users API"));
        api.get("/api/status").handle(|_request| async { "OK" });

        let mut users = api.group("/api/v1/users");
        let mut get_user = users.get("/{id}");
        let _id = get_user.param(ParamSpec::<i64>::path("id"));
        get_user.name("Get User Info").handle(|_request| async { "user" });

        let mut operations = users.group("/operations");
        assert_eq!(operations.prefix(), "/api/v1/users/operations");
        operations
            .get("/delete")
            .handle(|_request| async { "deleted" });
        users.mount(operations);
        api.mount(users);

        let paths: Vec<_> = api.endpoints().iter().map(|e| e.path().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "/api/status",
                "/api/v1/users/{id}",
                "/api/v1/users/operations/delete"
            ]
        );

        let doc = api.doc();
        assert_eq!(doc.endpoints.len(), 1);
        assert_eq!(doc.subroutes[0].path, "/api/v1/users");
        assert_eq!(doc.subroutes[0].subroutes[0].path, "/api/v1/users/operations");
        assert_eq!(doc.endpoint_count(), 3);
    }

    #[test]
    fn test_mount_conflict() {
        let mut api = Api::new(ApiInfo::default());
        api.get("/users/list").handle(|_request| async { "root" });

        let mut users = api.group("/users");
        users.get("/list").handle(|_request| async { "group" });

        assert!(api.try_mount(users).is_err());
    }

    #[tokio::test]
    async fn test_failed_mount_leaves_api_unchanged() {
        let mut api = Api::new(ApiInfo::default());
        api.get("/users/b").handle(|_request| async { "root" });

        let mut users = api.group("/users");
        users.get("/a").handle(|_request| async { "a" });
        users.get("/b").handle(|_request| async { "b" });

        assert!(matches!(api.try_mount(users), Err(ServerError::Route(_))));
        assert_eq!(api.endpoints().len(), 1);
        assert_eq!(api.doc().endpoint_count(), 1);
        assert!(api.doc().subroutes.is_empty());

        let app = api.build();
        let request = http::Request::get("/users/a").body(bytes::Bytes::new()).unwrap();
        assert_eq!(app.dispatch(request).await.status(), http::StatusCode::NOT_FOUND);
    }
}
