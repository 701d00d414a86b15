//! HTTP/1.1 server on hyper and tokio.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hermes_config::{HermesConfig, ServerSettings};
use hermes_core::{IntoResponse, Response};
use http::StatusCode;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::shutdown::{ConnectionTracker, ShutdownSignal};
use crate::{App, ServerError, ServerResult};

/// Serves an [`App`] over HTTP/1.1.
///
/// Each connection runs on its own task. Request bodies are buffered under
/// the configured timeout before dispatch.
///
/// ```no_run
/// use hermes_docs::ApiInfo;
/// use hermes_server::{Api, Server};
///
/// # async fn run() -> Result<(), hermes_server::ServerError> {
/// let mut api = Api::new(ApiInfo::new("Status"));
/// api.get("/status").handle(|_request| async { "OK" });
///
/// Server::new(api.build()).run().await
/// # }
/// ```
#[derive(Debug)]
pub struct Server {
    app: Arc<App>,
    settings: ServerSettings,
}

impl Server {
    /// Creates a server with default settings.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self {
            app: Arc::new(app),
            settings: ServerSettings::default(),
        }
    }

    /// Creates a server using the `server` section of `config`.
    #[must_use]
    pub fn from_config(app: App, config: &HermesConfig) -> Self {
        Self::new(app).with_settings(config.server.clone())
    }

    /// Replaces the server settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ServerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The application being served.
    #[must_use]
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Binds the configured address and serves until SIGTERM or SIGINT.
    pub async fn run(self) -> ServerResult<()> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr: SocketAddr =
            self.settings
                .http_addr
                .parse()
                .map_err(|_| ServerError::InvalidAddress {
                    addr: self.settings.http_addr.clone(),
                })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr = listener.local_addr()?;
        info!(addr = %addr, endpoints = self.app.endpoints().len(), "server listening");

        let tracker = ConnectionTracker::new();
        let body_timeout = self.settings.request_timeout();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let app = Arc::clone(&self.app);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(err) = serve_connection(app, stream, body_timeout, shutdown).await {
                                debug!(remote = %remote, error = %err, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(err) => error!(error = %err, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let deadline = self.settings.shutdown_timeout();
        info!(
            active = tracker.active_connections(),
            timeout_secs = deadline.as_secs(),
            "draining connections"
        );
        if tokio::time::timeout(deadline, tracker.wait_for_drain())
            .await
            .is_err()
        {
            warn!(
                active = tracker.active_connections(),
                "shutdown deadline reached with open connections"
            );
        }

        info!("server stopped");
        Ok(())
    }
}

async fn serve_connection(
    app: Arc<App>,
    stream: TcpStream,
    body_timeout: Duration,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let service = service_fn(move |request: http::Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { Ok::<_, Infallible>(handle(app, request, body_timeout).await) }
    });

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

async fn handle(app: Arc<App>, request: http::Request<Incoming>, body_timeout: Duration) -> Response {
    let (parts, body) = request.into_parts();
    let body = match tokio::time::timeout(body_timeout, body.collect()).await {
        Ok(Ok(collected)) => collected.to_bytes(),
        Ok(Err(err)) => {
            warn!(error = %err, http.path = %parts.uri.path(), "failed to read request body");
            return (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "failed to read request body" }),
            )
                .into_response();
        }
        Err(_) => {
            warn!(http.path = %parts.uri.path(), "request body timed out");
            return (
                StatusCode::REQUEST_TIMEOUT,
                serde_json::json!({ "error": "request body timed out" }),
            )
                .into_response();
        }
    };

    app.dispatch(http::Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Api;
    use hermes_docs::ApiInfo;

    fn app() -> App {
        let mut api = Api::new(ApiInfo::new("Test"));
        api.get("/ping").handle(|_request| async { "pong" });
        api.build()
    }

    #[test]
    fn test_default_settings() {
        let server = Server::new(app());
        assert_eq!(server.settings().http_addr, "0.0.0.0:8080");
        assert_eq!(server.app().endpoints().len(), 1);
    }

    #[test]
    fn test_from_config() {
        let mut config = HermesConfig::default();
        config.server.http_addr = "127.0.0.1:3000".to_string();
        let server = Server::from_config(app(), &config);
        assert_eq!(server.settings().http_addr, "127.0.0.1:3000");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let server = Server::new(app()).with_settings(ServerSettings {
            http_addr: "not-an-address".to_string(),
            ..ServerSettings::default()
        });
        let err = server
            .run_with_shutdown(ShutdownSignal::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidAddress { .. }));
    }
}
