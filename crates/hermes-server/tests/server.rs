//! The hyper server over a real socket.

use std::time::Duration;

use hermes_docs::ApiInfo;
use hermes_extract::ParamSpec;
use hermes_server::{Api, Server, ShutdownSignal};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_requests_until_shutdown() {
    let mut api = Api::new(ApiInfo::new("Echo"));
    let mut echo = api.post("/echo");
    let text = echo.param(ParamSpec::<String>::body("text"));
    echo.handle(move |request| {
        let text = text.value(&request);
        async move { text.to_uppercase() }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let server = tokio::spawn(Server::new(api.build()).serve(listener, shutdown.clone()));

    let response = roundtrip(
        addr,
        "POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("x-request-id: "));
    assert!(response.ends_with("HELLO"));

    let response = roundtrip(
        addr,
        "GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.contains("\"status\":\"healthy\""));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop")
        .unwrap()
        .unwrap();
}
