//! Shared fixtures for integration tests.
//!
//! Each test starts its own in-process server bound to an ephemeral port and
//! a temporary public directory.

#![allow(dead_code)]

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{Server, ServerConfig, ServerError};
use tempfile::TempDir;
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body>hiroba</body></html>";
pub const CLIENT_JS: &str = "console.log('hiroba');";
pub const STYLE_CSS: &str = "body { margin: 0; }";

/// Assets written to the public directory by [`TestServer::start`]
pub const DEFAULT_ASSETS: &[(&str, &str)] = &[
    ("index.html", INDEX_HTML),
    ("client.js", CLIENT_JS),
    ("style.css", STYLE_CSS),
];

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// In-process relay server, shut down on drop
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Result<(), ServerError>>>,
    _public_dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_assets(DEFAULT_ASSETS).await
    }

    pub async fn start_with_assets(assets: &[(&str, &str)]) -> Self {
        let public_dir = tempfile::tempdir().expect("Failed to create public dir");
        for (name, body) in assets {
            std::fs::write(public_dir.path().join(name), body).expect("Failed to write asset");
        }

        let config = ServerConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, public_dir.path());
        let server = Server::bind(&config).await.expect("Failed to bind server");
        let addr = server.local_addr().expect("Failed to read local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            _public_dir: public_dir,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    /// Trigger shutdown and wait for the listener to close
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let handle = self.handle.take().expect("server task already joined");
        tokio::time::timeout(RECV_TIMEOUT, handle)
            .await
            .expect("server did not shut down in time")
            .expect("server task panicked")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Open a WebSocket connection to the server root
pub async fn connect(server: &TestServer) -> WsClient {
    let (ws, _response) = connect_async(server.ws_url())
        .await
        .expect("Failed to connect WebSocket");
    ws
}

/// Open a connection and consume its welcome envelope
pub async fn connect_and_welcome(server: &TestServer) -> (WsClient, serde_json::Value) {
    let mut ws = connect(server).await;
    let welcome = next_envelope(&mut ws).await;
    (ws, welcome)
}

/// Wait for the next text frame and parse it as JSON
pub async fn next_envelope(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for an envelope")
            .expect("WebSocket stream ended")
            .expect("WebSocket error");

        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Envelope is not JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Unexpected frame: {other:?}"),
        }
    }
}

/// Assert that no frame arrives within `wait`
pub async fn assert_no_envelope(ws: &mut WsClient, wait: Duration) {
    if let Ok(Some(Ok(msg))) = tokio::time::timeout(wait, ws.next()).await {
        panic!("Expected silence, got: {msg:?}");
    }
}

/// Send a raw text frame
pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::text(text.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Send `{text, timestamp}` the way the browser client does
pub async fn send_chat(ws: &mut WsClient, text: &str) {
    let payload = serde_json::json!({
        "text": text,
        "timestamp": "2024-05-01T12:34:56.789Z",
    });
    send_text(ws, &payload.to_string()).await;
}
