//! Shared helpers: spawn the real router on an ephemeral port and talk to
//! it over HTTP and WebSocket.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use request_bin::app_state::AppState;
use request_bin::config::ServerConfig;
use request_bin::domain::{BinId, ObserverId};
use request_bin::server::build_app;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
    pub http: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Creates a bin over HTTP and returns its JSON.
    pub async fn create_bin(&self, name: &str) -> serde_json::Value {
        let Ok(response) = self
            .http
            .post(self.url("/api/bins"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
        else {
            panic!("create bin request failed");
        };
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let Ok(body) = response.json::<serde_json::Value>().await else {
            panic!("create bin response is not JSON");
        };
        body["bin"].clone()
    }

    /// Connects a WebSocket observer and consumes its CONNECTED frame.
    pub async fn connect(&self) -> (WsStream, ObserverId) {
        let Ok((mut ws, _)) = tokio_tungstenite::connect_async(format!("ws://{}/ws", self.addr)).await
        else {
            panic!("ws connect failed");
        };
        let ack = next_event(&mut ws).await;
        assert_eq!(ack["type"], "CONNECTED");
        let Some(Ok(uuid)) = ack["clientId"].as_str().map(str::parse::<uuid::Uuid>) else {
            panic!("CONNECTED frame without clientId: {ack}");
        };
        (ws, ObserverId::from(uuid))
    }

    /// Sends SUBSCRIBE and waits until the server has applied it.
    pub async fn subscribe(&self, ws: &mut WsStream, observer: ObserverId, bin_id: &str) {
        send_json(ws, serde_json::json!({ "type": "SUBSCRIBE", "binId": bin_id })).await;
        let bin = &BinId::from(bin_id);
        let hub = &self.state.hub;
        self.wait_until(|| async move { hub.subscribers_of(bin).await.contains(&observer) })
            .await;
    }

    /// Polls `condition` until it holds, failing the test after a timeout.
    pub async fn wait_until<F, Fut>(&self, condition: F)
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let done = tokio::time::timeout(WAIT, async {
            while !condition().await {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(done.is_ok(), "condition not reached in time");
    }
}

pub async fn spawn_app() -> TestApp {
    let config = ServerConfig::default();
    let state = AppState::new(&config);
    let app = build_app(state.clone(), &config);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestApp {
        addr,
        state,
        http: reqwest::Client::new(),
    }
}

pub async fn send_json(ws: &mut WsStream, value: serde_json::Value) {
    send_text(ws, &value.to_string()).await;
}

pub async fn send_text(ws: &mut WsStream, text: &str) {
    if ws.send(Message::text(text.to_string())).await.is_err() {
        panic!("ws send failed");
    }
}

/// Reads the next text frame as JSON, failing after a timeout.
pub async fn next_event(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let Ok(next) = tokio::time::timeout(WAIT, ws.next()).await else {
            panic!("timed out waiting for a ws frame");
        };
        let Some(Ok(msg)) = next else {
            panic!("ws stream ended");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("frame is not JSON: {text}");
            };
            return value;
        }
    }
}

/// Asserts that no text frame arrives within a short window.
pub async fn expect_silence(ws: &mut WsStream) {
    if let Ok(Some(Ok(Message::Text(text)))) =
        tokio::time::timeout(Duration::from_millis(200), ws.next()).await
    {
        panic!("unexpected frame: {text}");
    }
}
