//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    build_router, infrastructure::repository::InMemoryMessageRepository, ui::state::AppState,
};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use url::form_urlencoded;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A server serving the full router on an ephemeral port with an in-memory store
pub struct TestServer {
    addr: std::net::SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let state = Arc::new(AppState::new(Arc::new(InMemoryMessageRepository::new()), 100));
        let app = build_router(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, username: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", username)
            .finish();
        format!("ws://{}/ws?{}", self.addr, query)
    }

    /// Connect a WebSocket client as `username`
    pub async fn connect(&self, username: &str) -> WsClient {
        let (stream, _) = tokio_tungstenite::connect_async(self.ws_url(username))
            .await
            .expect("Failed to connect WebSocket");
        WsClient { stream }
    }

    /// Poll `/api/rooms` until `room` has `members` sessions
    pub async fn wait_for_members(&self, room: &str, members: u64) {
        let client = reqwest::Client::new();
        for _ in 0..50 {
            let rooms: Value = client
                .get(format!("{}/api/rooms", self.base_url()))
                .send()
                .await
                .expect("Failed to send request")
                .json()
                .await
                .expect("Failed to parse JSON");
            let current = rooms
                .as_array()
                .and_then(|rooms| rooms.iter().find(|r| r["id"] == room))
                .and_then(|r| r["members"].as_u64())
                .unwrap_or(0);
            if current == members {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("room '{room}' never reached {members} member(s)");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A raw WebSocket client speaking the JSON event protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn send_event(&mut self, event: Value) {
        self.stream
            .send(Message::Text(event.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn join(&mut self, room: &str) -> Value {
        self.send_event(serde_json::json!({"event": "join_room", "data": room}))
            .await;
        let event = self.recv_event().await;
        assert_eq!(event["event"], "message_history");
        event
    }

    pub async fn say(&mut self, content: &str) {
        self.send_event(serde_json::json!({
            "event": "send_message",
            "data": {"content": content}
        }))
        .await;
    }

    /// Next JSON event, skipping control frames
    pub async fn recv_event(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for event")
                .expect("Stream closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).expect("Invalid JSON frame");
            }
        }
    }

    /// Assert nothing arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.stream.next()).await
        {
            panic!("Unexpected event: {text}");
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
