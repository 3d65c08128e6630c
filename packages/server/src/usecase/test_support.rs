//! UseCase テスト用のヘルパー

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{RoomId, SessionEvent, SessionId, Username},
    infrastructure::hub::SessionHub,
};

use super::ConnectSessionUseCase;

pub fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn user(name: &str) -> Username {
    Username::new(name.to_string()).unwrap()
}

/// 接続済みのテスト用クライアント
pub struct TestClient {
    pub id: SessionId,
    pub rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl TestClient {
    /// 受信済みのイベントをすべて取り出す
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

pub async fn connect(hub: &Arc<SessionHub>, name: &str) -> TestClient {
    let (tx, rx) = mpsc::unbounded_channel();
    let session = ConnectSessionUseCase::new(hub.clone())
        .execute(user(name), tx)
        .await
        .unwrap();
    TestClient { id: session.id, rx }
}
