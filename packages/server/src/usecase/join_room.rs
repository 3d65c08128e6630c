//! UseCase: ルーム入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 入室（暗黙の退室を含む）と履歴リプレイ
//!
//! ### なぜこのテストが必要か
//! - 履歴は入室したセッションにだけ、最新 N 件が古い順で届く必要がある
//! - ルーム移動時に前のルームから確実に外れることを保証
//! - ストア障害時も入室自体は失敗しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルーム、履歴のあるルーム、ルーム移動、同じルームへの再入室
//! - 異常系：存在しないセッション、ストア障害（空の履歴に縮退）

use std::sync::Arc;

use crate::{
    domain::{MessageRepository, RoomId, SessionEvent, SessionId},
    infrastructure::hub::SessionHub,
};

use super::error::JoinRoomError;

/// 入室結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// 直前にいたルーム（同じルームへの再入室ならそのルーム）
    pub previous_room: Option<RoomId>,
    /// リプレイした履歴の件数
    pub history_len: usize,
    /// 履歴がセッションに渡されたか（切断済みなら false）
    pub delivered: bool,
}

/// ルーム入室のユースケース
pub struct JoinRoomUseCase {
    hub: Arc<SessionHub>,
    store: Arc<dyn MessageRepository>,
    history_limit: usize,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(hub: Arc<SessionHub>, store: Arc<dyn MessageRepository>, history_limit: usize) -> Self {
        Self {
            hub,
            store,
            history_limit,
        }
    }

    /// 入室を実行
    ///
    /// 別のルームにいる場合は先に退室します。入室後、履歴を
    /// このセッションにだけ送信します。
    pub async fn execute(
        &self,
        session_id: SessionId,
        room: RoomId,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let session = self
            .hub
            .session(session_id)
            .await
            .ok_or(JoinRoomError::SessionNotFound(session_id))?;

        // 1. 入室先と退室元の両方のレーンを確保
        let mut lanes = vec![room.clone()];
        if let Some(current) = session.current_room() {
            lanes.push(current.clone());
        }
        let guard = self.hub.lock_rooms(&lanes).await;

        // 2. レジストリとセッション状態を同時に更新
        let previous_room = self.hub.enter_room(session_id, &room).await?;
        if let Some(previous) = previous_room.as_ref().filter(|previous| **previous != room) {
            tracing::info!("Session '{}' left room '{}'", session_id, previous);
        }
        tracing::info!("Session '{}' joined room '{}'", session_id, room);

        // 3. 履歴を取得（ストア障害時は空の履歴に縮退）
        let messages = match self.store.recent(&room, self.history_limit).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to load history of room '{}': {}", room, e);
                Vec::new()
            }
        };
        let history_len = messages.len();

        // 4. 入室したセッションにだけ送信
        let delivered = self
            .hub
            .deliver(
                session_id,
                SessionEvent::History {
                    room: room.clone(),
                    messages,
                },
            )
            .await;
        if !delivered {
            tracing::debug!(
                "Session '{}' went away before history of '{}' arrived; discarded",
                session_id,
                room
            );
        }
        drop(guard);

        if let Some(previous) = previous_room.as_ref().filter(|previous| **previous != room) {
            self.hub.prune_idle_lanes(std::slice::from_ref(previous)).await;
        }

        Ok(JoinOutcome {
            previous_room,
            history_len,
            delivered,
        })
    }
}
