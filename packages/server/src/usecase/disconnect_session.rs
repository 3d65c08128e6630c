//! UseCase: セッション切断処理
//!
//! 接続が閉じたときに呼ばれ、セッションをすべてのルームから外して破棄します。
//! 切断後のセッションにはイベントが送信されません。

use std::sync::Arc;

use crate::{
    domain::{RoomId, SessionId},
    infrastructure::hub::SessionHub,
};

use super::error::DisconnectError;

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    hub: Arc<SessionHub>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(hub: Arc<SessionHub>) -> Self {
        Self { hub }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RoomId>)` - セッションが所属していたルーム
    /// * `Err(DisconnectError)` - セッションが存在しない
    pub async fn execute(&self, session_id: SessionId) -> Result<Vec<RoomId>, DisconnectError> {
        let rooms = self.hub.rooms_of(session_id).await;
        let guard = self.hub.lock_rooms(&rooms).await;
        let left = self.hub.unregister(session_id).await?;
        drop(guard);

        self.hub.prune_idle_lanes(&left).await;
        for room in &left {
            tracing::info!("Session '{}' left room '{}' on disconnect", session_id, room);
        }
        tracing::info!("Session '{}' disconnected", session_id);
        Ok(left)
    }
}
