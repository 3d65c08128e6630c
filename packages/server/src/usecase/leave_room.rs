//! UseCase: ルーム退室処理
//!
//! セッションを現在のルームから外し、Connected 状態に戻します。
//! 接続は維持されるため、続けて別のルームに入室できます。

use std::sync::Arc;

use crate::{
    domain::{RoomId, SessionId},
    infrastructure::hub::SessionHub,
};

use super::error::LeaveRoomError;

/// ルーム退室のユースケース
pub struct LeaveRoomUseCase {
    hub: Arc<SessionHub>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(hub: Arc<SessionHub>) -> Self {
        Self { hub }
    }

    /// 退室を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RoomId))` - 退室したルーム
    /// * `Ok(None)` - どのルームにも入室していなかった
    /// * `Err(LeaveRoomError)` - セッションが存在しない
    pub async fn execute(&self, session_id: SessionId) -> Result<Option<RoomId>, LeaveRoomError> {
        let session = self
            .hub
            .session(session_id)
            .await
            .ok_or(LeaveRoomError::SessionNotFound(session_id))?;

        let Some(current) = session.current_room().cloned() else {
            return Ok(None);
        };

        let guard = self.hub.lock_rooms(std::slice::from_ref(&current)).await;
        let left = self.hub.exit_room(session_id).await?;
        drop(guard);

        if let Some(room) = &left {
            tracing::info!("Session '{}' left room '{}'", session_id, room);
            self.hub.prune_idle_lanes(std::slice::from_ref(room)).await;
        }
        Ok(left)
    }
}
