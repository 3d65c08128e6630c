//! UseCase: セッション接続処理
//!
//! 認証済みのユーザー名を受け取り、Connected 状態のセッションを作成して
//! SessionHub に登録します。ネットワークへの送信は行いません。

use std::sync::Arc;

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{ConnectionSession, SessionIdFactory, Timestamp, Username},
    infrastructure::hub::{Outbox, SessionHub},
};

use super::error::ConnectError;

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    hub: Arc<SessionHub>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(hub: Arc<SessionHub>) -> Self {
        Self { hub }
    }

    /// セッション接続を実行
    ///
    /// # Arguments
    ///
    /// * `username` - 外部の認証基盤で認証済みのユーザー名
    /// * `outbox` - このセッション宛てのイベント送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionSession)` - 作成されたセッション（Connected 状態）
    /// * `Err(ConnectError)` - 登録失敗
    pub async fn execute(
        &self,
        username: Username,
        outbox: Outbox,
    ) -> Result<ConnectionSession, ConnectError> {
        let session = ConnectionSession::new(SessionIdFactory::generate(), username, Timestamp::now());
        self.hub.register(session.clone(), outbox).await?;

        tracing::info!(
            "Session '{}' connected as '{}' at {}",
            session.id,
            session.username,
            timestamp_to_rfc3339(session.connected_at.value())
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::SessionState, usecase::test_support::user};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_session_success() {
        // テスト項目: 接続すると Connected 状態のセッションが登録される
        // given (前提条件):
        let hub = Arc::new(SessionHub::new());
        let usecase = ConnectSessionUseCase::new(hub.clone());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let session = usecase.execute(user("alice"), tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(session.state, SessionState::Connected);
        assert_eq!(session.username.as_str(), "alice");
        assert_eq!(hub.session_count().await, 1);
        assert!(hub.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_same_user_can_connect_twice() {
        // テスト項目: 同じユーザーの複数接続は別々のセッションになる
        // given (前提条件):
        let hub = Arc::new(SessionHub::new());
        let usecase = ConnectSessionUseCase::new(hub.clone());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let first = usecase.execute(user("alice"), tx1).await.unwrap();
        let second = usecase.execute(user("alice"), tx2).await.unwrap();

        // then (期待する結果):
        assert_ne!(first.id, second.id);
        assert_eq!(hub.session_count().await, 2);
    }
}
