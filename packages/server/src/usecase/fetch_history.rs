//! UseCase: 履歴取得処理（HTTP API 用）

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageRepository, RoomId};

use super::error::HistoryError;

/// ルーム履歴取得のユースケース
pub struct FetchHistoryUseCase {
    store: Arc<dyn MessageRepository>,
    history_limit: usize,
}

impl FetchHistoryUseCase {
    /// 新しい FetchHistoryUseCase を作成
    pub fn new(store: Arc<dyn MessageRepository>, history_limit: usize) -> Self {
        Self {
            store,
            history_limit,
        }
    }

    /// 最新のメッセージを古い順で取得
    ///
    /// `limit` は履歴の上限件数で切り詰められます。省略時は上限件数。
    pub async fn execute(
        &self,
        room: &RoomId,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, HistoryError> {
        let limit = limit.unwrap_or(self.history_limit).min(self.history_limit);
        let messages = self.store.recent(room, limit).await?;
        tracing::debug!("Fetched {} message(s) of room '{}'", messages.len(), room);
        Ok(messages)
    }
}
