//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! プロセス終了時にデータは失われます。テストと `--store memory` 用。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, MessageContent, MessageRepository, RoomId, StoreError, Timestamp, Username,
};

/// インメモリ Message Repository 実装
///
/// ルームごとにメッセージを追記順で保持します。
#[derive(Default)]
pub struct InMemoryMessageRepository {
    /// ルーム ID → メッセージ履歴（古い順）
    messages: Mutex<HashMap<RoomId, Vec<ChatMessage>>>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 全ルームの保存済みメッセージ数
    #[cfg(test)]
    pub(crate) async fn count(&self) -> usize {
        let messages = self.messages.lock().await;
        messages.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(
        &self,
        room: RoomId,
        sender: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, StoreError> {
        let mut messages = self.messages.lock().await;
        let history = messages.entry(room.clone()).or_default();

        // 同一ルーム内で created_at が逆行しないようにする
        let now = Timestamp::now();
        let created_at = match history.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        let message = ChatMessage::new(sender, content, room, created_at);
        history.push(message.clone());
        Ok(message)
    }

    async fn recent(&self, room: &RoomId, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().await;
        let Some(history) = messages.get(room) else {
            return Ok(Vec::new());
        };
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryMessageRepository の append / recent
    // - 履歴が古い順で返ること、limit が「最新 N 件」に効くこと
    //
    // 【なぜこのテストが必要か】
    // - 参加時の履歴リプレイはこの順序保証に依存している
    // - UseCase のテストはこの実装を使うため、信頼性を担保する
    // ========================================

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn user(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_append_then_recent_round_trip() {
        // テスト項目: 追加したメッセージが同じ内容で取得でき、created_at は追加時刻以降
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        let before = Timestamp::now();

        // when (操作):
        let stored = repo
            .append(room("general"), user("alice"), content("hi"))
            .await
            .unwrap();
        let recent = repo.recent(&room("general"), 100).await.unwrap();

        // then (期待する結果):
        assert_eq!(recent, vec![stored.clone()]);
        assert_eq!(stored.sender.as_str(), "alice");
        assert_eq!(stored.content.as_str(), "hi");
        assert_eq!(stored.room, room("general"));
        assert!(stored.created_at >= before);
    }

    #[tokio::test]
    async fn test_recent_unknown_room_is_empty() {
        // テスト項目: メッセージのないルームは空の履歴を返す
        let repo = InMemoryMessageRepository::new();
        let recent = repo.recent(&room("empty"), 100).await.unwrap();
        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn test_recent_returns_latest_oldest_first() {
        // テスト項目: limit を超える場合、最新 N 件が古い順で返される
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        for i in 0..5 {
            repo.append(room("general"), user("alice"), content(&format!("m{i}")))
                .await
                .unwrap();
        }

        // when (操作):
        let recent = repo.recent(&room("general"), 3).await.unwrap();

        // then (期待する結果):
        let texts: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
        assert!(recent.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: ルームごとに履歴が分かれている
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.append(room("general"), user("alice"), content("in general"))
            .await
            .unwrap();
        repo.append(room("tech"), user("bob"), content("in tech"))
            .await
            .unwrap();

        // when (操作):
        let general = repo.recent(&room("general"), 100).await.unwrap();

        // then (期待する結果):
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].content.as_str(), "in general");
        assert_eq!(repo.count().await, 2);
    }
}
