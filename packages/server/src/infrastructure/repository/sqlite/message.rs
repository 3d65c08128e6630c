//! SQLite Message Repository 実装
//!
//! sqlx の SqlitePool を使った永続化ストア。
//! すべてのクエリはタイムアウト付きで実行され、応答しないバックエンドが
//! チャット全体を止めないようにします。

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sqlx::{
    Row,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
};

use crate::domain::{
    ChatMessage, MessageContent, MessageRepository, RoomId, StoreError, Timestamp, Username,
};

const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    room TEXT NOT NULL,
    sender TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL
)
"#;

const CREATE_MESSAGES_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_messages_room_created_at ON messages (room, created_at, id)
"#;

// created_at は同一ルームの直前のメッセージより前にならない
const INSERT_MESSAGE: &str = r#"
INSERT INTO messages (room, sender, content, created_at)
SELECT ?1, ?2, ?3, MAX(?4, COALESCE((SELECT MAX(created_at) FROM messages WHERE room = ?1), 0))
RETURNING created_at
"#;

const SELECT_RECENT: &str = r#"
SELECT sender, content, room, created_at FROM (
    SELECT id, sender, content, room, created_at
    FROM messages
    WHERE room = ?1
    ORDER BY created_at DESC, id DESC
    LIMIT ?2
)
ORDER BY created_at ASC, id ASC
"#;

/// SQLite Message Repository 実装
pub struct SqliteMessageRepository {
    pool: SqlitePool,
    /// クエリごとのタイムアウト
    timeout: Duration,
    ephemeral: bool,
}

impl SqliteMessageRepository {
    /// データベース URL（例: `sqlite://hiroba.db?mode=rwc`）に接続し、スキーマを作成する
    pub async fn connect(database_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let options: SqliteConnectOptions = database_url
            .parse()
            .map_err(|e: sqlx::Error| StoreError::Unavailable(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(timeout)
            .connect_with(options);
        let pool = bounded(timeout, pool).await?;

        let repo = Self {
            pool,
            timeout,
            ephemeral: false,
        };
        repo.migrate().await?;
        Ok(repo)
    }

    /// 使い捨てのインメモリ SQLite に接続する（再起動でデータは失われる）
    pub async fn connect_ephemeral(timeout: Duration) -> Result<Self, StoreError> {
        let options: SqliteConnectOptions = "sqlite::memory:"
            .parse()
            .map_err(|e: sqlx::Error| StoreError::Unavailable(e.to_string()))?;

        // インメモリ DB は接続ごとに別物なので、1 本の接続を保持し続ける
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(timeout)
            .connect_with(options);
        let pool = bounded(timeout, pool).await?;

        let repo = Self {
            pool,
            timeout,
            ephemeral: true,
        };
        repo.migrate().await?;
        Ok(repo)
    }

    /// 永続化されないインメモリ DB かどうか
    #[cfg(test)]
    fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        bounded(self.timeout, sqlx::query(CREATE_MESSAGES_TABLE).execute(&self.pool)).await?;
        bounded(self.timeout, sqlx::query(CREATE_MESSAGES_INDEX).execute(&self.pool)).await?;
        Ok(())
    }
}

/// Run a sqlx future with an upper time bound.
async fn bounded<T, F>(timeout: Duration, future: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result.map_err(|e| StoreError::Unavailable(e.to_string())),
        Err(_) => Err(StoreError::Timeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

fn message_from_row(row: &SqliteRow) -> Result<ChatMessage, StoreError> {
    let corrupted = |e: String| StoreError::Corrupted(e);

    let sender: String = row.try_get("sender").map_err(|e| corrupted(e.to_string()))?;
    let content: String = row.try_get("content").map_err(|e| corrupted(e.to_string()))?;
    let room: String = row.try_get("room").map_err(|e| corrupted(e.to_string()))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| corrupted(e.to_string()))?;

    Ok(ChatMessage::new(
        Username::new(sender).map_err(|e| corrupted(e.to_string()))?,
        MessageContent::new(content).map_err(|e| corrupted(e.to_string()))?,
        RoomId::new(room).map_err(|e| corrupted(e.to_string()))?,
        Timestamp::new(created_at),
    ))
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn append(
        &self,
        room: RoomId,
        sender: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, StoreError> {
        let now = Timestamp::now();
        let row = bounded(
            self.timeout,
            sqlx::query(INSERT_MESSAGE)
                .bind(room.as_str())
                .bind(sender.as_str())
                .bind(content.as_str())
                .bind(now.value())
                .fetch_one(&self.pool),
        )
        .await?;

        let created_at: i64 = row
            .try_get("created_at")
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;

        Ok(ChatMessage::new(
            sender,
            content,
            room,
            Timestamp::new(created_at),
        ))
    }

    async fn recent(&self, room: &RoomId, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = bounded(
            self.timeout,
            sqlx::query(SELECT_RECENT)
                .bind(room.as_str())
                .bind(limit)
                .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(message_from_row).collect()
    }

    fn backend(&self) -> &'static str {
        if self.ephemeral {
            "sqlite-memory"
        } else {
            "sqlite"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - SqliteMessageRepository の append / recent（インメモリ SQLite を使用）
    // - 最新 N 件が古い順で返ること
    // - 接続できない URL でエラーになること
    // ========================================

    const TIMEOUT: Duration = Duration::from_secs(5);

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
        // テスト項目: 追加したメッセージが同じ内容で取得できる
        // given (前提条件):
        let repo = SqliteMessageRepository::connect_ephemeral(TIMEOUT)
            .await
            .unwrap();
        let before = Timestamp::now();

        // when (操作):
        let stored = repo
            .append(room("general"), user("alice"), content("hi"))
            .await
            .unwrap();
        let recent = repo.recent(&room("general"), 100).await.unwrap();

        // then (期待する結果):
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0], stored);
        assert_eq!(recent[0].sender.as_str(), "alice");
        assert_eq!(recent[0].content.as_str(), "hi");
        assert!(stored.created_at >= before);
        assert!(repo.is_ephemeral());
        assert_eq!(repo.backend(), "sqlite-memory");
    }

    #[tokio::test]
    async fn test_recent_returns_latest_oldest_first() {
        // テスト項目: 105 件保存したとき、最新 100 件が古い順で返される
        // given (前提条件):
        let repo = SqliteMessageRepository::connect_ephemeral(TIMEOUT)
            .await
            .unwrap();
        for i in 0..105 {
            repo.append(room("general"), user("alice"), content(&format!("m{i}")))
                .await
                .unwrap();
        }

        // when (操作):
        let recent = repo.recent(&room("general"), 100).await.unwrap();

        // then (期待する結果):
        assert_eq!(recent.len(), 100);
        assert_eq!(recent[0].content.as_str(), "m5");
        assert_eq!(recent[99].content.as_str(), "m104");
        assert!(recent.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_recent_unknown_room_is_empty() {
        // テスト項目: メッセージのないルームは空の履歴を返す
        let repo = SqliteMessageRepository::connect_ephemeral(TIMEOUT)
            .await
            .unwrap();
        repo.append(room("general"), user("alice"), content("hi"))
            .await
            .unwrap();

        let recent = repo.recent(&room("tech"), 100).await.unwrap();

        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn test_connect_invalid_url_fails() {
        // テスト項目: 開けないデータベースへの接続はエラーになる
        // when (操作):
        let result = SqliteMessageRepository::connect(
            "sqlite:///nonexistent-dir/hiroba/chat.db?mode=ro",
            Duration::from_millis(500),
        )
        .await;

        // then (期待する結果):
        assert!(result.is_err());
    }
}
