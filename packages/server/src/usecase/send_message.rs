//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化とルーム内ブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身を含むルームの全メンバーに届くことを保証
//! - 各メンバーが永続化と同じ順序で受け取ることを確認
//! - 他のルームにメッセージが漏れないことを確認
//! - ストア障害時にもブロードキャストは行われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数メンバーのルームで送信、連続送信
//! - 異常系：未入室、空白のみの本文、宛先ルームの不一致、ストア障害

use std::sync::Arc;

use crate::{
    domain::{
        ChatMessage, MessageContent, MessageRepository, RoomId, SessionEvent, SessionId, Timestamp,
    },
    infrastructure::hub::SessionHub,
};

use super::error::SendMessageError;

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// ブロードキャストしたメッセージ
    pub message: ChatMessage,
    /// ストアに保存できたか
    pub persisted: bool,
    /// 配信できたセッション数（送信者を含む）
    pub recipients: usize,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    hub: Arc<SessionHub>,
    store: Arc<dyn MessageRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(hub: Arc<SessionHub>, store: Arc<dyn MessageRepository>) -> Self {
        Self { hub, store }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 送信者のセッション
    /// * `content` - 本文（空白のみは不可）
    /// * `requested_room` - クライアントが指定した宛先ルーム（任意）
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - ブロードキャスト済みのメッセージ
    /// * `Err(SendMessageError)` - 送信できない状態、または不正な本文
    pub async fn execute(
        &self,
        session_id: SessionId,
        content: String,
        requested_room: Option<RoomId>,
    ) -> Result<SendOutcome, SendMessageError> {
        let session = self
            .hub
            .session(session_id)
            .await
            .ok_or(SendMessageError::SessionNotFound(session_id))?;

        // 1. 入室中のルームを確認
        let room = session
            .current_room()
            .cloned()
            .ok_or(SendMessageError::NotInRoom(session_id))?;
        if let Some(requested) = requested_room.filter(|requested| *requested != room) {
            return Err(SendMessageError::RoomMismatch {
                current: room,
                requested,
            });
        }

        // 2. 本文を検証
        let content = MessageContent::new(content).map_err(SendMessageError::InvalidMessage)?;

        // 3. ルームのレーンを保持したまま保存と配信を行う
        let guard = self.hub.lock_rooms(std::slice::from_ref(&room)).await;
        if !self.hub.is_member(&room, session_id).await {
            return Err(SendMessageError::NotInRoom(session_id));
        }

        let (message, persisted) = match self
            .store
            .append(room.clone(), session.username.clone(), content.clone())
            .await
        {
            Ok(message) => (message, true),
            Err(e) => {
                tracing::error!(
                    "Failed to persist message from '{}' in room '{}': {}",
                    session.username,
                    room,
                    e
                );
                let message = ChatMessage::new(session.username, content, room.clone(), Timestamp::now());
                (message, false)
            }
        };

        let recipients = self
            .hub
            .fan_out(&room, SessionEvent::NewMessage(message.clone()))
            .await;
        drop(guard);

        tracing::info!(
            "Message from '{}' delivered to {} session(s) in room '{}'",
            message.sender,
            recipients,
            room
        );

        Ok(SendOutcome {
            message,
            persisted,
            recipients,
        })
    }
}
