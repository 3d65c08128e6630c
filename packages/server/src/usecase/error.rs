//! UseCase 層のエラー定義

use thiserror::Error;

use crate::{
    domain::{RoomId, SessionId, StoreError, ValueObjectError},
    infrastructure::hub::HubError,
};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Session '{0}' is already registered")]
    SessionAlreadyRegistered(SessionId),
}

/// 入室処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    #[error("Session '{0}' is not connected")]
    SessionNotFound(SessionId),
}

/// 退室処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaveRoomError {
    #[error("Session '{0}' is not connected")]
    SessionNotFound(SessionId),
}

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("Session '{0}' is not connected")]
    SessionNotFound(SessionId),

    #[error("Session '{0}' has not joined a room")]
    NotInRoom(SessionId),

    #[error("Invalid message: {0}")]
    InvalidMessage(ValueObjectError),

    #[error("Message addressed to room '{requested}' but session is in '{current}'")]
    RoomMismatch { current: RoomId, requested: RoomId },
}

/// 切断処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    #[error("Session '{0}' is not connected")]
    SessionNotFound(SessionId),
}

/// 履歴取得のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<HubError> for ConnectError {
    fn from(error: HubError) -> Self {
        match error {
            HubError::SessionAlreadyRegistered(id) | HubError::SessionNotFound(id) => {
                ConnectError::SessionAlreadyRegistered(id)
            }
        }
    }
}

impl From<HubError> for JoinRoomError {
    fn from(error: HubError) -> Self {
        match error {
            HubError::SessionNotFound(id) | HubError::SessionAlreadyRegistered(id) => {
                JoinRoomError::SessionNotFound(id)
            }
        }
    }
}

impl From<HubError> for LeaveRoomError {
    fn from(error: HubError) -> Self {
        match error {
            HubError::SessionNotFound(id) | HubError::SessionAlreadyRegistered(id) => {
                LeaveRoomError::SessionNotFound(id)
            }
        }
    }
}

impl From<HubError> for DisconnectError {
    fn from(error: HubError) -> Self {
        match error {
            HubError::SessionNotFound(id) | HubError::SessionAlreadyRegistered(id) => {
                DisconnectError::SessionNotFound(id)
            }
        }
    }
}
