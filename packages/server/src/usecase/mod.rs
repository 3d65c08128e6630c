//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層と SessionHub を操作します。
//! ルームを変更する操作はすべてそのルームのレーンを保持したまま実行されます。

pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod fetch_history;
pub mod join_room;
pub mod leave_room;
pub mod send_message;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{
    ConnectError, DisconnectError, HistoryError, JoinRoomError, LeaveRoomError, SendMessageError,
};
pub use fetch_history::FetchHistoryUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};

#[cfg(test)]
pub(crate) mod test_support;
