//! Local view of the room being displayed.
//!
//! Only server-confirmed messages are shown. Switching rooms clears the view;
//! it is filled again by the next `message_history`.

use hiroba_server::infrastructure::dto::websocket::{MessageDto, ServerEvent};

/// What the terminal should do after an event was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Redraw with the full history of `room`
    Replaced { room: String, messages: Vec<MessageDto> },
    /// Print one new message
    Appended(MessageDto),
    /// Event belongs to a room that is not displayed
    Ignored,
}

#[derive(Debug, Default)]
pub struct ChatView {
    room: Option<String>,
    messages: Vec<MessageDto>,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn messages(&self) -> &[MessageDto] {
        &self.messages
    }

    /// Start displaying `room`, dropping whatever was shown
    pub fn switch_to(&mut self, room: &str) {
        self.room = Some(room.to_string());
        self.messages.clear();
    }

    /// Stop displaying any room
    pub fn leave(&mut self) {
        self.room = None;
        self.messages.clear();
    }

    pub fn apply(&mut self, event: ServerEvent) -> ViewUpdate {
        match event {
            ServerEvent::MessageHistory(history) => {
                if self.room.as_deref() != Some(history.room.as_str()) {
                    return ViewUpdate::Ignored;
                }
                self.messages = history.messages.clone();
                ViewUpdate::Replaced {
                    room: history.room,
                    messages: history.messages,
                }
            }
            ServerEvent::ReceiveMessage(message) => {
                if self.room.as_deref() != Some(message.room.as_str()) {
                    return ViewUpdate::Ignored;
                }
                self.messages.push(message.clone());
                ViewUpdate::Appended(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiroba_server::infrastructure::dto::websocket::HistoryPayload;

    fn message(room: &str, content: &str) -> MessageDto {
        MessageDto {
            sender: "alice".to_string(),
            content: content.to_string(),
            room: room.to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    fn history(room: &str, messages: Vec<MessageDto>) -> ServerEvent {
        ServerEvent::MessageHistory(HistoryPayload {
            room: room.to_string(),
            messages,
        })
    }

    #[test]
    fn test_history_replaces_view() {
        // テスト項目: message_history は表示内容を置き換える
        // given (前提条件):
        let mut view = ChatView::new();
        view.switch_to("general");
        view.apply(ServerEvent::ReceiveMessage(message("general", "old")));

        // when (操作):
        let update = view.apply(history("general", vec![message("general", "a")]));

        // then (期待する結果):
        assert!(matches!(update, ViewUpdate::Replaced { .. }));
        assert_eq!(view.messages(), &[message("general", "a")]);
    }

    #[test]
    fn test_receive_message_appends_for_current_room() {
        // テスト項目: 表示中のルームのメッセージは末尾に追加される
        let mut view = ChatView::new();
        view.switch_to("general");

        let update = view.apply(ServerEvent::ReceiveMessage(message("general", "hi")));

        assert_eq!(update, ViewUpdate::Appended(message("general", "hi")));
        assert_eq!(view.messages().len(), 1);
    }

    #[test]
    fn test_other_room_events_are_ignored() {
        // テスト項目: 表示中でないルームのイベントは無視される
        // given (前提条件):
        let mut view = ChatView::new();
        view.switch_to("tech");

        // when (操作):
        let live = view.apply(ServerEvent::ReceiveMessage(message("general", "late")));
        let stale = view.apply(history("general", vec![message("general", "x")]));

        // then (期待する結果):
        assert_eq!(live, ViewUpdate::Ignored);
        assert_eq!(stale, ViewUpdate::Ignored);
        assert!(view.messages().is_empty());
    }

    #[test]
    fn test_switch_clears_view() {
        // テスト項目: ルームを切り替えると表示がクリアされる
        let mut view = ChatView::new();
        view.switch_to("general");
        view.apply(ServerEvent::ReceiveMessage(message("general", "hi")));

        view.switch_to("tech");

        assert_eq!(view.room(), Some("tech"));
        assert!(view.messages().is_empty());
    }

    #[test]
    fn test_leave_ignores_everything() {
        // テスト項目: 退室後はどのルームのイベントも表示しない
        let mut view = ChatView::new();
        view.switch_to("general");
        view.leave();

        let update = view.apply(ServerEvent::ReceiveMessage(message("general", "hi")));

        assert_eq!(update, ViewUpdate::Ignored);
        assert_eq!(view.room(), None);
    }
}
