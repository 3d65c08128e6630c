//! Terminal rendering of chat messages.

use hiroba_server::infrastructure::dto::websocket::MessageDto;
use hiroba_shared::time::format_time_of_day;

/// `[HH:MM:SS] sender: content`
pub fn format_message(message: &MessageDto) -> String {
    format!(
        "[{}] {}: {}",
        format_time_of_day(message.created_at),
        message.sender,
        message.content
    )
}

/// Header printed before a room's history
pub fn format_history_header(room: &str, count: usize) -> String {
    match count {
        0 => format!("--- #{room} (no messages yet) ---"),
        1 => format!("--- #{room} (1 message) ---"),
        n => format!("--- #{room} ({n} messages) ---"),
    }
}
