//! Domain factories for creating domain entities and value objects.

use super::SessionId;

/// Factory for generating SessionId instances.
///
/// Keeps id generation out of the SessionId value object, which only
/// validates and wraps.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId with a random UUID v4.
    pub fn generate() -> SessionId {
        SessionId::from_uuid(uuid::Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_factory_generate() {
        // テスト項目: SessionIdFactory::generate() で UUID v4 形式の SessionId を生成できる
        // when (操作):
        let session_id = SessionIdFactory::generate();

        // then (期待する結果):
        let id_str = session_id.to_string();
        assert_eq!(id_str.len(), 36); // UUID v4 の標準長（ハイフン含む）
        assert_eq!(session_id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_session_id_factory_generate_uniqueness() {
        // テスト項目: SessionIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let session_id1 = SessionIdFactory::generate();
        let session_id2 = SessionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(session_id1, session_id2);
    }
}
