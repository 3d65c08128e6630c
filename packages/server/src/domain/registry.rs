//! Room membership registry.
//!
//! Maps each active room to the sessions currently in it. A room exists here
//! only while it has at least one member; its messages live in the message
//! store independently of this table.

use std::collections::{BTreeMap, BTreeSet};

use super::value_object::{RoomId, SessionId};

/// In-memory room membership table
#[derive(Debug, Default, Clone)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, BTreeSet<SessionId>>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `session` to `room`.
    ///
    /// Returns `false` if the session was already a member.
    pub fn join(&mut self, room: &RoomId, session: SessionId) -> bool {
        self.rooms.entry(room.clone()).or_default().insert(session)
    }

    /// Remove `session` from `room`.
    ///
    /// Returns `false` if the session was not a member. The room entry is
    /// discarded once its last member leaves.
    pub fn leave(&mut self, room: &RoomId, session: SessionId) -> bool {
        let Some(members) = self.rooms.get_mut(room) else {
            return false;
        };
        let removed = members.remove(&session);
        if members.is_empty() {
            self.rooms.remove(room);
        }
        removed
    }

    /// Remove `session` from every room, returning the rooms it left
    pub fn leave_all(&mut self, session: SessionId) -> Vec<RoomId> {
        let rooms: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|(_, members)| members.contains(&session))
            .map(|(room, _)| room.clone())
            .collect();
        for room in &rooms {
            self.leave(room, session);
        }
        rooms
    }

    /// Current members of `room`; empty if the room is unknown
    pub fn members(&self, room: &RoomId) -> Vec<SessionId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &RoomId, session: SessionId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains(&session))
    }

    /// Rooms the session is a member of
    pub fn rooms_of(&self, session: SessionId) -> Vec<RoomId> {
        self.rooms
            .iter()
            .filter(|(_, members)| members.contains(&session))
            .map(|(room, _)| room.clone())
            .collect()
    }

    /// Active rooms with their member counts, sorted by room id
    pub fn rooms(&self) -> Vec<(RoomId, usize)> {
        self.rooms
            .iter()
            .map(|(room, members)| (room.clone(), members.len()))
            .collect()
    }

    pub fn is_active(&self, room: &RoomId) -> bool {
        self.rooms.contains_key(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::SessionIdFactory;

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_join_adds_member() {
        // テスト項目: join したセッションがメンバーに含まれる
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let alice = SessionIdFactory::generate();

        // when (操作):
        let added = registry.join(&room("general"), alice);

        // then (期待する結果):
        assert!(added);
        assert_eq!(registry.members(&room("general")), vec![alice]);
        assert!(registry.contains(&room("general"), alice));
    }

    #[test]
    fn test_join_is_idempotent() {
        // テスト項目: 同じルームに 2 回 join してもメンバーは 1 人
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let alice = SessionIdFactory::generate();
        registry.join(&room("general"), alice);

        // when (操作):
        let added = registry.join(&room("general"), alice);

        // then (期待する結果):
        assert!(!added);
        assert_eq!(registry.members(&room("general")).len(), 1);
    }

    #[test]
    fn test_leave_discards_empty_room() {
        // テスト項目: 最後のメンバーが抜けるとルームが消える
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let alice = SessionIdFactory::generate();
        registry.join(&room("general"), alice);

        // when (操作):
        let removed = registry.leave(&room("general"), alice);

        // then (期待する結果):
        assert!(removed);
        assert!(!registry.is_active(&room("general")));
        assert!(registry.rooms().is_empty());
    }

    #[test]
    fn test_leave_absent_is_noop() {
        // テスト項目: メンバーでないセッションの leave は何もしない
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let alice = SessionIdFactory::generate();
        let bob = SessionIdFactory::generate();
        registry.join(&room("general"), alice);

        // when (操作):
        let removed_unknown_room = registry.leave(&room("tech"), alice);
        let removed_non_member = registry.leave(&room("general"), bob);

        // then (期待する結果):
        assert!(!removed_unknown_room);
        assert!(!removed_non_member);
        assert_eq!(registry.members(&room("general")), vec![alice]);
    }

    #[test]
    fn test_members_of_unknown_room_is_empty() {
        // テスト項目: 存在しないルームのメンバーは空
        let registry = RoomRegistry::new();
        assert!(registry.members(&room("nowhere")).is_empty());
    }

    #[test]
    fn test_leave_all_removes_from_every_room() {
        // テスト項目: leave_all で全ルームから削除され、他のメンバーは残る
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let alice = SessionIdFactory::generate();
        let bob = SessionIdFactory::generate();
        registry.join(&room("general"), alice);
        registry.join(&room("tech"), alice);
        registry.join(&room("tech"), bob);

        // when (操作):
        let left = registry.leave_all(alice);

        // then (期待する結果):
        assert_eq!(left, vec![room("general"), room("tech")]);
        assert!(!registry.is_active(&room("general")));
        assert_eq!(registry.members(&room("tech")), vec![bob]);
        assert!(registry.rooms_of(alice).is_empty());
    }

    #[test]
    fn test_rooms_reports_member_counts() {
        // テスト項目: アクティブなルームとメンバー数が ID 順に返される
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.join(&room("tech"), SessionIdFactory::generate());
        registry.join(&room("general"), SessionIdFactory::generate());
        registry.join(&room("general"), SessionIdFactory::generate());

        // when (操作):
        let rooms = registry.rooms();

        // then (期待する結果):
        assert_eq!(rooms, vec![(room("general"), 2), (room("tech"), 1)]);
    }
}
