//! Session hub: the live side of the chat server.
//!
//! Owns the room registry, every connected session and its outbound channel,
//! and one lane per active room. Registry membership and session state are
//! only ever changed together, under the same lock.
//!
//! Lock order: room lanes first (sorted by room id), then the state lock.
//! The state lock is never held across an `.await` on anything but itself.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, mpsc};

use crate::domain::{ConnectionSession, RoomId, RoomRegistry, SessionEvent, SessionId};

/// Channel carrying events to one connected session
pub type Outbox = mpsc::UnboundedSender<SessionEvent>;

/// Errors raised by the session hub
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("Session '{0}' is not connected")]
    SessionNotFound(SessionId),

    #[error("Session '{0}' is already registered")]
    SessionAlreadyRegistered(SessionId),
}

struct SessionEntry {
    session: ConnectionSession,
    outbox: Outbox,
}

#[derive(Default)]
struct HubState {
    registry: RoomRegistry,
    sessions: HashMap<SessionId, SessionEntry>,
}

/// Exclusive hold on one or more room lanes.
///
/// Operations that mutate a room (join, leave, send, disconnect) hold its
/// lane for their whole duration, store calls included, so they run one at
/// a time per room while other rooms proceed.
pub struct RoomGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

/// Shared state of all live connections
#[derive(Default)]
pub struct SessionHub {
    state: Mutex<HubState>,
    lanes: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly connected session with its outbound channel
    pub async fn register(&self, session: ConnectionSession, outbox: Outbox) -> Result<(), HubError> {
        let mut state = self.state.lock().await;
        if state.sessions.contains_key(&session.id) {
            return Err(HubError::SessionAlreadyRegistered(session.id));
        }
        state
            .sessions
            .insert(session.id, SessionEntry { session, outbox });
        Ok(())
    }

    /// Remove a session from every room and drop it.
    ///
    /// Returns the rooms it was a member of. Its outbound channel is dropped
    /// here, so nothing can be delivered to it afterwards.
    pub async fn unregister(&self, session_id: SessionId) -> Result<Vec<RoomId>, HubError> {
        let mut state = self.state.lock().await;
        let mut entry = state
            .sessions
            .remove(&session_id)
            .ok_or(HubError::SessionNotFound(session_id))?;
        entry.session.close();
        Ok(state.registry.leave_all(session_id))
    }

    /// Snapshot of a session
    pub async fn session(&self, session_id: SessionId) -> Option<ConnectionSession> {
        let state = self.state.lock().await;
        state
            .sessions
            .get(&session_id)
            .map(|entry| entry.session.clone())
    }

    /// Move a session into `room`, leaving its previous room.
    ///
    /// Returns the previous room, which may equal `room` when re-joining.
    pub async fn enter_room(
        &self,
        session_id: SessionId,
        room: &RoomId,
    ) -> Result<Option<RoomId>, HubError> {
        let mut guard = self.state.lock().await;
        let HubState { registry, sessions } = &mut *guard;
        let entry = sessions
            .get_mut(&session_id)
            .ok_or(HubError::SessionNotFound(session_id))?;

        let previous = entry.session.enter(room.clone());
        if let Some(previous) = previous.as_ref().filter(|previous| *previous != room) {
            registry.leave(previous, session_id);
        }
        registry.join(room, session_id);
        Ok(previous)
    }

    /// Take a session out of its current room
    pub async fn exit_room(&self, session_id: SessionId) -> Result<Option<RoomId>, HubError> {
        let mut guard = self.state.lock().await;
        let HubState { registry, sessions } = &mut *guard;
        let entry = sessions
            .get_mut(&session_id)
            .ok_or(HubError::SessionNotFound(session_id))?;

        let previous = entry.session.exit();
        if let Some(previous) = &previous {
            registry.leave(previous, session_id);
        }
        Ok(previous)
    }

    /// Send an event to one session.
    ///
    /// Returns `false` if the session is gone or its channel is closed.
    pub async fn deliver(&self, session_id: SessionId, event: SessionEvent) -> bool {
        let state = self.state.lock().await;
        match state.sessions.get(&session_id) {
            Some(entry) => entry.outbox.send(event).is_ok(),
            None => false,
        }
    }

    /// Send an event to every current member of `room`.
    ///
    /// Returns the number of sessions the event was handed to.
    pub async fn fan_out(&self, room: &RoomId, event: SessionEvent) -> usize {
        let state = self.state.lock().await;
        let mut delivered = 0;
        for member in state.registry.members(room) {
            let Some(entry) = state.sessions.get(&member) else {
                continue;
            };
            if entry.outbox.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::warn!("Failed to deliver event to session '{}' in room '{}'", member, room);
            }
        }
        tracing::debug!("Fanned out event to {} session(s) in room '{}'", delivered, room);
        delivered
    }

    pub async fn is_member(&self, room: &RoomId, session_id: SessionId) -> bool {
        let state = self.state.lock().await;
        state.registry.contains(room, session_id)
    }

    pub async fn members(&self, room: &RoomId) -> Vec<SessionId> {
        let state = self.state.lock().await;
        state.registry.members(room)
    }

    pub async fn rooms_of(&self, session_id: SessionId) -> Vec<RoomId> {
        let state = self.state.lock().await;
        state.registry.rooms_of(session_id)
    }

    /// Active rooms and their member counts
    pub async fn rooms(&self) -> Vec<(RoomId, usize)> {
        let state = self.state.lock().await;
        state.registry.rooms()
    }

    #[cfg(test)]
    pub(crate) async fn session_count(&self) -> usize {
        let state = self.state.lock().await;
        state.sessions.len()
    }

    /// Acquire the lanes of `rooms`.
    ///
    /// Lanes are taken in room id order so two operations spanning the same
    /// pair of rooms cannot deadlock.
    pub async fn lock_rooms(&self, rooms: &[RoomId]) -> RoomGuard {
        let mut rooms: Vec<&RoomId> = rooms.iter().collect();
        rooms.sort();
        rooms.dedup();

        let lanes: Vec<Arc<Mutex<()>>> = {
            let mut lanes = self.lanes.lock().await;
            rooms
                .into_iter()
                .map(|room| lanes.entry(room.clone()).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(lanes.len());
        for lane in lanes {
            guards.push(lane.lock_owned().await);
        }
        RoomGuard { _guards: guards }
    }

    /// Drop lanes of rooms that are empty and not held by any operation
    pub async fn prune_idle_lanes(&self, rooms: &[RoomId]) {
        let mut lanes = self.lanes.lock().await;
        let state = self.state.lock().await;
        for room in rooms {
            let idle = lanes
                .get(room)
                .is_some_and(|lane| Arc::strong_count(lane) == 1);
            if idle && !state.registry.is_active(room) {
                lanes.remove(room);
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn lane_count(&self) -> usize {
        let lanes = self.lanes.lock().await;
        lanes.len()
    }
}
