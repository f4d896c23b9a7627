//! Room store
//!
//! Rooms live in a sharded concurrent map keyed by room code. Every
//! state-changing operation runs its read-check-write cycle under the
//! entry lock, which is the store's transaction boundary: capacity checks
//! cannot interleave with inserts, and the sweeper cannot delete a room
//! mid-join.

use chrono::{DateTime, Duration, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Participant, Room, RoomStatus},
};

/// Why the sweeper removed a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepReason {
    /// Active session exceeded the maximum session length
    SessionExpired,
    /// Room sat with zero active participants past the threshold
    LongEmpty,
}

/// Concurrent store for rooms and their participants
#[derive(Default)]
pub struct RoomStore {
    rooms: DashMap<String, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Insert a new room unless its code is already taken.
    ///
    /// Returns `false` on collision so callers can redraw the code.
    pub fn try_insert(&self, room: Room) -> bool {
        match self.rooms.entry(room.code.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(room);
                true
            }
        }
    }

    /// Fetch a snapshot of one room
    pub fn find(&self, code: &str) -> Option<Room> {
        self.rooms.get(code).map(|r| r.value().clone())
    }

    /// Add the user as an active participant.
    ///
    /// Idempotent for users that already hold an active record. Fails when
    /// the room has completed or is at capacity. Clears the empty-since
    /// marker on success.
    pub fn join(
        &self,
        code: &str,
        user_id: Uuid,
        username: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Room> {
        let mut room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| AppError::NotFound(format!("Room {code} not found")))?;

        if room.status == RoomStatus::Completed {
            return Err(AppError::InvalidState(
                "Room has already completed".to_string(),
            ));
        }

        if room.has_active_participant(&user_id) {
            return Ok(room.clone());
        }

        if room.active_count() as u32 >= room.max_participants {
            return Err(AppError::RoomFull);
        }

        room.participants.push(Participant {
            user_id,
            username: username.to_string(),
            joined_at: now,
            is_ready: false,
            left_at: None,
        });
        room.empty_since = None;

        Ok(room.clone())
    }

    /// Soft-delete the user's active participant record.
    ///
    /// Stamps the room's empty-since marker when the last active
    /// participant leaves.
    pub fn leave(&self, code: &str, user_id: &Uuid, now: DateTime<Utc>) -> AppResult<Room> {
        let mut room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| AppError::NotFound(format!("Room {code} not found")))?;

        let participant = room
            .participants
            .iter_mut()
            .find(|p| p.user_id == *user_id && p.left_at.is_none())
            .ok_or_else(|| AppError::NotFound("Participant not found in room".to_string()))?;

        participant.left_at = Some(now);

        if room.active_count() == 0 {
            room.empty_since = Some(now);
        }

        Ok(room.clone())
    }

    /// Update the ready flag on the user's active participant record
    pub fn set_ready(&self, code: &str, user_id: &Uuid, ready: bool) -> AppResult<Room> {
        let mut room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| AppError::NotFound(format!("Room {code} not found")))?;

        let participant = room
            .participants
            .iter_mut()
            .find(|p| p.user_id == *user_id && p.left_at.is_none())
            .ok_or_else(|| AppError::NotFound("Participant not found in room".to_string()))?;

        participant.is_ready = ready;

        Ok(room.clone())
    }

    /// Transition `waiting -> active`, binding the resolved problem.
    ///
    /// Only the creator may start, and only from `waiting`.
    pub fn start(
        &self,
        code: &str,
        requester_id: &Uuid,
        problem_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Room> {
        let mut room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| AppError::NotFound(format!("Room {code} not found")))?;

        if room.created_by != *requester_id {
            return Err(AppError::Forbidden(
                "Only the room creator can start the room".to_string(),
            ));
        }

        if room.status != RoomStatus::Waiting {
            return Err(AppError::InvalidState(format!(
                "Room is {} and cannot be started",
                room.status
            )));
        }

        room.problem_id = Some(problem_id);
        room.status = RoomStatus::Active;
        room.started_at = Some(now);

        Ok(room.clone())
    }

    /// Transition to `completed`, recording the winner.
    ///
    /// Idempotent: returns `(room, false)` when the room had already
    /// completed, leaving the recorded winner untouched.
    pub fn complete(&self, code: &str, winner_id: &Uuid) -> AppResult<(Room, bool)> {
        let mut room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| AppError::NotFound(format!("Room {code} not found")))?;

        if room.status == RoomStatus::Completed {
            return Ok((room.clone(), false));
        }

        room.status = RoomStatus::Completed;
        room.winner_id = Some(*winner_id);

        Ok((room.clone(), true))
    }

    /// Physically remove a room and its participants (creator only)
    pub fn remove(&self, code: &str, requester_id: &Uuid) -> AppResult<()> {
        match self.rooms.entry(code.to_string()) {
            Entry::Occupied(occupied) => {
                if occupied.get().created_by != *requester_id {
                    return Err(AppError::Forbidden(
                        "Only the room creator can delete the room".to_string(),
                    ));
                }
                occupied.remove();
                Ok(())
            }
            Entry::Vacant(_) => Err(AppError::NotFound(format!("Room {code} not found"))),
        }
    }

    /// Apply the staleness rules to a single room under its entry lock.
    ///
    /// Deletes the room when its active session has run past
    /// `max_session`, or when it has been empty past `max_empty` and a
    /// recount still finds zero active participants. A stale empty-since
    /// marker (participant present at recount) is cleared, not deleted.
    pub fn sweep_room(
        &self,
        code: &str,
        now: DateTime<Utc>,
        max_session: Duration,
        max_empty: Duration,
    ) -> Option<SweepReason> {
        match self.rooms.entry(code.to_string()) {
            Entry::Occupied(mut occupied) => {
                let room = occupied.get();

                if room.status == RoomStatus::Active
                    && room.started_at.is_some_and(|s| now - s >= max_session)
                {
                    occupied.remove();
                    return Some(SweepReason::SessionExpired);
                }

                if let Some(empty_since) = room.empty_since {
                    if now - empty_since >= max_empty {
                        if room.active_count() == 0 {
                            occupied.remove();
                            return Some(SweepReason::LongEmpty);
                        }
                        // Marker survived a rejoin race; clear it.
                        occupied.get_mut().empty_since = None;
                    }
                }

                None
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Snapshot of every room (unordered)
    pub fn snapshot(&self) -> Vec<Room> {
        self.rooms.iter().map(|r| r.value().clone()).collect()
    }

    /// Rooms where the user holds an active participant record
    pub fn rooms_for_user(&self, user_id: &Uuid) -> Vec<Room> {
        self.rooms
            .iter()
            .filter(|r| r.has_active_participant(user_id))
            .map(|r| r.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{ProblemSelectionMode, Visibility};

    fn room(code: &str, creator: Uuid) -> Room {
        Room {
            code: code.to_string(),
            created_by: creator,
            problem_id: Some(Uuid::new_v4()),
            mode: ProblemSelectionMode::Single,
            max_participants: 2,
            visibility: Visibility::Public,
            status: RoomStatus::Waiting,
            created_at: Utc::now(),
            started_at: None,
            winner_id: None,
            empty_since: None,
            participants: Vec::new(),
        }
    }

    #[test]
    fn test_try_insert_rejects_duplicate_codes() {
        let store = RoomStore::new();
        let creator = Uuid::new_v4();

        assert!(store.try_insert(room("AB12CD", creator)));
        assert!(!store.try_insert(room("AB12CD", creator)));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_join_completed_room_is_invalid_state() {
        let store = RoomStore::new();
        let creator = Uuid::new_v4();
        store.try_insert(room("AB12CD", creator));
        store.complete("AB12CD", &creator).unwrap();

        let err = store
            .join("AB12CD", Uuid::new_v4(), "late", Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn test_leave_without_membership_is_not_found() {
        let store = RoomStore::new();
        store.try_insert(room("AB12CD", Uuid::new_v4()));

        let err = store
            .leave("AB12CD", &Uuid::new_v4(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_complete_keeps_first_winner() {
        let store = RoomStore::new();
        let creator = Uuid::new_v4();
        store.try_insert(room("AB12CD", creator));

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let (_, newly) = store.complete("AB12CD", &first).unwrap();
        assert!(newly);
        let (room, newly) = store.complete("AB12CD", &second).unwrap();
        assert!(!newly);
        assert_eq!(room.winner_id, Some(first));
    }

    #[test]
    fn test_last_leave_stamps_empty_since_and_join_clears_it() {
        let store = RoomStore::new();
        let creator = Uuid::new_v4();
        store.try_insert(room("AB12CD", creator));

        let user = Uuid::new_v4();
        let now = Utc::now();
        store.join("AB12CD", user, "solo", now).unwrap();

        let left = store.leave("AB12CD", &user, now).unwrap();
        assert_eq!(left.empty_since, Some(now));

        let rejoined = store.join("AB12CD", user, "solo", now).unwrap();
        assert!(rejoined.empty_since.is_none());
        assert_eq!(rejoined.active_count(), 1);
    }
}
