//! Room lifecycle service
//!
//! Owns the room state machine: create, join, leave, ready-toggle, start,
//! complete, delete. Capacity, ownership and status gating are enforced by
//! the store's atomic mutations; this layer adds code generation, catalog
//! lookups and notifications.

use chrono::Utc;
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use crate::{
    constants::{ROOM_CODE_ALPHABET, ROOM_CODE_LENGTH},
    error::{AppError, AppResult},
    handlers::rooms::{
        request::CreateRoomRequest,
        response::{RoomListResponse, RoomResponse},
    },
    models::{Participant, ProblemSelectionMode, Room, RoomStatus, Visibility},
    notify::RoomEvent,
    state::AppState,
};

/// Room service for business logic
pub struct RoomService;

impl RoomService {
    /// Create a new room with the creator auto-joined as first participant
    pub async fn create_room(
        state: &AppState,
        payload: CreateRoomRequest,
    ) -> AppResult<RoomResponse> {
        if payload.mode == ProblemSelectionMode::Single && payload.problem_id.is_none() {
            return Err(AppError::Validation(
                "A problem must be selected for single-problem rooms".to_string(),
            ));
        }

        state
            .users()
            .get_or_create(payload.user_id, &payload.username);

        let now = Utc::now();
        let creator = Participant {
            user_id: payload.user_id,
            username: payload.username.clone(),
            joined_at: now,
            is_ready: false,
            left_at: None,
        };

        // Redraw on code collision; the store's insert is the uniqueness check.
        let room = loop {
            let code = generate_room_code();
            let candidate = Room {
                code: code.clone(),
                created_by: payload.user_id,
                problem_id: match payload.mode {
                    ProblemSelectionMode::Single => payload.problem_id,
                    ProblemSelectionMode::Random => None,
                },
                mode: payload.mode,
                max_participants: payload
                    .max_participants
                    .unwrap_or(crate::constants::DEFAULT_MAX_PARTICIPANTS),
                visibility: payload.visibility.unwrap_or(Visibility::Public),
                status: RoomStatus::Waiting,
                created_at: now,
                started_at: None,
                winner_id: None,
                empty_since: None,
                participants: vec![creator.clone()],
            };

            if state.rooms().try_insert(candidate.clone()) {
                break candidate;
            }
            tracing::debug!(%code, "Room code collision, redrawing");
        };

        tracing::info!(code = %room.code, creator = %payload.user_id, "Room created");

        Ok(RoomResponse::from_room(&room))
    }

    /// Join an existing room; idempotent for current members
    pub async fn join_room(
        state: &AppState,
        code: &str,
        user_id: Uuid,
        username: &str,
    ) -> AppResult<RoomResponse> {
        let code = normalize_code(code);

        state.users().get_or_create(user_id, username);

        let room = state.rooms().join(&code, user_id, username, Utc::now())?;

        tracing::info!(code = %code, user = %user_id, "User joined room");

        Ok(RoomResponse::from_room(&room))
    }

    /// Leave a room
    pub async fn leave_room(state: &AppState, code: &str, user_id: &Uuid) -> AppResult<()> {
        let code = normalize_code(code);

        let room = state.rooms().leave(&code, user_id, Utc::now())?;

        tracing::info!(code = %code, user = %user_id, "User left room");
        if room.empty_since.is_some() {
            tracing::debug!(code = %code, "Room is now empty");
        }

        Ok(())
    }

    /// Update the ready flag for a participant.
    ///
    /// Readiness is informational; it does not gate the start transition.
    pub async fn set_ready(
        state: &AppState,
        code: &str,
        user_id: &Uuid,
        ready: bool,
    ) -> AppResult<()> {
        let code = normalize_code(code);

        state.rooms().set_ready(&code, user_id, ready)?;

        Ok(())
    }

    /// Start a room (creator only), drawing a problem first when the room
    /// is in random mode
    pub async fn start_room(
        state: &AppState,
        code: &str,
        requester_id: &Uuid,
    ) -> AppResult<RoomResponse> {
        let code = normalize_code(code);

        let room = state
            .rooms()
            .find(&code)
            .ok_or_else(|| AppError::NotFound(format!("Room {code} not found")))?;

        let problem_id = match room.mode {
            ProblemSelectionMode::Single => room.problem_id.ok_or_else(|| {
                AppError::Validation("Room has no problem selected".to_string())
            })?,
            ProblemSelectionMode::Random => {
                let ids = state.catalog().list_problem_ids().await?;
                if ids.is_empty() {
                    return Err(AppError::Unavailable(
                        "No problems available for random selection".to_string(),
                    ));
                }
                *ids.choose(&mut rand::rng()).expect("non-empty id list")
            }
        };

        // The store re-checks ownership and status under the entry lock;
        // the read above only resolved the problem.
        let room = state
            .rooms()
            .start(&code, requester_id, problem_id, Utc::now())?;

        tracing::info!(code = %code, problem = %problem_id, "Room started");

        Ok(RoomResponse::from_room(&room))
    }

    /// Mark a room completed with its winner; idempotent no-op when the
    /// room already completed
    pub async fn complete_room(state: &AppState, code: &str, winner_id: &Uuid) -> AppResult<()> {
        let code = normalize_code(code);

        let (room, newly_completed) = state.rooms().complete(&code, winner_id)?;

        if newly_completed {
            tracing::info!(code = %code, winner = %winner_id, "Room completed");
            state.notifier().publish(RoomEvent {
                room_code: room.code,
                status: room.status,
                winner_id: room.winner_id,
            });
        }

        Ok(())
    }

    /// Delete a room and its participants (creator only, any status)
    pub async fn delete_room(state: &AppState, code: &str, requester_id: &Uuid) -> AppResult<()> {
        let code = normalize_code(code);

        state.rooms().remove(&code, requester_id)?;

        tracing::info!(code = %code, "Room deleted");

        Ok(())
    }

    /// Room snapshot with active participants in join order
    pub async fn get_room_details(state: &AppState, code: &str) -> AppResult<RoomResponse> {
        let code = normalize_code(code);

        let room = state
            .rooms()
            .find(&code)
            .ok_or_else(|| AppError::NotFound(format!("Room {code} not found")))?;

        Ok(RoomResponse::from_room(&room))
    }

    /// Rooms where the user is an active participant, most recent join
    /// first
    pub async fn list_user_rooms(state: &AppState, user_id: &Uuid) -> AppResult<RoomListResponse> {
        let mut rooms = state.rooms().rooms_for_user(user_id);

        rooms.sort_by_key(|room| {
            std::cmp::Reverse(
                room.active_participants()
                    .find(|p| p.user_id == *user_id)
                    .map(|p| p.joined_at),
            )
        });

        let rooms: Vec<RoomResponse> = rooms.iter().map(RoomResponse::from_room).collect();
        let total = rooms.len();

        Ok(RoomListResponse { rooms, total })
    }

    /// Public rooms in `waiting` or `active`, newest first
    pub async fn list_public_rooms(state: &AppState) -> AppResult<RoomListResponse> {
        let mut rooms: Vec<Room> = state
            .rooms()
            .snapshot()
            .into_iter()
            .filter(|room| {
                room.visibility == Visibility::Public
                    && matches!(room.status, RoomStatus::Waiting | RoomStatus::Active)
            })
            .collect();

        rooms.sort_by_key(|room| std::cmp::Reverse(room.created_at));

        let rooms: Vec<RoomResponse> = rooms.iter().map(RoomResponse::from_room).collect();
        let total = rooms.len();

        Ok(RoomListResponse { rooms, total })
    }
}

/// Normalize a user-supplied room code for lookup
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Draw a six-character code from the room alphabet.
///
/// Uniqueness is not assumed; callers must check against the live store.
fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ROOM_CODE_ALPHABET.len());
            ROOM_CODE_ALPHABET[idx] as char
        })
        .collect()
}
