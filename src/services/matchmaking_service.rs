//! Matchmaking service
//!
//! Quick-join: fill the most under-populated joinable public room so rooms
//! reach a startable size quickly, falling back to creating a fresh public
//! room with the caller's preferences.

use crate::{
    error::AppResult,
    handlers::rooms::{
        request::{CreateRoomRequest, RandomJoinRequest},
        response::RoomResponse,
    },
    models::{ProblemSelectionMode, Room, RoomStatus, Visibility},
    state::AppState,
};

use super::room_service::RoomService;

/// Matchmaking service for quick-join requests
pub struct MatchmakingService;

impl MatchmakingService {
    /// Join any eligible public room, or create one
    pub async fn random_join(
        state: &AppState,
        payload: RandomJoinRequest,
    ) -> AppResult<RoomResponse> {
        let candidates = joinable_public_rooms(state);

        for candidate in &candidates {
            match RoomService::join_room(state, &candidate.code, payload.user_id, &payload.username)
                .await
            {
                Ok(room) => {
                    tracing::info!(code = %room.code, user = %payload.user_id, "Quick join matched");
                    return Ok(room);
                }
                Err(e) => {
                    // Lost a race (room filled or expired); try the next one.
                    tracing::debug!(code = %candidate.code, error = %e, "Quick join candidate rejected");
                }
            }
        }

        tracing::info!(user = %payload.user_id, "No joinable room, creating one");

        RoomService::create_room(
            state,
            CreateRoomRequest {
                user_id: payload.user_id,
                username: payload.username,
                mode: payload.mode.unwrap_or(ProblemSelectionMode::Random),
                problem_id: payload.problem_id,
                max_participants: payload.max_participants,
                // Quick-join rooms must themselves be matchable
                visibility: Some(Visibility::Public),
            },
        )
        .await
    }
}

/// Public waiting rooms with a free slot, most under-populated first
fn joinable_public_rooms(state: &AppState) -> Vec<Room> {
    let mut rooms: Vec<Room> = state
        .rooms()
        .snapshot()
        .into_iter()
        .filter(|room| {
            room.visibility == Visibility::Public
                && room.status == RoomStatus::Waiting
                && (room.active_count() as u32) < room.max_participants
        })
        .collect();

    rooms.sort_by_key(|room| room.active_count());
    rooms
}
