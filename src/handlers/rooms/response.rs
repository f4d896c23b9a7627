//! Room response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ProblemSelectionMode, Room, RoomStatus, Visibility};

/// Room snapshot returned to clients
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub code: String,
    pub created_by: Uuid,
    pub problem_id: Option<Uuid>,
    pub mode: ProblemSelectionMode,
    pub max_participants: u32,
    pub visibility: Visibility,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub winner_id: Option<Uuid>,
    /// Active participants in join order
    pub participants: Vec<ParticipantResponse>,
}

/// Active participant within a room response
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub user_id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
    pub is_ready: bool,
}

impl RoomResponse {
    /// Build from a room snapshot, keeping only active participants
    pub fn from_room(room: &Room) -> Self {
        Self {
            code: room.code.clone(),
            created_by: room.created_by,
            problem_id: room.problem_id,
            mode: room.mode,
            max_participants: room.max_participants,
            visibility: room.visibility,
            status: room.status,
            created_at: room.created_at,
            started_at: room.started_at,
            winner_id: room.winner_id,
            participants: room
                .active_participants()
                .map(|p| ParticipantResponse {
                    user_id: p.user_id,
                    username: p.username.clone(),
                    joined_at: p.joined_at,
                    is_ready: p.is_ready,
                })
                .collect(),
        }
    }
}

/// List of rooms
#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomResponse>,
    pub total: usize,
}

/// Acknowledgement for leave/ready/delete operations
#[derive(Debug, Serialize)]
pub struct RoomActionResponse {
    pub success: bool,
}
