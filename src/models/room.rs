//! Room and participant models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A matchmaking session grouping participants around one problem.
///
/// Rooms own their participants; a participant record is never physically
/// removed while the room exists (soft-deleted via `left_at`) so join
/// history and the empty-since rule keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Six-character shareable code, upper-cased on lookup
    pub code: String,
    pub created_by: Uuid,
    /// Bound problem; null until a random-mode room starts
    pub problem_id: Option<Uuid>,
    pub mode: ProblemSelectionMode,
    pub max_participants: u32,
    pub visibility: Visibility,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub winner_id: Option<Uuid>,
    /// Set when the active participant count drops to zero, cleared when
    /// it rises again; drives the long-empty sweep rule
    pub empty_since: Option<DateTime<Utc>>,
    pub participants: Vec<Participant>,
}

impl Room {
    /// Participants that have not left, in join order
    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.left_at.is_none())
    }

    /// Number of participants that have not left
    pub fn active_count(&self) -> usize {
        self.active_participants().count()
    }

    /// Whether the user holds an active participant record
    pub fn has_active_participant(&self, user_id: &Uuid) -> bool {
        self.active_participants().any(|p| p.user_id == *user_id)
    }
}

/// A user's membership record within a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
    pub is_ready: bool,
    pub left_at: Option<DateTime<Utc>>,
}

/// How a room picks its problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemSelectionMode {
    /// Problem fixed at creation
    Single,
    /// Drawn uniformly from the catalog when the room starts
    Random,
}

/// Room visibility for listing and matchmaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Room lifecycle status. Transitions are forward-only:
/// `waiting -> active -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Active,
    Completed,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}
