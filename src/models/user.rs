//! User model (partial view)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of a user relevant to judging and rating.
///
/// Identity and session management live elsewhere; this record is mutated
/// only on a user's first accepted submission for a problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub rating: i64,
    pub problems_solved: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a zeroed score card
    pub fn new(id: Uuid, username: String) -> Self {
        Self {
            id,
            username,
            rating: 0,
            problems_solved: 0,
            created_at: Utc::now(),
        }
    }
}
