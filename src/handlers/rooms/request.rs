//! Room request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::MAX_USERNAME_LENGTH,
    models::{ProblemSelectionMode, Visibility},
};

/// Create room request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,

    /// Problem selection mode: single, random
    pub mode: ProblemSelectionMode,

    /// Required when mode is `single`
    pub problem_id: Option<Uuid>,

    #[validate(range(min = 1))]
    pub max_participants: Option<u32>,

    /// Room visibility: public, private (defaults to public)
    pub visibility: Option<Visibility>,
}

/// Quick-join request with optional room preferences for the fallback
/// create
#[derive(Debug, Deserialize, Validate)]
pub struct RandomJoinRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,

    pub mode: Option<ProblemSelectionMode>,

    pub problem_id: Option<Uuid>,

    #[validate(range(min = 1))]
    pub max_participants: Option<u32>,
}

/// Join room request
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRoomRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,
}

/// Leave room request
#[derive(Debug, Deserialize)]
pub struct LeaveRoomRequest {
    pub user_id: Uuid,
}

/// Ready flag update request
#[derive(Debug, Deserialize)]
pub struct ReadyRequest {
    pub user_id: Uuid,
    pub is_ready: bool,
}

/// Start room request
#[derive(Debug, Deserialize)]
pub struct StartRoomRequest {
    pub user_id: Uuid,
}

/// Delete room query parameters
#[derive(Debug, Deserialize)]
pub struct DeleteRoomQuery {
    pub user_id: Uuid,
}
