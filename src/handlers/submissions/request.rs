//! Submission request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_SOURCE_CODE_SIZE;

/// Create submission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    pub user_id: Uuid,

    pub problem_id: Uuid,

    #[validate(length(min = 1, max = MAX_SOURCE_CODE_SIZE))]
    pub code: String,

    pub language: String,
}
