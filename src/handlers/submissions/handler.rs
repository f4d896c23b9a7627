//! Submission handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppResult, services::JudgeService, state::AppState};

use super::{
    request::CreateSubmissionRequest,
    response::{SubmissionListResponse, SubmissionResponse},
};

/// Submit code for judging; the submission is judged synchronously
pub async fn create_submission(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    payload.validate()?;

    let submission = JudgeService::submit(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// Get a submission by ID
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = JudgeService::get_submission(&state, &id).await?;

    Ok(Json(submission))
}

/// List a user's submissions, newest first
pub async fn list_user_submissions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<SubmissionListResponse>> {
    let submissions = JudgeService::list_user_submissions(&state, &user_id).await?;
    let total = submissions.len();

    Ok(Json(SubmissionListResponse { submissions, total }))
}
