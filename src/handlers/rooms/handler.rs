//! Room handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    services::{MatchmakingService, RoomService},
    state::AppState,
};

use super::{
    request::{
        CreateRoomRequest, DeleteRoomQuery, JoinRoomRequest, LeaveRoomRequest, RandomJoinRequest,
        ReadyRequest, StartRoomRequest,
    },
    response::{RoomActionResponse, RoomListResponse, RoomResponse},
};

/// Create a new room
pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<RoomResponse>)> {
    payload.validate()?;

    let room = RoomService::create_room(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(room)))
}

/// Quick-join any eligible public room
pub async fn random_join(
    State(state): State<AppState>,
    Json(payload): Json<RandomJoinRequest>,
) -> AppResult<Json<RoomResponse>> {
    payload.validate()?;

    let room = MatchmakingService::random_join(&state, payload).await?;

    Ok(Json(room))
}

/// Join a specific room by code
pub async fn join_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<JoinRoomRequest>,
) -> AppResult<Json<RoomResponse>> {
    payload.validate()?;

    let room =
        RoomService::join_room(&state, &code, payload.user_id, &payload.username).await?;

    Ok(Json(room))
}

/// Leave a room
pub async fn leave_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<LeaveRoomRequest>,
) -> AppResult<Json<RoomActionResponse>> {
    RoomService::leave_room(&state, &code, &payload.user_id).await?;

    Ok(Json(RoomActionResponse { success: true }))
}

/// Update ready status
pub async fn set_ready(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<ReadyRequest>,
) -> AppResult<Json<RoomActionResponse>> {
    RoomService::set_ready(&state, &code, &payload.user_id, payload.is_ready).await?;

    Ok(Json(RoomActionResponse { success: true }))
}

/// Start a room (creator only)
pub async fn start_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<StartRoomRequest>,
) -> AppResult<Json<RoomResponse>> {
    let room = RoomService::start_room(&state, &code, &payload.user_id).await?;

    Ok(Json(room))
}

/// Delete a room (creator only)
pub async fn delete_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<DeleteRoomQuery>,
) -> AppResult<Json<RoomActionResponse>> {
    RoomService::delete_room(&state, &code, &query.user_id).await?;

    Ok(Json(RoomActionResponse { success: true }))
}

/// Get room details
pub async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<RoomResponse>> {
    let room = RoomService::get_room_details(&state, &code).await?;

    Ok(Json(room))
}

/// List public rooms
pub async fn list_public_rooms(State(state): State<AppState>) -> AppResult<Json<RoomListResponse>> {
    let rooms = RoomService::list_public_rooms(&state).await?;

    Ok(Json(rooms))
}

/// List a user's active rooms
pub async fn list_user_rooms(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<RoomListResponse>> {
    let rooms = RoomService::list_user_rooms(&state, &user_id).await?;

    Ok(Json(rooms))
}
