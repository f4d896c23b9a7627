//! Room management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Room routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_room))
        .route("/random-join", post(handler::random_join))
        .route("/public", get(handler::list_public_rooms))
        .route("/user/{user_id}", get(handler::list_user_rooms))
        .route("/{code}", get(handler::get_room))
        .route("/{code}", delete(handler::delete_room))
        .route("/{code}/join", post(handler::join_room))
        .route("/{code}/leave", post(handler::leave_room))
        .route("/{code}/ready", patch(handler::set_ready))
        .route("/{code}/start", post(handler::start_room))
}
