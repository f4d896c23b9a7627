//! Submission handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Submission routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_submission))
        .route("/{id}", get(handler::get_submission))
        .route("/user/{user_id}", get(handler::list_user_submissions))
}
