//! CodeArena - Multiplayer Competitive Programming Arena
//!
//! This library provides the core functionality for the CodeArena platform:
//! short-lived rooms race to solve a shared problem, submissions are judged
//! against ordered test cases, and first solves award rating.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic (room lifecycle, matchmaking, judging,
//!   cleanup, rating)
//! - **Store**: Concurrent in-process store with atomic per-entry mutations
//! - **Models**: Domain models and DTOs
//!
//! External collaborators (problem catalog, code execution) are reached
//! through trait-object clients held in [`state::AppState`].

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
