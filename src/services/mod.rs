//! Business logic services

pub mod cleanup_service;
pub mod judge_service;
pub mod matchmaking_service;
pub mod rating;
pub mod room_service;

pub use cleanup_service::CleanupService;
pub use judge_service::JudgeService;
pub use matchmaking_service::MatchmakingService;
pub use room_service::RoomService;
