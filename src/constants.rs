//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// ROOM SETTINGS
// =============================================================================

/// Length of a shareable room code
pub const ROOM_CODE_LENGTH: usize = 6;

/// Alphabet used for room codes (codes are upper-cased on lookup)
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default maximum participants when a create request omits it
pub const DEFAULT_MAX_PARTICIPANTS: u32 = 4;

/// Default maximum length of an active session before the sweeper deletes
/// the room (minutes)
pub const DEFAULT_MAX_SESSION_MINUTES: i64 = 180;

/// Default time a room may sit with zero active participants before the
/// sweeper deletes it (minutes)
pub const DEFAULT_EMPTY_ROOM_MINUTES: i64 = 15;

/// Default interval between cleanup sweeps (seconds)
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 60;

// =============================================================================
// EXECUTION SERVICE DEFAULTS
// =============================================================================

/// Default per-test-case execution timeout (milliseconds)
pub const DEFAULT_EXECUTION_TIMEOUT_MS: u64 = 10_000;

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const C: &str = "c";
    pub const CPP: &str = "cpp";
    pub const RUST: &str = "rust";
    pub const GO: &str = "go";
    pub const JAVA: &str = "java";
    pub const PYTHON: &str = "python";
    pub const JAVASCRIPT: &str = "javascript";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[C, CPP, RUST, GO, JAVA, PYTHON, JAVASCRIPT];
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum source code size in bytes (1 MB)
pub const MAX_SOURCE_CODE_SIZE: u64 = 1024 * 1024;

/// Maximum username length accepted in room requests
pub const MAX_USERNAME_LENGTH: u64 = 64;

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
