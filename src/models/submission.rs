//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single judged attempt at a problem.
///
/// Mutated only while judging runs; immutable once a final status is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    #[serde(skip_serializing)]
    pub code: String,
    pub language: String,
    pub status: SubmissionStatus,
    pub error_message: Option<String>,
    pub execution_time_ms: Option<f64>,
    pub memory_kb: Option<i64>,
    pub test_cases_passed: u32,
    pub total_test_cases: u32,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Create a fresh submission in `pending`
    pub fn new(user_id: Uuid, problem_id: Uuid, code: String, language: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            problem_id,
            code,
            language,
            status: SubmissionStatus::Pending,
            error_message: None,
            execution_time_ms: None,
            memory_kb: None,
            test_cases_passed: 0,
            total_test_cases: 0,
            submitted_at: Utc::now(),
        }
    }
}

/// Submission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Running,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    CompilationError,
}

impl SubmissionStatus {
    /// Get status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Accepted => "accepted",
            Self::WrongAnswer => "wrong_answer",
            Self::TimeLimitExceeded => "time_limit_exceeded",
            Self::MemoryLimitExceeded => "memory_limit_exceeded",
            Self::RuntimeError => "runtime_error",
            Self::CompilationError => "compilation_error",
        }
    }

    /// Check if this is a final status (judging complete)
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    /// Check if this status means the solution was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
