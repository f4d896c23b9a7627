//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Submission, SubmissionStatus};

/// Judged submission returned to clients
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub language: String,
    pub status: SubmissionStatus,
    pub error_message: Option<String>,
    pub execution_time_ms: Option<f64>,
    pub memory_kb: Option<i64>,
    pub test_cases_passed: u32,
    pub total_test_cases: u32,
    pub submitted_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            user_id: submission.user_id,
            problem_id: submission.problem_id,
            language: submission.language,
            status: submission.status,
            error_message: submission.error_message,
            execution_time_ms: submission.execution_time_ms,
            memory_kb: submission.memory_kb,
            test_cases_passed: submission.test_cases_passed,
            total_test_cases: submission.total_test_cases,
            submitted_at: submission.submitted_at,
        }
    }
}

/// List of submissions
#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionResponse>,
    pub total: usize,
}
