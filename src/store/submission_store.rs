//! Submission store

use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Submission, SubmissionStatus};

/// Concurrent store for judged attempts
#[derive(Default)]
pub struct SubmissionStore {
    submissions: DashMap<Uuid, Submission>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self {
            submissions: DashMap::new(),
        }
    }

    /// Insert or overwrite a submission record
    pub fn save(&self, submission: &Submission) {
        self.submissions
            .insert(submission.id, submission.clone());
    }

    /// Fetch one submission
    pub fn find(&self, id: &Uuid) -> Option<Submission> {
        self.submissions.get(id).map(|s| s.value().clone())
    }

    /// A user's submissions, newest first
    pub fn find_by_user(&self, user_id: &Uuid) -> Vec<Submission> {
        let mut submissions: Vec<Submission> = self
            .submissions
            .iter()
            .filter(|s| s.user_id == *user_id)
            .map(|s| s.value().clone())
            .collect();
        submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        submissions
    }

    /// Count the user's accepted submissions for a problem, excluding the
    /// one currently being judged.
    ///
    /// Used for first-solve detection: zero prior acceptances means this
    /// acceptance is the first.
    pub fn accepted_count_excluding(
        &self,
        user_id: &Uuid,
        problem_id: &Uuid,
        exclude_id: &Uuid,
    ) -> usize {
        self.submissions
            .iter()
            .filter(|s| {
                s.user_id == *user_id
                    && s.problem_id == *problem_id
                    && s.id != *exclude_id
                    && s.status == SubmissionStatus::Accepted
            })
            .count()
    }
}
