//! Problem model (catalog view)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Problem as served by the catalog collaborator.
///
/// Read-only here apart from the submission counters, which the judging
/// pipeline bumps through the catalog interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub title: String,
    pub difficulty: Difficulty,
    /// Ordered test cases; judging runs them in this order
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub total_submissions: u64,
    #[serde(default)]
    pub accepted_submissions: u64,
}

/// One input/expected-output pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

/// Problem difficulty tiers, strictly increasing in reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Cakewalk,
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cakewalk => write!(f, "cakewalk"),
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}
