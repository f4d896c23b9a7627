//! Problem catalog collaborator
//!
//! Problems and their test cases are owned by an external catalog service;
//! this module defines the interface the arena depends on and the
//! HTTP-backed client used in production.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Problem,
};

/// Read access to problems plus the submission counters the judging
/// pipeline maintains as a side effect.
#[async_trait]
pub trait ProblemCatalog: Send + Sync {
    /// Fetch a problem with its ordered test cases
    async fn get_problem(&self, id: &Uuid) -> AppResult<Problem>;

    /// All problem ids, used by random-mode room starts
    async fn list_problem_ids(&self) -> AppResult<Vec<Uuid>>;

    /// Bump the problem's total (and, when accepted, accepted) counters
    async fn record_submission(&self, id: &Uuid, accepted: bool) -> AppResult<()>;
}

/// Catalog client speaking the REST contract of the problem service
pub struct HttpProblemCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProblemCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProblemIdRow {
    id: Uuid,
}

#[async_trait]
impl ProblemCatalog for HttpProblemCatalog {
    async fn get_problem(&self, id: &Uuid) -> AppResult<Problem> {
        let url = format!("{}/problems/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Unavailable(format!("Problem catalog unreachable: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Problem {id} not found")));
        }

        let problem = response
            .error_for_status()
            .map_err(|e| AppError::Unavailable(format!("Problem catalog error: {e}")))?
            .json::<Problem>()
            .await
            .map_err(|e| AppError::Unavailable(format!("Malformed catalog response: {e}")))?;

        Ok(problem)
    }

    async fn list_problem_ids(&self) -> AppResult<Vec<Uuid>> {
        let url = format!("{}/problems", self.base_url);
        let rows = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Unavailable(format!("Problem catalog unreachable: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::Unavailable(format!("Problem catalog error: {e}")))?
            .json::<Vec<ProblemIdRow>>()
            .await
            .map_err(|e| AppError::Unavailable(format!("Malformed catalog response: {e}")))?;

        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn record_submission(&self, id: &Uuid, accepted: bool) -> AppResult<()> {
        let url = format!("{}/problems/{}/stats", self.base_url, id);
        self.client
            .post(&url)
            .json(&json!({ "accepted": accepted }))
            .send()
            .await
            .map_err(|e| AppError::Unavailable(format!("Problem catalog unreachable: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::Unavailable(format!("Problem catalog error: {e}")))?;

        Ok(())
    }
}
