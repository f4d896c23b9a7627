//! Execution client
//!
//! Thin adapter to the external code-execution service. The contract is a
//! single request/response exchange per test case: source code, language
//! and stdin go in; stdout, stderr and an exit status come back. All
//! interpretation of the outcome belongs to the judging pipeline.

mod http;

pub use http::HttpExecutionClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One execution request
#[derive(Debug, Serialize)]
pub struct ExecutionRequest<'a> {
    pub code: &'a str,
    pub language: &'a str,
    pub stdin: &'a str,
}

/// Result of one execution.
///
/// `compile_error` is populated by services that report a failed compile
/// stage separately from the run stage.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionResponse {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    pub exit_code: i32,
    #[serde(default)]
    pub compile_error: Option<String>,
    #[serde(default)]
    pub time_ms: Option<f64>,
    #[serde(default)]
    pub memory_kb: Option<i64>,
}

/// Failures of the exchange itself, as opposed to failures of the
/// submitted program
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("execution timed out after {0}ms")]
    Timeout(u64),

    #[error("execution service error: {0}")]
    Transport(String),
}

/// Adapter to the external code-execution service
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Run `code` once with `stdin` piped to the program
    async fn execute(
        &self,
        code: &str,
        language: &str,
        stdin: &str,
    ) -> Result<ExecutionResponse, ExecutionError>;
}
