//! HTTP execution client

use std::time::Duration;

use async_trait::async_trait;

use super::{ExecutionClient, ExecutionError, ExecutionRequest, ExecutionResponse};

/// Client for an HTTP code-execution service.
///
/// The per-request timeout is enforced client-side so a wedged executor
/// surfaces as a classified failure instead of a hang.
pub struct HttpExecutionClient {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpExecutionClient {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to build execution HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            timeout_ms,
        }
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn execute(
        &self,
        code: &str,
        language: &str,
        stdin: &str,
    ) -> Result<ExecutionResponse, ExecutionError> {
        let url = format!("{}/execute", self.base_url);
        let request = ExecutionRequest {
            code,
            language,
            stdin,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecutionError::Timeout(self.timeout_ms)
                } else {
                    ExecutionError::Transport(e.to_string())
                }
            })?;

        response
            .error_for_status()
            .map_err(|e| ExecutionError::Transport(e.to_string()))?
            .json::<ExecutionResponse>()
            .await
            .map_err(|e| ExecutionError::Transport(format!("malformed response: {e}")))
    }
}
