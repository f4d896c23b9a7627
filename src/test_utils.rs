//! Test utilities
//!
//! Shared fixtures for service tests: an in-memory problem catalog, a
//! scripted execution client that counts invocations, and a state builder.

use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    catalog::ProblemCatalog,
    config::{CatalogConfig, Config, ExecutionConfig, RoomConfig, ServerConfig},
    error::{AppError, AppResult},
    execution::{ExecutionClient, ExecutionError, ExecutionResponse},
    models::{Difficulty, Problem, TestCase},
    state::AppState,
};

/// In-memory problem catalog fixture
#[derive(Default)]
pub struct InMemoryCatalog {
    problems: DashMap<Uuid, Problem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_problems(problems: Vec<Problem>) -> Self {
        let catalog = Self::new();
        for problem in problems {
            catalog.problems.insert(problem.id, problem);
        }
        catalog
    }

    pub fn insert(&self, problem: Problem) {
        self.problems.insert(problem.id, problem);
    }
}

#[async_trait]
impl ProblemCatalog for InMemoryCatalog {
    async fn get_problem(&self, id: &Uuid) -> AppResult<Problem> {
        self.problems
            .get(id)
            .map(|p| p.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("Problem {id} not found")))
    }

    async fn list_problem_ids(&self) -> AppResult<Vec<Uuid>> {
        Ok(self.problems.iter().map(|p| p.id).collect())
    }

    async fn record_submission(&self, id: &Uuid, accepted: bool) -> AppResult<()> {
        let mut problem = self
            .problems
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Problem {id} not found")))?;

        problem.total_submissions += 1;
        if accepted {
            problem.accepted_submissions += 1;
        }

        Ok(())
    }
}

/// Execution client fixture that replays a scripted sequence of results
/// and counts how many times it was invoked.
pub struct ScriptedExecutionClient {
    script: Mutex<VecDeque<Result<ExecutionResponse, ExecutionError>>>,
    calls: AtomicUsize,
}

impl ScriptedExecutionClient {
    pub fn new(script: Vec<Result<ExecutionResponse, ExecutionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionClient for ScriptedExecutionClient {
    async fn execute(
        &self,
        _code: &str,
        _language: &str,
        _stdin: &str,
    ) -> Result<ExecutionResponse, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(ExecutionError::Transport("script exhausted".to_string())))
    }
}

/// Successful execution producing `stdout`
pub fn success(stdout: &str) -> ExecutionResponse {
    ExecutionResponse {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 0,
        compile_error: None,
        time_ms: Some(10.0),
        memory_kb: Some(1024),
    }
}

/// Non-zero exit with stderr
pub fn crash(stderr: &str) -> ExecutionResponse {
    ExecutionResponse {
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code: 1,
        compile_error: None,
        time_ms: Some(10.0),
        memory_kb: Some(1024),
    }
}

/// Problem fixture with ordered test cases
pub fn sample_problem(difficulty: Difficulty, cases: &[(&str, &str)]) -> Problem {
    Problem {
        id: Uuid::new_v4(),
        title: "Sample Problem".to_string(),
        difficulty,
        test_cases: cases
            .iter()
            .map(|(input, expected)| TestCase {
                input: input.to_string(),
                expected_output: expected.to_string(),
            })
            .collect(),
        total_submissions: 0,
        accepted_submissions: 0,
    }
}

/// Configuration fixture with production defaults
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        },
        execution: ExecutionConfig {
            url: "http://localhost:0".to_string(),
            timeout_ms: 1_000,
        },
        catalog: CatalogConfig {
            url: "http://localhost:0".to_string(),
        },
        rooms: RoomConfig {
            max_session_minutes: 180,
            empty_room_minutes: 15,
            cleanup_interval_seconds: 60,
        },
    }
}

/// Application state over the given fixtures.
///
/// Takes `Arc`s so tests can keep handles for invocation-count assertions.
pub fn test_state(catalog: Arc<InMemoryCatalog>, executor: Arc<ScriptedExecutionClient>) -> AppState {
    AppState::new(catalog, executor, test_config())
}
