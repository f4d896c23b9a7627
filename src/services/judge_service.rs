//! Judging service
//!
//! Runs a submission against its problem's test cases in order, one
//! execution per case, stopping at the first failure. Acceptance feeds the
//! rating engine and may complete the submitter's active room.

use uuid::Uuid;

use crate::{
    constants::languages,
    error::{AppError, AppResult},
    execution::ExecutionError,
    handlers::submissions::{request::CreateSubmissionRequest, response::SubmissionResponse},
    models::{Problem, Submission, SubmissionStatus},
    state::AppState,
};

use super::{rating, room_service::RoomService};

/// Judging service for submission processing
pub struct JudgeService;

/// Where the test-case loop ended up
struct JudgedOutcome {
    status: SubmissionStatus,
    error_message: Option<String>,
    test_cases_passed: u32,
    execution_time_ms: Option<f64>,
    memory_kb: Option<i64>,
}

impl JudgeService {
    /// Judge a submission synchronously and record its side effects
    pub async fn submit(
        state: &AppState,
        payload: CreateSubmissionRequest,
    ) -> AppResult<SubmissionResponse> {
        if !languages::ALL.contains(&payload.language.as_str()) {
            return Err(AppError::Validation(format!(
                "Unsupported language: {}",
                payload.language
            )));
        }

        let user = state
            .users()
            .find(&payload.user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", payload.user_id)))?;

        let problem = state.catalog().get_problem(&payload.problem_id).await?;

        let mut submission =
            Submission::new(user.id, problem.id, payload.code, payload.language);
        submission.total_test_cases = problem.test_cases.len() as u32;
        state.submissions().save(&submission);

        submission.status = SubmissionStatus::Running;
        state.submissions().save(&submission);

        tracing::info!(
            submission = %submission.id,
            user = %user.id,
            problem = %problem.id,
            "Judging submission"
        );

        let outcome = match Self::run_test_cases(state, &submission, &problem).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The exchange with the executor failed; finalize the row
                // so it does not linger in `running`, then surface the
                // failure.
                submission.status = SubmissionStatus::RuntimeError;
                submission.error_message = Some(e.to_string());
                state.submissions().save(&submission);
                return Err(e);
            }
        };

        submission.status = outcome.status;
        submission.error_message = outcome.error_message;
        submission.test_cases_passed = outcome.test_cases_passed;
        submission.execution_time_ms = outcome.execution_time_ms;
        submission.memory_kb = outcome.memory_kb;
        state.submissions().save(&submission);

        let accepted = submission.status.is_accepted();

        tracing::info!(
            submission = %submission.id,
            status = %submission.status,
            passed = submission.test_cases_passed,
            total = submission.total_test_cases,
            "Judging finished"
        );

        // Counter updates and room completion are separate transactions;
        // their failure must not corrupt the judged submission.
        if let Err(e) = state.catalog().record_submission(&problem.id, accepted).await {
            tracing::error!(problem = %problem.id, error = %e, "Failed to record problem stats");
        }

        if accepted {
            Self::award_first_solve(state, &submission, &problem);
            Self::complete_matching_room(state, &user.id, &problem.id).await;
        }

        Ok(submission.into())
    }

    /// Fetch one submission
    pub async fn get_submission(state: &AppState, id: &Uuid) -> AppResult<SubmissionResponse> {
        state
            .submissions()
            .find(id)
            .map(SubmissionResponse::from)
            .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))
    }

    /// A user's submissions, newest first
    pub async fn list_user_submissions(
        state: &AppState,
        user_id: &Uuid,
    ) -> AppResult<Vec<SubmissionResponse>> {
        Ok(state
            .submissions()
            .find_by_user(user_id)
            .into_iter()
            .map(SubmissionResponse::from)
            .collect())
    }

    /// Execute the ordered test cases, stopping at the first failure.
    ///
    /// Returns `Err` only for a transport failure of the execution
    /// exchange itself; every judgeable outcome is an `Ok`.
    async fn run_test_cases(
        state: &AppState,
        submission: &Submission,
        problem: &Problem,
    ) -> AppResult<JudgedOutcome> {
        let mut passed = 0u32;
        let mut max_time_ms: Option<f64> = None;
        let mut max_memory_kb: Option<i64> = None;

        for (index, case) in problem.test_cases.iter().enumerate() {
            let response = match state
                .executor()
                .execute(&submission.code, &submission.language, &case.input)
                .await
            {
                Ok(response) => response,
                Err(ExecutionError::Timeout(ms)) => {
                    return Ok(JudgedOutcome {
                        status: SubmissionStatus::RuntimeError,
                        error_message: Some(format!("Execution timed out after {ms}ms")),
                        test_cases_passed: passed,
                        execution_time_ms: max_time_ms,
                        memory_kb: max_memory_kb,
                    });
                }
                Err(ExecutionError::Transport(detail)) => {
                    return Err(AppError::Transport(detail));
                }
            };

            if let Some(time_ms) = response.time_ms {
                max_time_ms = Some(max_time_ms.map_or(time_ms, |t| t.max(time_ms)));
            }
            if let Some(memory_kb) = response.memory_kb {
                max_memory_kb = Some(max_memory_kb.map_or(memory_kb, |m| m.max(memory_kb)));
            }

            if let Some(compile_error) = response.compile_error {
                return Ok(JudgedOutcome {
                    status: SubmissionStatus::CompilationError,
                    error_message: Some(compile_error),
                    test_cases_passed: passed,
                    execution_time_ms: max_time_ms,
                    memory_kb: max_memory_kb,
                });
            }

            if response.exit_code != 0 {
                return Ok(JudgedOutcome {
                    status: SubmissionStatus::RuntimeError,
                    error_message: Some(response.stderr),
                    test_cases_passed: passed,
                    execution_time_ms: max_time_ms,
                    memory_kb: max_memory_kb,
                });
            }

            let actual = normalize_output(&response.stdout);
            let expected = normalize_output(&case.expected_output);

            if actual != expected {
                return Ok(JudgedOutcome {
                    status: SubmissionStatus::WrongAnswer,
                    error_message: Some(format!(
                        "Wrong answer on test case {}\nExpected: {}\nGot: {}",
                        index + 1,
                        expected,
                        actual
                    )),
                    test_cases_passed: passed,
                    execution_time_ms: max_time_ms,
                    memory_kb: max_memory_kb,
                });
            }

            passed += 1;
        }

        Ok(JudgedOutcome {
            status: SubmissionStatus::Accepted,
            error_message: None,
            test_cases_passed: passed,
            execution_time_ms: max_time_ms,
            memory_kb: max_memory_kb,
        })
    }

    /// Award rating on the user's first acceptance for this problem.
    ///
    /// Prior acceptances are counted before this submission, so a re-solve
    /// earns nothing.
    fn award_first_solve(state: &AppState, submission: &Submission, problem: &Problem) {
        let prior_accepted = state.submissions().accepted_count_excluding(
            &submission.user_id,
            &submission.problem_id,
            &submission.id,
        );

        if prior_accepted > 0 {
            return;
        }

        let delta = rating::rating_delta(problem.difficulty, submission.execution_time_ms);
        match state.users().record_first_solve(&submission.user_id, delta) {
            Ok(user) => {
                tracing::info!(
                    user = %user.id,
                    delta,
                    rating = user.rating,
                    "First solve, rating awarded"
                );
            }
            Err(e) => {
                tracing::error!(user = %submission.user_id, error = %e, "Failed to award rating");
            }
        }
    }

    /// Complete the submitter's active room bound to this problem, if any.
    ///
    /// The first accepter becomes the winner; losers of the race hit the
    /// idempotent no-op inside `complete_room`.
    async fn complete_matching_room(state: &AppState, user_id: &Uuid, problem_id: &Uuid) {
        let room = state
            .rooms()
            .rooms_for_user(user_id)
            .into_iter()
            .find(|room| {
                room.status == crate::models::RoomStatus::Active
                    && room.problem_id == Some(*problem_id)
            });

        if let Some(room) = room {
            if let Err(e) = RoomService::complete_room(state, &room.code, user_id).await {
                tracing::error!(code = %room.code, error = %e, "Room completion after acceptance failed");
            }
        }
    }
}

/// Normalize program output for comparison: trim the ends, fold line
/// endings to `\n`, trim each line.
fn normalize_output(output: &str) -> String {
    output
        .trim()
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        catalog::ProblemCatalog,
        handlers::rooms::request::CreateRoomRequest,
        models::{Difficulty, ProblemSelectionMode, RoomStatus},
        test_utils::{
            InMemoryCatalog, ScriptedExecutionClient, crash, sample_problem, success, test_state,
        },
    };

    fn submission_for(user_id: Uuid, problem_id: Uuid) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            user_id,
            problem_id,
            code: "print(input())".to_string(),
            language: "python".to_string(),
        }
    }

    #[test]
    fn test_normalize_output_folds_line_endings() {
        assert_eq!(normalize_output("5 \r\n6\r\n"), normalize_output("5\n6"));
        assert_eq!(normalize_output("  a\rb  "), "a\nb");
        assert_eq!(normalize_output(""), "");
    }

    #[tokio::test]
    async fn test_wrong_answer_short_circuits() {
        let problem = sample_problem(
            Difficulty::Easy,
            &[("1", "1"), ("2", "2"), ("3", "3"), ("4", "4"), ("5", "5")],
        );
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        // Case 1 passes, case 2 answers wrong
        let executor = Arc::new(ScriptedExecutionClient::new(vec![
            Ok(success("1")),
            Ok(success("7")),
        ]));
        let state = test_state(catalog, executor.clone());

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        let result = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::WrongAnswer);
        assert_eq!(result.test_cases_passed, 1);
        assert_eq!(result.total_test_cases, 5);
        assert_eq!(executor.calls(), 2);
        assert!(
            result
                .error_message
                .as_deref()
                .unwrap()
                .starts_with("Wrong answer on test case 2")
        );
    }

    #[tokio::test]
    async fn test_runtime_error_stops_immediately_with_stderr() {
        let problem = sample_problem(Difficulty::Easy, &[("1", "1"), ("2", "2")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![Ok(crash(
            "IndexError: list index out of range",
        ))]));
        let state = test_state(catalog, executor.clone());

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        let result = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::RuntimeError);
        assert_eq!(result.test_cases_passed, 0);
        assert_eq!(executor.calls(), 1);
        assert_eq!(
            result.error_message.as_deref(),
            Some("IndexError: list index out of range")
        );
    }

    #[tokio::test]
    async fn test_compile_error_classification() {
        let problem = sample_problem(Difficulty::Easy, &[("1", "1")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let mut response = success("");
        response.compile_error = Some("expected `;`".to_string());
        let executor = Arc::new(ScriptedExecutionClient::new(vec![Ok(response)]));
        let state = test_state(catalog, executor);

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        let result = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::CompilationError);
        assert_eq!(result.error_message.as_deref(), Some("expected `;`"));
    }

    #[tokio::test]
    async fn test_timeout_classifies_as_runtime_error() {
        let problem = sample_problem(Difficulty::Easy, &[("1", "1")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![Err(
            ExecutionError::Timeout(1_000),
        )]));
        let state = test_state(catalog, executor);

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        let result = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();

        assert_eq!(result.status, SubmissionStatus::RuntimeError);
        assert!(result.error_message.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_and_finalizes_submission() {
        let problem = sample_problem(Difficulty::Easy, &[("1", "1")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![Err(
            ExecutionError::Transport("connection refused".to_string()),
        )]));
        let state = test_state(catalog, executor);

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        let err = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));

        // The stored row must not be stuck in `running`
        let stored = state.submissions().find_by_user(&user);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, SubmissionStatus::RuntimeError);
    }

    #[tokio::test]
    async fn test_unknown_user_and_language_are_rejected() {
        let problem = sample_problem(Difficulty::Easy, &[("1", "1")]);
        let problem_id = problem.id;
        let state = test_state(
            Arc::new(InMemoryCatalog::with_problems(vec![])),
            Arc::new(ScriptedExecutionClient::new(vec![])),
        );

        let err = JudgeService::submit(&state, submission_for(Uuid::new_v4(), problem_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");
        let mut payload = submission_for(user, problem_id);
        payload.language = "cobol".to_string();
        let err = JudgeService::submit(&state, payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_acceptance_updates_problem_and_user_stats() {
        let problem = sample_problem(Difficulty::Medium, &[("1", "1"), ("2", "2")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![
            Ok(success("1")),
            Ok(success("2")),
        ]));
        let state = test_state(catalog.clone(), executor);

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        let result = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();
        assert_eq!(result.status, SubmissionStatus::Accepted);
        assert_eq!(result.test_cases_passed, 2);

        let problem = catalog.get_problem(&problem_id).await.unwrap();
        assert_eq!(problem.total_submissions, 1);
        assert_eq!(problem.accepted_submissions, 1);

        // Medium base 40 + full speed bonus 20 at the fixture's 10ms
        let scored = state.users().find(&user).unwrap();
        assert_eq!(scored.rating, 60);
        assert_eq!(scored.problems_solved, 1);
    }

    #[tokio::test]
    async fn test_rejection_counts_total_submissions_only() {
        let problem = sample_problem(Difficulty::Medium, &[("1", "1")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![Ok(success("0"))]));
        let state = test_state(catalog.clone(), executor);

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();

        let problem = catalog.get_problem(&problem_id).await.unwrap();
        assert_eq!(problem.total_submissions, 1);
        assert_eq!(problem.accepted_submissions, 0);

        let scored = state.users().find(&user).unwrap();
        assert_eq!(scored.rating, 0);
        assert_eq!(scored.problems_solved, 0);
    }

    #[tokio::test]
    async fn test_first_solve_rating_awarded_once() {
        let problem = sample_problem(Difficulty::Medium, &[("1", "1")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![
            Ok(success("1")),
            Ok(success("1")),
        ]));
        let state = test_state(catalog, executor);

        let user = Uuid::new_v4();
        state.users().get_or_create(user, "alice");

        let first = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();
        let second = JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();

        assert_eq!(first.status, SubmissionStatus::Accepted);
        assert_eq!(second.status, SubmissionStatus::Accepted);

        let scored = state.users().find(&user).unwrap();
        assert_eq!(scored.rating, 60);
        assert_eq!(scored.problems_solved, 1);
    }

    #[tokio::test]
    async fn test_accepted_submission_completes_active_room() {
        let problem = sample_problem(Difficulty::Easy, &[("1", "1")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![Ok(success("1"))]));
        let state = test_state(catalog, executor);

        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        let room = RoomService::create_room(
            &state,
            CreateRoomRequest {
                user_id: user_a,
                username: "a".to_string(),
                mode: ProblemSelectionMode::Single,
                problem_id: Some(problem_id),
                max_participants: Some(2),
                visibility: None,
            },
        )
        .await
        .unwrap();

        RoomService::join_room(&state, &room.code, user_b, "b")
            .await
            .unwrap();
        let started = RoomService::start_room(&state, &room.code, &user_a)
            .await
            .unwrap();
        assert_eq!(started.status, RoomStatus::Active);
        assert_eq!(started.problem_id, Some(problem_id));
        assert_eq!(started.participants.len(), 2);

        let result = JudgeService::submit(&state, submission_for(user_b, problem_id))
            .await
            .unwrap();
        assert_eq!(result.status, SubmissionStatus::Accepted);

        let completed = state.rooms().find(&room.code).unwrap();
        assert_eq!(completed.status, RoomStatus::Completed);
        assert_eq!(completed.winner_id, Some(user_b));
    }

    #[tokio::test]
    async fn test_waiting_room_not_completed_by_acceptance() {
        let problem = sample_problem(Difficulty::Easy, &[("1", "1")]);
        let problem_id = problem.id;
        let catalog = Arc::new(InMemoryCatalog::with_problems(vec![problem]));
        let executor = Arc::new(ScriptedExecutionClient::new(vec![Ok(success("1"))]));
        let state = test_state(catalog, executor);

        let user = Uuid::new_v4();
        let room = RoomService::create_room(
            &state,
            CreateRoomRequest {
                user_id: user,
                username: "a".to_string(),
                mode: ProblemSelectionMode::Single,
                problem_id: Some(problem_id),
                max_participants: Some(2),
                visibility: None,
            },
        )
        .await
        .unwrap();

        JudgeService::submit(&state, submission_for(user, problem_id))
            .await
            .unwrap();

        // The room never started, so acceptance must not complete it
        let untouched = state.rooms().find(&room.code).unwrap();
        assert_eq!(untouched.status, RoomStatus::Waiting);
        assert_eq!(untouched.winner_id, None);
    }
}
