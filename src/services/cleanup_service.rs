//! Room cleanup service
//!
//! Periodic background sweep deleting stale rooms: overlong active
//! sessions and rooms that have sat empty past the threshold. Runs on its
//! own timer, independent of request traffic, and re-validates emptiness
//! under the room's entry lock immediately before deleting.

use chrono::{DateTime, Duration, Utc};

use crate::{state::AppState, store::SweepReason};

/// Counts of rooms deleted in one sweep, by reason
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepReport {
    pub expired_sessions: u64,
    pub empty_rooms: u64,
}

impl SweepReport {
    pub fn total(&self) -> u64 {
        self.expired_sessions + self.empty_rooms
    }
}

/// Cleanup service for stale rooms
pub struct CleanupService;

impl CleanupService {
    /// Spawn the background sweeper on its configured interval
    pub fn spawn(state: AppState) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let period =
                std::time::Duration::from_secs(state.config().rooms.cleanup_interval_seconds);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            tracing::info!(period_seconds = period.as_secs(), "Room cleanup sweeper started");

            loop {
                interval.tick().await;
                let report = Self::sweep(&state);
                if report.total() > 0 {
                    tracing::info!(
                        expired_sessions = report.expired_sessions,
                        empty_rooms = report.empty_rooms,
                        "Cleaned up stale rooms"
                    );
                }
            }
        })
    }

    /// Run one sweep against the current clock
    pub fn sweep(state: &AppState) -> SweepReport {
        Self::sweep_at(state, Utc::now())
    }

    /// Run one sweep as of `now`.
    ///
    /// Each room is decided independently under its own entry lock, so one
    /// room's outcome never aborts the scan of the rest.
    pub fn sweep_at(state: &AppState, now: DateTime<Utc>) -> SweepReport {
        let max_session = Duration::minutes(state.config().rooms.max_session_minutes);
        let max_empty = Duration::minutes(state.config().rooms.empty_room_minutes);

        let mut report = SweepReport::default();

        for room in state.rooms().snapshot() {
            match state
                .rooms()
                .sweep_room(&room.code, now, max_session, max_empty)
            {
                Some(SweepReason::SessionExpired) => {
                    report.expired_sessions += 1;
                    tracing::info!(code = %room.code, "Deleted room: session ran too long");
                }
                Some(SweepReason::LongEmpty) => {
                    report.empty_rooms += 1;
                    tracing::info!(code = %room.code, "Deleted room: empty past threshold");
                }
                None => {}
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{
        handlers::rooms::request::CreateRoomRequest,
        models::{ProblemSelectionMode, Room, RoomStatus},
        services::room_service::RoomService,
        test_utils::{InMemoryCatalog, ScriptedExecutionClient, test_state},
    };

    fn empty_state() -> crate::state::AppState {
        test_state(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(ScriptedExecutionClient::new(vec![])),
        )
    }

    async fn make_room(state: &crate::state::AppState, creator: Uuid) -> String {
        RoomService::create_room(
            state,
            CreateRoomRequest {
                user_id: creator,
                username: "host".to_string(),
                mode: ProblemSelectionMode::Single,
                problem_id: Some(Uuid::new_v4()),
                max_participants: Some(4),
                visibility: None,
            },
        )
        .await
        .unwrap()
        .code
    }

    #[tokio::test]
    async fn test_long_empty_room_is_deleted() {
        let state = empty_state();
        let creator = Uuid::new_v4();
        let code = make_room(&state, creator).await;

        RoomService::leave_room(&state, &code, &creator)
            .await
            .unwrap();

        // Under the threshold: untouched
        let report = CleanupService::sweep_at(&state, Utc::now() + Duration::minutes(10));
        assert_eq!(report.total(), 0);
        assert!(state.rooms().find(&code).is_some());

        // Past the threshold: gone
        let report = CleanupService::sweep_at(&state, Utc::now() + Duration::minutes(20));
        assert_eq!(report.empty_rooms, 1);
        assert!(state.rooms().find(&code).is_none());
    }

    #[tokio::test]
    async fn test_rejoin_clears_marker_before_sweep() {
        let state = empty_state();
        let creator = Uuid::new_v4();
        let code = make_room(&state, creator).await;

        RoomService::leave_room(&state, &code, &creator)
            .await
            .unwrap();
        RoomService::join_room(&state, &code, creator, "host")
            .await
            .unwrap();

        let report = CleanupService::sweep_at(&state, Utc::now() + Duration::minutes(20));
        assert_eq!(report.total(), 0);
        assert!(state.rooms().find(&code).is_some());
    }

    #[tokio::test]
    async fn test_stale_marker_with_live_participant_is_cleared_not_deleted() {
        let state = empty_state();
        let now = Utc::now();

        // A marker that survived a rejoin race: set despite a live
        // participant.
        let room = Room {
            code: "STALE1".to_string(),
            created_by: Uuid::new_v4(),
            problem_id: None,
            mode: ProblemSelectionMode::Random,
            max_participants: 4,
            visibility: crate::models::Visibility::Public,
            status: RoomStatus::Waiting,
            created_at: now,
            started_at: None,
            winner_id: None,
            empty_since: Some(now - Duration::minutes(30)),
            participants: vec![crate::models::Participant {
                user_id: Uuid::new_v4(),
                username: "lingerer".to_string(),
                joined_at: now,
                is_ready: false,
                left_at: None,
            }],
        };
        assert!(state.rooms().try_insert(room));

        let report = CleanupService::sweep_at(&state, now);
        assert_eq!(report.total(), 0);

        let survivor = state.rooms().find("STALE1").unwrap();
        assert!(survivor.empty_since.is_none());
    }

    #[tokio::test]
    async fn test_overlong_active_session_is_deleted() {
        let state = empty_state();
        let creator = Uuid::new_v4();
        let code = make_room(&state, creator).await;
        RoomService::start_room(&state, &code, &creator)
            .await
            .unwrap();

        let report = CleanupService::sweep_at(&state, Utc::now() + Duration::minutes(170));
        assert_eq!(report.total(), 0);

        let report = CleanupService::sweep_at(&state, Utc::now() + Duration::minutes(181));
        assert_eq!(report.expired_sessions, 1);
        assert!(state.rooms().find(&code).is_none());
    }

    #[tokio::test]
    async fn test_waiting_populated_rooms_survive_sweeps() {
        let state = empty_state();
        let code = make_room(&state, Uuid::new_v4()).await;

        let report = CleanupService::sweep_at(&state, Utc::now() + Duration::days(7));
        assert_eq!(report.total(), 0);
        assert!(state.rooms().find(&code).is_some());
    }
}
