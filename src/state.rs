//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{
    catalog::ProblemCatalog,
    config::Config,
    execution::ExecutionClient,
    notify::RoomNotifier,
    store::{RoomStore, SubmissionStore, UserStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Room and participant store
    pub rooms: RoomStore,

    /// Submission store
    pub submissions: SubmissionStore,

    /// User store (judging-relevant slice)
    pub users: UserStore,

    /// Problem catalog collaborator
    pub catalog: Arc<dyn ProblemCatalog>,

    /// Code execution collaborator
    pub executor: Arc<dyn ExecutionClient>,

    /// Room event broadcast
    pub notifier: RoomNotifier,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        catalog: Arc<dyn ProblemCatalog>,
        executor: Arc<dyn ExecutionClient>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                rooms: RoomStore::new(),
                submissions: SubmissionStore::new(),
                users: UserStore::new(),
                catalog,
                executor,
                notifier: RoomNotifier::new(),
                config,
            }),
        }
    }

    /// Get a reference to the room store
    pub fn rooms(&self) -> &RoomStore {
        &self.inner.rooms
    }

    /// Get a reference to the submission store
    pub fn submissions(&self) -> &SubmissionStore {
        &self.inner.submissions
    }

    /// Get a reference to the user store
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    /// Get a reference to the problem catalog
    pub fn catalog(&self) -> &dyn ProblemCatalog {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the execution client
    pub fn executor(&self) -> &dyn ExecutionClient {
        self.inner.executor.as_ref()
    }

    /// Get a reference to the room notifier
    pub fn notifier(&self) -> &RoomNotifier {
        &self.inner.notifier
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
