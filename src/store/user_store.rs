//! User store (partial view)

use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

/// Concurrent store for the judging-relevant slice of users
#[derive(Default)]
pub struct UserStore {
    users: DashMap<Uuid, User>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Fetch one user
    pub fn find(&self, id: &Uuid) -> Option<User> {
        self.users.get(id).map(|u| u.value().clone())
    }

    /// Fetch the user, creating a zeroed record on first sight.
    ///
    /// Room create/join paths register users here so their later
    /// submissions resolve.
    pub fn get_or_create(&self, id: Uuid, username: &str) -> User {
        self.users
            .entry(id)
            .or_insert_with(|| User::new(id, username.to_string()))
            .clone()
    }

    /// Apply a first-solve reward under the entry lock
    pub fn record_first_solve(&self, id: &Uuid, rating_delta: i64) -> AppResult<User> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

        user.rating += rating_delta;
        user.problems_solved += 1;

        Ok(user.clone())
    }
}
