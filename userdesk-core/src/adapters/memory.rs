//! In-memory repository
//!
//! Mirrors the DuckDB adapter's contract (unique emails, case-insensitive
//! substring search, id order, ids never reused) without a database file.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::result::{Error, Result};
use crate::domain::{User, UserDraft};
use crate::ports::UserRepository;

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: BTreeMap<i64, User>,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::database("repository lock poisoned"))
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, draft: &UserDraft) -> Result<User> {
        let mut state = self.lock()?;
        // The id is consumed even when the insert is rejected, like a sequence
        state.last_id += 1;
        let id = state.last_id;

        if state.email_taken(draft.email(), None) {
            return Err(Error::constraint_violation("email is already in use"));
        }

        let user = draft.clone().into_user(id);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    fn list(&self, filter: Option<&str>) -> Result<Vec<User>> {
        let state = self.lock()?;
        let needle = filter.filter(|t| !t.is_empty()).map(str::to_lowercase);

        let users = state
            .users
            .values()
            .filter(|u| match &needle {
                Some(n) => u.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        Ok(users)
    }

    fn get(&self, id: i64) -> Result<User> {
        let state = self.lock()?;
        state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("User {id}")))
    }

    fn update(&self, id: i64, draft: &UserDraft) -> Result<User> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&id) {
            return Err(Error::not_found(format!("User {id}")));
        }
        if state.email_taken(draft.email(), Some(id)) {
            return Err(Error::constraint_violation("email is already in use"));
        }

        let user = draft.clone().into_user(id);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.lock()?;
        state
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("User {id}")))
    }
}
