//! Repository port - user data access abstraction

use crate::domain::result::Result;
use crate::domain::{User, UserDraft};

/// Data access for user records
///
/// Every operation is self-contained: it acquires the storage handle, runs a
/// single statement inside its own transaction and releases the handle on
/// every exit path. Write operations take a [`UserDraft`], so input is
/// validated before an implementation is ever reached.
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned id
    ///
    /// Fails with `ConstraintViolation` when the email is already taken.
    fn create(&self, draft: &UserDraft) -> Result<User>;

    /// List users, optionally only those whose name contains `filter`
    ///
    /// `None` or an empty filter returns every user. Matching is a
    /// case-insensitive literal substring match; results are ordered by id.
    fn list(&self, filter: Option<&str>) -> Result<Vec<User>>;

    /// Load a single user by id
    fn get(&self, id: i64) -> Result<User>;

    /// Overwrite name and email of an existing user
    ///
    /// Fails with `NotFound` for an unknown id and `ConstraintViolation` when
    /// the email belongs to another user; the stored row is left unchanged in
    /// both cases.
    fn update(&self, id: i64, draft: &UserDraft) -> Result<User>;

    /// Hard-delete a user, `NotFound` for an unknown id
    fn delete(&self, id: i64) -> Result<()>;
}
