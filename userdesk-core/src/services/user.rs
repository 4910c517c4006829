//! User service - the data-access boundary used by the presentation layer

use std::sync::Arc;

use tracing::debug;

use crate::domain::result::Result;
use crate::domain::{User, UserDraft};
use crate::ports::UserRepository;

/// Create, search, edit and delete user records from plain field values
///
/// Input is validated here, before any repository call, so a validation
/// failure never reaches the database.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn create(&self, name: &str, email: &str) -> Result<User> {
        let draft = UserDraft::new(name, email)?;
        let user = self.repository.create(&draft)?;
        debug!(id = user.id, "user created");
        Ok(user)
    }

    /// List all users, or those whose name contains `search`
    ///
    /// The term is trimmed first; a blank term lists everyone.
    pub fn list(&self, search: Option<&str>) -> Result<Vec<User>> {
        let term = search.map(str::trim).filter(|t| !t.is_empty());
        self.repository.list(term)
    }

    pub fn get(&self, id: i64) -> Result<User> {
        self.repository.get(id)
    }

    pub fn update(&self, id: i64, name: &str, email: &str) -> Result<User> {
        let draft = UserDraft::new(name, email)?;
        let user = self.repository.update(id, &draft)?;
        debug!(id, "user updated");
        Ok(user)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.repository.delete(id)?;
        debug!(id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::ErrorKind;

    /// Counts repository calls on top of the in-memory adapter
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryUserRepository,
        calls: AtomicUsize,
    }

    impl CountingRepository {
        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl UserRepository for CountingRepository {
        fn create(&self, draft: &UserDraft) -> Result<User> {
            self.hit();
            self.inner.create(draft)
        }
        fn list(&self, filter: Option<&str>) -> Result<Vec<User>> {
            self.hit();
            self.inner.list(filter)
        }
        fn get(&self, id: i64) -> Result<User> {
            self.hit();
            self.inner.get(id)
        }
        fn update(&self, id: i64, draft: &UserDraft) -> Result<User> {
            self.hit();
            self.inner.update(id, draft)
        }
        fn delete(&self, id: i64) -> Result<()> {
            self.hit();
            self.inner.delete(id)
        }
    }

    fn service() -> (UserService, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::default());
        (UserService::new(repo.clone()), repo)
    }

    #[test]
    fn test_validation_never_reaches_repository() {
        let (service, repo) = service();

        let err = service.create("", "john@example.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = service.update(1, "John", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_search_lists_everyone() {
        let (service, _) = service();
        service.create("John", "john@example.com").unwrap();
        service.create("Mark", "mark@example.com").unwrap();

        assert_eq!(service.list(Some("   ")).unwrap().len(), 2);
        assert_eq!(service.list(None).unwrap().len(), 2);
    }

    #[test]
    fn test_search_term_is_trimmed() {
        let (service, _) = service();
        service.create("John", "john@example.com").unwrap();
        service.create("Mark", "mark@example.com").unwrap();

        let found = service.list(Some(" Jo ")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "John");
    }

    #[test]
    fn test_update_unknown_id() {
        let (service, _) = service();
        let err = service.update(42, "John", "john@example.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(service.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let (service, _) = service();
        let created = service.create("Joana", "joana@example.com").unwrap();
        let loaded = service.get(created.id).unwrap();
        assert_eq!(loaded.name, "Joana");
        assert_eq!(loaded.email, "joana@example.com");
    }
}
