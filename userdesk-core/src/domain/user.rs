//! User domain model

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// A stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Engine-assigned surrogate key
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Validated name/email pair, the input of every write operation
///
/// Validation is presence only: a blank name or email is rejected, nothing
/// checks the shape of the email. Values are kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: String,
    email: String,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if email.trim().is_empty() {
            return Err(Error::validation("email must not be empty"));
        }

        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Materialize the draft as a stored record
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::ErrorKind;

    #[test]
    fn test_user_creation() {
        let user = User::new(1, "John", "john@example.com");
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "John");
        assert_eq!(user.email, "john@example.com");
    }

    #[test]
    fn test_draft_accepts_any_non_empty_strings() {
        let draft = UserDraft::new("J", "not-an-email").unwrap();
        assert_eq!(draft.name(), "J");
        assert_eq!(draft.email(), "not-an-email");
    }

    #[test]
    fn test_draft_keeps_values_untrimmed() {
        let draft = UserDraft::new(" John ", "john@example.com").unwrap();
        assert_eq!(draft.name(), " John ");
    }

    #[test]
    fn test_draft_rejects_empty_name() {
        let err = UserDraft::new("", "john@example.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_draft_rejects_blank_email() {
        let err = UserDraft::new("John", "   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_into_user() {
        let user = UserDraft::new("Mark", "mark@example.com").unwrap().into_user(9);
        assert_eq!(user, User::new(9, "Mark", "mark@example.com"));
    }
}
