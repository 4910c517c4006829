//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O.

mod user;
pub mod result;

pub use result::{Error, ErrorKind, OperationResult, Result};
pub use user::{User, UserDraft};
