//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services and the
//! presentation layer depend only on these traits, not on concrete adapters.

mod repository;

pub use repository::UserRepository;
