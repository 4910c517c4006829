//! userdesk core - data access for a small user records manager
//!
//! Hexagonal layout:
//!
//! - **domain**: `User`, validated `UserDraft`, error taxonomy
//! - **ports**: the `UserRepository` data-access trait
//! - **adapters**: DuckDB and in-memory implementations of the port
//! - **services**: `UserService` for the presentation layer, migrations, event log

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use adapters::duckdb::DuckDbUserRepository;
use config::Config;

// Re-export commonly used types at crate root
pub use domain::{Error, ErrorKind, OperationResult, Result, User, UserDraft};
pub use ports::UserRepository;
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService, UserService};

/// Main context for userdesk operations
///
/// Constructed explicitly at startup and closed explicitly at shutdown; it
/// owns the database and hands out the user service.
pub struct UserdeskContext {
    pub config: Config,
    pub db_path: PathBuf,
    pub repository: Arc<DuckDbUserRepository>,
    pub user_service: UserService,
}

impl UserdeskContext {
    /// Load config from `data_dir`, open the database and ensure its schema
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let db_path = config.resolve_database_path(data_dir);
        debug!(path = %db_path.display(), "opening user database");

        let repository = Arc::new(DuckDbUserRepository::open(&db_path)?);
        repository.ensure_schema()?;

        let user_service = UserService::new(repository.clone());

        Ok(Self {
            config,
            db_path,
            repository,
            user_service,
        })
    }

    /// Release the database
    ///
    /// Fails if a clone of the user service or repository is still alive.
    pub fn close(self) -> Result<()> {
        let Self {
            repository,
            user_service,
            ..
        } = self;
        drop(user_service);

        match Arc::try_unwrap(repository) {
            Ok(repository) => repository.close(),
            Err(_) => Err(Error::database("database is still in use")),
        }
    }
}
