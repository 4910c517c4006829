//! DuckDB repository implementation

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection, Row};
use tracing::{debug, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{User, UserDraft};
use crate::ports::UserRepository;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of attempts when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const SELECT_USERS: &str = "SELECT id, name, email FROM users";

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("could not set lock on file")
}

/// Check if an engine error reports a uniqueness/integrity rule violation
fn is_constraint_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("constraint error")
        || lower.contains("violates unique constraint")
        || lower.contains("violates primary key constraint")
        || lower.contains("duplicate key")
}

/// Map an error from a write statement or its commit.
///
/// The engine message quotes the offending key, so it is not carried over.
fn write_error(err: duckdb::Error) -> Error {
    let msg = err.to_string();
    if is_constraint_violation(&msg) {
        Error::constraint_violation("email is already in use")
    } else {
        Error::Database(msg)
    }
}

/// Escape LIKE wildcards so the search term matches literally
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_user(row: &Row<'_>) -> duckdb::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

/// Run `open` until it succeeds, retrying lock errors with exponential backoff
///
/// Non-retryable errors are returned from the first attempt.
fn retry_on_lock<T, E>(
    mut open: impl FnMut() -> std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match open() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let err_msg = e.to_string();
                attempt += 1;
                if !is_retryable_error(&err_msg) || attempt >= MAX_RETRIES {
                    return Err(e);
                }
                let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt - 1));
                warn!(
                    delay_ms = delay.as_millis() as u64,
                    attempt,
                    max = MAX_RETRIES,
                    error = %err_msg,
                    "database busy, retrying"
                );
                thread::sleep(delay);
            }
        }
    }
}

/// DuckDB-backed user repository
///
/// Holds a single connection; every operation locks it for its duration and
/// runs inside its own transaction, which rolls back when dropped uncommitted.
pub struct DuckDbUserRepository {
    conn: Mutex<Connection>,
}

impl DuckDbUserRepository {
    /// Open (or create) the database file at `db_path`
    ///
    /// Retries with exponential backoff while another process holds the
    /// file lock.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = retry_on_lock(|| Self::try_open_connection(db_path))?;
        debug!(path = %db_path.display(), "opened database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Extension autoloading would reach into ~/.duckdb; nothing here needs it
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        let result = self.run_migrations()?;
        if !result.applied.is_empty() {
            debug!(applied = ?result.applied, "schema migrated");
        }
        Ok(())
    }

    /// Close the connection, surfacing any error the engine reports
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| Error::database("connection lock poisoned"))?;
        conn.close().map_err(|(_, e)| Error::from(e))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::database("connection lock poisoned"))
    }
}

impl UserRepository for DuckDbUserRepository {
    fn create(&self, draft: &UserDraft) -> Result<User> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let sql = "INSERT INTO users (name, email) VALUES (?, ?) RETURNING id";
        debug!(sql, "executing");
        let id: i64 = tx
            .query_row(sql, params![draft.name(), draft.email()], |row| row.get(0))
            .map_err(write_error)?;
        tx.commit().map_err(write_error)?;

        Ok(draft.clone().into_user(id))
    }

    fn list(&self, filter: Option<&str>) -> Result<Vec<User>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let users = match filter.filter(|term| !term.is_empty()) {
            Some(term) => {
                let sql = format!("{SELECT_USERS} WHERE name ILIKE ? ESCAPE '\\' ORDER BY id");
                debug!(sql = %sql, "executing");
                let mut stmt = tx.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![like_pattern(term)], row_to_user)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let sql = format!("{SELECT_USERS} ORDER BY id");
                debug!(sql = %sql, "executing");
                let mut stmt = tx.prepare(&sql)?;
                let rows = stmt
                    .query_map([], row_to_user)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        tx.commit()?;
        Ok(users)
    }

    fn get(&self, id: i64) -> Result<User> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let sql = format!("{SELECT_USERS} WHERE id = ?");
        debug!(sql = %sql, id, "executing");
        let user = match tx.query_row(&sql, params![id], row_to_user) {
            Ok(user) => user,
            Err(duckdb::Error::QueryReturnedNoRows) => {
                return Err(Error::not_found(format!("User {id}")));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit()?;
        Ok(user)
    }

    fn update(&self, id: i64, draft: &UserDraft) -> Result<User> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let sql = "UPDATE users SET name = ?, email = ? WHERE id = ?";
        debug!(sql, id, "executing");
        let changed = tx
            .execute(sql, params![draft.name(), draft.email(), id])
            .map_err(write_error)?;
        if changed == 0 {
            return Err(Error::not_found(format!("User {id}")));
        }
        tx.commit().map_err(write_error)?;

        Ok(draft.clone().into_user(id))
    }

    fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let sql = "DELETE FROM users WHERE id = ?";
        debug!(sql, id, "executing");
        let changed = tx.execute(sql, params![id])?;
        if changed == 0 {
            return Err(Error::not_found(format!("User {id}")));
        }
        tx.commit()?;

        Ok(())
    }
}
