//! CLI command implementations

pub mod add;
pub mod config;
pub mod edit;
pub mod list;
pub mod logs;
pub mod remove;
pub mod show;

use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use userdesk_core::config::Config;
use userdesk_core::{EntryPoint, LogEvent, LoggingService, OperationResult, UserdeskContext};

/// Marker error for failures already printed (e.g. as JSON)
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failure already reported")
    }
}

impl std::error::Error for AlreadyReported {}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("USERDESK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".userdesk"))
        .ok_or_else(|| anyhow!("Could not find home directory; set USERDESK_DIR"))
}

/// Initialize diagnostics on stderr
///
/// `RUST_LOG` wins; otherwise `--debug` enables everything at debug level and
/// the `echoSql` setting enables statement tracing only.
pub fn init_tracing(debug: bool) {
    let echo_sql = get_data_dir()
        .ok()
        .and_then(|dir| Config::load(&dir).ok())
        .map(|config| config.echo_sql)
        .unwrap_or(false);

    let default_filter = if debug {
        "debug"
    } else if echo_sql {
        "warn,userdesk_core::adapters=debug"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        if let Err(e) = l.log(event) {
            tracing::debug!(error = %e, "failed to record event");
        }
    }
}

/// Open the context, run `f`, and close the database on every exit path
pub fn with_context<T>(f: impl FnOnce(&UserdeskContext) -> Result<T>) -> Result<T> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let ctx = UserdeskContext::new(&data_dir).context("Failed to open user database")?;
    let result = f(&ctx);
    let closed = ctx.close().context("Failed to close user database");

    let value = result?;
    closed?;
    Ok(value)
}

/// Record the outcome of a user operation in the event log
pub fn track<T>(
    command: &str,
    event: &str,
    user_id: Option<i64>,
    result: &userdesk_core::Result<T>,
) {
    let logger = get_logger();
    let mut log = match result {
        Ok(_) => LogEvent::new(event),
        Err(e) => LogEvent::new(format!("{}_failed", event)).with_error(e),
    }
    .with_command(command);
    if let Some(id) = user_id {
        log = log.with_user(id);
    }
    log_event(&logger, log);
}

/// Render a result as a pretty JSON `OperationResult` envelope
pub fn render_json<T: Serialize>(result: userdesk_core::Result<T>) -> Result<String> {
    let envelope: OperationResult<T> = result.into();
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Print a result as a JSON envelope; failures become `AlreadyReported`
pub fn emit_json<T: Serialize>(result: userdesk_core::Result<T>) -> Result<()> {
    let failed = result.is_err();
    println!("{}", render_json(result)?);
    if failed {
        return Err(AlreadyReported.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_failure_envelope() {
        let result: userdesk_core::Result<i64> =
            Err(userdesk_core::Error::not_found("User 9"));
        let json: serde_json::Value = serde_json::from_str(&render_json(result).unwrap()).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["kind"], "not_found");
        assert!(json.get("data").is_none());
    }
}
