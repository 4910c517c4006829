//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "database": { "path": "users.duckdb", "echoSql": false }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Default database file name, relative to the data directory
pub const DEFAULT_DB_FILENAME: &str = "users.duckdb";

const SETTINGS_FILENAME: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    database: DatabaseSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(default)]
    echo_sql: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Parse a boolean environment override
fn parse_bool_env(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

/// userdesk configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Database file, as configured (may be relative to the data directory)
    pub database_path: Option<PathBuf>,
    /// Trace every SQL statement
    pub echo_sql: bool,
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing file yields defaults; a malformed one is an error.
    /// `USERDESK_ECHO_SQL` overrides `echoSql`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILENAME);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).map_err(|e| {
                Error::config(format!("invalid {}: {}", settings_path.display(), e))
            })?
        } else {
            SettingsFile::default()
        };

        let echo_sql = std::env::var("USERDESK_ECHO_SQL")
            .ok()
            .as_deref()
            .and_then(parse_bool_env)
            .unwrap_or(raw.database.echo_sql);

        Ok(Self {
            database_path: raw.database.path.clone(),
            echo_sql,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory, keeping unmanaged keys
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = self._raw_settings.clone();
        settings.database.path = self.database_path.clone();
        settings.database.echo_sql = self.echo_sql;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILENAME), content)?;
        Ok(())
    }

    /// Absolute location of the database file
    pub fn resolve_database_path(&self, data_dir: &Path) -> PathBuf {
        match &self.database_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DEFAULT_DB_FILENAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.database_path.is_none());
        assert_eq!(
            config.resolve_database_path(dir.path()),
            dir.path().join(DEFAULT_DB_FILENAME)
        );
    }

    #[test]
    fn test_relative_path_resolves_against_data_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{ "database": { "path": "people.duckdb" } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.resolve_database_path(dir.path()),
            dir.path().join("people.duckdb")
        );
    }

    #[test]
    fn test_malformed_settings_is_config_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), "{ not json").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{ "theme": "dark", "database": { "poolSize": 4 } }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.database_path = Some(PathBuf::from("other.duckdb"));
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILENAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["database"]["poolSize"], 4);
        assert_eq!(value["database"]["path"], "other.duckdb");
    }

    #[test]
    fn test_parse_bool_env() {
        assert_eq!(parse_bool_env("yes"), Some(true));
        assert_eq!(parse_bool_env("0"), Some(false));
        assert_eq!(parse_bool_env("maybe"), None);
    }
}
