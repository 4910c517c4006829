//! Config command - show or change settings

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use super::get_data_dir;
use crate::output;
use userdesk_core::config::Config;

pub fn run(database: Option<PathBuf>, echo_sql: Option<bool>, json: bool) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let mut config = Config::load(&data_dir)?;
    let changed = database.is_some() || echo_sql.is_some();

    if let Some(path) = database {
        config.database_path = Some(path);
    }
    if let Some(echo) = echo_sql {
        config.echo_sql = echo;
    }
    if changed {
        config.save(&data_dir)?;
    }

    let db_path = config.resolve_database_path(&data_dir);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "data_dir": data_dir.to_string_lossy(),
                "database_path": db_path.to_string_lossy(),
                "echo_sql": config.echo_sql,
            })
        );
        return Ok(());
    }

    if changed {
        output::success("Settings saved");
    }
    println!("{}", "Settings".bold());
    println!("  Data directory: {}", data_dir.display());
    println!("  Database: {}", db_path.display());
    println!("  Echo SQL: {}", if config.echo_sql { "on" } else { "off" });
    Ok(())
}
