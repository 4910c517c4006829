//! userdesk CLI - manage user records from the terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{add, config, edit, list, logs, remove, show};
use userdesk_core::ErrorKind;

/// userdesk - create, search, edit and delete user records
#[derive(Parser)]
#[command(name = "ud", version, about, long_about = None)]
struct Cli {
    /// Print diagnostic logs, including every SQL statement
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new user
    Add {
        /// User name
        name: String,
        /// User email (must be unique)
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List users, optionally searching by name
    #[command(visible_alias = "search")]
    List {
        /// Only users whose name contains this text
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single user
    Show {
        /// User ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the name and email of a user
    Edit {
        /// User ID
        id: i64,
        /// New name
        name: String,
        /// New email
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a user
    Remove {
        /// User ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show or change settings
    Config {
        /// Database file (relative paths resolve against the data directory)
        #[arg(long)]
        database: Option<PathBuf>,
        /// Trace every SQL statement
        #[arg(long)]
        echo_sql: Option<bool>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    commands::init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Print a failure, as a warning when the record simply does not exist
fn report(err: &anyhow::Error) {
    if err.is::<commands::AlreadyReported>() {
        return;
    }
    match err.downcast_ref::<userdesk_core::Error>().map(|e| e.kind()) {
        Some(ErrorKind::NotFound) => output::warning(&err.to_string()),
        _ => output::error(&format!("{:#}", err)),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add { name, email, json } => add::run(&name, &email, json),
        Commands::List { search, json } => list::run(search.as_deref(), json),
        Commands::Show { id, json } => show::run(id, json),
        Commands::Edit { id, name, email, json } => edit::run(id, &name, &email, json),
        Commands::Remove { id, force, json } => remove::run(id, force, json),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { database, echo_sql, json } => config::run(database, echo_sql, json),
    }
}
