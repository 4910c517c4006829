//! List command - list or search users by name

use anyhow::Result;
use colored::Colorize;

use super::{emit_json, with_context};
use crate::output;

pub fn run(search: Option<&str>, json: bool) -> Result<()> {
    with_context(|ctx| {
        let result = ctx.user_service.list(search);

        if json {
            return emit_json(result);
        }

        let users = result?;
        if users.is_empty() {
            match search.map(str::trim).filter(|s| !s.is_empty()) {
                Some(term) => output::info(&format!("No users matching '{}'", term)),
                None => output::info("No users yet. Add one with `ud add <NAME> <EMAIL>`."),
            }
            return Ok(());
        }

        println!("{}", output::user_table(&users));
        println!("{}", format!("{} user(s)", users.len()).dimmed());
        Ok(())
    })
}
