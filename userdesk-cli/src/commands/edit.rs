//! Edit command - overwrite a user's name and email

use anyhow::Result;

use super::{emit_json, track, with_context};
use crate::output;

pub fn run(id: i64, name: &str, email: &str, json: bool) -> Result<()> {
    with_context(|ctx| {
        let result = ctx.user_service.update(id, name, email);
        track("edit", "user_updated", Some(id), &result);

        if json {
            return emit_json(result);
        }

        let user = result?;
        output::success(&format!("User {} updated", user.id));
        println!("{}", output::user_table(std::slice::from_ref(&user)));
        Ok(())
    })
}
