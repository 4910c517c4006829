//! Add command - create a user

use anyhow::Result;

use super::{emit_json, track, with_context};
use crate::output;

pub fn run(name: &str, email: &str, json: bool) -> Result<()> {
    with_context(|ctx| {
        let result = ctx.user_service.create(name, email);
        track("add", "user_created", result.as_ref().ok().map(|u| u.id), &result);

        if json {
            return emit_json(result);
        }

        let user = result?;
        output::success(&format!("User {} added", user.id));
        println!("{}", output::user_table(std::slice::from_ref(&user)));
        Ok(())
    })
}
