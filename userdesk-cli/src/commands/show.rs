//! Show command - display a single user

use anyhow::Result;

use super::{emit_json, with_context};
use crate::output;

pub fn run(id: i64, json: bool) -> Result<()> {
    with_context(|ctx| {
        let result = ctx.user_service.get(id);

        if json {
            return emit_json(result);
        }

        let user = result?;
        println!("{}", output::user_table(std::slice::from_ref(&user)));
        Ok(())
    })
}
