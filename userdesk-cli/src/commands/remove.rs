//! Remove command - delete a user after confirmation

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use userdesk_core::{Error, User};

use super::{emit_json, track, with_context};
use crate::output;

/// Failure for a removal that cannot be confirmed interactively
fn confirmation_required(id: i64) -> Error {
    Error::validation(format!(
        "Refusing to remove user {} without confirmation; pass --force",
        id
    ))
}

pub fn run(id: i64, force: bool, json: bool) -> Result<()> {
    with_context(|ctx| {
        // Show what is about to go; an unknown id is reported before prompting
        let user = match ctx.user_service.get(id) {
            Ok(user) => user,
            Err(e) => {
                let result: userdesk_core::Result<()> = Err(e);
                track("remove", "user_deleted", Some(id), &result);
                return if json { emit_json(result) } else { Ok(result?) };
            }
        };

        if !force {
            // JSON output is for scripts, so it never prompts
            if json {
                return emit_json::<User>(Err(confirmation_required(id)));
            }
            if atty::isnt(atty::Stream::Stdin) {
                return Err(confirmation_required(id).into());
            }

            println!("{}", output::user_table(std::slice::from_ref(&user)));
            if !Confirm::new()
                .with_prompt("Are you sure you want to remove this user?")
                .default(false)
                .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
        }

        let result = ctx.user_service.delete(id);
        track("remove", "user_deleted", Some(id), &result);

        if json {
            return emit_json(result.map(|()| user));
        }

        result?;
        output::success(&format!("User {} removed", id));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::render_json;
    use userdesk_core::ErrorKind;

    #[test]
    fn test_unconfirmed_json_removal_is_validation_envelope() {
        let err = confirmation_required(4);
        assert_eq!(err.kind(), ErrorKind::Validation);

        let rendered = render_json::<User>(Err(err)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["kind"], "validation");
        assert!(json["error"].as_str().unwrap().contains("--force"));
        assert!(json.get("data").is_none());
    }
}
