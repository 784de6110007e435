//! `marginalia user` -- register and inspect users.

use anyhow::{Context, Result};

use marginalia_core::user::NewUser;
use marginalia_service::adapter::email_hash;
use marginalia_storage::UserStore;

use crate::cli::{UserArgs, UserCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia user` command.
pub fn run(ctx: &RuntimeContext, args: &UserArgs) -> Result<()> {
    let store = ctx.open_store()?;

    match &args.command {
        UserCommands::Add(add) => {
            let id = store
                .create_user(&NewUser {
                    username: add.username.clone(),
                    email: add.email.clone(),
                    moderator: add.moderator,
                })
                .with_context(|| format!("failed to add user '{}'", add.username))?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "id": id,
                    "userName": add.username,
                    "mod": add.moderator,
                }));
            } else if !ctx.quiet {
                println!("Added user '{}' (id {id})", add.username);
            }
        }
        UserCommands::Show(show) => {
            let user = store.get_user_by_name(&show.username)?;
            if ctx.json {
                output_json(&serde_json::json!({
                    "id": user.id,
                    "userName": user.username,
                    "mod": user.moderator,
                    "emailHash": email_hash(&user.email),
                }));
            } else {
                println!("{} (id {})", user.username, user.id);
                if user.moderator {
                    println!("  moderator");
                }
            }
        }
    }
    Ok(())
}
