//! `marginalia top` -- leaderboards of users, targets and tags.

use anyhow::Result;

use crate::cli::{TopArgs, TopCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia top` command.
pub fn run(ctx: &RuntimeContext, args: &TopArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let request = backend.request();

    match &args.command {
        TopCommands::Users { sort_by } => {
            let users = request.get_top_users(*sort_by)?;
            if ctx.json {
                output_json(&users);
            } else {
                for u in &users {
                    let badge = if u.moderator { " (moderator)" } else { "" };
                    println!("{:>5}  {}{badge}", u.score, u.user_name);
                }
            }
        }
        TopCommands::Targets => {
            let targets = request.get_top_targets()?;
            if ctx.json {
                output_json(&targets);
            } else {
                for t in &targets {
                    let member = if t.member.is_empty() {
                        String::new()
                    } else {
                        format!("#{}", t.member)
                    };
                    println!("{:>5}  {} {}{member}", t.score, t.target_type, t.class);
                }
            }
        }
        TopCommands::Tags => {
            let tags = request.get_top_tags()?;
            if ctx.json {
                output_json(&tags);
            } else {
                for t in &tags {
                    println!("{:>5}  {}", t.score, t.tagname);
                }
            }
        }
    }
    Ok(())
}
