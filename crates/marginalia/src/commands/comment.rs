//! `marginalia add|show|list|replies|edit` -- write and read comments.

use anyhow::{Result, bail};

use crate::cli::{AddArgs, EditArgs, IdArgs, TargetArgs};
use crate::context::RuntimeContext;
use crate::output::{format_target, output_json, print_comment_detail, print_comment_list};

/// Execute the `marginalia add` command.
pub fn run_add(ctx: &RuntimeContext, args: &AddArgs) -> Result<()> {
    if args.message.trim().is_empty() {
        bail!("comment text cannot be empty");
    }

    let backend = ctx.backend()?;
    let comment = backend.request().add_comment(
        &args.target.to_json(),
        args.parent,
        &args.message,
        &args.url,
    )?;

    if ctx.json {
        output_json(&comment);
    } else if !ctx.quiet {
        match comment.parent_id {
            Some(parent) => println!("Added comment #{} (reply to #{parent})", comment.id),
            None => println!(
                "Added comment #{} on {}",
                comment.id,
                format_target(&comment.target)
            ),
        }
    }
    Ok(())
}

/// Execute the `marginalia show` command.
pub fn run_show(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let comment = backend.request().get_comment(args.id)?;

    if ctx.json {
        output_json(&comment);
    } else {
        print_comment_detail(&comment);
    }
    Ok(())
}

/// Execute the `marginalia list` command.
pub fn run_list(ctx: &RuntimeContext, args: &TargetArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let comments = backend.request().get_comments(&args.to_json())?;

    if ctx.json {
        output_json(&comments);
    } else if comments.is_empty() {
        println!("No comments on {}", args.class);
    } else {
        print_comment_list(&comments);
    }
    Ok(())
}

/// Execute the `marginalia replies` command.
pub fn run_replies(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let replies = backend.request().get_replies(args.id)?;

    if ctx.json {
        output_json(&replies);
    } else if replies.is_empty() {
        println!("No replies to #{}", args.id);
    } else {
        print_comment_list(&replies);
    }
    Ok(())
}

/// Execute the `marginalia edit` command.
pub fn run_edit(ctx: &RuntimeContext, args: &EditArgs) -> Result<()> {
    if args.message.trim().is_empty() {
        bail!("comment text cannot be empty");
    }

    let backend = ctx.backend()?;
    let comment = backend.request().update_comment(args.id, &args.message)?;

    if ctx.json {
        output_json(&comment);
    } else if !ctx.quiet {
        println!("Updated comment #{}", comment.id);
    }
    Ok(())
}
