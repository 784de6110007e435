//! `marginalia move` -- re-parent a comment and its direct replies.

use anyhow::Result;

use crate::cli::MoveArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia move` command.
pub fn run(ctx: &RuntimeContext, args: &MoveArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let request = backend.request();
    request.set_parent(args.id, args.parent)?;

    // The parent may have been redirected to a thread root.
    let moved = request.get_comment(args.id).ok();
    let parent_id = moved.as_ref().and_then(|c| c.parent_id);

    if ctx.json {
        output_json(&serde_json::json!({
            "_id": args.id,
            "parentId": parent_id,
        }));
    } else if !ctx.quiet {
        match parent_id {
            Some(parent) => println!("Moved #{} under #{parent}", args.id),
            None => println!("Moved #{} to the top level", args.id),
        }
    }
    Ok(())
}
