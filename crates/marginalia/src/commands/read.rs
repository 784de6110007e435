//! `marginalia read` -- mark a comment as read.

use anyhow::Result;

use crate::cli::IdArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

pub fn run(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let backend = ctx.backend()?;
    backend.request().mark_read(args.id)?;

    if ctx.json {
        output_json(&serde_json::json!({ "_id": args.id, "read": true }));
    } else if !ctx.quiet {
        println!("Marked #{} as read", args.id);
    }
    Ok(())
}
