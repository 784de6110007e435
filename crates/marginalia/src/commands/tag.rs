//! `marginalia tag` -- manage tags on a comment.

use anyhow::Result;

use crate::cli::{TagArgs, TagCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia tag` command.
pub fn run(ctx: &RuntimeContext, args: &TagArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let request = backend.request();

    let (status, tag) = match &args.command {
        TagCommands::Add(t) => {
            request.add_tag(args.id, &t.tag)?;
            ("added", &t.tag)
        }
        TagCommands::Remove(t) => {
            request.remove_tag(args.id, &t.tag)?;
            ("removed", &t.tag)
        }
    };

    if ctx.json {
        output_json(&serde_json::json!({
            "status": status,
            "_id": args.id,
            "tagname": tag,
        }));
    } else if !ctx.quiet {
        match status {
            "added" => println!("Added tag '{tag}' to #{}", args.id),
            _ => println!("Removed tag '{tag}' from #{}", args.id),
        }
    }
    Ok(())
}
