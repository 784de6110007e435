//! `marginalia history` -- show the edit history of a comment.

use anyhow::Result;

use crate::cli::IdArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia history` command.
pub fn run(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let updates = backend.request().get_history(args.id)?;

    if ctx.json {
        output_json(&updates);
        return Ok(());
    }

    if updates.is_empty() {
        println!("No history for #{}", args.id);
        return Ok(());
    }

    println!("History for #{}:\n", args.id);
    for entry in &updates {
        println!(
            "  {}  {:<12} {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.username.as_deref().unwrap_or("(unknown)"),
            entry.action
        );
    }
    Ok(())
}
