//! `marginalia vote` -- vote a comment up or down.

use anyhow::Result;

use crate::cli::VoteArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia vote` command.
pub fn run(ctx: &RuntimeContext, args: &VoteArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let response = backend.request().vote(args.id, &args.direction)?;

    if ctx.json {
        output_json(&response);
    } else if !ctx.quiet {
        match response.direction {
            Some(direction) => println!(
                "Voted {direction} on #{} (score {})",
                args.id, response.total
            ),
            None => println!("Vote on #{} withdrawn (score {})", args.id, response.total),
        }
    }
    Ok(())
}
