//! `marginalia count` and `marginalia counts`.

use anyhow::Result;

use crate::cli::FeedFilterArgs;
use crate::commands::recent::build_query;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia count` command.
pub fn run(ctx: &RuntimeContext, args: &FeedFilterArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let request = backend.request();

    let count = match build_query(&request, args)? {
        Some(query) => request.count_recent(query, args.hide_mine)?,
        None => 0,
    };

    if ctx.json {
        output_json(&serde_json::json!({ "count": count }));
    } else {
        println!("{count}");
    }
    Ok(())
}

/// Execute the `marginalia counts` command.
pub fn run_per_target(ctx: &RuntimeContext) -> Result<()> {
    let backend = ctx.backend()?;
    let counts = backend.request().get_comment_counts_per_target()?;

    if ctx.json {
        output_json(&counts);
    } else if counts.is_empty() {
        println!("No comments");
    } else {
        for (key, count) in &counts {
            println!("{count:>5}  {key}");
        }
    }
    Ok(())
}
