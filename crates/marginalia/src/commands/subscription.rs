//! `marginalia subscribe|unsubscribe|subscriptions`.

use anyhow::Result;

use crate::cli::TargetArgs;
use crate::context::RuntimeContext;
use crate::output::{format_target, output_json};

/// Execute `subscribe` (`subscribe = true`) or `unsubscribe`.
pub fn run_change(ctx: &RuntimeContext, args: &TargetArgs, subscribe: bool) -> Result<()> {
    let backend = ctx.backend()?;
    backend
        .request()
        .change_subscription(&args.to_json(), subscribe)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "status": if subscribe { "subscribed" } else { "unsubscribed" },
            "target": [args.target_type, args.class, args.member.clone().unwrap_or_default()],
        }));
    } else if !ctx.quiet {
        let verb = if subscribe { "Subscribed to" } else { "Unsubscribed from" };
        println!("{verb} {} {}", args.target_type, args.class);
    }
    Ok(())
}

/// Execute the `marginalia subscriptions` command.
pub fn run_list(ctx: &RuntimeContext) -> Result<()> {
    let backend = ctx.backend()?;
    let targets = backend.request().get_subscriptions()?;

    if ctx.json {
        output_json(&targets);
    } else if targets.is_empty() {
        println!("No subscriptions");
    } else {
        for t in &targets {
            println!("  {}", format_target(t));
        }
    }
    Ok(())
}
