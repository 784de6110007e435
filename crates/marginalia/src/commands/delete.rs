//! `marginalia delete` and `marginalia undelete`.

use anyhow::Result;

use crate::cli::IdArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute `delete` (`deleted = true`) or `undelete` (`deleted = false`).
pub fn run(ctx: &RuntimeContext, args: &IdArgs, deleted: bool) -> Result<()> {
    let backend = ctx.backend()?;
    let comment = backend.request().set_deleted(args.id, deleted)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "_id": comment.id,
            "deleted": comment.deleted,
        }));
    } else if !ctx.quiet {
        let verb = if deleted { "Deleted" } else { "Restored" };
        println!("{verb} comment #{}", comment.id);
    }
    Ok(())
}
