//! `marginalia recent` -- the domain-wide feed of top-level comments.

use anyhow::Result;

use marginalia_core::filter::RecentQuery;
use marginalia_service::Request;
use marginalia_storage::DomainStore;

use crate::cli::{FeedFilterArgs, RecentArgs};
use crate::context::RuntimeContext;
use crate::output::{output_json, print_comment_list};

/// Builds the feed query from the filter flags.
///
/// Returns `None` when `--class` names a target nobody has commented on,
/// so the feed is known to be empty.
pub fn build_query(
    request: &Request<'_, DomainStore<'_>>,
    filter: &FeedFilterArgs,
) -> Result<Option<RecentQuery>> {
    let target_id = match filter.target_json() {
        Some(json) => match request.lookup_target(&json)? {
            Some(id) => Some(id),
            None => return Ok(None),
        },
        None => None,
    };

    Ok(Some(RecentQuery {
        hide_read: filter.hide_read,
        username: filter.author.clone(),
        target_id,
        tagname: filter.tag.clone(),
        ..RecentQuery::default()
    }))
}

/// Execute the `marginalia recent` command.
pub fn run(ctx: &RuntimeContext, args: &RecentArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let request = backend.request();

    let comments = match build_query(&request, &args.filter)? {
        Some(query) => {
            let query = RecentQuery {
                order_by: args.order_by,
                limit: args.limit,
                offset: args.offset,
                ..query
            };
            request.get_recent_comments(query, args.filter.hide_mine)?
        }
        None => Vec::new(),
    };

    if ctx.json {
        output_json(&comments);
        return Ok(());
    }

    if comments.is_empty() {
        println!("No comments");
        return Ok(());
    }

    print_comment_list(&comments);
    if let Some(last) = comments.last() {
        if let (Some(total), Some(offset)) = (last.total_rows, last.offset) {
            if !ctx.quiet {
                println!(
                    "\nShowing {}-{} of {total}",
                    offset + 1,
                    offset + comments.len() as i64
                );
            }
        }
    }
    Ok(())
}
