//! `marginalia` -- comments for API documentation.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(ctx.log_filter()))
            .with_writer(std::io::stderr)
            .init();

        dispatch(&ctx, cli.command)
    });

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn dispatch(ctx: &RuntimeContext, command: Option<Commands>) -> anyhow::Result<()> {
    match command {
        Some(Commands::Init(args)) => commands::init::run(ctx, &args),
        Some(Commands::User(args)) => commands::user::run(ctx, &args),
        // Comments
        Some(Commands::Add(args)) => commands::comment::run_add(ctx, &args),
        Some(Commands::Show(args)) => commands::comment::run_show(ctx, &args),
        Some(Commands::List(args)) => commands::comment::run_list(ctx, &args),
        Some(Commands::Replies(args)) => commands::comment::run_replies(ctx, &args),
        Some(Commands::Edit(args)) => commands::comment::run_edit(ctx, &args),
        Some(Commands::Delete(args)) => commands::delete::run(ctx, &args, true),
        Some(Commands::Undelete(args)) => commands::delete::run(ctx, &args, false),
        Some(Commands::Vote(args)) => commands::vote::run(ctx, &args),
        Some(Commands::Read(args)) => commands::read::run(ctx, &args),
        Some(Commands::Tag(args)) => commands::tag::run(ctx, &args),
        Some(Commands::MoveCmd(args)) => commands::move_cmd::run(ctx, &args),
        Some(Commands::History(args)) => commands::history::run(ctx, &args),
        // Feeds & reports
        Some(Commands::Recent(args)) => commands::recent::run(ctx, &args),
        Some(Commands::Count(args)) => commands::count::run(ctx, &args),
        Some(Commands::Counts) => commands::count::run_per_target(ctx),
        Some(Commands::Top(args)) => commands::top::run(ctx, &args),
        // Subscriptions
        Some(Commands::Subscribe(args)) => commands::subscription::run_change(ctx, &args, true),
        Some(Commands::Unsubscribe(args)) => commands::subscription::run_change(ctx, &args, false),
        Some(Commands::Subscriptions) => commands::subscription::run_list(ctx),
        Some(Commands::Completion(args)) => commands::completion::run(ctx, &args),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    }
}
