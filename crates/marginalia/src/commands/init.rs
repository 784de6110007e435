//! `marginalia init` -- create the database and a config file.

use std::fs;

use anyhow::{Context, Result, bail};

use marginalia_config::save_config;
use marginalia_storage::SqliteStore;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `marginalia init` command.
///
/// Creating the database is idempotent; the config file is only written
/// when missing (or with `--force`).
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    if let Some(dir) = ctx.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory: {}", dir.display()))?;
    }

    // Opening runs the schema setup.
    SqliteStore::open(&ctx.db_path)
        .with_context(|| format!("failed to create database: {}", ctx.db_path.display()))?;

    let write_config = args.force || !ctx.config_path.exists();
    if write_config {
        let mut config = ctx.config.clone();
        config.database = ctx.db_path.clone();
        save_config(&ctx.config_path, &config)
            .with_context(|| format!("failed to write {}", ctx.config_path.display()))?;
    } else if ctx.config.database != ctx.db_path {
        bail!(
            "{} points at {}, not {}\nHint: use --force to rewrite it",
            ctx.config_path.display(),
            ctx.config.database.display(),
            ctx.db_path.display()
        );
    }

    if ctx.json {
        output_json(&serde_json::json!({
            "database": ctx.db_path,
            "config": ctx.config_path,
            "config_written": write_config,
        }));
    } else if !ctx.quiet {
        println!();
        println!("marginalia initialized successfully!");
        println!();
        println!("  Database: {}", ctx.db_path.display());
        println!("  Config:   {}", ctx.config_path.display());
        println!();
        println!("Run `marginalia user add <name>` to register a user.");
        println!();
    }

    Ok(())
}
