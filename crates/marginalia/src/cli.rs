//! Clap CLI definitions for the `marginalia` command.
//!
//! This module defines the complete CLI structure using clap 4 derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use marginalia_core::enums::{RecentOrder, TopUsersSort};

/// marginalia -- comments for API documentation.
///
/// Stores threaded, votable comments attached to the classes and members of
/// a documentation set.
#[derive(Parser, Debug)]
#[command(
    name = "marginalia",
    about = "Comments for API documentation",
    long_about = "Stores threaded, votable comments attached to the classes and members of a documentation set.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Database path (default: `database` from the config file).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Configuration file.
    #[arg(long, global = true, default_value = "marginalia.yaml")]
    pub config: PathBuf,

    /// Act as this user (must exist, see `user add`).
    #[arg(long, global = true, env = "MARGINALIA_USER")]
    pub user: Option<String>,

    /// Documentation SDK, first half of the domain.
    #[arg(long, global = true, env = "MARGINALIA_SDK", default_value = "ext-js")]
    pub sdk: String,

    /// Documentation version, second half of the domain.
    #[arg(long, global = true, env = "MARGINALIA_DOC_VERSION", default_value = "4")]
    pub doc_version: String,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and a default config file.
    Init(InitArgs),

    /// Manage users.
    User(UserArgs),

    // ===== Comments =====
    /// Add a comment to a target.
    Add(AddArgs),

    /// Show one comment.
    Show(IdArgs),

    /// List the top-level comments of a target.
    List(TargetArgs),

    /// List the replies to a comment.
    Replies(IdArgs),

    /// Replace the content of a comment.
    Edit(EditArgs),

    /// Delete a comment.
    Delete(IdArgs),

    /// Restore a deleted comment.
    Undelete(IdArgs),

    /// Vote a comment up or down.
    Vote(VoteArgs),

    /// Mark a comment as read.
    Read(IdArgs),

    /// Manage tags on a comment.
    Tag(TagArgs),

    /// Move a comment (and its replies) under another comment.
    #[command(name = "move")]
    MoveCmd(MoveArgs),

    /// Show the edit history of a comment.
    History(IdArgs),

    // ===== Feeds & Reports =====
    /// List recent top-level comments across the domain.
    Recent(RecentArgs),

    /// Count the comments `recent` would list.
    Count(FeedFilterArgs),

    /// Show top-level comment counts for every target.
    Counts,

    /// Leaderboards.
    Top(TopArgs),

    // ===== Subscriptions =====
    /// Subscribe to a target.
    Subscribe(TargetArgs),

    /// Unsubscribe from a target.
    Unsubscribe(TargetArgs),

    /// List the targets you are subscribed to.
    Subscriptions,

    /// Generate shell completions.
    Completion(CompletionArgs),
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// A single comment id.
#[derive(Args, Debug)]
pub struct IdArgs {
    /// Comment ID.
    pub id: i64,
}

/// A documentation element comments attach to.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Class name, e.g. `Ext.Panel`.
    pub class: String,

    /// Member within the class, e.g. `cfg-title`.
    #[arg(long)]
    pub member: Option<String>,

    /// Target type.
    #[arg(long = "type", default_value = "class")]
    pub target_type: String,
}

impl TargetArgs {
    /// The target in its JSON wire form.
    pub fn to_json(&self) -> String {
        serde_json::json!([self.target_type, self.class, self.member]).to_string()
    }
}

// ---------------------------------------------------------------------------
// Init / User
// ---------------------------------------------------------------------------

/// Arguments for `marginalia init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `marginalia user`.
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

/// User subcommands.
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user.
    Add(UserAddArgs),
    /// Show a user.
    Show(UserShowArgs),
}

/// Arguments for `marginalia user add`.
#[derive(Args, Debug)]
pub struct UserAddArgs {
    /// Login name.
    pub username: String,

    /// E-mail address (used for avatars).
    #[arg(long, default_value = "")]
    pub email: String,

    /// Grant moderator rights.
    #[arg(long)]
    pub moderator: bool,
}

/// Arguments for `marginalia user show`.
#[derive(Args, Debug)]
pub struct UserShowArgs {
    /// Login name.
    pub username: String,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Arguments for `marginalia add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Comment text.
    #[arg(short = 'm', long)]
    pub message: String,

    /// Reply to this comment.
    #[arg(long)]
    pub parent: Option<i64>,

    /// Link to the thread, included in notifications.
    #[arg(long, default_value = "")]
    pub url: String,
}

/// Arguments for `marginalia edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Comment ID.
    pub id: i64,

    /// New comment text.
    #[arg(short = 'm', long)]
    pub message: String,
}

/// Arguments for `marginalia vote`.
#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Comment ID.
    pub id: i64,

    /// `up` or `down`.
    pub direction: String,
}

/// Arguments for `marginalia tag`.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Comment ID.
    pub id: i64,
    #[command(subcommand)]
    pub command: TagCommands,
}

/// Tag subcommands.
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Add a tag to a comment.
    Add(TagNameArgs),
    /// Remove a tag from a comment.
    Remove(TagNameArgs),
}

/// A tag name.
#[derive(Args, Debug)]
pub struct TagNameArgs {
    /// Tag name.
    pub tag: String,
}

/// Arguments for `marginalia move`.
#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Comment ID.
    pub id: i64,

    /// New parent; omit to make the comment top-level.
    #[arg(long)]
    pub parent: Option<i64>,
}

// ---------------------------------------------------------------------------
// Feeds & Reports
// ---------------------------------------------------------------------------

/// Filters shared by `recent` and `count`.
#[derive(Args, Debug)]
pub struct FeedFilterArgs {
    /// Only comments by this user.
    #[arg(long)]
    pub author: Option<String>,

    /// Only comments on this class.
    #[arg(long)]
    pub class: Option<String>,

    /// Member within `--class`.
    #[arg(long, requires = "class")]
    pub member: Option<String>,

    /// Target type of `--class`.
    #[arg(long = "type", default_value = "class")]
    pub target_type: String,

    /// Only comments with this tag.
    #[arg(long)]
    pub tag: Option<String>,

    /// Leave out your own comments.
    #[arg(long)]
    pub hide_mine: bool,

    /// Leave out comments you have read (moderators).
    #[arg(long)]
    pub hide_read: bool,
}

impl FeedFilterArgs {
    /// The `--class` filter as a wire-form target.
    pub fn target_json(&self) -> Option<String> {
        self.class.as_ref().map(|class| {
            TargetArgs {
                class: class.clone(),
                member: self.member.clone(),
                target_type: self.target_type.clone(),
            }
            .to_json()
        })
    }
}

/// Arguments for `marginalia recent`.
#[derive(Args, Debug)]
pub struct RecentArgs {
    #[command(flatten)]
    pub filter: FeedFilterArgs,

    /// Sort by `created_at` or `score`.
    #[arg(long, default_value = "created_at")]
    pub order_by: RecentOrder,

    /// Maximum number of comments (default: `default_limit` from config).
    #[arg(short = 'n', long)]
    pub limit: Option<i64>,

    /// Skip this many comments.
    #[arg(long)]
    pub offset: Option<i64>,
}

/// Arguments for `marginalia top`.
#[derive(Args, Debug)]
pub struct TopArgs {
    #[command(subcommand)]
    pub command: TopCommands,
}

/// Leaderboard subcommands.
#[derive(Subcommand, Debug)]
pub enum TopCommands {
    /// Users ranked by votes or comment count.
    Users {
        /// `votes` or `comments`.
        #[arg(long, default_value = "votes")]
        sort_by: TopUsersSort,
    },
    /// Targets ranked by comment count.
    Targets,
    /// Tags ranked by usage.
    Tags,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `marginalia completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Supported shells.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate bash completions.
    Bash,
    /// Generate zsh completions.
    Zsh,
    /// Generate fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn target_json_keeps_null_member() {
        let t = TargetArgs {
            class: "Ext.Panel".into(),
            member: None,
            target_type: "class".into(),
        };
        assert_eq!(t.to_json(), r#"["class","Ext.Panel",null]"#);
    }

    #[test]
    fn parses_feed_flags() {
        let cli = Cli::try_parse_from([
            "marginalia", "recent", "--class", "Ext.Panel", "--order-by", "score", "-n", "5",
        ])
        .unwrap();
        let Some(Commands::Recent(args)) = cli.command else {
            panic!("expected recent");
        };
        assert_eq!(args.order_by, RecentOrder::Score);
        assert_eq!(args.limit, Some(5));
        assert_eq!(
            args.filter.target_json().as_deref(),
            Some(r#"["class","Ext.Panel",null]"#)
        );
    }
}
