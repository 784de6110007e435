//! Store traits -- the public API for comment persistence.
//!
//! The request layer depends on these traits rather than on the SQLite
//! implementation so that alternative backends can be substituted in tests.

use std::collections::BTreeMap;

use marginalia_core::comment::{
    Comment, CommentUpdate, DeleteAction, NewComment, TagAction, UpdateEntry,
};
use marginalia_core::enums::TopUsersSort;
use marginalia_core::filter::{RecentQuery, ViewOptions};
use marginalia_core::stats::{TagCount, TopTarget, TopUser};
use marginalia_core::target::TargetDescriptor;
use marginalia_core::user::{NewUser, User};
use marginalia_core::vote::{Vote, VoteOutcome};
use marginalia_core::{CommentId, TargetId, UserId};

use crate::error::Result;

/// Comment persistence scoped to a single documentation domain.
///
/// Every read takes a [`ViewOptions`] describing the caller's visibility and
/// projection; nothing about a previous call carries over.
pub trait CommentStore {
    /// The domain this store is bound to.
    fn domain(&self) -> &str;

    // -- Reads ---------------------------------------------------------------

    fn get_by_id(&self, id: CommentId, view: &ViewOptions) -> Result<Comment>;

    /// Top-level comments on a target, oldest first.
    fn find(&self, target: &TargetDescriptor, view: &ViewOptions) -> Result<Vec<Comment>>;

    /// Replies to a comment, oldest first.
    fn find_children(&self, parent_id: CommentId, view: &ViewOptions) -> Result<Vec<Comment>>;

    /// One page of the recent feed; the last row carries the paging envelope.
    fn find_recent(&self, query: &RecentQuery, view: &ViewOptions) -> Result<Vec<Comment>>;

    /// Total rows matching `query`, ignoring paging.
    fn count(&self, query: &RecentQuery, view: &ViewOptions) -> Result<i64>;

    fn counts_per_target(&self) -> Result<BTreeMap<String, i64>>;

    // -- Writes --------------------------------------------------------------

    fn add(&self, comment: &NewComment) -> Result<CommentId>;
    fn update(&self, update: &CommentUpdate) -> Result<()>;
    fn set_deleted(&self, action: &DeleteAction) -> Result<()>;

    /// Moves a comment and its direct replies under `parent_id`.
    fn set_parent(&self, id: CommentId, parent_id: Option<CommentId>) -> Result<()>;

    /// Resolves a requested parent to its thread's top-level comment.
    fn fix_parent_id(&self, parent_id: Option<CommentId>) -> Result<Option<CommentId>>;

    // -- Ledgers -------------------------------------------------------------

    fn vote(&self, vote: &Vote) -> Result<VoteOutcome>;
    fn mark_read(&self, user_id: UserId, comment_id: CommentId) -> Result<()>;
    fn add_tag(&self, action: &TagAction) -> Result<()>;
    fn remove_tag(&self, action: &TagAction) -> Result<()>;

    // -- Aggregates ----------------------------------------------------------

    fn get_top_tags(&self) -> Result<Vec<TagCount>>;
    fn get_top_users(&self, sort_by: TopUsersSort) -> Result<Vec<TopUser>>;
    fn get_top_targets(&self) -> Result<Vec<TopTarget>>;
    fn get_updates(&self, comment_id: CommentId) -> Result<Vec<UpdateEntry>>;

    // -- Targets -------------------------------------------------------------

    fn lookup_target(&self, target: &TargetDescriptor) -> Result<Option<TargetId>>;
}

/// Per-user target subscriptions within a domain.
pub trait SubscriptionStore {
    fn find_targets_by_user(&self, user_id: UserId) -> Result<Vec<TargetDescriptor>>;
    fn find_subscribers(&self, target_id: TargetId) -> Result<Vec<User>>;
    fn add_subscription(&self, user_id: UserId, target: &TargetDescriptor) -> Result<()>;
    fn remove_subscription(&self, user_id: UserId, target: &TargetDescriptor) -> Result<()>;
}

/// User accounts, shared by every domain.
pub trait UserStore {
    fn create_user(&self, user: &NewUser) -> Result<UserId>;
    fn get_user(&self, id: UserId) -> Result<User>;
    fn get_user_by_name(&self, username: &str) -> Result<User>;
}
