//! Storage backend for documentation comments.
//!
//! Provides the [`CommentStore`], [`SubscriptionStore`] and [`UserStore`]
//! traits and a SQLite implementation ([`SqliteStore`], scoped per domain by
//! [`DomainStore`]).

pub mod error;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use error::StorageError;
pub use sqlite::{DomainStore, SqliteStore};
pub use traits::{CommentStore, SubscriptionStore, UserStore};

// ---------------------------------------------------------------------------
// Trait implementations for the SQLite backend
// ---------------------------------------------------------------------------

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

impl CommentStore for DomainStore<'_> {
    fn domain(&self) -> &str {
        self.name()
    }

    fn get_by_id(&self, id: CommentId, view: &ViewOptions) -> Result<Comment> {
        self.get_by_id_impl(id, view)
    }

    fn find(&self, target: &TargetDescriptor, view: &ViewOptions) -> Result<Vec<Comment>> {
        self.find_impl(target, view)
    }

    fn find_children(&self, parent_id: CommentId, view: &ViewOptions) -> Result<Vec<Comment>> {
        self.find_children_impl(parent_id, view)
    }

    fn find_recent(&self, query: &RecentQuery, view: &ViewOptions) -> Result<Vec<Comment>> {
        self.find_recent_impl(query, view)
    }

    fn count(&self, query: &RecentQuery, view: &ViewOptions) -> Result<i64> {
        self.count_impl(query, view)
    }

    fn counts_per_target(&self) -> Result<BTreeMap<String, i64>> {
        self.counts_per_target_impl()
    }

    fn add(&self, comment: &NewComment) -> Result<CommentId> {
        self.add_impl(comment)
    }

    fn update(&self, update: &CommentUpdate) -> Result<()> {
        self.update_impl(update)
    }

    fn set_deleted(&self, action: &DeleteAction) -> Result<()> {
        self.set_deleted_impl(action)
    }

    fn set_parent(&self, id: CommentId, parent_id: Option<CommentId>) -> Result<()> {
        self.set_parent_impl(id, parent_id)
    }

    fn fix_parent_id(&self, parent_id: Option<CommentId>) -> Result<Option<CommentId>> {
        self.fix_parent_id_impl(parent_id)
    }

    fn vote(&self, vote: &Vote) -> Result<VoteOutcome> {
        self.vote_impl(vote)
    }

    fn mark_read(&self, user_id: UserId, comment_id: CommentId) -> Result<()> {
        self.mark_read_impl(user_id, comment_id)
    }

    fn add_tag(&self, action: &TagAction) -> Result<()> {
        self.add_tag_impl(action)
    }

    fn remove_tag(&self, action: &TagAction) -> Result<()> {
        self.remove_tag_impl(action)
    }

    fn get_top_tags(&self) -> Result<Vec<TagCount>> {
        self.get_top_tags_impl()
    }

    fn get_top_users(&self, sort_by: TopUsersSort) -> Result<Vec<TopUser>> {
        self.get_top_users_impl(sort_by)
    }

    fn get_top_targets(&self) -> Result<Vec<TopTarget>> {
        self.get_top_targets_impl()
    }

    fn get_updates(&self, comment_id: CommentId) -> Result<Vec<UpdateEntry>> {
        self.get_updates_impl(comment_id)
    }

    fn lookup_target(&self, target: &TargetDescriptor) -> Result<Option<TargetId>> {
        self.lookup_target_impl(target)
    }
}

impl SubscriptionStore for DomainStore<'_> {
    fn find_targets_by_user(&self, user_id: UserId) -> Result<Vec<TargetDescriptor>> {
        self.find_targets_by_user_impl(user_id)
    }

    fn find_subscribers(&self, target_id: TargetId) -> Result<Vec<User>> {
        self.find_subscribers_impl(target_id)
    }

    fn add_subscription(&self, user_id: UserId, target: &TargetDescriptor) -> Result<()> {
        self.add_subscription_impl(user_id, target)
    }

    fn remove_subscription(&self, user_id: UserId, target: &TargetDescriptor) -> Result<()> {
        self.remove_subscription_impl(user_id, target)
    }
}

impl UserStore for SqliteStore {
    fn create_user(&self, user: &NewUser) -> Result<UserId> {
        self.create_user_impl(user)
    }

    fn get_user(&self, id: UserId) -> Result<User> {
        self.get_user_impl(id)
    }

    fn get_user_by_name(&self, username: &str) -> Result<User> {
        self.get_user_by_name_impl(username)
    }
}
