//! [`Request`] -- one inbound call bound to a session and a domain.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use marginalia_core::comment::{
    CommentUpdate, DeleteAction, NewComment, TagAction, UpdateEntry,
};
use marginalia_core::enums::TopUsersSort;
use marginalia_core::filter::{DEFAULT_RECENT_LIMIT, RecentQuery, ViewOptions};
use marginalia_core::stats::{TagCount, TopTarget};
use marginalia_core::vote::{Vote, VoteValue};
use marginalia_core::{CommentId, TargetId};
use marginalia_storage::{CommentStore, SubscriptionStore};

use crate::adapter::{self, CommentJson, TargetJson, UserJson};
use crate::error::{Result, ServiceError};
use crate::mailer::Mailer;
use crate::session::{Session, SessionUser};

/// Builds the domain name `"{sdk}-{version}"` of a documentation set.
///
/// The version must be a non-zero number, so `("extjs", "4")` is accepted
/// while `("extjs", "latest")` and `("extjs", "0")` are not.
pub fn domain_name(sdk: &str, version: &str) -> Result<String> {
    let sdk = sdk.trim();
    let version = version.trim();
    let numeric = version
        .parse::<f64>()
        .is_ok_and(|v| v.is_finite() && v != 0.0);
    if sdk.is_empty() || !numeric {
        return Err(ServiceError::Validation(format!(
            "unknown documentation domain {sdk:?} version {version:?}"
        )));
    }
    Ok(format!("{sdk}-{version}"))
}

/// Behaviour switches of the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Resolve a reply-to-a-reply to its thread root when adding comments.
    pub flatten_replies_on_add: bool,
    /// Page size of the recent feed when the caller gives none.
    pub default_limit: i64,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            flatten_replies_on_add: false,
            default_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Result of a vote as returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteResponse {
    /// `"up"`/`"down"` when a vote was recorded, `null` otherwise.
    pub direction: Option<&'static str>,
    /// The comment's new score.
    pub total: i64,
}

/// One inbound call: the caller's session, a domain-scoped store and the
/// collaborators needed by its workflows.
pub struct Request<'a, S> {
    store: S,
    session: Session,
    mailer: &'a dyn Mailer,
    options: RequestOptions,
}

impl<'a, S> Request<'a, S>
where
    S: CommentStore + SubscriptionStore,
{
    pub fn new(store: S, session: Session, mailer: &'a dyn Mailer) -> Self {
        Self {
            store,
            session,
            mailer,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Viewer projection for this caller: logged-in users see their own
    /// votes, moderators additionally see read flags.
    pub fn view(&self) -> ViewOptions {
        let mut view = ViewOptions::visible();
        if let Some(user) = &self.session.user {
            view = view.vote_dir_by(user.id);
            if user.moderator {
                view = view.read_by(user.id);
            }
        }
        view
    }

    // -- Role checks ---------------------------------------------------------

    fn require_user(&self) -> Result<&SessionUser> {
        self.session.user.as_ref().ok_or(ServiceError::Unauthorized)
    }

    fn require_moderator(&self) -> Result<&SessionUser> {
        let user = self.require_user()?;
        if !user.moderator {
            return Err(ServiceError::forbidden("moderator rights required"));
        }
        Ok(user)
    }

    fn require_modify(&self, comment_id: CommentId) -> Result<&SessionUser> {
        if !self.can_modify(comment_id)? {
            return Err(ServiceError::forbidden(format!(
                "comment {comment_id} belongs to another user"
            )));
        }
        self.require_user()
    }

    /// True when the caller is a moderator or the comment's author. Deleted
    /// comments are inspected too, so authors can restore their own.
    pub fn can_modify(&self, comment_id: CommentId) -> Result<bool> {
        let user = self.require_user()?;
        let comment = self
            .store
            .get_by_id(comment_id, &ViewOptions::with_deleted())?;
        Ok(user.moderator || user.id == comment.user_id)
    }

    // -- Reads ---------------------------------------------------------------

    /// One page of the recent feed. The last row carries `total_rows`,
    /// `offset` and `limit`.
    pub fn get_recent_comments(
        &self,
        mut query: RecentQuery,
        hide_current_user: bool,
    ) -> Result<Vec<CommentJson>> {
        if hide_current_user {
            query.hide_user = self.session.user_id();
        }
        if query.limit.is_none() {
            query.limit = Some(self.options.default_limit);
        }
        let comments = self.store.find_recent(&query, &self.view())?;
        Ok(comments.iter().map(adapter::comment_to_json).collect())
    }

    /// Number of comments the recent feed would list for `query`, ignoring
    /// paging.
    pub fn count_recent(&self, mut query: RecentQuery, hide_current_user: bool) -> Result<i64> {
        if hide_current_user {
            query.hide_user = self.session.user_id();
        }
        Ok(self.store.count(&query, &self.view())?)
    }

    /// Id of a known target; `None` when nothing was ever posted on it.
    pub fn lookup_target(&self, target_json: &str) -> Result<Option<TargetId>> {
        let target = adapter::target_from_json(target_json)?;
        Ok(self.store.lookup_target(&target)?)
    }

    pub fn get_comments(&self, target_json: &str) -> Result<Vec<CommentJson>> {
        let target = adapter::target_from_json(target_json)?;
        let comments = self.store.find(&target, &self.view())?;
        Ok(comments.iter().map(adapter::comment_to_json).collect())
    }

    pub fn get_replies(&self, parent_id: CommentId) -> Result<Vec<CommentJson>> {
        let comments = self.store.find_children(parent_id, &self.view())?;
        Ok(comments.iter().map(adapter::comment_to_json).collect())
    }

    pub fn get_comment(&self, comment_id: CommentId) -> Result<CommentJson> {
        let comment = self.store.get_by_id(comment_id, &self.view())?;
        Ok(adapter::comment_to_json(&comment))
    }

    pub fn get_top_users(&self, sort_by: TopUsersSort) -> Result<Vec<UserJson>> {
        let users = self.store.get_top_users(sort_by)?;
        Ok(users.iter().map(adapter::user_to_json).collect())
    }

    pub fn get_top_targets(&self) -> Result<Vec<TopTarget>> {
        Ok(self.store.get_top_targets()?)
    }

    pub fn get_top_tags(&self) -> Result<Vec<TagCount>> {
        Ok(self.store.get_top_tags()?)
    }

    pub fn get_comment_counts_per_target(&self) -> Result<BTreeMap<String, i64>> {
        Ok(self.store.counts_per_target()?)
    }

    /// The caller's subscriptions; empty for anonymous callers.
    pub fn get_subscriptions(&self) -> Result<Vec<TargetJson>> {
        let Some(user_id) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        let targets = self.store.find_targets_by_user(user_id)?;
        Ok(targets.iter().map(adapter::target_to_json).collect())
    }

    /// Edit and visibility history of a comment (moderators only).
    pub fn get_history(&self, comment_id: CommentId) -> Result<Vec<UpdateEntry>> {
        self.require_moderator()?;
        Ok(self.store.get_updates(comment_id)?)
    }

    // -- Writes --------------------------------------------------------------

    /// Adds a comment, then marks it read for moderators, re-reads it with
    /// the caller's view and finally notifies the target's subscribers.
    pub fn add_comment(
        &self,
        target_json: &str,
        parent_id: Option<CommentId>,
        content: &str,
        thread_url: &str,
    ) -> Result<CommentJson> {
        let user = self.require_user()?;
        let target = adapter::target_from_json(target_json)?;

        let parent_id = if self.options.flatten_replies_on_add {
            self.store.fix_parent_id(parent_id)?
        } else {
            parent_id
        };

        let id = self.store.add(&NewComment {
            user_id: user.id,
            target,
            parent_id,
            content: content.to_string(),
        })?;
        debug!(id, user = %user.username, "comment stored");

        if user.moderator {
            self.store.mark_read(user.id, id)?;
        }

        let comment = self.store.get_by_id(id, &self.view())?;

        let subscribers: Vec<String> = match self.store.find_subscribers(comment.target_id) {
            Ok(users) => users
                .into_iter()
                .filter(|u| u.id != user.id && !u.email.is_empty())
                .map(|u| u.email)
                .collect(),
            Err(e) => {
                warn!(id, error = %e, "failed to look up subscribers");
                Vec::new()
            }
        };
        if let Err(e) = self.mailer.notify(&comment, thread_url, &subscribers) {
            warn!(id, error = %e, "failed to send comment notification");
        }

        Ok(adapter::comment_to_json(&comment))
    }

    /// Replaces a comment's content (author or moderator).
    pub fn update_comment(&self, comment_id: CommentId, content: &str) -> Result<CommentJson> {
        let user = self.require_modify(comment_id)?;
        self.store.update(&CommentUpdate {
            id: comment_id,
            user_id: user.id,
            content: content.to_string(),
        })?;

        let comment = self
            .store
            .get_by_id(comment_id, &self.view().show_deleted(true))?;
        Ok(adapter::comment_to_json(&comment))
    }

    /// Deletes or restores a comment (author or moderator) and returns its
    /// new state.
    pub fn set_deleted(&self, comment_id: CommentId, deleted: bool) -> Result<CommentJson> {
        let user = self.require_modify(comment_id)?;
        self.store.set_deleted(&DeleteAction {
            id: comment_id,
            user_id: user.id,
            deleted,
        })?;

        let comment = self
            .store
            .get_by_id(comment_id, &self.view().show_deleted(true))?;
        Ok(adapter::comment_to_json(&comment))
    }

    /// Votes `"up"` or `"down"`. Authors cannot vote on their own comments.
    pub fn vote(&self, comment_id: CommentId, direction: &str) -> Result<VoteResponse> {
        let user = self.require_user()?;
        let value = VoteValue::from_direction(direction)?;

        let comment = self.store.get_by_id(comment_id, &ViewOptions::visible())?;
        if comment.user_id == user.id {
            return Err(ServiceError::forbidden("cannot vote on your own comment"));
        }

        let outcome = self.store.vote(&Vote {
            user_id: user.id,
            comment_id,
            value,
        })?;
        Ok(VoteResponse {
            direction: outcome.direction.map(VoteValue::direction),
            total: outcome.score,
        })
    }

    pub fn add_tag(&self, comment_id: CommentId, tagname: &str) -> Result<()> {
        let user = self.require_moderator()?;
        self.store.add_tag(&TagAction {
            comment_id,
            user_id: user.id,
            tagname: tagname.to_string(),
        })?;
        Ok(())
    }

    pub fn remove_tag(&self, comment_id: CommentId, tagname: &str) -> Result<()> {
        let user = self.require_moderator()?;
        self.store.remove_tag(&TagAction {
            comment_id,
            user_id: user.id,
            tagname: tagname.to_string(),
        })?;
        Ok(())
    }

    pub fn mark_read(&self, comment_id: CommentId) -> Result<()> {
        let user = self.require_user()?;
        self.store.mark_read(user.id, comment_id)?;
        Ok(())
    }

    /// Moves a comment under `parent_id`, or to the top level when `None`
    /// (moderators only).
    pub fn set_parent(&self, comment_id: CommentId, parent_id: Option<CommentId>) -> Result<()> {
        self.require_moderator()?;
        self.store.set_parent(comment_id, parent_id)?;
        Ok(())
    }

    pub fn change_subscription(&self, target_json: &str, subscribe: bool) -> Result<()> {
        let user = self.require_user()?;
        let target = adapter::target_from_json(target_json)?;
        if subscribe {
            self.store.add_subscription(user.id, &target)?;
        } else {
            self.store.remove_subscription(user.id, &target)?;
        }
        Ok(())
    }
}
