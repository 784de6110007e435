//! Per-query viewer options and recent-feed filters.

use crate::enums::RecentOrder;
use crate::{TargetId, UserId};

/// Default page size of the recent-comments feed.
pub const DEFAULT_RECENT_LIMIT: i64 = 100;

/// Visibility mode and viewer projection for a single read.
///
/// Passed by value into every query instead of being toggled on the store, so
/// elevated visibility never leaks into a later call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Include soft-deleted comments.
    pub show_deleted: bool,
    /// Attach this user's own vote as `vote_dir`.
    pub vote_dir_by: Option<UserId>,
    /// Attach this user's read flag as `read`.
    pub read_by: Option<UserId>,
}

impl ViewOptions {
    /// Default visibility: deleted comments hidden, no projection.
    pub fn visible() -> Self {
        Self::default()
    }

    /// Elevated visibility including deleted comments.
    pub fn with_deleted() -> Self {
        Self {
            show_deleted: true,
            ..Self::default()
        }
    }

    /// Returns a copy that includes or excludes deleted comments.
    pub fn show_deleted(mut self, show: bool) -> Self {
        self.show_deleted = show;
        self
    }

    /// Returns a copy that attaches `user_id`'s vote direction.
    pub fn vote_dir_by(mut self, user_id: UserId) -> Self {
        self.vote_dir_by = Some(user_id);
        self
    }

    /// Returns a copy that attaches `user_id`'s read flag.
    pub fn read_by(mut self, user_id: UserId) -> Self {
        self.read_by = Some(user_id);
        self
    }
}

/// Filters and paging for the recent-comments feed and its count.
///
/// All set filters are combined with AND. Only top-level comments are ever
/// matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentQuery {
    pub order_by: RecentOrder,
    /// Page size; `None` means [`DEFAULT_RECENT_LIMIT`].
    pub limit: Option<i64>,
    /// Rows to skip; `None` means 0.
    pub offset: Option<i64>,
    /// Exclude comments written by this user.
    pub hide_user: Option<UserId>,
    /// Exclude comments the read viewer has already read.
    pub hide_read: bool,
    /// Only comments written by this username.
    pub username: Option<String>,
    /// Only comments on this target.
    pub target_id: Option<TargetId>,
    /// Only comments carrying exactly this tag.
    pub tagname: Option<String>,
}

impl RecentQuery {
    /// Effective page size.
    pub fn limit(&self) -> i64 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_RECENT_LIMIT)
    }

    /// Effective offset.
    pub fn offset(&self) -> i64 {
        self.offset.filter(|o| *o > 0).unwrap_or(0)
    }
}
