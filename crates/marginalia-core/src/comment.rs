//! Comment, mutation inputs, and update log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::UpdateAction;
use crate::target::TargetDescriptor;
use crate::vote::VoteValue;
use crate::{CommentId, TargetId, UserId};

/// A comment as seen by a particular viewer.
///
/// `vote_dir`, `read`, `reply_count` and `page` are computed per query and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,

    pub domain: String,

    pub target_id: TargetId,

    pub target: TargetDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,

    pub user_id: UserId,

    /// Author's username.
    pub username: String,

    /// Author's email address.
    #[serde(default)]
    pub email: String,

    /// Whether the author is a moderator.
    #[serde(default)]
    pub moderator: bool,

    pub content: String,

    pub content_html: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub deleted: bool,

    /// Sum of all vote values on this comment.
    #[serde(default)]
    pub score: i64,

    /// The viewer's own vote, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_dir: Option<VoteValue>,

    /// Whether the viewer has read the comment, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,

    /// Number of direct replies; only set by top-level listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<i64>,

    /// Sorted, unique tag names.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Pagination metadata, carried by the last row of a recent-comments page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
}

impl Comment {
    /// Returns `true` if this comment is a reply.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Total-count and paging echo attached to the last row of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Number of rows matching the filters, disregarding pagination.
    pub total_rows: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Input for creating a comment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub user_id: UserId,
    pub target: TargetDescriptor,
    /// Stored verbatim; replies to replies are not flattened here.
    pub parent_id: Option<CommentId>,
    pub content: String,
}

/// Input for editing a comment's content.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentUpdate {
    pub id: CommentId,
    /// The user performing the edit, recorded in the update log.
    pub user_id: UserId,
    pub content: String,
}

/// Input for soft-deleting or restoring a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAction {
    pub id: CommentId,
    pub user_id: UserId,
    /// `true` to delete, `false` to undo a delete.
    pub deleted: bool,
}

/// Input for attaching or detaching a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAction {
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub tagname: String,
}

/// An append-only moderation history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub id: i64,

    pub comment_id: CommentId,

    pub user_id: UserId,

    /// Username of the actor, when the user still exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    pub action: UpdateAction,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Comment {
        Comment {
            id: 7,
            domain: "touch-2".into(),
            target_id: 1,
            target: TargetDescriptor::new("class", "Ext", None),
            parent_id: None,
            user_id: 3,
            username: "alice".into(),
            email: "alice@example.com".into(),
            moderator: false,
            content: "Nice".into(),
            content_html: "<p>Nice</p>".into(),
            created_at: Utc::now(),
            deleted: false,
            score: 2,
            vote_dir: None,
            read: None,
            reply_count: Some(0),
            tags: vec![],
            page: None,
        }
    }

    #[test]
    fn transient_fields_omitted_when_absent() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("vote_dir").is_none());
        assert!(json.get("read").is_none());
        assert!(json.get("page").is_none());
        assert_eq!(json["reply_count"], 0);
    }

    #[test]
    fn reply_detection() {
        let mut c = sample();
        assert!(!c.is_reply());
        c.parent_id = Some(1);
        assert!(c.is_reply());
    }
}
