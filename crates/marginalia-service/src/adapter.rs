//! Conversion between store rows and the JSON response schema.
//!
//! Field names follow the wire format consumed by the documentation
//! front end (`_id`, `contentHtml`, `upVote`, ...), so they are renamed
//! explicitly rather than with a blanket `rename_all`.

use chrono::SecondsFormat;
use serde::Serialize;
use md5::{Digest, Md5};

use marginalia_core::comment::Comment;
use marginalia_core::stats::TopUser;
use marginalia_core::target::TargetDescriptor;
use marginalia_core::validation::{ValidationError, validate_target};
use marginalia_core::vote::VoteValue;
use marginalia_core::{CommentId, UserId};

/// A target in wire form: `[type, class, member]`.
pub type TargetJson = [String; 3];

/// A comment as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentJson {
    #[serde(rename = "_id")]
    pub id: CommentId,
    pub user_id: UserId,
    pub author: String,
    pub target: TargetJson,
    pub content: String,
    #[serde(rename = "contentHtml")]
    pub content_html: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub score: i64,
    #[serde(rename = "upVote")]
    pub up_vote: bool,
    #[serde(rename = "downVote")]
    pub down_vote: bool,
    pub read: Option<bool>,
    pub tags: Vec<String>,
    pub moderator: bool,
    #[serde(rename = "emailHash")]
    pub email_hash: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<CommentId>,
    #[serde(rename = "replyCount")]
    pub reply_count: Option<i64>,
    /// Only present (and true) when a deleted comment is shown.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,

    // Paging envelope, set on the last row of the recent feed only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// A leaderboard user as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserJson {
    pub id: UserId,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub score: i64,
    #[serde(rename = "mod")]
    pub moderator: bool,
    #[serde(rename = "emailHash")]
    pub email_hash: String,
}

pub fn comment_to_json(comment: &Comment) -> CommentJson {
    CommentJson {
        id: comment.id,
        user_id: comment.user_id,
        author: comment.username.clone(),
        target: target_to_json(&comment.target),
        content: comment.content.clone(),
        content_html: comment.content_html.clone(),
        created_at: comment.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        score: comment.score,
        up_vote: comment.vote_dir == Some(VoteValue::Up),
        down_vote: comment.vote_dir == Some(VoteValue::Down),
        read: comment.read,
        tags: comment.tags.clone(),
        moderator: comment.moderator,
        email_hash: email_hash(&comment.email),
        parent_id: comment.parent_id,
        reply_count: comment.reply_count,
        deleted: comment.deleted,
        total_rows: comment.page.map(|p| p.total_rows),
        offset: comment.page.map(|p| p.offset),
        limit: comment.page.map(|p| p.limit),
    }
}

pub fn user_to_json(user: &TopUser) -> UserJson {
    UserJson {
        id: user.id,
        user_name: user.username.clone(),
        score: user.score,
        moderator: user.moderator,
        email_hash: email_hash(&user.email),
    }
}

pub fn target_to_json(target: &TargetDescriptor) -> TargetJson {
    [
        target.target_type.clone(),
        target.class.clone(),
        target.member.clone(),
    ]
}

/// Parses a `["type", "class", "member"]` string; `member` may be omitted
/// or null.
pub fn target_from_json(json: &str) -> Result<TargetDescriptor, ValidationError> {
    let parts: Vec<Option<String>> = serde_json::from_str(json)
        .map_err(|_| ValidationError::MalformedTarget(json.to_string()))?;
    if !(2..=3).contains(&parts.len()) {
        return Err(ValidationError::MalformedTarget(json.to_string()));
    }

    let mut parts = parts.into_iter();
    let target_type = parts.next().flatten().unwrap_or_default();
    let class = parts.next().flatten().unwrap_or_default();
    let member = parts.next().flatten();

    let target = TargetDescriptor::new(target_type, class, member.as_deref());
    validate_target(&target)?;
    Ok(target)
}

/// Hex MD5 of the trimmed, lower-cased address, the Gravatar avatar key.
pub fn email_hash(email: &str) -> String {
    let digest = Md5::digest(email.trim().to_lowercase().as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use marginalia_core::comment::PageInfo;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Comment {
        Comment {
            id: 5,
            domain: "ext-4".into(),
            target_id: 1,
            target: TargetDescriptor::new("class", "Ext.Panel", Some("cfg-title")),
            parent_id: None,
            user_id: 2,
            username: "alice".into(),
            email: "Alice@Example.com ".into(),
            moderator: false,
            content: "hi".into(),
            content_html: "<p>hi</p>".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            deleted: false,
            score: 3,
            vote_dir: Some(VoteValue::Down),
            read: None,
            reply_count: Some(0),
            tags: vec!["bug".into()],
            page: None,
        }
    }

    #[test]
    fn comment_wire_names() {
        let json = serde_json::to_value(comment_to_json(&sample())).unwrap();
        assert_eq!(json["_id"], 5);
        assert_eq!(json["author"], "alice");
        assert_eq!(json["target"], serde_json::json!(["class", "Ext.Panel", "cfg-title"]));
        assert_eq!(json["contentHtml"], "<p>hi</p>");
        assert_eq!(json["createdAt"], "2024-03-01T10:00:00.000Z");
        assert_eq!(json["upVote"], false);
        assert_eq!(json["downVote"], true);
        assert_eq!(json["parentId"], serde_json::Value::Null);
        assert!(json.get("total_rows").is_none());
        assert!(json.get("deleted").is_none());
    }

    #[test]
    fn page_info_lands_on_row() {
        let mut c = sample();
        c.page = Some(PageInfo {
            total_rows: 40,
            offset: 20,
            limit: 10,
        });
        let json = serde_json::to_value(comment_to_json(&c)).unwrap();
        assert_eq!(json["total_rows"], 40);
        assert_eq!(json["offset"], 20);
        assert_eq!(json["limit"], 10);
    }

    #[test]
    fn email_hash_normalizes() {
        assert_eq!(email_hash("Alice@Example.com "), email_hash("alice@example.com"));
        assert_eq!(email_hash("x").len(), 32);
        // Empty address hashes like any other string.
        assert_eq!(email_hash(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(email_hash("a"), "0cc175b9c0f1b6a831c399e269772661");
    }

    #[test]
    fn target_parsing() {
        assert_eq!(
            target_from_json(r#"["class","Ext.Panel"]"#).unwrap(),
            TargetDescriptor::new("class", "Ext.Panel", None)
        );
        assert_eq!(
            target_from_json(r#"["class","Ext","method-define"]"#).unwrap().member,
            "method-define"
        );
        assert_eq!(target_from_json(r#"["guide","intro",null]"#).unwrap().member, "");
    }

    #[test]
    fn malformed_targets() {
        for bad in ["", "nope", r#"["class"]"#, r#"{"type":"class"}"#, r#"["a","b","c","d"]"#] {
            assert!(
                matches!(target_from_json(bad), Err(ValidationError::MalformedTarget(_))),
                "{bad}"
            );
        }
        assert_eq!(
            target_from_json(r#"["class",""]"#).unwrap_err(),
            ValidationError::TargetClassRequired
        );
    }

    #[test]
    fn user_wire_names() {
        let json = serde_json::to_value(user_to_json(&TopUser {
            id: 1,
            username: "bob".into(),
            email: "bob@example.com".into(),
            moderator: true,
            score: 12,
        }))
        .unwrap();
        assert_eq!(json["userName"], "bob");
        assert_eq!(json["mod"], true);
        assert_eq!(json["score"], 12);
    }
}
