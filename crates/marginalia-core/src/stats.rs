//! Aggregate view rows: top users, top targets, top tags.

use serde::{Deserialize, Serialize};

use crate::{TargetId, UserId};

/// A user ranked by vote score or comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub moderator: bool,
    pub score: i64,
}

/// A target ranked by number of comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTarget {
    pub id: TargetId,
    #[serde(rename = "type")]
    pub target_type: String,
    #[serde(rename = "cls")]
    pub class: String,
    pub member: String,
    pub score: i64,
}

/// A tag ranked by number of comments carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tagname: String,
    pub score: i64,
}
