//! Enum types for the comment engine.
//!
//! String-backed enums serialize as their snake_case name and expose
//! `as_str()` plus a `Display` impl.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// UpdateAction
// ---------------------------------------------------------------------------

/// Kind of moderation/audit entry written to the update log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpdateAction {
    /// Content was edited.
    Update,
    /// Comment was soft-deleted.
    Delete,
    /// A soft delete was undone.
    UndoDelete,
    /// Unknown action read back from storage.
    Other(String),
}

impl UpdateAction {
    /// Returns the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Update => "update",
            Self::Delete => "delete",
            Self::UndoDelete => "undo_delete",
            Self::Other(s) => s.as_str(),
        }
    }

    /// The action recorded when the deleted flag is set to `deleted`.
    pub fn for_deleted(deleted: bool) -> Self {
        if deleted { Self::Delete } else { Self::UndoDelete }
    }
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UpdateAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UpdateAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

impl From<String> for UpdateAction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "update" => Self::Update,
            "delete" => Self::Delete,
            "undo_delete" => Self::UndoDelete,
            _ => Self::Other(s),
        }
    }
}

// ---------------------------------------------------------------------------
// RecentOrder
// ---------------------------------------------------------------------------

/// Sort key of the recent-comments feed (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentOrder {
    /// Newest first.
    #[default]
    CreatedAt,
    /// Highest vote score first.
    Score,
}

impl RecentOrder {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for RecentOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecentOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" | "date" => Ok(Self::CreatedAt),
            "score" | "vote" => Ok(Self::Score),
            other => Err(format!("unknown order: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// TopUsersSort
// ---------------------------------------------------------------------------

/// Ranking key for the top-users view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopUsersSort {
    /// Sum of the vote scores of the user's comments.
    #[default]
    Votes,
    /// Number of comments written.
    Comments,
}

impl TopUsersSort {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Votes => "votes",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for TopUsersSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopUsersSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "votes" => Ok(Self::Votes),
            "comments" => Ok(Self::Comments),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}
