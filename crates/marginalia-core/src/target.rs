//! Documentation targets that comment threads attach to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `{type, class, member}` triple identifying a documented entity
/// within a domain.
///
/// `member` is the empty string for comments on the class/guide/video itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// One of `class`, `guide`, `video` (custom values are tolerated).
    #[serde(rename = "type")]
    pub target_type: String,

    /// Name of the class, guide or video.
    #[serde(rename = "cls")]
    pub class: String,

    /// Name of the class member, or empty.
    #[serde(default)]
    pub member: String,
}

impl TargetDescriptor {
    /// Builds a descriptor; `member` defaults to `""` when absent.
    pub fn new(
        target_type: impl Into<String>,
        class: impl Into<String>,
        member: Option<&str>,
    ) -> Self {
        Self {
            target_type: target_type.into(),
            class: class.into(),
            member: member.unwrap_or_default().to_string(),
        }
    }

    /// The `"{type}__{class}__{member}"` key used by per-target count maps.
    pub fn key(&self) -> String {
        format!("{}__{}__{}", self.target_type, self.class, self.member)
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.member.is_empty() {
            write!(f, "{} {}", self.target_type, self.class)
        } else {
            write!(f, "{} {}#{}", self.target_type, self.class, self.member)
        }
    }
}
