//! Core types and rules for the marginalia comment engine.
//!
//! Everything in here is storage-agnostic: the comment model, targets, query
//! options, the single-vote state machine, validation and content rendering.

pub mod comment;
pub mod enums;
pub mod filter;
pub mod format;
pub mod stats;
pub mod target;
pub mod user;
pub mod validation;
pub mod vote;

/// Identifier of a comment row.
pub type CommentId = i64;

/// Identifier of a user row.
pub type UserId = i64;

/// Identifier of a target row.
pub type TargetId = i64;
