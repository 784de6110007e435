//! Input validation rules.

use crate::target::TargetDescriptor;

/// Maximum length of a tag name, in characters.
pub const MAX_TAG_LEN: usize = 100;

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("target type is required")]
    TargetTypeRequired,

    #[error("target class is required")]
    TargetClassRequired,

    #[error("malformed target: {0}")]
    MalformedTarget(String),

    #[error("comment content cannot be empty")]
    EmptyContent,

    #[error("vote value must be 1 or -1 (got {0})")]
    InvalidVoteValue(i32),

    #[error("vote direction must be \"up\" or \"down\" (got {0:?})")]
    InvalidVoteDirection(String),

    #[error("tag name is required")]
    TagNameRequired,

    #[error("tag name must be {MAX_TAG_LEN} characters or less (got {0})")]
    TagNameTooLong(usize),

    #[error("tag name cannot contain tabs or newlines")]
    TagNameInvalidChars,

    #[error("a comment cannot be its own parent")]
    SelfParent,

    #[error("username is required")]
    UsernameRequired,
}

/// Validates a target descriptor before it is resolved or created.
pub fn validate_target(target: &TargetDescriptor) -> Result<(), ValidationError> {
    if target.target_type.trim().is_empty() {
        return Err(ValidationError::TargetTypeRequired);
    }
    if target.class.trim().is_empty() {
        return Err(ValidationError::TargetClassRequired);
    }
    Ok(())
}

/// Validates raw comment content.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}

/// Normalizes and validates a tag name, returning the trimmed form.
///
/// Tags are stored tab-joined in listings, so tabs and newlines are rejected.
pub fn normalize_tag_name(tagname: &str) -> Result<String, ValidationError> {
    let name = tagname.trim();
    if name.is_empty() {
        return Err(ValidationError::TagNameRequired);
    }
    let len = name.chars().count();
    if len > MAX_TAG_LEN {
        return Err(ValidationError::TagNameTooLong(len));
    }
    if name.contains(['\t', '\n', '\r']) {
        return Err(ValidationError::TagNameInvalidChars);
    }
    Ok(name.to_string())
}
