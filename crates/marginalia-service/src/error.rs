//! Service error types.

use marginalia_core::validation::ValidationError;
use marginalia_storage::StorageError;

/// Errors returned by [`Request`](crate::Request) operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation requires a logged-in user.
    #[error("login required")]
    Unauthorized,

    /// The caller is logged in but lacks the required role or ownership.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The request itself was malformed.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Convenience alias used throughout the service crate.
pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl ServiceError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    /// True for caller mistakes (bad input, missing rights, unknown ids) as
    /// opposed to backend failures.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_not_found() || e.is_validation(),
            Self::Unauthorized | Self::Forbidden(_) | Self::Validation(_) => true,
        }
    }
}
