//! Storage error types.

use marginalia_core::validation::ValidationError;

/// Errors that can occur during storage operations.
///
/// Lost races on votes, tags and readings are resolved inside the store and
/// never show up here.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested entity was not found in the current domain and
    /// visibility mode.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g., "comment", "user").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A validation constraint was violated.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to establish or maintain a database connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// A transaction operation failed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A schema migration failed.
    #[error("migration {name} failed: {reason}")]
    Migration {
        /// Name of the migration that failed.
        name: String,
        /// Underlying error description.
        reason: String,
    },

    /// A raw SQLite query error.
    #[error("query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// Catch-all for unexpected internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the storage crate.
pub type Result<T> = std::result::Result<T, StorageError>;

impl From<ValidationError> for StorageError {
    fn from(e: ValidationError) -> Self {
        Self::validation(e.to_string())
    }
}

impl StorageError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`StorageError::NotFound`] for the given entity kind and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a [`StorageError::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` if this is a [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a [`StorageError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry (e.g., database busy, connection errors).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Transaction(_) => true,
            Self::Query(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Maps `QueryReturnedNoRows` to [`StorageError::NotFound`].
pub(crate) fn not_found_on_no_rows(
    entity: &'static str,
    id: impl ToString,
) -> impl FnOnce(rusqlite::Error) -> StorageError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => StorageError::not_found(entity, id),
        other => StorageError::Query(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_convert() {
        let err: StorageError = ValidationError::EmptyContent.into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("content cannot be empty"));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let err = not_found_on_no_rows("comment", 42)(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "comment not found: 42");
    }

    #[test]
    fn retryable_errors() {
        assert!(StorageError::Connection("gone".into()).is_retryable());
        assert!(!StorageError::not_found("comment", 1).is_retryable());
    }
}
