//! Domain errors - typed outcomes surfaced by repositories

use thiserror::Error;

/// Domain layer errors
///
/// `entity` fields carry the repository's human-readable entity name and are
/// only used for messages.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid {entity}: {message}")]
    Validation {
        entity: &'static str,
        message: String,
    },

    #[error("{entity} conflict: {message}")]
    Conflict {
        entity: &'static str,
        message: String,
    },

    #[error("Invalid repository configuration: {0}")]
    InvalidConfiguration(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            entity,
            message: message.into(),
        }
    }

    pub fn conflict(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            message: message.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Conflict { .. } => "CONFLICT",
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::not_found("PinnedMessage", 7).code(), "NOT_FOUND");
        assert_eq!(
            DomainError::conflict("PinnedMessage", "already pinned").code(),
            "CONFLICT"
        );
    }

    #[test]
    fn test_predicates() {
        assert!(DomainError::not_found("ChannelSection", 1).is_not_found());
        assert!(DomainError::validation("ChannelSection", "bad").is_validation());
        assert!(!DomainError::DatabaseError("x".into()).is_conflict());
    }

    #[test]
    fn test_error_display_uses_entity_name() {
        let err = DomainError::not_found("ChannelSection", 123);
        assert_eq!(err.to_string(), "ChannelSection not found: 123");

        let err = DomainError::validation("PinnedMessage", "channel_id: too short");
        assert_eq!(err.to_string(), "Invalid PinnedMessage: channel_id: too short");
    }
}
