//! Errors from session and organization operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The internal organization id has no identity-provider counterpart
    #[error("Unknown organization: {0}")]
    UnknownOrganization(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownOrganization(_) => "UNKNOWN_ORGANIZATION",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Provider(_) => "IDENTITY_PROVIDER_ERROR",
        }
    }
}
