//! Organization switching for the current session
//!
//! Callers work with internal organization ids. Translating them into the
//! identity provider's ids is a required step, so every switcher is built
//! around an [`OrganizationIdResolver`].

use async_trait::async_trait;

use crate::error::AuthError;

/// Switch the active organization of the current session
#[async_trait]
pub trait OrganizationSwitcher: Send + Sync {
    async fn switch_to(&self, organization_id: &str) -> Result<(), AuthError>;
}

/// Map an internal organization id to the identity provider's id
#[async_trait]
pub trait OrganizationIdResolver: Send + Sync {
    /// Fails with `AuthError::UnknownOrganization` if there is no mapping
    async fn resolve(&self, organization_id: &str) -> Result<String, AuthError>;
}

/// Resolver for deployments where internal and provider ids are the same.
///
/// Must be chosen explicitly; nothing falls back to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

#[async_trait]
impl OrganizationIdResolver for PassthroughResolver {
    async fn resolve(&self, organization_id: &str) -> Result<String, AuthError> {
        if organization_id.trim().is_empty() {
            return Err(AuthError::UnknownOrganization(organization_id.to_string()));
        }
        Ok(organization_id.to_string())
    }
}
