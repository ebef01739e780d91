//! Organization switching against a JWT session

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hazel_core::{AuthError, OrganizationIdResolver, OrganizationSwitcher};
use parking_lot::RwLock;
use tracing::{info, instrument};

use super::jwt::JwtService;

/// Resolver backed by a fixed internal-to-provider id table
#[derive(Debug, Clone, Default)]
pub struct MappedResolver {
    ids: HashMap<String, String>,
}

impl MappedResolver {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            ids: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl OrganizationIdResolver for MappedResolver {
    async fn resolve(&self, organization_id: &str) -> Result<String, AuthError> {
        self.ids
            .get(organization_id)
            .cloned()
            .ok_or_else(|| AuthError::UnknownOrganization(organization_id.to_string()))
    }
}

/// Switches organizations by re-issuing the session's access token.
///
/// The token only changes after the id resolved and the new token was
/// issued; on any failure the session keeps its previous token.
pub struct SessionOrganizationSwitcher {
    jwt: JwtService,
    resolver: Arc<dyn OrganizationIdResolver>,
    access_token: RwLock<String>,
}

impl SessionOrganizationSwitcher {
    pub fn new(
        jwt: JwtService,
        resolver: Arc<dyn OrganizationIdResolver>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            jwt,
            resolver,
            access_token: RwLock::new(access_token.into()),
        }
    }

    /// Current access token of the session
    pub fn access_token(&self) -> String {
        self.access_token.read().clone()
    }

    /// Provider id of the active organization, if any
    pub fn active_organization(&self) -> Result<Option<String>, AuthError> {
        let token = self.access_token();
        Ok(self.jwt.decode_token(&token)?.org_id)
    }
}

impl std::fmt::Debug for SessionOrganizationSwitcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOrganizationSwitcher")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrganizationSwitcher for SessionOrganizationSwitcher {
    #[instrument(skip(self))]
    async fn switch_to(&self, organization_id: &str) -> Result<(), AuthError> {
        let provider_id = self.resolver.resolve(organization_id).await?;

        let current = self.access_token();
        let token = self.jwt.reissue_for_organization(&current, &provider_id)?;
        *self.access_token.write() = token;

        info!(%provider_id, "Switched organization");
        Ok(())
    }
}
