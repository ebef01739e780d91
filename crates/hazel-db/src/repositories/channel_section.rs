//! ChannelSectionRepository over the generic model repository

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use hazel_core::entities::{ChannelSection, ChannelSectionPatch, NewChannelSection};
use hazel_core::error::DomainError;
use hazel_core::model::{Filter, RepositoryConfig, SortOrder};
use hazel_core::traits::{ChannelSectionRepository, RepoResult, TableStore};
use hazel_core::value_objects::{Snowflake, SnowflakeGenerator};

use crate::repository::ModelRepository;
use crate::tables::CHANNEL_SECTIONS;

const ENTITY: &str = "ChannelSection";

/// Repository wiring for `channel_sections`
pub const CONFIG: RepositoryConfig = RepositoryConfig::new("id", ENTITY)
    .with_created_at("created_at")
    .with_updated_at("updated_at");

/// Channel section repository backed by any `TableStore`
#[derive(Debug, Clone)]
pub struct ChannelSectionRepo {
    inner: ModelRepository<ChannelSection>,
}

impl ChannelSectionRepo {
    pub fn new(store: Arc<dyn TableStore>, ids: Arc<SnowflakeGenerator>) -> RepoResult<Self> {
        Ok(Self {
            inner: ModelRepository::make(&CHANNEL_SECTIONS, store, ids, CONFIG)?,
        })
    }
}

#[async_trait]
impl ChannelSectionRepository for ChannelSectionRepo {
    async fn create(&self, section: &NewChannelSection) -> RepoResult<ChannelSection> {
        self.inner.create(section).await
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<ChannelSection> {
        self.inner.find_by_id(id).await
    }

    async fn update(
        &self,
        id: Snowflake,
        patch: &ChannelSectionPatch,
    ) -> RepoResult<ChannelSection> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.inner.delete(id).await
    }

    async fn list(&self, filter: &Filter) -> RepoResult<Vec<ChannelSection>> {
        self.inner.list(filter).await
    }

    #[instrument(skip(self))]
    async fn find_by_workspace(&self, workspace_id: &str) -> RepoResult<Vec<ChannelSection>> {
        let filter = Filter::new()
            .where_eq("workspace_id", workspace_id)
            .order_by("position", SortOrder::Asc);
        self.inner.list(&filter).await
    }

    #[instrument(skip(self, ordered_ids), fields(count = ordered_ids.len()))]
    async fn reorder(
        &self,
        workspace_id: &str,
        ordered_ids: &[Snowflake],
    ) -> RepoResult<Vec<ChannelSection>> {
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        if let Some(dup) = ordered_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(DomainError::validation(
                ENTITY,
                format!("section {dup} appears more than once"),
            ));
        }

        let current = self.find_by_workspace(workspace_id).await?;
        let existing: HashSet<Snowflake> = current.iter().map(|s| s.id).collect();
        if let Some(stranger) = ordered_ids.iter().find(|id| !existing.contains(*id)) {
            return Err(DomainError::validation(
                ENTITY,
                format!("section {stranger} is not in workspace {workspace_id}"),
            ));
        }
        if existing.len() != ordered_ids.len() {
            return Err(DomainError::validation(
                ENTITY,
                format!(
                    "expected all {} sections of workspace {workspace_id}, got {}",
                    existing.len(),
                    ordered_ids.len()
                ),
            ));
        }

        let mut reordered = Vec::with_capacity(ordered_ids.len());
        for (position, section) in ordered_ids.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| DomainError::validation(ENTITY, "too many sections"))?;
            let patch = ChannelSectionPatch::move_to(position);
            reordered.push(self.inner.update(*section, &patch).await?);
        }

        info!(workspace_id, "Reordered channel sections");
        Ok(reordered)
    }
}
