//! PinnedMessageRepository over the generic model repository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use hazel_core::entities::{NewPinnedMessage, PinnedMessage};
use hazel_core::error::DomainError;
use hazel_core::model::{Filter, RepositoryConfig, SortOrder};
use hazel_core::traits::{PinnedMessageRepository, RepoResult, TableStore};
use hazel_core::value_objects::{Snowflake, SnowflakeGenerator};

use crate::repository::ModelRepository;
use crate::tables::PINNED_MESSAGES;

const ENTITY: &str = "PinnedMessage";

/// Repository wiring for `pinned_messages`
pub const CONFIG: RepositoryConfig =
    RepositoryConfig::new("id", ENTITY).with_created_at("pinned_at");

/// Pinned message repository backed by any `TableStore`
#[derive(Debug, Clone)]
pub struct PinnedMessageRepo {
    inner: ModelRepository<PinnedMessage>,
}

impl PinnedMessageRepo {
    pub fn new(store: Arc<dyn TableStore>, ids: Arc<SnowflakeGenerator>) -> RepoResult<Self> {
        Ok(Self {
            inner: ModelRepository::make(&PINNED_MESSAGES, store, ids, CONFIG)?,
        })
    }
}

#[async_trait]
impl PinnedMessageRepository for PinnedMessageRepo {
    async fn create(&self, pin: &NewPinnedMessage) -> RepoResult<PinnedMessage> {
        self.inner.create(pin).await
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<PinnedMessage> {
        self.inner.find_by_id(id).await
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.inner.delete(id).await
    }

    async fn list(&self, filter: &Filter) -> RepoResult<Vec<PinnedMessage>> {
        self.inner.list(filter).await
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: &str) -> RepoResult<Vec<PinnedMessage>> {
        let filter = Filter::new()
            .where_eq("channel_id", channel_id)
            .order_by("pinned_at", SortOrder::Desc)
            .order_by("id", SortOrder::Desc);
        self.inner.list(&filter).await
    }

    #[instrument(skip(self))]
    async fn find_by_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> RepoResult<Option<PinnedMessage>> {
        let filter = Filter::new()
            .where_eq("channel_id", channel_id)
            .where_eq("message_id", message_id)
            .limit(1);
        Ok(self.inner.list(&filter).await?.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn unpin(&self, channel_id: &str, message_id: &str) -> RepoResult<()> {
        let pin = self
            .find_by_message(channel_id, message_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    ENTITY,
                    format!("message {message_id} in channel {channel_id}"),
                )
            })?;
        self.inner.delete(pin.id).await
    }
}
