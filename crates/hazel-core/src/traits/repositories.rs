//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{
    ChannelSection, ChannelSectionPatch, NewChannelSection, NewPinnedMessage, PinnedMessage,
};
use crate::error::DomainError;
use crate::model::Filter;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Channel Section Repository
// ============================================================================

#[async_trait]
pub trait ChannelSectionRepository: Send + Sync {
    async fn create(&self, section: &NewChannelSection) -> RepoResult<ChannelSection>;

    /// Fails with `NotFound` if the section does not exist
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<ChannelSection>;

    /// Apply a rename and/or move
    async fn update(&self, id: Snowflake, patch: &ChannelSectionPatch)
        -> RepoResult<ChannelSection>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    async fn list(&self, filter: &Filter) -> RepoResult<Vec<ChannelSection>>;

    /// Sections of a workspace ordered by position
    async fn find_by_workspace(&self, workspace_id: &str) -> RepoResult<Vec<ChannelSection>>;

    /// Rewrite positions so the workspace's sections follow `ordered_ids`.
    ///
    /// `ordered_ids` must name every section of the workspace exactly once.
    async fn reorder(
        &self,
        workspace_id: &str,
        ordered_ids: &[Snowflake],
    ) -> RepoResult<Vec<ChannelSection>>;
}

// ============================================================================
// Pinned Message Repository
// ============================================================================

#[async_trait]
pub trait PinnedMessageRepository: Send + Sync {
    /// Pin a message. Pinning the same message twice in a channel is a `Conflict`.
    async fn create(&self, pin: &NewPinnedMessage) -> RepoResult<PinnedMessage>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<PinnedMessage>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    async fn list(&self, filter: &Filter) -> RepoResult<Vec<PinnedMessage>>;

    /// Pins of a channel, newest first
    async fn find_by_channel(&self, channel_id: &str) -> RepoResult<Vec<PinnedMessage>>;

    async fn find_by_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> RepoResult<Option<PinnedMessage>>;

    /// Remove the pin of `message_id` in `channel_id`
    async fn unpin(&self, channel_id: &str, message_id: &str) -> RepoResult<()>;
}
