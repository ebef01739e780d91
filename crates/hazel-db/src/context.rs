//! Repository bundle shared by callers

use std::sync::Arc;

use hazel_core::traits::{
    ChannelSectionRepository, PinnedMessageRepository, RepoResult, TableStore,
};
use hazel_core::value_objects::SnowflakeGenerator;
use sqlx::PgPool;

use crate::repositories::{ChannelSectionRepo, PinnedMessageRepo};
use crate::store::{MemoryTableStore, PgTableStore};

/// All repositories over one store and one id generator
#[derive(Clone)]
pub struct RepositoryContext {
    pub channel_sections: Arc<dyn ChannelSectionRepository>,
    pub pinned_messages: Arc<dyn PinnedMessageRepository>,
}

impl RepositoryContext {
    pub fn new(store: Arc<dyn TableStore>, ids: Arc<SnowflakeGenerator>) -> RepoResult<Self> {
        Ok(Self {
            channel_sections: Arc::new(ChannelSectionRepo::new(
                Arc::clone(&store),
                Arc::clone(&ids),
            )?),
            pinned_messages: Arc::new(PinnedMessageRepo::new(store, ids)?),
        })
    }

    pub fn postgres(pool: PgPool, ids: Arc<SnowflakeGenerator>) -> RepoResult<Self> {
        Self::new(Arc::new(PgTableStore::new(pool)), ids)
    }

    /// Fresh, empty in-process tables
    pub fn in_memory(ids: Arc<SnowflakeGenerator>) -> RepoResult<Self> {
        Self::new(Arc::new(MemoryTableStore::new()), ids)
    }
}

impl std::fmt::Debug for RepositoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryContext").finish_non_exhaustive()
    }
}
