//! # hazel-db
//!
//! Database layer implementing the hazel-core ports.
//!
//! ## Overview
//!
//! - Connection pool management and SQL migrations
//! - `TableStore` implementations for PostgreSQL and in-process tables
//! - The generic [`ModelRepository`] factory
//! - Channel section and pinned message repositories built on it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hazel_core::{NewChannelSection, SnowflakeGenerator};
//! use hazel_db::{create_pool, PoolOptions, RepositoryContext};
//!
//! async fn example(config: &hazel_common::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolOptions::from(&config.database)).await?;
//!     let ids = Arc::new(config.snowflake.generator()?);
//!     let repos = RepositoryContext::postgres(pool, ids)?;
//!
//!     let section = repos
//!         .channel_sections
//!         .create(&NewChannelSection::new("w1", "General", 0))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pool;
pub mod repositories;
pub mod repository;
pub mod store;
pub mod tables;

// Re-export commonly used types
pub use context::RepositoryContext;
pub use pool::{create_pool, run_migrations, PgPool, PoolOptions};
pub use repositories::{ChannelSectionRepo, PinnedMessageRepo};
pub use repository::ModelRepository;
pub use store::{MemoryTableStore, PgTableStore};
pub use tables::{CHANNEL_SECTIONS, PINNED_MESSAGES};
