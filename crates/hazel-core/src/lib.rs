//! # hazel-core
//!
//! Domain layer containing entities, value objects, table and model
//! descriptors, and the ports implemented by infrastructure crates.
//! This crate has zero dependencies on infrastructure (database, identity
//! provider, etc.).

pub mod entities;
pub mod error;
pub mod model;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChannelSection, ChannelSectionPatch, NewChannelSection, NewPinnedMessage, PinnedMessage,
};
pub use error::{AuthError, DomainError, StoreError, StoreResult};
pub use model::{
    Column, ColumnKind, Filter, Model, MutableModel, RepositoryConfig, Row, SortOrder,
    TableDescriptor,
};
pub use traits::{
    ChannelSectionRepository, OrganizationIdResolver, OrganizationSwitcher, PassthroughResolver,
    PinnedMessageRepository, RepoResult, TableStore,
};
pub use value_objects::{Snowflake, SnowflakeConfigError, SnowflakeGenerator, SnowflakeParseError};
