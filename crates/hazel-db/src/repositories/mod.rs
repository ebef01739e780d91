//! Repository implementations
//!
//! Implementations of the repository traits defined in hazel-core, each a thin
//! layer of entity-specific queries over a [`ModelRepository`](crate::repository::ModelRepository).

mod channel_section;
mod pinned_message;

pub use channel_section::ChannelSectionRepo;
pub use pinned_message::PinnedMessageRepo;
