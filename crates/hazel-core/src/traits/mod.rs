//! Traits (ports) implemented by the infrastructure crates

mod organization;
mod repositories;
mod storage;

pub use organization::{OrganizationIdResolver, OrganizationSwitcher, PassthroughResolver};
pub use repositories::{ChannelSectionRepository, PinnedMessageRepository, RepoResult};
pub use storage::TableStore;
