//! Domain entities - core business objects

mod channel_section;
mod pinned_message;

pub use channel_section::{ChannelSection, ChannelSectionPatch, NewChannelSection};
pub use pinned_message::{NewPinnedMessage, PinnedMessage};
