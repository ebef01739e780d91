//! Pinned message entity - marks a message as pinned within a channel
//!
//! Pins are immutable once created; unpinning deletes the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::Model;
use crate::value_objects::Snowflake;

/// Pinned message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PinnedMessage {
    pub id: Snowflake,
    #[validate(length(min = 1, max = 64, message = "Channel id must be 1-64 characters"))]
    pub channel_id: String,
    #[validate(length(min = 1, max = 64, message = "Message id must be 1-64 characters"))]
    pub message_id: String,
    #[validate(length(min = 1, max = 64, message = "Pinning user id must be 1-64 characters"))]
    pub pinned_by: String,
    pub pinned_at: DateTime<Utc>,
}

impl Model for PinnedMessage {
    type Create = NewPinnedMessage;

    fn id(&self) -> Snowflake {
        self.id
    }
}

/// Attributes for pinning a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewPinnedMessage {
    #[validate(length(min = 1, max = 64, message = "Channel id must be 1-64 characters"))]
    pub channel_id: String,
    #[validate(length(min = 1, max = 64, message = "Message id must be 1-64 characters"))]
    pub message_id: String,
    #[validate(length(min = 1, max = 64, message = "Pinning user id must be 1-64 characters"))]
    pub pinned_by: String,
}

impl NewPinnedMessage {
    pub fn new(
        channel_id: impl Into<String>,
        message_id: impl Into<String>,
        pinned_by: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            pinned_by: pinned_by.into(),
        }
    }
}
