//! Channel section entity - a named, ordered grouping of channels in a workspace

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{Model, MutableModel};
use crate::value_objects::Snowflake;

/// Channel section entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ChannelSection {
    pub id: Snowflake,
    #[validate(length(min = 1, max = 64, message = "Workspace id must be 1-64 characters"))]
    pub workspace_id: String,
    #[validate(length(min = 1, max = 100, message = "Section name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model for ChannelSection {
    type Create = NewChannelSection;

    fn id(&self) -> Snowflake {
        self.id
    }
}

impl MutableModel for ChannelSection {
    type Patch = ChannelSectionPatch;
}

/// Attributes for creating a channel section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewChannelSection {
    #[validate(length(min = 1, max = 64, message = "Workspace id must be 1-64 characters"))]
    pub workspace_id: String,
    #[validate(length(min = 1, max = 100, message = "Section name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: i32,
}

impl NewChannelSection {
    pub fn new(workspace_id: impl Into<String>, name: impl Into<String>, position: i32) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            name: name.into(),
            position,
        }
    }
}

/// Rename and/or move a channel section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ChannelSectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Section name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: Option<i32>,
}

impl ChannelSectionPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn move_to(position: i32) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.position.is_none()
    }
}
