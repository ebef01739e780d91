//! Table descriptors for the persisted entities

use hazel_core::model::{Column, ColumnKind, TableDescriptor};

const CHANNEL_SECTION_COLUMNS: &[Column] = &[
    Column::new("id", ColumnKind::BigInt),
    Column::new("workspace_id", ColumnKind::Text),
    Column::new("name", ColumnKind::Text),
    Column::new("position", ColumnKind::Integer),
    Column::new("created_at", ColumnKind::Timestamp),
    Column::new("updated_at", ColumnKind::Timestamp),
];

/// `channel_sections` table
pub static CHANNEL_SECTIONS: TableDescriptor =
    TableDescriptor::new("channel_sections", CHANNEL_SECTION_COLUMNS);

const PINNED_MESSAGE_COLUMNS: &[Column] = &[
    Column::new("id", ColumnKind::BigInt),
    Column::new("channel_id", ColumnKind::Text),
    Column::new("message_id", ColumnKind::Text),
    Column::new("pinned_by", ColumnKind::Text),
    Column::new("pinned_at", ColumnKind::Timestamp),
];

/// `pinned_messages` table; a message is pinned at most once per channel
pub static PINNED_MESSAGES: TableDescriptor =
    TableDescriptor::new("pinned_messages", PINNED_MESSAGE_COLUMNS)
        .with_unique(&[&["channel_id", "message_id"]]);
