//! Repository behavior over in-process tables
//!
//! ```bash
//! cargo test -p hazel-db --test repository_tests
//! ```

use std::sync::Arc;

use hazel_core::entities::{ChannelSectionPatch, NewChannelSection, NewPinnedMessage};
use hazel_core::error::DomainError;
use hazel_core::model::{Filter, SortOrder};
use hazel_core::value_objects::{Snowflake, SnowflakeGenerator};
use hazel_db::RepositoryContext;

fn repos() -> RepositoryContext {
    RepositoryContext::in_memory(Arc::new(SnowflakeGenerator::default())).unwrap()
}

// ============================================================================
// Channel Section Tests
// ============================================================================

#[tokio::test]
async fn test_section_create_and_find() {
    let repos = repos();

    let section = repos
        .channel_sections
        .create(&NewChannelSection::new("w1", "General", 0))
        .await
        .unwrap();

    assert_ne!(section.id, Snowflake::default());
    assert_eq!(section.workspace_id, "w1");
    assert_eq!(section.name, "General");
    assert_eq!(section.position, 0);
    assert_eq!(section.created_at, section.updated_at);

    let found = repos.channel_sections.find_by_id(section.id).await.unwrap();
    assert_eq!(found, section);
}

#[tokio::test]
async fn test_section_find_missing_is_not_found() {
    let repos = repos();

    let err = repos
        .channel_sections
        .find_by_id(Snowflake::new(404))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::NotFound { entity: "ChannelSection", .. }
    ));
}

#[tokio::test]
async fn test_section_update_changes_only_given_fields() {
    let repos = repos();
    let section = repos
        .channel_sections
        .create(&NewChannelSection::new("w1", "General", 0))
        .await
        .unwrap();

    let renamed = repos
        .channel_sections
        .update(section.id, &ChannelSectionPatch::rename("Projects"))
        .await
        .unwrap();

    assert_eq!(renamed.id, section.id);
    assert_eq!(renamed.name, "Projects");
    assert_eq!(renamed.workspace_id, "w1");
    assert_eq!(renamed.position, 0);
    assert_eq!(renamed.created_at, section.created_at);
    assert!(renamed.updated_at >= section.updated_at);

    let moved = repos
        .channel_sections
        .update(section.id, &ChannelSectionPatch::move_to(4))
        .await
        .unwrap();
    assert_eq!(moved.name, "Projects");
    assert_eq!(moved.position, 4);
}

#[tokio::test]
async fn test_section_invalid_attributes() {
    let repos = repos();

    for attributes in [
        NewChannelSection::new("w1", "", 0),
        NewChannelSection::new("w1", "General", -1),
        NewChannelSection::new("", "General", 0),
    ] {
        let err = repos.channel_sections.create(&attributes).await.unwrap_err();
        assert!(err.is_validation(), "{attributes:?} gave {err}");
    }

    let section = repos
        .channel_sections
        .create(&NewChannelSection::new("w1", "General", 0))
        .await
        .unwrap();
    let err = repos
        .channel_sections
        .update(section.id, &ChannelSectionPatch::move_to(-3))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_section_delete() {
    let repos = repos();
    let section = repos
        .channel_sections
        .create(&NewChannelSection::new("w1", "General", 0))
        .await
        .unwrap();

    repos.channel_sections.delete(section.id).await.unwrap();

    assert!(repos
        .channel_sections
        .find_by_id(section.id)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(repos
        .channel_sections
        .delete(section.id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_section_list_filters() {
    let repos = repos();
    for (workspace, name, position) in [("w1", "B", 1), ("w1", "A", 0), ("w2", "C", 0)] {
        repos
            .channel_sections
            .create(&NewChannelSection::new(workspace, name, position))
            .await
            .unwrap();
    }

    let listed = repos
        .channel_sections
        .list(
            &Filter::new()
                .where_eq("workspace_id", "w1")
                .order_by("name", SortOrder::Desc),
        )
        .await
        .unwrap();
    let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);

    let page = repos
        .channel_sections
        .list(&Filter::new().order_by("name", SortOrder::Asc).offset(1).limit(1))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "B");

    let err = repos
        .channel_sections
        .list(&Filter::new().where_eq("colour", "red"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_section_reorder() {
    let repos = repos();
    let mut ids = Vec::new();
    for (position, name) in ["General", "Projects", "Random"].into_iter().enumerate() {
        let section = repos
            .channel_sections
            .create(&NewChannelSection::new("w1", name, position as i32))
            .await
            .unwrap();
        ids.push(section.id);
    }

    let reordered = repos
        .channel_sections
        .reorder("w1", &[ids[2], ids[0], ids[1]])
        .await
        .unwrap();
    assert_eq!(
        reordered.iter().map(|s| s.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    let names: Vec<String> = repos
        .channel_sections
        .find_by_workspace("w1")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Random", "General", "Projects"]);

    // Every section must be named
    let err = repos
        .channel_sections
        .reorder("w1", &[ids[0], ids[1]])
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

// ============================================================================
// Pinned Message Tests
// ============================================================================

#[tokio::test]
async fn test_pin_create_and_find() {
    let repos = repos();

    let pin = repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c1", "m1", "u1"))
        .await
        .unwrap();

    assert_eq!(pin.channel_id, "c1");
    assert_eq!(pin.message_id, "m1");
    assert_eq!(pin.pinned_by, "u1");
    assert_eq!(repos.pinned_messages.find_by_id(pin.id).await.unwrap(), pin);
}

#[tokio::test]
async fn test_pin_delete_then_not_found() {
    let repos = repos();
    let pin = repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c1", "m1", "u1"))
        .await
        .unwrap();

    repos.pinned_messages.delete(pin.id).await.unwrap();

    let err = repos.pinned_messages.find_by_id(pin.id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound { entity: "PinnedMessage", .. }
    ));
}

#[tokio::test]
async fn test_duplicate_pin_is_conflict() {
    let repos = repos();
    repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c1", "m1", "u1"))
        .await
        .unwrap();

    let err = repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c1", "m1", "u2"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // Same message in another channel is fine
    repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c2", "m1", "u1"))
        .await
        .unwrap();

    let count = repos
        .pinned_messages
        .list(&Filter::new().where_eq("message_id", "m1"))
        .await
        .unwrap()
        .len();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_unpin_by_message() {
    let repos = repos();
    repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c1", "m1", "u1"))
        .await
        .unwrap();
    repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c1", "m2", "u1"))
        .await
        .unwrap();

    repos.pinned_messages.unpin("c1", "m1").await.unwrap();

    let remaining = repos.pinned_messages.find_by_channel("c1").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].message_id, "m2");

    // Pinning again after an unpin is allowed
    repos
        .pinned_messages
        .create(&NewPinnedMessage::new("c1", "m1", "u3"))
        .await
        .unwrap();
}
