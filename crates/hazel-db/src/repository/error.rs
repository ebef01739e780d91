//! Error handling utilities for repositories

use hazel_core::error::{DomainError, StoreError};

/// Convert a storage error to a `DomainError` for `entity`
pub fn map_store_error(entity: &'static str, e: StoreError) -> DomainError {
    match e {
        StoreError::UniqueViolation {
            constraint: Some(constraint),
        } => DomainError::conflict(entity, format!("violates unique constraint {constraint}")),
        StoreError::UniqueViolation { constraint: None } => {
            DomainError::conflict(entity, "already exists")
        }
        StoreError::Decode { .. } | StoreError::Backend(_) => {
            DomainError::DatabaseError(e.to_string())
        }
    }
}
