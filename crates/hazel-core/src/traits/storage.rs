//! Storage boundary
//!
//! A `TableStore` is the only component that talks to persistence. Each call
//! is an independent round-trip; isolation between concurrent callers is the
//! store's own business.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;
use crate::model::{Filter, Row, TableDescriptor};

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Insert a normalized row. Primary-key and unique collisions are
    /// reported as `StoreError::UniqueViolation`.
    async fn insert(&self, table: &TableDescriptor, primary_key: &str, row: &Row)
        -> StoreResult<()>;

    /// Fetch the row whose `primary_key` column equals `id`
    async fn fetch(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
    ) -> StoreResult<Option<Row>>;

    /// Replace the row identified by `id`. Returns `false` if no row matched.
    async fn update(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
        row: &Row,
    ) -> StoreResult<bool>;

    /// Delete the row identified by `id`. Returns `false` if no row matched.
    async fn delete(&self, table: &TableDescriptor, primary_key: &str, id: &Value)
        -> StoreResult<bool>;

    /// Rows matching a resolved filter, in the filter's order
    async fn select(&self, table: &TableDescriptor, filter: &Filter) -> StoreResult<Vec<Row>>;

    /// Number of rows matching a resolved filter's conditions
    async fn count(&self, table: &TableDescriptor, filter: &Filter) -> StoreResult<u64>;
}
