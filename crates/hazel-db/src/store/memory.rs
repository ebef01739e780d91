//! In-memory table store

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::instrument;

use hazel_core::error::{StoreError, StoreResult};
use hazel_core::model::{Filter, Row, SortOrder, TableDescriptor};
use hazel_core::traits::TableStore;

/// Rows keyed by the display form of their normalized primary-key value
type Table = BTreeMap<String, Row>;

/// In-process store. Each table is locked as a whole for the duration of a
/// call, so constraint checks and writes are atomic per table.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: DashMap<&'static str, Table>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held for `table`
    pub fn len(&self, table: &TableDescriptor) -> usize {
        self.tables.get(table.name).map_or(0, |t| t.len())
    }

    pub fn is_empty(&self, table: &TableDescriptor) -> bool {
        self.len(table) == 0
    }
}

/// Map key for `id`, in the primary key's canonical form so `"42"` and `42`
/// address the same row
fn key_of(table: &TableDescriptor, primary_key: &str, id: &Value) -> StoreResult<String> {
    table
        .normalize_value(primary_key, id.clone())
        .map(|id| id.to_string())
        .map_err(StoreError::Backend)
}

/// Find a unique group `row` would collide with, ignoring the row stored
/// under `skip`. NULLs never collide.
fn unique_collision(
    table: &TableDescriptor,
    rows: &Table,
    row: &Row,
    skip: Option<&str>,
) -> Option<String> {
    table.unique.iter().find_map(|group| {
        let values: Option<Vec<&Value>> = group
            .iter()
            .map(|c| row.get(*c).filter(|v| !v.is_null()))
            .collect();
        let values = values?;

        let collides = rows.iter().any(|(key, other)| {
            Some(key.as_str()) != skip
                && group
                    .iter()
                    .zip(&values)
                    .all(|(c, v)| other.get(*c) == Some(*v))
        });
        collides.then(|| format!("{}_{}_key", table.name, group.join("_")))
    })
}

fn row_matches(row: &Row, filter: &Filter) -> bool {
    filter
        .conditions
        .iter()
        .all(|(column, value)| row.get(column).unwrap_or(&Value::Null) == value && !value.is_null())
}

/// Ordering that mirrors PostgreSQL defaults: NULLs sort last ascending
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn compare_rows(a: &Row, b: &Row, order_by: &[(String, SortOrder)]) -> Ordering {
    order_by
        .iter()
        .map(|(column, order)| {
            let ordering = compare_values(
                a.get(column).unwrap_or(&Value::Null),
                b.get(column).unwrap_or(&Value::Null),
            );
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl TableStore for MemoryTableStore {
    #[instrument(skip(self, table, row), fields(table = table.name))]
    async fn insert(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        row: &Row,
    ) -> StoreResult<()> {
        let id = row
            .get(primary_key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| StoreError::Backend(format!("row has no `{primary_key}` value")))?;
        let key = key_of(table, primary_key, id)?;

        let mut rows = self.tables.entry(table.name).or_default();
        if rows.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                constraint: Some(format!("{}_pkey", table.name)),
            });
        }
        if let Some(constraint) = unique_collision(table, &rows, row, None) {
            return Err(StoreError::UniqueViolation {
                constraint: Some(constraint),
            });
        }
        rows.insert(key, row.clone());
        Ok(())
    }

    #[instrument(skip(self, table, primary_key), fields(table = table.name))]
    async fn fetch(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
    ) -> StoreResult<Option<Row>> {
        let key = key_of(table, primary_key, id)?;
        Ok(self
            .tables
            .get(table.name)
            .and_then(|rows| rows.get(&key).cloned()))
    }

    #[instrument(skip(self, table, primary_key, row), fields(table = table.name))]
    async fn update(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
        row: &Row,
    ) -> StoreResult<bool> {
        let key = key_of(table, primary_key, id)?;
        let Some(mut rows) = self.tables.get_mut(table.name) else {
            return Ok(false);
        };
        if !rows.contains_key(&key) {
            return Ok(false);
        }
        if let Some(constraint) = unique_collision(table, &rows, row, Some(&key)) {
            return Err(StoreError::UniqueViolation {
                constraint: Some(constraint),
            });
        }
        rows.insert(key, row.clone());
        Ok(true)
    }

    #[instrument(skip(self, table, primary_key), fields(table = table.name))]
    async fn delete(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
    ) -> StoreResult<bool> {
        let key = key_of(table, primary_key, id)?;
        Ok(self
            .tables
            .get_mut(table.name)
            .is_some_and(|mut rows| rows.remove(&key).is_some()))
    }

    #[instrument(skip(self, table, filter), fields(table = table.name))]
    async fn select(&self, table: &TableDescriptor, filter: &Filter) -> StoreResult<Vec<Row>> {
        let Some(rows) = self.tables.get(table.name) else {
            return Ok(Vec::new());
        };

        let mut selected: Vec<&Row> = rows.values().filter(|r| row_matches(r, filter)).collect();
        selected.sort_by(|a, b| compare_rows(a, b, &filter.order_by));

        let offset = usize::try_from(filter.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = filter
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(selected
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, table, filter), fields(table = table.name))]
    async fn count(&self, table: &TableDescriptor, filter: &Filter) -> StoreResult<u64> {
        Ok(self.tables.get(table.name).map_or(0, |rows| {
            rows.values().filter(|r| row_matches(r, filter)).count() as u64
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazel_core::model::{Column, ColumnKind};
    use serde_json::json;

    const COLUMNS: &[Column] = &[
        Column::new("id", ColumnKind::BigInt),
        Column::new("room", ColumnKind::Text),
        Column::new("seat", ColumnKind::Integer).nullable(),
    ];

    static SEATS: TableDescriptor =
        TableDescriptor::new("seats", COLUMNS).with_unique(&[&["room", "seat"]]);

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_fetch_delete() {
        let store = MemoryTableStore::new();
        store
            .insert(&SEATS, "id", &row(json!({"id": 1, "room": "a", "seat": 1})))
            .await
            .unwrap();

        let fetched = store.fetch(&SEATS, "id", &json!(1)).await.unwrap();
        assert_eq!(fetched.unwrap()["room"], json!("a"));

        assert!(store.delete(&SEATS, "id", &json!(1)).await.unwrap());
        assert!(!store.delete(&SEATS, "id", &json!(1)).await.unwrap());
        assert!(store.is_empty(&SEATS));
    }

    #[tokio::test]
    async fn test_string_and_number_ids_address_same_row() {
        let store = MemoryTableStore::new();
        store
            .insert(&SEATS, "id", &row(json!({"id": 42, "room": "a", "seat": 1})))
            .await
            .unwrap();

        let fetched = store.fetch(&SEATS, "id", &json!("42")).await.unwrap();
        assert_eq!(fetched.unwrap()["room"], json!("a"));

        let err = store
            .insert(&SEATS, "id", &row(json!({"id": "42", "room": "b", "seat": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        assert!(store.delete(&SEATS, "id", &json!("42")).await.unwrap());
        assert!(store.is_empty(&SEATS));
    }

    #[tokio::test]
    async fn test_primary_key_collision() {
        let store = MemoryTableStore::new();
        let r = row(json!({"id": 1, "room": "a", "seat": 1}));
        store.insert(&SEATS, "id", &r).await.unwrap();

        let err = store.insert(&SEATS, "id", &r).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation { constraint: Some(ref c) } if c == "seats_pkey"
        ));
    }

    #[tokio::test]
    async fn test_unique_group_collision_and_nulls() {
        let store = MemoryTableStore::new();
        store
            .insert(&SEATS, "id", &row(json!({"id": 1, "room": "a", "seat": 1})))
            .await
            .unwrap();

        let err = store
            .insert(&SEATS, "id", &row(json!({"id": 2, "room": "a", "seat": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        // NULL seats never collide
        for id in [3, 4] {
            store
                .insert(&SEATS, "id", &row(json!({"id": id, "room": "a", "seat": null})))
                .await
                .unwrap();
        }
        assert_eq!(store.len(&SEATS), 3);
    }

    #[tokio::test]
    async fn test_update_checks_unique_against_other_rows() {
        let store = MemoryTableStore::new();
        store
            .insert(&SEATS, "id", &row(json!({"id": 1, "room": "a", "seat": 1})))
            .await
            .unwrap();
        store
            .insert(&SEATS, "id", &row(json!({"id": 2, "room": "a", "seat": 2})))
            .await
            .unwrap();

        // Rewriting a row with its own values is fine
        assert!(store
            .update(&SEATS, "id", &json!(1), &row(json!({"id": 1, "room": "a", "seat": 1})))
            .await
            .unwrap());

        let err = store
            .update(&SEATS, "id", &json!(2), &row(json!({"id": 2, "room": "a", "seat": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        assert!(!store
            .update(&SEATS, "id", &json!(9), &row(json!({"id": 9, "room": "a", "seat": 9})))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_select_orders_and_pages() {
        let store = MemoryTableStore::new();
        for (id, room, seat) in [(1, "a", 3), (2, "a", 1), (3, "b", 2), (4, "a", 2)] {
            store
                .insert(&SEATS, "id", &row(json!({"id": id, "room": room, "seat": seat})))
                .await
                .unwrap();
        }

        let filter = Filter::new()
            .where_eq("room", "a")
            .order_by("seat", SortOrder::Desc)
            .resolve(&SEATS, "id")
            .unwrap();
        let ids: Vec<_> = store
            .select(&SEATS, &filter)
            .await
            .unwrap()
            .iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(1), json!(4), json!(2)]);

        let paged = Filter {
            limit: Some(1),
            offset: Some(1),
            ..filter.clone()
        };
        let page = store.select(&SEATS, &paged).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["id"], json!(4));

        assert_eq!(store.count(&SEATS, &filter).await.unwrap(), 3);
    }

    #[test]
    fn test_nulls_sort_last() {
        assert_eq!(compare_values(&Value::Null, &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!("a"), &json!("b")), Ordering::Less);
    }
}
