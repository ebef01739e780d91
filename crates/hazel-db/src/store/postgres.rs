//! PostgreSQL table store
//!
//! SQL is generated from the table descriptor. Identifiers come from static
//! descriptors and are always quoted; values are always bound.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Error as SqlxError, PgPool, Postgres, Row as _};
use tracing::instrument;

use hazel_core::error::{StoreError, StoreResult};
use hazel_core::model::{Column, ColumnKind, Filter, Row, SortOrder, TableDescriptor};
use hazel_core::traits::TableStore;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// PostgreSQL implementation of `TableStore`
#[derive(Clone)]
pub struct PgTableStore {
    pool: PgPool,
}

impl PgTableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map SQLx errors, keeping unique violations distinguishable
fn map_db_error(e: SqlxError) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation {
                constraint: db_err.constraint().map(str::to_string),
            };
        }
    }
    StoreError::Backend(e.to_string())
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn column_list(table: &TableDescriptor) -> String {
    table
        .columns
        .iter()
        .map(|c| quote(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn lookup<'t>(table: &'t TableDescriptor, name: &str) -> StoreResult<&'t Column> {
    table
        .column(name)
        .ok_or_else(|| StoreError::Backend(format!("unknown column `{}.{name}`", table.name)))
}

fn mismatch(column: &Column, value: &Value) -> StoreError {
    StoreError::Backend(format!(
        "value {value} does not fit {} column `{}`",
        column.kind, column.name
    ))
}

/// Bind `value` with the SQL type of `column`
fn bind_value<'q>(query: PgQuery<'q>, column: &Column, value: &Value) -> StoreResult<PgQuery<'q>> {
    if value.is_null() {
        return Ok(match column.kind {
            ColumnKind::BigInt => query.bind(None::<i64>),
            ColumnKind::Integer => query.bind(None::<i32>),
            ColumnKind::Text => query.bind(None::<String>),
            ColumnKind::Timestamp => query.bind(None::<DateTime<Utc>>),
            ColumnKind::Boolean => query.bind(None::<bool>),
        });
    }

    Ok(match column.kind {
        ColumnKind::BigInt => query.bind(value.as_i64().ok_or_else(|| mismatch(column, value))?),
        ColumnKind::Integer => query.bind(
            value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| mismatch(column, value))?,
        ),
        ColumnKind::Text => query.bind(
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(column, value))?,
        ),
        ColumnKind::Timestamp => query.bind(
            value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc))
                .ok_or_else(|| mismatch(column, value))?,
        ),
        ColumnKind::Boolean => query.bind(value.as_bool().ok_or_else(|| mismatch(column, value))?),
    })
}

fn decode_row(table: &TableDescriptor, row: &PgRow) -> StoreResult<Row> {
    let mut decoded = Row::new();
    for column in table.columns {
        let decode_error = |e: SqlxError| StoreError::Decode {
            column: column.name.to_string(),
            message: e.to_string(),
        };
        let value = match column.kind {
            ColumnKind::BigInt => row
                .try_get::<Option<i64>, _>(column.name)
                .map_err(decode_error)?
                .map(Value::from),
            ColumnKind::Integer => row
                .try_get::<Option<i32>, _>(column.name)
                .map_err(decode_error)?
                .map(Value::from),
            ColumnKind::Text => row
                .try_get::<Option<String>, _>(column.name)
                .map_err(decode_error)?
                .map(Value::from),
            ColumnKind::Timestamp => row
                .try_get::<Option<DateTime<Utc>>, _>(column.name)
                .map_err(decode_error)?
                .map(|t| Value::from(t.to_rfc3339_opts(SecondsFormat::Micros, true))),
            ColumnKind::Boolean => row
                .try_get::<Option<bool>, _>(column.name)
                .map_err(decode_error)?
                .map(Value::from),
        };
        decoded.insert(column.name.to_string(), value.unwrap_or(Value::Null));
    }
    Ok(decoded)
}

/// `WHERE` clause for a filter's conditions, numbering placeholders from `first`
fn where_clause(filter: &Filter, first: usize) -> String {
    if filter.conditions.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = filter
        .conditions
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = ${}", quote(column), first + i))
        .collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

fn bind_conditions<'q>(
    mut query: PgQuery<'q>,
    table: &TableDescriptor,
    filter: &Filter,
) -> StoreResult<PgQuery<'q>> {
    for (column, value) in &filter.conditions {
        query = bind_value(query, lookup(table, column)?, value)?;
    }
    Ok(query)
}

#[async_trait]
impl TableStore for PgTableStore {
    #[instrument(skip(self, table, _primary_key, row), fields(table = table.name))]
    async fn insert(
        &self,
        table: &TableDescriptor,
        _primary_key: &str,
        row: &Row,
    ) -> StoreResult<()> {
        let placeholders: Vec<String> = (1..=table.columns.len())
            .map(|i| format!("${i}"))
            .collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(table.name),
            column_list(table),
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for column in table.columns {
            query = bind_value(query, column, row.get(column.name).unwrap_or(&Value::Null))?;
        }
        query.execute(&self.pool).await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, table), fields(table = table.name))]
    async fn fetch(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
    ) -> StoreResult<Option<Row>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            column_list(table),
            quote(table.name),
            quote(primary_key)
        );

        let query = bind_value(sqlx::query(&sql), lookup(table, primary_key)?, id)?;
        let result = query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(|row| decode_row(table, &row)).transpose()
    }

    #[instrument(skip(self, table, row), fields(table = table.name))]
    async fn update(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
        row: &Row,
    ) -> StoreResult<bool> {
        let columns: Vec<&Column> = table
            .columns
            .iter()
            .filter(|c| c.name != primary_key)
            .collect();
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", quote(c.name), i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            quote(table.name),
            assignments.join(", "),
            quote(primary_key),
            columns.len() + 1
        );

        let mut query = sqlx::query(&sql);
        for column in &columns {
            query = bind_value(query, column, row.get(column.name).unwrap_or(&Value::Null))?;
        }
        query = bind_value(query, lookup(table, primary_key)?, id)?;

        let result = query.execute(&self.pool).await.map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, table), fields(table = table.name))]
    async fn delete(
        &self,
        table: &TableDescriptor,
        primary_key: &str,
        id: &Value,
    ) -> StoreResult<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            quote(table.name),
            quote(primary_key)
        );

        let query = bind_value(sqlx::query(&sql), lookup(table, primary_key)?, id)?;
        let result = query.execute(&self.pool).await.map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, table, filter), fields(table = table.name))]
    async fn select(&self, table: &TableDescriptor, filter: &Filter) -> StoreResult<Vec<Row>> {
        let mut sql = format!(
            "SELECT {} FROM {}{}",
            column_list(table),
            quote(table.name),
            where_clause(filter, 1)
        );

        if !filter.order_by.is_empty() {
            let keys: Vec<String> = filter
                .order_by
                .iter()
                .map(|(column, order)| {
                    let direction = match order {
                        SortOrder::Asc => "ASC",
                        SortOrder::Desc => "DESC",
                    };
                    format!("{} {direction}", quote(column))
                })
                .collect();
            sql.push_str(&format!(" ORDER BY {}", keys.join(", ")));
        }

        let mut next = filter.conditions.len() + 1;
        if filter.limit.is_some() {
            sql.push_str(&format!(" LIMIT ${next}"));
            next += 1;
        }
        if filter.offset.is_some() {
            sql.push_str(&format!(" OFFSET ${next}"));
        }

        let mut query = bind_conditions(sqlx::query(&sql), table, filter)?;
        for bound in [filter.limit, filter.offset].into_iter().flatten() {
            query = query.bind(i64::try_from(bound).unwrap_or(i64::MAX));
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_db_error)?;
        rows.iter().map(|row| decode_row(table, row)).collect()
    }

    #[instrument(skip(self, table, filter), fields(table = table.name))]
    async fn count(&self, table: &TableDescriptor, filter: &Filter) -> StoreResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM {}{}",
            quote(table.name),
            where_clause(filter, 1)
        );

        let row = bind_conditions(sqlx::query(&sql), table, filter)?
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        let count: i64 = row.try_get("count").map_err(|e| StoreError::Decode {
            column: "count".to_string(),
            message: e.to_string(),
        })?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgTableStore>();
    }

    #[test]
    fn test_quote_escapes_identifiers() {
        assert_eq!(quote("position"), "\"position\"");
        assert_eq!(quote("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_where_clause_numbers_placeholders() {
        let filter = Filter::new()
            .where_eq("channel_id", "c1")
            .where_eq("message_id", "m1");
        assert_eq!(
            where_clause(&filter, 1),
            " WHERE \"channel_id\" = $1 AND \"message_id\" = $2"
        );
        assert_eq!(where_clause(&Filter::new(), 1), "");
    }

    #[test]
    fn test_bind_rejects_mismatched_value() {
        let column = Column::new("position", ColumnKind::Integer);
        let err = bind_value(sqlx::query("SELECT 1"), &column, &json!("three"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("`position`"));
    }
}
