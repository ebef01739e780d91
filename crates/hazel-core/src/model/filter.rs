//! List filters

use serde_json::Value;

use super::table::TableDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Equality conditions, ordering, and paging for `list`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    pub conditions: Vec<(String, Value)>,
    pub order_by: Vec<(String, SortOrder)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match rows where `column` equals `value`
    #[must_use]
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((column.into(), order));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Check the filter against `table` and put it in canonical form.
    ///
    /// Condition values are normalized to their column kinds, and the primary
    /// key is appended as the last sort key so results are deterministic.
    pub fn resolve(self, table: &TableDescriptor, primary_key: &str) -> Result<Self, String> {
        let conditions = self
            .conditions
            .into_iter()
            .map(|(column, value)| {
                let value = table.normalize_value(&column, value)?;
                Ok((column, value))
            })
            .collect::<Result<Vec<_>, String>>()?;

        if let Some((column, _)) = self.order_by.iter().find(|(c, _)| !table.has_column(c)) {
            return Err(format!("unknown column `{column}`"));
        }
        let mut order_by = self.order_by;
        if !order_by.iter().any(|(c, _)| c == primary_key) {
            order_by.push((primary_key.to_string(), SortOrder::Asc));
        }

        Ok(Self {
            conditions,
            order_by,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnKind};
    use serde_json::json;

    const COLUMNS: &[Column] = &[
        Column::new("id", ColumnKind::BigInt),
        Column::new("owner_id", ColumnKind::BigInt),
        Column::new("position", ColumnKind::Integer),
    ];

    static TABLE: TableDescriptor = TableDescriptor::new("things", COLUMNS);

    #[test]
    fn test_resolve_normalizes_and_adds_tiebreak() {
        let filter = Filter::new()
            .where_eq("owner_id", "17")
            .order_by("position", SortOrder::Desc)
            .limit(10)
            .resolve(&TABLE, "id")
            .unwrap();

        assert_eq!(filter.conditions, vec![("owner_id".to_string(), json!(17))]);
        assert_eq!(
            filter.order_by,
            vec![
                ("position".to_string(), SortOrder::Desc),
                ("id".to_string(), SortOrder::Asc),
            ]
        );
        assert_eq!(filter.limit, Some(10));
    }

    #[test]
    fn test_resolve_rejects_unknown_columns() {
        assert!(Filter::new().where_eq("color", "red").resolve(&TABLE, "id").is_err());
        assert!(Filter::new()
            .order_by("color", SortOrder::Asc)
            .resolve(&TABLE, "id")
            .is_err());
    }
}
