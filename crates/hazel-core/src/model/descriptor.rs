//! Model descriptors and repository configuration

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use super::table::{ColumnKind, TableDescriptor};
use crate::value_objects::Snowflake;

/// An entity stored in one table.
///
/// The serde shape must match the table's columns, and the `Validate` rules
/// are checked on every read and write.
pub trait Model: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {
    /// Attributes accepted by `create`: every column except the generated ones
    type Create: Serialize + Validate + Send + Sync;

    fn id(&self) -> Snowflake;
}

/// A model whose rows may be changed in place.
pub trait MutableModel: Model {
    /// Partial attributes for `update`. Fields left out of the serialized
    /// form keep their stored values.
    type Patch: Serialize + Validate + Send + Sync;
}

/// Wiring for a generic repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Column holding the entity id
    pub primary_key: &'static str,
    /// Human-readable name, used for error messages and log fields only
    pub entity_name: &'static str,
    /// Column stamped with the creation time
    pub created_at: Option<&'static str>,
    /// Column stamped on creation and on every update
    pub updated_at: Option<&'static str>,
}

impl RepositoryConfig {
    pub const fn new(primary_key: &'static str, entity_name: &'static str) -> Self {
        Self {
            primary_key,
            entity_name,
            created_at: None,
            updated_at: None,
        }
    }

    pub const fn with_created_at(self, column: &'static str) -> Self {
        Self {
            created_at: Some(column),
            ..self
        }
    }

    pub const fn with_updated_at(self, column: &'static str) -> Self {
        Self {
            updated_at: Some(column),
            ..self
        }
    }

    /// Check that the configured columns exist in `table` with usable kinds
    pub fn check(&self, table: &TableDescriptor) -> Result<(), String> {
        let pk = table.column(self.primary_key).ok_or_else(|| {
            format!(
                "primary key `{}` is not a column of `{}`",
                self.primary_key, table.name
            )
        })?;
        if pk.kind != ColumnKind::BigInt || pk.nullable {
            return Err(format!(
                "primary key `{}.{}` must be a non-null bigint",
                table.name, self.primary_key
            ));
        }

        for column in [self.created_at, self.updated_at].into_iter().flatten() {
            match table.column(column) {
                Some(c) if c.kind == ColumnKind::Timestamp => {}
                Some(_) => {
                    return Err(format!(
                        "timestamp column `{}.{column}` must be a timestamp",
                        table.name
                    ))
                }
                None => {
                    return Err(format!(
                        "timestamp column `{column}` is not a column of `{}`",
                        table.name
                    ))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    const COLUMNS: &[Column] = &[
        Column::new("id", ColumnKind::BigInt),
        Column::new("label", ColumnKind::Text),
        Column::new("created_at", ColumnKind::Timestamp),
    ];

    static TABLE: TableDescriptor = TableDescriptor::new("labels", COLUMNS);

    #[test]
    fn test_valid_config() {
        let config = RepositoryConfig::new("id", "Label").with_created_at("created_at");
        assert!(config.check(&TABLE).is_ok());
    }

    #[test]
    fn test_missing_primary_key() {
        let err = RepositoryConfig::new("uuid", "Label").check(&TABLE).unwrap_err();
        assert!(err.contains("`uuid`"));
    }

    #[test]
    fn test_primary_key_must_be_bigint() {
        assert!(RepositoryConfig::new("label", "Label").check(&TABLE).is_err());
    }

    #[test]
    fn test_timestamp_column_kind_is_checked() {
        let config = RepositoryConfig::new("id", "Label").with_updated_at("label");
        assert!(config.check(&TABLE).is_err());
    }
}
