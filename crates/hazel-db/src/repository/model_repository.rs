//! Uniform CRUD for any [`Model`] stored in one table

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use validator::Validate;

use hazel_core::error::DomainError;
use hazel_core::model::{Filter, Model, MutableModel, RepositoryConfig, Row, TableDescriptor};
use hazel_core::traits::{RepoResult, TableStore};
use hazel_core::value_objects::{Snowflake, SnowflakeGenerator};

use super::error::map_store_error;

/// CRUD access object for model `M`.
///
/// Built once per entity with [`ModelRepository::make`]. Every entity it
/// returns has been deserialized from a normalized row and validated, on
/// writes and on reads alike. The configured primary key is the only column
/// used for identity; the entity name only shows up in errors and spans.
pub struct ModelRepository<M> {
    table: &'static TableDescriptor,
    config: RepositoryConfig,
    store: Arc<dyn TableStore>,
    ids: Arc<SnowflakeGenerator>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for ModelRepository<M> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            config: self.config,
            store: Arc::clone(&self.store),
            ids: Arc::clone(&self.ids),
            _model: PhantomData,
        }
    }
}

impl<M> fmt::Debug for ModelRepository<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRepository")
            .field("table", &self.table.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn now() -> Value {
    Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

impl<M: Model> ModelRepository<M> {
    /// Build a repository for `M` over `table`.
    ///
    /// Fails with `InvalidConfiguration` if the configured primary key or
    /// timestamp columns don't fit the table.
    pub fn make(
        table: &'static TableDescriptor,
        store: Arc<dyn TableStore>,
        ids: Arc<SnowflakeGenerator>,
        config: RepositoryConfig,
    ) -> RepoResult<Self> {
        config.check(table).map_err(|e| {
            DomainError::InvalidConfiguration(format!("{}: {e}", config.entity_name))
        })?;

        Ok(Self {
            table,
            config,
            store,
            ids,
            _model: PhantomData,
        })
    }

    fn entity(&self) -> &'static str {
        self.config.entity_name
    }

    fn invalid(&self, message: impl Into<String>) -> DomainError {
        DomainError::validation(self.entity(), message)
    }

    fn not_found(&self, id: Snowflake) -> DomainError {
        DomainError::not_found(self.entity(), id)
    }

    /// Serialize attributes into a row fragment
    fn to_row<T: Serialize>(&self, value: &T) -> RepoResult<Row> {
        match serde_json::to_value(value) {
            Ok(Value::Object(row)) => Ok(row),
            Ok(other) => Err(DomainError::InternalError(format!(
                "{} attributes serialized to {other}, expected an object",
                self.entity()
            ))),
            Err(e) => Err(DomainError::InternalError(e.to_string())),
        }
    }

    /// Normalize a row against the table and read it back as a validated model
    fn conform(&self, row: Row) -> RepoResult<(Row, M)> {
        let row = self.table.normalize_row(row).map_err(|e| self.invalid(e))?;
        let model = self.read(&row)?;
        Ok((row, model))
    }

    fn read(&self, row: &Row) -> RepoResult<M> {
        let model: M = serde_json::from_value(Value::Object(row.clone()))
            .map_err(|e| self.invalid(e.to_string()))?;
        model.validate().map_err(|e| self.invalid(e.to_string()))?;
        Ok(model)
    }

    /// Insert a new entity with a generated id
    #[instrument(skip(self, attributes), fields(entity = self.config.entity_name))]
    pub async fn create(&self, attributes: &M::Create) -> RepoResult<M> {
        attributes.validate().map_err(|e| self.invalid(e.to_string()))?;

        let mut row = self.to_row(attributes)?;
        if row.contains_key(self.config.primary_key) {
            return Err(self.invalid(format!(
                "`{}` is generated and cannot be set",
                self.config.primary_key
            )));
        }

        let id = self.ids.generate();
        row.insert(self.config.primary_key.to_string(), id.into());
        let stamp = now();
        for column in [self.config.created_at, self.config.updated_at]
            .into_iter()
            .flatten()
        {
            row.insert(column.to_string(), stamp.clone());
        }

        let (row, model) = self.conform(row)?;
        self.store
            .insert(self.table, self.config.primary_key, &row)
            .await
            .map_err(|e| map_store_error(self.entity(), e))?;

        debug!(%id, "created");
        Ok(model)
    }

    /// Find an entity by id, `None` if absent
    #[instrument(skip(self), fields(entity = self.config.entity_name))]
    pub async fn find(&self, id: Snowflake) -> RepoResult<Option<M>> {
        let row = self
            .store
            .fetch(self.table, self.config.primary_key, &id.into())
            .await
            .map_err(|e| map_store_error(self.entity(), e))?;

        row.map(|row| self.read(&row)).transpose()
    }

    /// Find an entity by id, `NotFound` if absent
    pub async fn find_by_id(&self, id: Snowflake) -> RepoResult<M> {
        self.find(id).await?.ok_or_else(|| self.not_found(id))
    }

    #[instrument(skip(self), fields(entity = self.config.entity_name))]
    pub async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let deleted = self
            .store
            .delete(self.table, self.config.primary_key, &id.into())
            .await
            .map_err(|e| map_store_error(self.entity(), e))?;

        if !deleted {
            return Err(self.not_found(id));
        }
        debug!(%id, "deleted");
        Ok(())
    }

    /// Entities matching `filter`, tie-broken by primary key
    #[instrument(skip(self, filter), fields(entity = self.config.entity_name))]
    pub async fn list(&self, filter: &Filter) -> RepoResult<Vec<M>> {
        let filter = filter
            .clone()
            .resolve(self.table, self.config.primary_key)
            .map_err(|e| self.invalid(e))?;

        let rows = self
            .store
            .select(self.table, &filter)
            .await
            .map_err(|e| map_store_error(self.entity(), e))?;

        rows.iter().map(|row| self.read(row)).collect()
    }

    #[instrument(skip(self, filter), fields(entity = self.config.entity_name))]
    pub async fn count(&self, filter: &Filter) -> RepoResult<u64> {
        let filter = filter
            .clone()
            .resolve(self.table, self.config.primary_key)
            .map_err(|e| self.invalid(e))?;

        self.store
            .count(self.table, &filter)
            .await
            .map_err(|e| map_store_error(self.entity(), e))
    }
}

impl<M: MutableModel> ModelRepository<M> {
    /// Merge the fields present in `patch` into the stored entity.
    ///
    /// The `updated_at` column, if configured, is stamped on every update.
    #[instrument(skip(self, patch), fields(entity = self.config.entity_name))]
    pub async fn update(&self, id: Snowflake, patch: &M::Patch) -> RepoResult<M> {
        patch.validate().map_err(|e| self.invalid(e.to_string()))?;

        let changes = self.to_row(patch)?;
        if changes.contains_key(self.config.primary_key) {
            return Err(self.invalid(format!(
                "`{}` cannot be changed",
                self.config.primary_key
            )));
        }
        if let Some(unknown) = changes.keys().find(|k| !self.table.has_column(k)) {
            return Err(self.invalid(format!("unknown column `{unknown}`")));
        }

        let key: Value = id.into();
        let mut row = self
            .store
            .fetch(self.table, self.config.primary_key, &key)
            .await
            .map_err(|e| map_store_error(self.entity(), e))?
            .ok_or_else(|| self.not_found(id))?;

        row.extend(changes);
        if let Some(column) = self.config.updated_at {
            row.insert(column.to_string(), now());
        }

        let (row, model) = self.conform(row)?;
        let matched = self
            .store
            .update(self.table, self.config.primary_key, &key, &row)
            .await
            .map_err(|e| map_store_error(self.entity(), e))?;

        // Deleted between the read and the write
        if !matched {
            return Err(self.not_found(id));
        }
        debug!(%id, "updated");
        Ok(model)
    }
}
