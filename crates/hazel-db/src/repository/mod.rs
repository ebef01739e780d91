//! Generic model repository
//!
//! [`ModelRepository`] turns a table descriptor, a model type and a
//! [`RepositoryConfig`](hazel_core::model::RepositoryConfig) into uniform CRUD
//! over any [`TableStore`](hazel_core::traits::TableStore).

mod error;
mod model_repository;

pub use error::map_store_error;
pub use model_repository::ModelRepository;
