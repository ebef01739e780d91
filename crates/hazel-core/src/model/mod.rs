//! Descriptors that drive the generic repository
//!
//! A repository is assembled from three pieces:
//! - a [`TableDescriptor`] naming the physical table and its column shapes
//! - a [`Model`] type describing the entity's shape and validation rules
//! - a [`RepositoryConfig`] naming the primary-key column and the entity

mod descriptor;
mod filter;
mod table;

pub use descriptor::{Model, MutableModel, RepositoryConfig};
pub use filter::{Filter, SortOrder};
pub use table::{Column, ColumnKind, Row, TableDescriptor};
