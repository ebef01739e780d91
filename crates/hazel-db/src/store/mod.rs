//! `TableStore` implementations
//!
//! - [`PgTableStore`]: PostgreSQL through SQLx, SQL generated from the table descriptor
//! - [`MemoryTableStore`]: in-process tables for tests and embedding

mod memory;
mod postgres;

pub use memory::MemoryTableStore;
pub use postgres::PgTableStore;
