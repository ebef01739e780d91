//! Domain, storage, and authentication errors

mod auth_error;
mod domain_error;
mod store_error;

pub use auth_error::AuthError;
pub use domain_error::DomainError;
pub use store_error::{StoreError, StoreResult};
