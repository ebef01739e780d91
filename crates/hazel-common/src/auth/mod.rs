//! Session tokens and organization switching

mod jwt;
mod organization;

pub use jwt::{Claims, JwtService};
pub use organization::{MappedResolver, SessionOrganizationSwitcher};
