//! Use cases composed from form validation, role checks and repository calls.

use crate::domain::user::User;

pub mod auth;
pub mod catalog;
pub mod errors;
pub mod products;
pub mod users;

pub use errors::{ServiceError, ServiceResult};

/// Fails with [`ServiceError::Forbidden`] unless `user` is an active admin.
pub fn ensure_admin(user: &User) -> ServiceResult<()> {
    if user.is_active && user.is_admin() {
        Ok(())
    } else {
        log::warn!("User {} attempted an admin action", user.username);
        Err(ServiceError::Forbidden)
    }
}
