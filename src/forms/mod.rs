//! Form definitions backing the admin and account screens.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod product;
pub mod user;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid category")]
    InvalidCategory,

    #[error("invalid role")]
    InvalidRole,

    #[error("password must be at least 6 characters")]
    InvalidPassword,

    #[error("price must be greater than zero")]
    InvalidPrice,

    #[error("stock cannot be negative")]
    InvalidStock,

    #[error("stock change must be greater than zero")]
    InvalidStockChange,

    #[error("not enough stock to subtract {requested} from {available}")]
    InsufficientStock { available: i64, requested: i64 },
}

/// Trims the value and treats blank input as absent.
pub(crate) fn optional_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
