//! Domain entities exposed by the catalog and account services.

pub mod auth;
pub mod category;
pub mod product;
pub mod role;
pub mod types;
pub mod user;
