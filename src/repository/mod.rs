//! Access to the remote catalog API.
//!
//! The traits below are the seams services and list controllers depend on;
//! [`HttpRepository`] implements all of them over HTTP.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::{AuthTokens, Credentials, Registration};
use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::role::Role;
use crate::domain::types::{ProductId, UserId};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::query::product::ProductQuery;
use crate::query::user::UserQuery;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpRepository;

/// One page of a server-side filtered, sorted and paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Number of matching records before pagination.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[async_trait]
pub trait ProductReader: Send + Sync {
    async fn list_products(
        &self,
        query: &ProductQuery,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<Product>>;
    async fn get_product(&self, id: &ProductId) -> RepositoryResult<Product>;
}

#[async_trait]
pub trait ProductWriter: Send + Sync {
    async fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    async fn update_product(
        &self,
        id: &ProductId,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    async fn delete_product(&self, id: &ProductId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait CategoryReader: Send + Sync {
    async fn list_categories(&self, search: Option<String>) -> RepositoryResult<Vec<Category>>;
}

#[async_trait]
pub trait RoleReader: Send + Sync {
    async fn list_roles(&self) -> RepositoryResult<Vec<Role>>;
}

#[async_trait]
pub trait UserReader: Send + Sync {
    async fn list_users(
        &self,
        query: &UserQuery,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<User>>;
    async fn get_user(&self, id: &UserId) -> RepositoryResult<User>;
}

#[async_trait]
pub trait UserWriter: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    async fn update_user(&self, id: &UserId, updates: &UpdateUser) -> RepositoryResult<User>;
    async fn delete_user(&self, id: &UserId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthTokens>;
    async fn register(&self, registration: &Registration) -> RepositoryResult<AuthTokens>;
    /// Profile of the account owning the current access token.
    async fn current_user(&self) -> RepositoryResult<User>;
    /// Exchanges the refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> RepositoryResult<String>;
    async fn logout(&self) -> RepositoryResult<()>;
}
