//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::{AuthTokens, Credentials, Registration};
use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::role::{ADMIN_ROLE, Role, RoleSummary};
use crate::domain::types::{
    CategoryId, FullName, LowStockThreshold, Price, ProductId, ProductName, RoleId, RoleName,
    StockQuantity, UserEmail, UserId, Username,
};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::query::product::ProductQuery;
use crate::query::user::UserQuery;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AuthApi, CategoryReader, Page, ProductReader, ProductWriter, RoleReader, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl ProductReader for Repository {
        async fn list_products(
            &self,
            query: &ProductQuery,
            cancel: &CancellationToken,
        ) -> RepositoryResult<Page<Product>>;
        async fn get_product(&self, id: &ProductId) -> RepositoryResult<Product>;
    }

    #[async_trait]
    impl ProductWriter for Repository {
        async fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
        async fn update_product(
            &self,
            id: &ProductId,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Product>;
        async fn delete_product(&self, id: &ProductId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl CategoryReader for Repository {
        async fn list_categories(&self, search: Option<String>) -> RepositoryResult<Vec<Category>>;
    }

    #[async_trait]
    impl RoleReader for Repository {
        async fn list_roles(&self) -> RepositoryResult<Vec<Role>>;
    }

    #[async_trait]
    impl UserReader for Repository {
        async fn list_users(
            &self,
            query: &UserQuery,
            cancel: &CancellationToken,
        ) -> RepositoryResult<Page<User>>;
        async fn get_user(&self, id: &UserId) -> RepositoryResult<User>;
    }

    #[async_trait]
    impl UserWriter for Repository {
        async fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
        async fn update_user(&self, id: &UserId, updates: &UpdateUser) -> RepositoryResult<User>;
        async fn delete_user(&self, id: &UserId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl AuthApi for Repository {
        async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthTokens>;
        async fn register(&self, registration: &Registration) -> RepositoryResult<AuthTokens>;
        async fn current_user(&self) -> RepositoryResult<User>;
        async fn refresh(&self, refresh_token: &str) -> RepositoryResult<String>;
        async fn logout(&self) -> RepositoryResult<()>;
    }
}

/// Active account; `admin` decides the embedded role.
pub fn sample_user(id: &str, admin: bool) -> User {
    let role = if admin { ADMIN_ROLE } else { "user" };
    let now = chrono::DateTime::from_timestamp(0, 0)
        .unwrap_or_default()
        .naive_utc();
    User {
        id: UserId::new(id).unwrap(),
        email: UserEmail::new(format!("{id}@example.com")).unwrap(),
        username: Username::new(id).unwrap(),
        full_name: FullName::new(format!("User {id}")).unwrap(),
        role_id: RoleId::new(role).unwrap(),
        role: Some(RoleSummary {
            id: RoleId::new(role).unwrap(),
            name: RoleName::new(role).unwrap(),
        }),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_product(id: &str, stock: i64) -> Product {
    let now = chrono::DateTime::from_timestamp(0, 0)
        .unwrap_or_default()
        .naive_utc();
    Product {
        id: ProductId::new(id).unwrap(),
        name: ProductName::new(format!("Product {id}")).unwrap(),
        description: None,
        price: Price::new(99.0).unwrap(),
        stock: StockQuantity::new(stock).unwrap(),
        low_stock_threshold: LowStockThreshold::new(5).unwrap(),
        stock_status: None,
        image_url: None,
        category_id: CategoryId::new("c-1").unwrap(),
        category: None,
        creator: None,
        created_by: UserId::new("admin").unwrap(),
        created_at: now,
        updated_at: now,
    }
}
