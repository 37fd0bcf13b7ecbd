//! REST client for the catalog API built on [`reqwest`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::{AuthTokens, Credentials, Registration};
use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::role::Role;
use crate::domain::types::{ProductId, TypeConstraintError, UserId};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::models::auth::{AuthResponse, RefreshRequest, RefreshResponse, RegisterRequest};
use crate::models::config::ClientConfig;
use crate::models::{self, ErrorBody, PaginatedResponse};
use crate::query::product::ProductQuery;
use crate::query::user::UserQuery;
use crate::repository::errors::{
    RepositoryError, RepositoryResult, SERVER_ERROR_MESSAGE, UNAUTHORIZED_MESSAGE,
};
use crate::repository::{
    AuthApi, CategoryReader, Page, ProductReader, ProductWriter, RoleReader, UserReader, UserWriter,
};
use crate::session::CredentialProvider;

/// HTTP implementation of every repository trait.
#[derive(Clone)]
pub struct HttpRepository {
    client: reqwest::Client,
    api_root: String,
    credentials: Arc<dyn CredentialProvider>,
    use_refresh_token: bool,
}

impl HttpRepository {
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> RepositoryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_client(client, config, credentials))
    }

    /// Reuses an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(
        client: reqwest::Client,
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client,
            api_root: config.api_root(),
            credentials,
            use_refresh_token: config.use_refresh_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request built by `build`, handling an expired session.
    ///
    /// On 401 the request is retried once after a token refresh when refresh
    /// is enabled; otherwise the stored credentials are dropped.
    async fn execute<F>(&self, build: F) -> RepositoryResult<Response>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder + Send + Sync,
    {
        let response = self.authorized(build(&self.client)).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::ensure_success(response).await;
        }

        let mut message = Self::error_body(response)
            .await
            .message()
            .unwrap_or_else(|| UNAUTHORIZED_MESSAGE.to_string());

        if self.use_refresh_token
            && let Some(refresh_token) = self.credentials.refresh_token()
        {
            match self.request_refresh(&refresh_token).await {
                Ok(access_token) => {
                    self.credentials.update_access_token(access_token);
                    let retry = self.authorized(build(&self.client)).send().await?;
                    if retry.status() != StatusCode::UNAUTHORIZED {
                        return Self::ensure_success(retry).await;
                    }
                    if let Some(retry_message) = Self::error_body(retry).await.message() {
                        message = retry_message;
                    }
                }
                Err(err) => log::warn!("Token refresh failed: {err}"),
            }
        }

        log::info!("Session rejected by the API, clearing credentials");
        self.credentials.clear();
        Err(RepositoryError::Unauthorized(message))
    }

    async fn request_refresh(&self, refresh_token: &str) -> RepositoryResult<String> {
        let response = self
            .client
            .post(self.url("auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let body: RefreshResponse = Self::ensure_success(response).await?.json().await?;
        Ok(body.access_token)
    }

    /// Maps non-2xx responses onto [`RepositoryError`].
    async fn ensure_success(response: Response) -> RepositoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound);
        }

        let body = Self::error_body(response).await;
        let message = body
            .message()
            .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string());
        log::error!("API request failed ({status}): {message}");
        Err(RepositoryError::Api {
            status: status.as_u16(),
            message,
            errors: body.errors,
        })
    }

    async fn error_body(response: Response) -> ErrorBody {
        response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    async fn get_one<W, D>(&self, path: &str) -> RepositoryResult<D>
    where
        W: DeserializeOwned + Send,
        D: TryFrom<W, Error = TypeConstraintError>,
    {
        let url = self.url(path);
        let body: W = self.execute(|client| client.get(&url)).await?.json().await?;
        Ok(D::try_from(body)?)
    }

    async fn get_all<W, D>(&self, path: &str, params: &[(&str, &str)]) -> RepositoryResult<Vec<D>>
    where
        W: DeserializeOwned + Send,
        D: TryFrom<W, Error = TypeConstraintError> + Send,
    {
        let url = self.url(path);
        let body: Vec<W> = self
            .execute(|client| client.get(&url).query(params))
            .await?
            .json()
            .await?;
        body.into_iter()
            .map(|item| D::try_from(item).map_err(RepositoryError::from))
            .collect()
    }

    /// Fetches one page of a list endpoint, abandoning it once `cancel` fires.
    async fn get_page<W, D>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<D>>
    where
        W: DeserializeOwned + Send,
        D: TryFrom<W, Error = TypeConstraintError> + Send,
    {
        let url = self.url(path);
        let request = async {
            let body: PaginatedResponse<W> = self
                .execute(|client| client.get(&url).query(&params))
                .await?
                .json()
                .await?;
            let items = body
                .data
                .into_iter()
                .map(D::try_from)
                .collect::<Result<Vec<D>, _>>()?;
            Ok(Page::new(items, body.metadata.total))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RepositoryError::Cancelled),
            result = request => result,
        }
    }

    async fn send_json<B, W, D>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> RepositoryResult<D>
    where
        B: serde::Serialize + Sync,
        W: DeserializeOwned + Send,
        D: TryFrom<W, Error = TypeConstraintError>,
    {
        let url = self.url(path);
        let response: W = self
            .execute(|client| client.request(method.clone(), &url).json(body))
            .await?
            .json()
            .await?;
        Ok(D::try_from(response)?)
    }

    async fn delete(&self, path: &str) -> RepositoryResult<()> {
        let url = self.url(path);
        self.execute(|client| client.delete(&url)).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductReader for HttpRepository {
    async fn list_products(
        &self,
        query: &ProductQuery,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<Product>> {
        self.get_page::<models::product::Product, Product>(
            "products",
            query.to_query_pairs(),
            cancel,
        )
        .await
    }

    async fn get_product(&self, id: &ProductId) -> RepositoryResult<Product> {
        self.get_one::<models::product::Product, Product>(&format!("products/{id}"))
            .await
    }
}

#[async_trait]
impl ProductWriter for HttpRepository {
    async fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let body = models::product::NewProduct::from(product);
        self.send_json::<_, models::product::Product, Product>(
            reqwest::Method::POST,
            "products",
            &body,
        )
        .await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product> {
        let body = models::product::UpdateProduct::from(updates);
        self.send_json::<_, models::product::Product, Product>(
            reqwest::Method::PUT,
            &format!("products/{id}"),
            &body,
        )
        .await
    }

    async fn delete_product(&self, id: &ProductId) -> RepositoryResult<()> {
        self.delete(&format!("products/{id}")).await
    }
}

#[async_trait]
impl CategoryReader for HttpRepository {
    async fn list_categories(&self, search: Option<String>) -> RepositoryResult<Vec<Category>> {
        let params: Vec<(&str, &str)> = search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![("search", s)])
            .unwrap_or_default();
        self.get_all::<models::category::Category, Category>("categories", &params)
            .await
    }
}

#[async_trait]
impl RoleReader for HttpRepository {
    async fn list_roles(&self) -> RepositoryResult<Vec<Role>> {
        self.get_all::<models::role::Role, Role>("roles", &[]).await
    }
}

#[async_trait]
impl UserReader for HttpRepository {
    async fn list_users(
        &self,
        query: &UserQuery,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<User>> {
        self.get_page::<models::user::User, User>("users", query.to_query_pairs(), cancel)
            .await
    }

    async fn get_user(&self, id: &UserId) -> RepositoryResult<User> {
        self.get_one::<models::user::User, User>(&format!("users/{id}"))
            .await
    }
}

#[async_trait]
impl UserWriter for HttpRepository {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let body = models::user::NewUser::from(user);
        self.send_json::<_, models::user::User, User>(reqwest::Method::POST, "users", &body)
            .await
    }

    async fn update_user(&self, id: &UserId, updates: &UpdateUser) -> RepositoryResult<User> {
        let body = models::user::UpdateUser::from(updates);
        self.send_json::<_, models::user::User, User>(
            reqwest::Method::PUT,
            &format!("users/{id}"),
            &body,
        )
        .await
    }

    async fn delete_user(&self, id: &UserId) -> RepositoryResult<()> {
        self.delete(&format!("users/{id}")).await
    }
}

#[async_trait]
impl AuthApi for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthTokens> {
        let url = self.url("auth/login");
        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let body: AuthResponse = self
            .execute(|client| client.post(&url).form(&form))
            .await?
            .json()
            .await?;
        Ok(body.into())
    }

    async fn register(&self, registration: &Registration) -> RepositoryResult<AuthTokens> {
        let url = self.url("auth/register");
        let request = RegisterRequest::from(registration);
        let body: AuthResponse = self
            .execute(|client| client.post(&url).json(&request))
            .await?
            .json()
            .await?;
        Ok(body.into())
    }

    async fn current_user(&self) -> RepositoryResult<User> {
        self.get_one::<models::user::User, User>("auth/me").await
    }

    async fn refresh(&self, refresh_token: &str) -> RepositoryResult<String> {
        self.request_refresh(refresh_token).await
    }

    async fn logout(&self) -> RepositoryResult<()> {
        let url = self.url("auth/logout");
        self.execute(|client| client.post(&url)).await?;
        Ok(())
    }
}
