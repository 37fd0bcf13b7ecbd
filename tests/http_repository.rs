use mockito::{Matcher, Server};
use serde_json::json;
use storefront_admin::domain::types::{ProductId, StockStatus};
use storefront_admin::query::SortDirection;
use storefront_admin::query::product::{ProductQuery, ProductSort, STOCK_STATUS_FILTER};
use storefront_admin::repository::errors::{
    NETWORK_ERROR_MESSAGE, RepositoryError, SERVER_ERROR_MESSAGE,
};
use storefront_admin::repository::{CategoryReader, ProductReader, ProductWriter};
use storefront_admin::services;
use storefront_admin::session::{CredentialProvider, SessionStore};
use tokio_util::sync::CancellationToken;

mod common;

#[tokio::test]
async fn list_products_sends_query_and_bearer_token() {
    let mut server = Server::new_async().await;
    let body = common::page_json(
        vec![
            common::product_json("p-1", "Desk Lamp", 3),
            common::product_json("p-2", "Floor Lamp", 0),
        ],
        47,
        12,
        12,
    );
    let mock = server
        .mock("GET", "/api/v1/products")
        .match_header("authorization", "Bearer access")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search".into(), "lamp".into()),
            Matcher::UrlEncoded("stock_status".into(), "yellow".into()),
            Matcher::UrlEncoded("sort_by".into(), "price".into()),
            Matcher::UrlEncoded("order".into(), "asc".into()),
            Matcher::UrlEncoded("skip".into(), "12".into()),
            Matcher::UrlEncoded("limit".into(), "12".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = common::signed_in("access", "refresh");
    let repo = common::repository(&config, &session);

    let mut query = ProductQuery::new(12)
        .with_search("lamp")
        .with_filter(STOCK_STATUS_FILTER, "yellow")
        .with_sort(ProductSort::Price, SortDirection::Asc);
    query.page = 2;

    let page = repo
        .list_products(&query, &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.total, 47);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name.as_str(), "Desk Lamp");
    assert_eq!(page.items[0].effective_stock_status(), StockStatus::Yellow);
    assert_eq!(page.items[1].effective_stock_status(), StockStatus::Red);
}

#[tokio::test]
async fn cancelled_list_never_reaches_the_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/products")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = common::signed_in("access", "refresh");
    let repo = common::repository(&config, &session);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = repo.list_products(&ProductQuery::new(10), &cancel).await;

    assert!(matches!(result, Err(RepositoryError::Cancelled)));
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_response_clears_the_session() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/products/p-1")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Not authenticated"}"#)
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = common::signed_in("expired", "refresh");
    let repo = common::repository(&config, &session);

    let result = repo.get_product(&ProductId::new("p-1").unwrap()).await;

    match result {
        Err(RepositoryError::Unauthorized(message)) => assert_eq!(message, "Not authenticated"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!session.is_authenticated());
    assert!(session.refresh_token().is_none());
}

#[tokio::test]
async fn unauthorized_response_is_retried_after_refresh() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", "/api/v1/products/p-1")
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/auth/refresh")
        .match_body(Matcher::Json(json!({"refresh_token": "r-1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"fresh"}"#)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/api/v1/products/p-1")
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::product_json("p-1", "Desk Lamp", 9).to_string())
        .create_async()
        .await;

    let mut config = common::config(&server.url());
    config.use_refresh_token = true;
    let session = common::signed_in("stale", "r-1");
    let repo = common::repository(&config, &session);

    let product = repo
        .get_product(&ProductId::new("p-1").unwrap())
        .await
        .unwrap();

    rejected.assert_async().await;
    refresh.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(product.stock.get(), 9);
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
    assert_eq!(session.refresh_token().as_deref(), Some("r-1"));
}

#[tokio::test]
async fn failed_refresh_logs_out() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/products/p-1")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("POST", "/api/v1/auth/refresh")
        .with_status(401)
        .create_async()
        .await;

    let mut config = common::config(&server.url());
    config.use_refresh_token = true;
    let session = common::signed_in("stale", "revoked");
    let repo = common::repository(&config, &session);

    let result = repo.get_product(&ProductId::new("p-1").unwrap()).await;

    assert!(matches!(result, Err(RepositoryError::Unauthorized(_))));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn api_errors_keep_status_message_and_field_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/api/v1/products/p-1")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Product has open orders","errors":{"orders":["3 open"]}}"#)
        .create_async()
        .await;
    server
        .mock("DELETE", "/api/v1/products/p-2")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("DELETE", "/api/v1/products/p-3")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = common::signed_in("access", "refresh");
    let repo = common::repository(&config, &session);

    match repo.delete_product(&ProductId::new("p-1").unwrap()).await {
        Err(RepositoryError::Api {
            status,
            message,
            errors,
        }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "Product has open orders");
            assert_eq!(errors, Some(json!({"orders": ["3 open"]})));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(matches!(
        repo.delete_product(&ProductId::new("p-2").unwrap()).await,
        Err(RepositoryError::NotFound)
    ));

    match repo.delete_product(&ProductId::new("p-3").unwrap()).await {
        Err(err) => {
            assert_eq!(err.status(), 500);
            assert_eq!(err.to_string(), SERVER_ERROR_MESSAGE);
        }
        Ok(()) => panic!("server error was swallowed"),
    }
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn unreachable_api_reports_network_error() {
    let config = common::config("http://127.0.0.1:9");
    let session = common::signed_in("access", "refresh");
    let repo = common::repository(&config, &session);

    match repo.get_product(&ProductId::new("p-1").unwrap()).await {
        Err(RepositoryError::Network(message)) => assert_eq!(message, NETWORK_ERROR_MESSAGE),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn blank_category_search_is_not_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/categories")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": "c-1",
                "name": "Lighting",
                "description": null,
                "created_by": "u-1",
                "created_at": "2024-05-01T10:00:00",
                "updated_at": "2024-05-01T10:00:00"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = common::signed_in("access", "refresh");
    let repo = common::repository(&config, &session);

    let categories = repo.list_categories(Some("   ".to_string())).await.unwrap();

    mock.assert_async().await;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name.as_str(), "Lighting");
}

#[tokio::test]
async fn login_posts_form_and_loads_profile() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/v1/auth/login")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "ann".into()),
            Matcher::UrlEncoded("password".into(), "secret1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"a-1","refresh_token":"r-1","metadata":null}"#)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/v1/auth/me")
        .match_header("authorization", "Bearer a-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::user_json("u-2", "ann", "user").to_string())
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = std::sync::Arc::new(SessionStore::new());
    let repo = common::repository(&config, &session);

    let form = storefront_admin::forms::auth::LoginForm {
        username: "ann".into(),
        password: "secret1".into(),
    };
    let user = services::auth::login(&repo, &session, &form).await.unwrap();

    login.assert_async().await;
    me.assert_async().await;
    assert_eq!(user.username.as_str(), "ann");
    assert!(!user.is_admin());
    assert_eq!(session.user(), Some(user));
    assert_eq!(session.refresh_token().as_deref(), Some("r-1"));
}

#[tokio::test]
async fn rejected_login_leaves_session_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Incorrect username or password"}"#)
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = std::sync::Arc::new(SessionStore::new());
    let repo = common::repository(&config, &session);

    let form = storefront_admin::forms::auth::LoginForm {
        username: "ann".into(),
        password: "wrong-password".into(),
    };
    let result = services::auth::login(&repo, &session, &form).await;

    assert!(matches!(result, Err(services::ServiceError::Unauthorized)));
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}
