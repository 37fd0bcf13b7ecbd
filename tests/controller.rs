use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use storefront_admin::query::product::{self, CatalogParams, ProductCatalog, ProductSort};
use storefront_admin::query::{ListView, LoadingState, QueryController, SortDirection};

mod common;

type CatalogView = ListView<storefront_admin::domain::product::Product, ProductSort>;

async fn settle(
    updates: &mut tokio::sync::watch::Receiver<CatalogView>,
    done: impl FnMut(&CatalogView) -> bool,
) -> CatalogView {
    tokio::time::timeout(Duration::from_secs(5), updates.wait_for(done))
        .await
        .expect("controller did not settle")
        .expect("controller stopped")
        .clone()
}

#[tokio::test]
async fn admin_table_pages_through_the_api() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/api/v1/products")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("skip".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("sort_by".into(), "created_at".into()),
            Matcher::UrlEncoded("order".into(), "desc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::page_json(
            vec![common::product_json("p-1", "Desk Lamp", 3)],
            47,
            0,
            10,
        ))
        .create_async()
        .await;
    let last = server
        .mock("GET", "/api/v1/products")
        .match_query(Matcher::UrlEncoded("skip".into(), "40".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::page_json(
            vec![common::product_json("p-47", "Wall Lamp", 8)],
            47,
            40,
            10,
        ))
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = common::signed_in("access", "refresh");
    let repo = Arc::new(common::repository(&config, &session));
    let controller = QueryController::spawn(
        Arc::new(ProductCatalog::new(repo)),
        product::admin_options(&config),
    );
    let mut updates = controller.subscribe();

    let view = settle(&mut updates, |v| v.loading == LoadingState::Idle).await;
    first.assert_async().await;
    assert_eq!(view.total, 47);
    assert_eq!(view.page_count, 5);
    assert_eq!(view.items[0].id.as_str(), "p-1");

    controller.set_page(5);
    let view = settle(&mut updates, |v| {
        v.query.page == 5 && v.loading == LoadingState::Idle
    })
    .await;
    last.assert_async().await;
    assert_eq!(view.items[0].id.as_str(), "p-47");
    assert!(view.error.is_none());

    controller.shutdown().await;
}

#[tokio::test]
async fn catalog_link_restores_query_and_survives_errors() {
    let mut server = Server::new_async().await;
    let linked = server
        .mock("GET", "/api/v1/products")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search".into(), "lamp".into()),
            Matcher::UrlEncoded("min_price".into(), "10".into()),
            Matcher::UrlEncoded("sort_by".into(), "price".into()),
            Matcher::UrlEncoded("order".into(), "asc".into()),
            Matcher::UrlEncoded("limit".into(), "12".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::page_json(
            vec![common::product_json("p-1", "Desk Lamp", 3)],
            1,
            0,
            12,
        ))
        .create_async()
        .await;
    let failing = server
        .mock("GET", "/api/v1/products")
        .match_query(Matcher::UrlEncoded("order".into(), "desc".into()))
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Catalog is being reindexed"}"#)
        .create_async()
        .await;

    let config = common::config(&server.url());
    let session = common::signed_in("access", "refresh");
    let repo = Arc::new(common::repository(&config, &session));
    let link = "?search=lamp&min_price=10&sort_by=price&order=asc";
    let params = CatalogParams::parse(link).unwrap();
    let controller = QueryController::spawn(
        Arc::new(ProductCatalog::new(repo)),
        product::catalog_options(&config, Some(&params)),
    );
    let mut updates = controller.subscribe();

    let view = settle(&mut updates, |v| v.loading == LoadingState::Idle).await;
    linked.assert_async().await;
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.query.sort_by, ProductSort::Price);

    controller.set_sort_order(SortDirection::Desc);
    let view = settle(&mut updates, |v| v.error.is_some()).await;
    failing.assert_async().await;
    assert_eq!(view.error.as_deref(), Some("Catalog is being reindexed"));
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.loading, LoadingState::Idle);

    controller.shutdown().await;
}
