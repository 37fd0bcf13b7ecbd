//! Product lists: the admin table and the storefront catalog grid.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::domain::product::Product;
use crate::domain::types::StockStatus;
use crate::models::config::ClientConfig;
use crate::query::controller::{ControllerOptions, ListSource};
use crate::query::descriptor::{QueryDescriptor, SortDirection, SortKey, normalize_search};
use crate::repository::errors::RepositoryResult;
use crate::repository::{Page, ProductReader};

pub const CATEGORY_FILTER: &str = "category_id";
pub const MIN_PRICE_FILTER: &str = "min_price";
pub const MAX_PRICE_FILTER: &str = "max_price";
pub const STOCK_STATUS_FILTER: &str = "stock_status";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    Name,
    Price,
    Stock,
    Status,
    #[default]
    CreatedAt,
}

impl SortKey for ProductSort {
    fn as_str(&self) -> &'static str {
        match self {
            ProductSort::Name => "name",
            ProductSort::Price => "price",
            ProductSort::Stock => "stock",
            ProductSort::Status => "status",
            ProductSort::CreatedAt => "created_at",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "name" => Some(ProductSort::Name),
            "price" => Some(ProductSort::Price),
            "stock" => Some(ProductSort::Stock),
            "status" => Some(ProductSort::Status),
            "created_at" => Some(ProductSort::CreatedAt),
            _ => None,
        }
    }
}

pub type ProductQuery = QueryDescriptor<ProductSort>;

/// Validates a product filter value; blank input clears the filter.
pub fn normalize_product_filter(name: &str, raw: &str) -> Result<Option<String>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match name {
        CATEGORY_FILTER => Ok(Some(raw.to_string())),
        MIN_PRICE_FILTER | MAX_PRICE_FILTER => raw
            .parse::<u64>()
            .map(|price| Some(price.to_string()))
            .map_err(|_| "Price must be a whole number of at least 0".to_string()),
        STOCK_STATUS_FILTER => raw
            .parse::<StockStatus>()
            .map(|status| Some(status.as_str().to_string()))
            .map_err(|_| "Stock status must be red, yellow or green".to_string()),
        other => Err(format!("Unknown filter `{other}`")),
    }
}

/// [`ListSource`] over the `/products` endpoint.
pub struct ProductCatalog<R> {
    repo: Arc<R>,
}

impl<R> ProductCatalog<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> ListSource for ProductCatalog<R>
where
    R: ProductReader + 'static,
{
    type Item = Product;
    type Sort = ProductSort;

    async fn list(
        &self,
        query: &ProductQuery,
        cancel: &CancellationToken,
    ) -> RepositoryResult<Page<Product>> {
        self.repo.list_products(query, cancel).await
    }

    fn normalize_filter(&self, name: &str, raw: &str) -> Result<Option<String>, String> {
        normalize_product_filter(name, raw)
    }
}

/// Options of the admin product table.
pub fn admin_options(config: &ClientConfig) -> ControllerOptions<ProductSort> {
    ControllerOptions::from_config(config, ProductQuery::new(config.page_size))
}

/// Options of the storefront catalog, starting from a deep link if present.
pub fn catalog_options(
    config: &ClientConfig,
    params: Option<&CatalogParams>,
) -> ControllerOptions<ProductSort> {
    let defaults = ProductQuery::new(config.catalog_page_size)
        .with_sort(ProductSort::Name, SortDirection::Asc);
    let options = ControllerOptions::from_config(config, defaults.clone());
    match params {
        Some(params) => options.with_initial(params.to_query(&defaults)),
        None => options,
    }
}

/// Catalog state carried in the page URL, e.g.
/// `?search=lamp&category_id=c-2&sort_by=price&order=asc&page=3`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl CatalogParams {
    /// Parses a URL query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Result<Self, String> {
        serde_html_form::from_str(query.trim_start_matches('?')).map_err(|e| e.to_string())
    }

    /// Deep link describing `query`; default values are left out.
    pub fn from_query(query: &ProductQuery) -> Self {
        let filter = |name: &str| query.filter(name).map(str::to_string);
        Self {
            search: query.search.clone(),
            category_id: filter(CATEGORY_FILTER),
            min_price: filter(MIN_PRICE_FILTER),
            max_price: filter(MAX_PRICE_FILTER),
            stock_status: filter(STOCK_STATUS_FILTER),
            sort_by: Some(query.sort_by.as_str().to_string()),
            order: Some(query.order.as_str().to_string()),
            page: (query.page > 1).then_some(query.page),
        }
    }

    /// Applies the link on top of `defaults`; invalid parts are ignored.
    pub fn to_query(&self, defaults: &ProductQuery) -> ProductQuery {
        let mut query = defaults.clone();
        query.search = self.search.as_deref().and_then(normalize_search);

        let filters = [
            (CATEGORY_FILTER, &self.category_id),
            (MIN_PRICE_FILTER, &self.min_price),
            (MAX_PRICE_FILTER, &self.max_price),
            (STOCK_STATUS_FILTER, &self.stock_status),
        ];
        for (name, raw) in filters {
            let Some(raw) = raw else { continue };
            match normalize_product_filter(name, raw) {
                Ok(Some(value)) => {
                    query.filters.insert(name.to_string(), value);
                }
                Ok(None) => {}
                Err(err) => log::warn!("Ignoring catalog link filter {name}: {err}"),
            }
        }

        if let Some(sort_by) = self.sort_by.as_deref() {
            match ProductSort::parse(sort_by) {
                Some(sort_by) => query.sort_by = sort_by,
                None => log::warn!("Ignoring unknown catalog sort field `{sort_by}`"),
            }
        }
        if let Some(order) = self.order.as_deref().and_then(SortDirection::parse) {
            query.order = order;
        }
        if let Some(page) = self.page.filter(|page| *page > 0) {
            query.page = page;
        }
        query
    }

    pub fn to_query_string(&self) -> Result<String, String> {
        serde_html_form::to_string(self).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::controller::{LoadingState, QueryController};
    use crate::repository::mock::MockRepository;

    #[test]
    fn sort_keys_are_canonical() {
        assert_eq!(ProductSort::parse("status"), Some(ProductSort::Status));
        assert_eq!(ProductSort::parse("satus"), None);
        assert_eq!(ProductSort::default().as_str(), "created_at");
    }

    #[test]
    fn price_filters_must_be_whole_numbers() {
        assert_eq!(
            normalize_product_filter(MIN_PRICE_FILTER, " 0200 "),
            Ok(Some("200".to_string()))
        );
        assert!(normalize_product_filter(MAX_PRICE_FILTER, "-5").is_err());
        assert!(normalize_product_filter(MAX_PRICE_FILTER, "9.99").is_err());
        assert_eq!(normalize_product_filter(MIN_PRICE_FILTER, "  "), Ok(None));
    }

    #[test]
    fn stock_status_filter_is_lowercased() {
        assert_eq!(
            normalize_product_filter(STOCK_STATUS_FILTER, "Yellow"),
            Ok(Some("yellow".to_string()))
        );
        assert!(normalize_product_filter(STOCK_STATUS_FILTER, "blue").is_err());
        assert!(normalize_product_filter("colour", "red").is_err());
    }

    #[test]
    fn deep_link_round_trips_through_descriptor() {
        let defaults = ProductQuery::new(12);
        let link = concat!(
            "?search=desk+lamp&category_id=c-2&min_price=10",
            "&sort_by=price&order=asc&page=3",
        );
        let params = CatalogParams::parse(link).unwrap();
        let query = params.to_query(&defaults);

        assert_eq!(query.search.as_deref(), Some("desk lamp"));
        assert_eq!(query.filter(CATEGORY_FILTER), Some("c-2"));
        assert_eq!(query.filter(MIN_PRICE_FILTER), Some("10"));
        assert_eq!(query.sort_by, ProductSort::Price);
        assert_eq!(query.order, SortDirection::Asc);
        assert_eq!(query.page, 3);
        assert_eq!(query.per_page, 12);

        let link = CatalogParams::from_query(&query).to_query_string().unwrap();
        assert_eq!(CatalogParams::parse(&link).unwrap().to_query(&defaults), query);
    }

    #[test]
    fn deep_link_ignores_invalid_parts() {
        let defaults = ProductQuery::new(12);
        let query = CatalogParams::parse("sort_by=satus&min_price=abc&page=0")
            .unwrap()
            .to_query(&defaults);
        assert_eq!(query, defaults);
    }

    #[tokio::test]
    async fn catalog_forwards_descriptor_to_repository() {
        let mut repo = MockRepository::new();
        repo.expect_list_products()
            .withf(|query, _| query.filter(CATEGORY_FILTER).is_none() && query.per_page == 12)
            .times(1)
            .returning(|_, _| Ok(Page::new(Vec::new(), 0)));

        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base_url": "http://localhost"}"#).unwrap();
        let controller = QueryController::spawn(
            Arc::new(ProductCatalog::new(Arc::new(repo))),
            catalog_options(&config, None),
        );
        let mut updates = controller.subscribe();
        while updates.borrow_and_update().loading != LoadingState::Idle {
            updates.changed().await.unwrap();
        }
        assert_eq!(controller.view().total, 0);
        assert_eq!(controller.view().query.sort_by, ProductSort::Name);
    }
}
