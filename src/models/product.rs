use serde::{Deserialize, Serialize};

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductCreator as DomainCreator,
    UpdateProduct as DomainUpdateProduct,
};
use crate::domain::types::{
    CategoryId, ImageUrl, LowStockThreshold, Price, ProductDescription, ProductId, ProductName,
    StockQuantity, StockStatus, TypeConstraintError, UserEmail, UserId, Username,
};
use crate::models::category::CategorySummary;
use crate::models::parse_timestamp;

#[derive(Debug, Clone, Deserialize)]
/// API model for [`crate::domain::product::Product`].
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub low_stock_threshold: i64,
    pub stock_status: Option<StockStatus>,
    pub image_url: Option<String>,
    pub category_id: String,
    pub category: Option<CategorySummary>,
    pub creator: Option<ProductCreator>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreator {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
/// Request body of `POST /products`.
pub struct NewProduct<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub price: f64,
    pub stock: i64,
    pub low_stock_threshold: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    pub category_id: &'a str,
}

#[derive(Serialize, Default)]
/// Request body of `PUT /products/{id}`; only present fields are changed.
pub struct UpdateProduct<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<&'a str>,
}

/// Treats blank optional strings as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<ProductCreator> for DomainCreator {
    type Error = TypeConstraintError;

    fn try_from(creator: ProductCreator) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(creator.id)?,
            username: Username::new(creator.username)?,
            email: UserEmail::new(creator.email)?,
        })
    }
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(product.id)?,
            name: ProductName::new(product.name)?,
            description: non_blank(product.description)
                .map(ProductDescription::new)
                .transpose()?,
            price: Price::new(product.price)?,
            stock: StockQuantity::new(product.stock)?,
            low_stock_threshold: LowStockThreshold::new(product.low_stock_threshold)?,
            stock_status: product.stock_status,
            image_url: non_blank(product.image_url).map(ImageUrl::new).transpose()?,
            category_id: CategoryId::new(product.category_id)?,
            category: product.category.map(TryInto::try_into).transpose()?,
            creator: product.creator.map(TryInto::try_into).transpose()?,
            created_by: UserId::new(product.created_by)?,
            created_at: parse_timestamp(&product.created_at)?,
            updated_at: parse_timestamp(&product.updated_at)?,
        })
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        Self {
            name: product.name.as_str(),
            description: product.description.as_ref().map(ProductDescription::as_str),
            price: product.price.get(),
            stock: product.stock.get(),
            low_stock_threshold: product.low_stock_threshold.get(),
            image_url: product.image_url.as_ref().map(ImageUrl::as_str),
            category_id: product.category_id.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(product: &'a DomainUpdateProduct) -> Self {
        Self {
            name: product.name.as_ref().map(ProductName::as_str),
            description: product.description.as_ref().map(ProductDescription::as_str),
            price: product.price.map(Price::get),
            stock: product.stock.map(StockQuantity::get),
            low_stock_threshold: product.low_stock_threshold.map(LowStockThreshold::get),
            image_url: product.image_url.as_ref().map(ImageUrl::as_str),
            category_id: product.category_id.as_ref().map(CategoryId::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_payload_into_domain() {
        let payload: Product = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Laptop",
            "description": "",
            "price": 12500000.0,
            "stock": 3,
            "low_stock_threshold": 5,
            "stock_status": "yellow",
            "image_url": null,
            "category_id": "c-1",
            "category": {"id": "c-1", "name": "Electronics"},
            "created_by": "u-1",
            "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-02T10:00:00Z"
        }))
        .unwrap();

        let product = DomainProduct::try_from(payload).expect("valid product");
        assert_eq!(product.name.as_str(), "Laptop");
        assert!(product.description.is_none());
        assert_eq!(product.stock_status, Some(StockStatus::Yellow));
        assert_eq!(product.category.unwrap().name.as_str(), "Electronics");
    }

    #[test]
    fn update_payload_skips_untouched_fields() {
        let update = DomainUpdateProduct::stock(StockQuantity::new(7).unwrap());
        let body = serde_json::to_value(UpdateProduct::from(&update)).unwrap();
        assert_eq!(body, json!({"stock": 7}));
    }
}
