use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::CategorySummary;
use crate::domain::types::{
    CategoryId, ImageUrl, LowStockThreshold, Price, ProductDescription, ProductId, ProductName,
    StockQuantity, StockStatus, UserEmail, UserId, Username,
};

/// Product as returned by the catalog API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub stock: StockQuantity,
    pub low_stock_threshold: LowStockThreshold,
    /// Bucket computed by the API; absent on older payloads.
    pub stock_status: Option<StockStatus>,
    pub image_url: Option<ImageUrl>,
    pub category_id: CategoryId,
    pub category: Option<CategorySummary>,
    pub creator: Option<ProductCreator>,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Returns the API-provided stock status, deriving it from the stock level
    /// when the payload omitted it.
    pub fn effective_stock_status(&self) -> StockStatus {
        self.stock_status.unwrap_or_else(|| {
            if self.stock.get() == 0 {
                StockStatus::Red
            } else if self.stock.get() <= self.low_stock_threshold.get() {
                StockStatus::Yellow
            } else {
                StockStatus::Green
            }
        })
    }
}

/// Author reference embedded in product payloads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductCreator {
    pub id: UserId,
    pub username: Username,
    pub email: UserEmail,
}

/// Validated payload for creating a product.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub stock: StockQuantity,
    pub low_stock_threshold: LowStockThreshold,
    pub image_url: Option<ImageUrl>,
    pub category_id: CategoryId,
}

/// Partial update of a product; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateProduct {
    pub name: Option<ProductName>,
    pub description: Option<ProductDescription>,
    pub price: Option<Price>,
    pub stock: Option<StockQuantity>,
    pub low_stock_threshold: Option<LowStockThreshold>,
    pub image_url: Option<ImageUrl>,
    pub category_id: Option<CategoryId>,
}

impl UpdateProduct {
    /// Update touching only the stock level.
    #[must_use]
    pub fn stock(stock: StockQuantity) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }
}
