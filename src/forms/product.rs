//! Forms for creating products and adjusting their stock.

use serde::Deserialize;
use validator::Validate;

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::domain::types::{
    CategoryId, ImageUrl, LowStockThreshold, Price, ProductDescription, ProductName,
    StockQuantity,
};
use crate::forms::{FormError, optional_text};

#[derive(Debug, Clone, Deserialize, Validate)]
/// Product editor used both for creation and full edits.
pub struct ProductForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[validate(length(min = 1))]
    pub category_id: String,
}

impl TryFrom<&ProductForm> for NewProduct {
    type Error = FormError;

    fn try_from(form: &ProductForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: ProductName::new(form.name.as_str()).map_err(|_| FormError::InvalidName)?,
            description: optional_text(&form.description)
                .map(ProductDescription::new)
                .transpose()
                .map_err(|_| FormError::InvalidName)?,
            price: Price::new(form.price).map_err(|_| FormError::InvalidPrice)?,
            stock: StockQuantity::new(form.stock).map_err(|_| FormError::InvalidStock)?,
            low_stock_threshold: LowStockThreshold::new(form.low_stock_threshold)
                .map_err(|_| FormError::InvalidStock)?,
            image_url: optional_text(&form.image_url)
                .map(ImageUrl::new)
                .transpose()
                .map_err(|_| FormError::InvalidUrl)?,
            category_id: CategoryId::new(form.category_id.as_str())
                .map_err(|_| FormError::InvalidCategory)?,
        })
    }
}

impl TryFrom<&ProductForm> for UpdateProduct {
    type Error = FormError;

    /// Edits submit the whole editor, so every field is replaced.
    fn try_from(form: &ProductForm) -> Result<Self, Self::Error> {
        let product = NewProduct::try_from(form)?;
        Ok(Self {
            name: Some(product.name),
            description: product.description,
            price: Some(product.price),
            stock: Some(product.stock),
            low_stock_threshold: Some(product.low_stock_threshold),
            image_url: product.image_url,
            category_id: Some(product.category_id),
        })
    }
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAdjustment {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Deserialize)]
/// Restock / write-off dialog.
pub struct UpdateStockForm {
    pub change: i64,
    pub kind: StockAdjustment,
}

impl UpdateStockForm {
    /// Computes the stock level after the adjustment.
    pub fn apply(&self, current: StockQuantity) -> Result<StockQuantity, FormError> {
        if self.change <= 0 {
            return Err(FormError::InvalidStockChange);
        }
        let next = match self.kind {
            StockAdjustment::Add => current.get().saturating_add(self.change),
            StockAdjustment::Subtract => current.get() - self.change,
        };
        StockQuantity::new(next).map_err(|_| FormError::InsufficientStock {
            available: current.get(),
            requested: self.change,
        })
    }
}
