//! Services handling product administration.

use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::types::ProductId;
use crate::domain::user::User;
use crate::forms::product::{ProductForm, UpdateStockForm};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult, ensure_admin};

/// Loads a single product for the detail page.
pub async fn get_product<R>(repo: &R, product_id: &str) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    let product_id = ProductId::new(product_id)?;
    repo.get_product(&product_id)
        .await
        .map_err(ServiceError::from)
}

/// Validates the editor form and creates the product.
pub async fn create_product<R>(repo: &R, user: &User, form: &ProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let new_product = NewProduct::try_from(form).map_err(|err| {
        log::error!("Failed to validate product form: {err}");
        ServiceError::from(err)
    })?;

    repo.create_product(&new_product).await.map_err(|err| {
        log::error!("Failed to create a product: {err}");
        ServiceError::from(err)
    })
}

/// Replaces the editable fields of an existing product.
pub async fn update_product<R>(
    repo: &R,
    user: &User,
    product_id: &str,
    form: &ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let product_id = ProductId::new(product_id)?;
    let updates = UpdateProduct::try_from(form).map_err(|err| {
        log::error!("Failed to validate product form: {err}");
        ServiceError::from(err)
    })?;

    repo.update_product(&product_id, &updates)
        .await
        .map_err(|err| {
            log::error!("Failed to update product {product_id}: {err}");
            ServiceError::from(err)
        })
}

pub async fn delete_product<R>(repo: &R, user: &User, product_id: &str) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let product_id = ProductId::new(product_id)?;
    repo.delete_product(&product_id).await.map_err(|err| {
        log::error!("Failed to delete product {product_id}: {err}");
        ServiceError::from(err)
    })
}

/// Adds or subtracts stock relative to the current server-side level.
pub async fn adjust_stock<R>(
    repo: &R,
    user: &User,
    product_id: &str,
    form: &UpdateStockForm,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    ensure_admin(user)?;

    let product_id = ProductId::new(product_id)?;
    let product = repo.get_product(&product_id).await?;
    let stock = form.apply(product.stock)?;

    repo.update_product(&product_id, &UpdateProduct::stock(stock))
        .await
        .map_err(|err| {
            log::error!("Failed to update stock of product {product_id}: {err}");
            ServiceError::from(err)
        })
}
