//! Product service
//!
//! Sellers manage their own listings. Role checks happen in the extractor;
//! ownership is checked here against the stored product.

use std::collections::HashSet;
use std::sync::Arc;

use validator::Validate;

use crate::auth::{require_owner, Identity};
use crate::error::{ApiError, ApiResult};
use crate::models::{Product, ProductCreate};
use crate::repository::{CategoryRepository, ProductRepository};

use super::categories::CATEGORY_NOT_FOUND;

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Active, in-stock products whose category is still active
    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        let active: HashSet<i64> = self
            .categories
            .list_active()
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        Ok(self
            .products
            .list_active(None)
            .await?
            .into_iter()
            .filter(|p| p.stock > 0 && active.contains(&p.category_id))
            .collect())
    }

    /// Active products in one active category
    pub async fn list_by_category(&self, category_id: i64) -> ApiResult<Vec<Product>> {
        self.require_active_category(category_id).await?;
        Ok(self.products.list_active(Some(category_id)).await?)
    }

    pub async fn get(&self, product_id: i64) -> ApiResult<Product> {
        self.products
            .find_active_by_id(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product not found or inactive".to_string()))
    }

    pub async fn create(&self, seller: &impl Identity, request: ProductCreate) -> ApiResult<Product> {
        request.validate()?;
        self.require_active_category(request.category_id).await?;

        let product = self.products.create(seller.user_id(), request).await?;
        tracing::info!(product_id = product.id, seller_id = seller.user_id(), "Product created");
        Ok(product)
    }

    pub async fn update(
        &self,
        seller: &impl Identity,
        product_id: i64,
        request: ProductCreate,
    ) -> ApiResult<Product> {
        let existing = self.get(product_id).await?;
        require_owner(&existing, seller)?;
        request.validate()?;
        self.require_active_category(request.category_id).await?;

        let product = self.products.update(product_id, request).await?;
        tracing::info!(product_id, seller_id = seller.user_id(), "Product updated");
        Ok(product)
    }

    /// Soft delete
    pub async fn delete(&self, seller: &impl Identity, product_id: i64) -> ApiResult<Product> {
        let existing = self.get(product_id).await?;
        require_owner(&existing, seller)?;

        let product = self.products.deactivate(product_id).await?;
        tracing::info!(product_id, seller_id = seller.user_id(), "Product deactivated");
        Ok(product)
    }

    async fn require_active_category(&self, category_id: i64) -> ApiResult<()> {
        match self.categories.find_active_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::BadRequest(CATEGORY_NOT_FOUND.to_string())),
        }
    }
}
