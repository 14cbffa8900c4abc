//! Category service
//!
//! Categories form a tree through `parent_id`. Only active categories can be
//! referenced as a parent or by a product.

use std::sync::Arc;

use validator::Validate;

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::models::{Category, CategoryCreate};
use crate::repository::CategoryRepository;

pub(crate) const CATEGORY_NOT_FOUND: &str = "Category not found or inactive";

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        Ok(self.categories.list_active().await?)
    }

    pub async fn create(&self, admin: &impl Identity, request: CategoryCreate) -> ApiResult<Category> {
        request.validate()?;
        self.require_active_parent(request.parent_id).await?;

        let category = self.categories.create(request).await?;
        tracing::info!(category_id = category.id, admin_id = admin.user_id(), "Category created");
        Ok(category)
    }

    pub async fn update(
        &self,
        admin: &impl Identity,
        category_id: i64,
        request: CategoryCreate,
    ) -> ApiResult<Category> {
        request.validate()?;
        if self.categories.find_active_by_id(category_id).await?.is_none() {
            return Err(ApiError::NotFound(CATEGORY_NOT_FOUND.to_string()));
        }
        if request.parent_id == Some(category_id) {
            return Err(ApiError::BadRequest(
                "A category cannot be its own parent".to_string(),
            ));
        }
        self.require_active_parent(request.parent_id).await?;

        let category = self.categories.update(category_id, request).await?;
        tracing::info!(category_id, admin_id = admin.user_id(), "Category updated");
        Ok(category)
    }

    /// Soft delete
    pub async fn delete(&self, admin: &impl Identity, category_id: i64) -> ApiResult<Category> {
        let category = self.categories.deactivate(category_id).await?;
        tracing::info!(category_id, admin_id = admin.user_id(), "Category deactivated");
        Ok(category)
    }

    async fn require_active_parent(&self, parent_id: Option<i64>) -> ApiResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        match self.categories.find_active_by_id(parent_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::BadRequest(CATEGORY_NOT_FOUND.to_string())),
        }
    }
}
