//! Review service

use std::sync::Arc;

use validator::Validate;

use crate::auth::{require_owner, AuthError, ForbiddenReason, Identity};
use crate::error::{ApiError, ApiResult};
use crate::models::{Review, ReviewCreate, UserRole};
use crate::repository::{ProductRepository, RepositoryError, ReviewRepository};

#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    products: Arc<dyn ProductRepository>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { reviews, products }
    }

    pub async fn list(&self) -> ApiResult<Vec<Review>> {
        Ok(self.reviews.list_active(None).await?)
    }

    pub async fn list_for_product(&self, product_id: i64) -> ApiResult<Vec<Review>> {
        self.ensure_product(product_id).await?;
        Ok(self.reviews.list_active(Some(product_id)).await?)
    }

    pub async fn create(&self, buyer: &impl Identity, request: ReviewCreate) -> ApiResult<Review> {
        request.validate()?;
        self.ensure_product(request.product_id).await?;

        let review = self
            .reviews
            .create(buyer.user_id(), request)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    ApiError::Conflict("You have already reviewed this product".to_string())
                }
                other => other.into(),
            })?;

        self.refresh_rating(review.product_id).await?;
        tracing::info!(review_id = review.id, product_id = review.product_id, "Review created");
        Ok(review)
    }

    /// Soft delete, allowed to the author or an admin
    pub async fn delete(&self, user: &impl Identity, review_id: i64) -> ApiResult<Review> {
        let existing = self
            .reviews
            .find_active_by_id(review_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Review not found or inactive".to_string()))?;

        if user.role() != UserRole::Admin {
            require_owner(&existing, user)
                .map_err(|_| AuthError::Forbidden(ForbiddenReason::AuthorOrAdmin))?;
        }

        let review = self.reviews.deactivate(review_id).await?;
        self.refresh_rating(review.product_id).await?;
        tracing::info!(review_id, user_id = user.user_id(), "Review deactivated");
        Ok(review)
    }

    async fn ensure_product(&self, product_id: i64) -> ApiResult<()> {
        self.products
            .find_active_by_id(product_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound("Product not found or inactive".to_string()))
    }

    async fn refresh_rating(&self, product_id: i64) -> ApiResult<()> {
        let average = self.reviews.average_grade(product_id).await?;
        self.products.set_rating(product_id, average).await?;
        Ok(())
    }
}
