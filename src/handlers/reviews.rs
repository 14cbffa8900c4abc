//! Review HTTP handlers

use axum::{extract::State, http::StatusCode, Json};

use super::{AuthenticatedUser, BuyerUser};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::{Review, ReviewCreate};
use crate::state::AppState;

/// GET /reviews
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.review_service.list().await?))
}

/// GET /products/:product_id/reviews
pub async fn list_product_reviews(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.review_service.list_for_product(product_id).await?))
}

/// POST /reviews - Buyer only
pub async fn create_review(
    State(state): State<AppState>,
    BuyerUser(buyer): BuyerUser,
    ApiJson(req): ApiJson<ReviewCreate>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state.review_service.create(&buyer, req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// DELETE /reviews/:review_id - Author or admin
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(review_id): ApiPath<i64>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(state.review_service.delete(&user, review_id).await?))
}
