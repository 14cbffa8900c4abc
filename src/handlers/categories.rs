//! Category HTTP handlers

use axum::{extract::State, http::StatusCode, Json};

use super::AdminUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::{Category, CategoryCreate};
use crate::state::AppState;

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.category_service.list().await?))
}

/// POST /categories - Admin only
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(req): ApiJson<CategoryCreate>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.category_service.create(&admin, req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/:category_id - Admin only
pub async fn update_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(category_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CategoryCreate>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(
        state
            .category_service
            .update(&admin, category_id, req)
            .await?,
    ))
}

/// DELETE /categories/:category_id - Admin only
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(category_id): ApiPath<i64>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.category_service.delete(&admin, category_id).await?))
}
