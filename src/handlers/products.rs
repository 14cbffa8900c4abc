//! Product HTTP handlers

use axum::{extract::State, http::StatusCode, Json};

use super::SellerUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::{Product, ProductCreate};
use crate::state::AppState;

/// GET /products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.product_service.list().await?))
}

/// GET /products/category/:category_id
pub async fn list_products_by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(
        state.product_service.list_by_category(category_id).await?,
    ))
}

/// GET /products/:product_id
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.product_service.get(product_id).await?))
}

/// POST /products - Seller only
pub async fn create_product(
    State(state): State<AppState>,
    SellerUser(seller): SellerUser,
    ApiJson(req): ApiJson<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.product_service.create(&seller, req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:product_id - Owning seller only
pub async fn update_product(
    State(state): State<AppState>,
    SellerUser(seller): SellerUser,
    ApiPath(product_id): ApiPath<i64>,
    ApiJson(req): ApiJson<ProductCreate>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(
        state
            .product_service
            .update(&seller, product_id, req)
            .await?,
    ))
}

/// DELETE /products/:product_id - Owning seller only
pub async fn delete_product(
    State(state): State<AppState>,
    SellerUser(seller): SellerUser,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.product_service.delete(&seller, product_id).await?))
}
