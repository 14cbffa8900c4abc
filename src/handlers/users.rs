//! User and authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use super::{AdminUser, AuthenticatedUser};
use crate::auth::AuthError;
use crate::error::ApiError;
use crate::extract::{ApiForm, ApiJson, ApiPath};
use crate::models::{
    AccessTokenResponse, LoginForm, RefreshTokenRequest, TokenPairResponse, UserCreate,
    UserResponse, UserRoleUpdate,
};
use crate::state::AppState;

const TOKEN_TYPE: &str = "bearer";

/// POST /users - Register a buyer or seller
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    req.validate()?;
    let user = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /users/token - Exchange credentials for a token pair
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let tokens = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(TokenPairResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

/// POST /users/access_token - New access token from a refresh token
pub async fn access_token_by_refresh_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let access_token = state
        .auth_service
        .access_token_from_refresh(&req.refresh_token)
        .await
        .map_err(ApiError::from_refresh_error)?;

    Ok(Json(AccessTokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

/// POST /users/refresh_token - New access and refresh tokens from a refresh token
pub async fn tokens_by_refresh_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let tokens = state
        .auth_service
        .tokens_from_refresh(&req.refresh_token)
        .await
        .map_err(ApiError::from_refresh_error)?;

    Ok(Json(TokenPairResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

/// GET /users/me - Current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service.get_active_user(user.user_id).await?;
    Ok(Json(user.into()))
}

/// GET /users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .auth_service
        .get_active_user(user_id)
        .await
        .map_err(not_found)?;

    Ok(Json(user.into()))
}

/// PUT /users/:user_id/update_role - Admin only
pub async fn update_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UserRoleUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!(admin_id = admin.user_id, user_id, new_role = %req.new_role, "Role change requested");

    let user = state
        .auth_service
        .update_role(user_id, req.new_role)
        .await
        .map_err(not_found)?;

    Ok(Json(user.into()))
}

/// Looking up a user by id is a 404 when it is missing, not a 401
fn not_found(err: AuthError) -> ApiError {
    match err {
        AuthError::UserNotFoundOrInactive => {
            ApiError::NotFound("User not found or inactive".to_string())
        }
        other => other.into(),
    }
}
