//! Centralized API error handling
//!
//! This module provides a unified error type for API responses with proper
//! HTTP status code mapping and JSON error responses.

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::repository::RepositoryError;

const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";
const REFRESH_MESSAGE: &str = "Could not validate refresh token";
const EXPIRED_MESSAGE: &str = "Token has expired";

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests")]
    TooManyRequests,

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in the response
#[derive(Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::TooManyRequests => "TOO_MANY_REQUESTS",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Map an error raised while handling a refresh token
    ///
    /// Expiry keeps its own message on this path too. Every other token
    /// failure reports the refresh-specific message, and a refresh token for
    /// a user that is gone is a 404 rather than a 401.
    pub fn from_refresh_error(err: AuthError) -> Self {
        match err {
            AuthError::Expired => ApiError::Unauthorized(EXPIRED_MESSAGE.to_string()),
            e if e.is_token_error() => ApiError::Unauthorized(REFRESH_MESSAGE.to_string()),
            AuthError::UserNotFoundOrInactive => {
                ApiError::NotFound("User not found or inactive".to_string())
            }
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Log server errors
        match &self {
            ApiError::InternalError(_) | ApiError::DatabaseError(_) => {
                tracing::error!(error = %message, code = %error_code, "Server error occurred");
            }
            _ => {
                tracing::debug!(error = %message, code = %error_code, "Client error occurred");
            }
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code: error_code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

// Convenience conversions from common error types

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Expired => ApiError::Unauthorized(EXPIRED_MESSAGE.to_string()),
            AuthError::InvalidSignature
            | AuthError::TypeMismatch { .. }
            | AuthError::MissingClaim(_)
            | AuthError::UserNotFoundOrInactive => {
                ApiError::Unauthorized(CREDENTIALS_MESSAGE.to_string())
            }
            AuthError::Forbidden(reason) => ApiError::Forbidden(reason.to_string()),
            AuthError::EmailAlreadyRegistered => ApiError::Conflict(err.to_string()),
            AuthError::IncorrectCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::EncodingFailed(e) | AuthError::HashingFailed(e) => {
                ApiError::InternalError(e)
            }
            AuthError::Repository(e) => e.into(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            RepositoryError::Conflict(e) => ApiError::Conflict(e),
            RepositoryError::Database(e) => ApiError::DatabaseError(e),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON that does not fit the target type
            JsonRejection::JsonDataError(e) => ApiError::ValidationError(e.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::FailedToDeserializeForm(e) => ApiError::ValidationError(e.body_text()),
            FormRejection::FailedToDeserializeFormBody(e) => {
                ApiError::ValidationError(e.body_text())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(e) => {
                ApiError::ValidationError(e.body_text())
            }
            other => ApiError::InternalError(other.body_text()),
        }
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ForbiddenReason, TokenType};
    use crate::models::UserRole;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            ApiError::Unauthorized("test".to_string()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(ApiError::TooManyRequests.error_code(), "TOO_MANY_REQUESTS");
    }

    #[test]
    fn test_auth_error_mapping() {
        let expired = ApiError::from(AuthError::Expired);
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.to_string(), "Token has expired");

        for err in [
            AuthError::InvalidSignature,
            AuthError::MissingClaim("sub"),
            AuthError::UserNotFoundOrInactive,
            AuthError::TypeMismatch {
                expected: TokenType::Access,
                found: "refresh".to_string(),
            },
        ] {
            let api = ApiError::from(err);
            assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(api.to_string(), "Could not validate credentials");
        }

        let forbidden = ApiError::from(AuthError::Forbidden(ForbiddenReason::Role(UserRole::Seller)));
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let conflict = ApiError::from(AuthError::EmailAlreadyRegistered);
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.to_string(), "Email is already registered");

        let login = ApiError::from(AuthError::IncorrectCredentials);
        assert_eq!(login.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(login.to_string(), "Incorrect email or password");
    }

    #[test]
    fn test_refresh_error_mapping() {
        let expired = ApiError::from_refresh_error(AuthError::Expired);
        assert_eq!(expired.to_string(), "Token has expired");

        let invalid = ApiError::from_refresh_error(AuthError::InvalidSignature);
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.to_string(), "Could not validate refresh token");

        let gone = ApiError::from_refresh_error(AuthError::UserNotFoundOrInactive);
        assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = ApiError::Unauthorized("nope".to_string()).into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let response = ApiError::Forbidden("nope".to_string()).into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
