//! Authentication middleware
//!
//! Extractors that resolve the bearer token into a live user before the
//! handler runs, plus role-guarded variants.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use crate::auth::{require_admin, require_buyer, require_seller, Identity, SessionResolver};
use crate::error::ApiError;
use crate::models::{User, UserRole};

/// Authenticated user resolved from an access token and the live user record
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

impl Identity for AuthenticatedUser {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn role(&self) -> UserRole {
        self.role
    }
}

/// Extractor for authenticated users
///
/// Verifies the access token from the Authorization header, then loads the
/// active user it names. Role checks use the stored role, so a role change
/// takes effect without waiting for old tokens to expire.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", user.user_id)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<SessionResolver>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let sessions = Arc::<SessionResolver>::from_ref(state);
        let user = sessions.resolve(bearer.token()).await?;

        Ok(user.into())
    }
}

/// Authenticated user holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

/// Authenticated user holding the seller role
#[derive(Debug, Clone)]
pub struct SellerUser(pub AuthenticatedUser);

/// Authenticated user holding the buyer role
#[derive(Debug, Clone)]
pub struct BuyerUser(pub AuthenticatedUser);

macro_rules! role_extractor {
    ($name:ident, $guard:ident) => {
        #[async_trait]
        impl<S> FromRequestParts<S> for $name
        where
            Arc<SessionResolver>: FromRef<S>,
            S: Send + Sync,
        {
            type Rejection = ApiError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthenticatedUser::from_request_parts(parts, state).await?;
                Ok($name($guard(user)?))
            }
        }
    };
}

role_extractor!(AdminUser, require_admin);
role_extractor!(SellerUser, require_seller);
role_extractor!(BuyerUser, require_buyer);
