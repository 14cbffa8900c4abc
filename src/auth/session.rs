//! Session resolution
//!
//! Turns a bearer token into a live user record. The token alone is never
//! trusted: the user must still exist and be active at request time.

use std::sync::Arc;

use crate::models::User;
use crate::repository::UserRepository;

use super::jwt::{TokenType, TokenVerifier};
use super::AuthError;

pub struct SessionResolver {
    verifier: TokenVerifier,
    users: Arc<dyn UserRepository>,
}

impl SessionResolver {
    pub fn new(verifier: TokenVerifier, users: Arc<dyn UserRepository>) -> Self {
        Self { verifier, users }
    }

    /// Resolve an access token to the active user it names
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .verifier
            .verify(token, TokenType::Access)
            .map_err(|e| {
                tracing::warn!(error = %e, "Access token rejected");
                e
            })?;
        let email = claims.sub.ok_or(AuthError::MissingClaim("sub"))?;

        match self.users.find_active_user_by_email(&email).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                tracing::warn!(email = %email, "Token subject is unknown or inactive");
                Err(AuthError::UserNotFoundOrInactive)
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed during session resolution");
                Err(AuthError::UserNotFoundOrInactive)
            }
        }
    }

    /// Validate a refresh token and return the user id it carries
    ///
    /// Loading the user and issuing new tokens is left to the caller.
    pub fn resolve_from_refresh(&self, refresh_token: &str) -> Result<i64, AuthError> {
        let claims = self
            .verifier
            .verify(refresh_token, TokenType::Refresh)
            .map_err(|e| {
                tracing::warn!(error = %e, "Refresh token rejected");
                e
            })?;

        claims.id.ok_or(AuthError::MissingClaim("id"))
    }
}
