//! Authentication and authorization errors

use thiserror::Error;

use crate::models::UserRole;
use crate::repository::RepositoryError;

use super::jwt::TokenType;

/// Why an authenticated caller was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// Caller does not hold the required role
    Role(UserRole),
    /// Caller does not own the resource
    Ownership,
    /// Caller is neither the author of the resource nor an admin
    AuthorOrAdmin,
}

impl std::fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForbiddenReason::Role(UserRole::Admin) => f.write_str("Admin access required"),
            ForbiddenReason::Role(UserRole::Seller) => f.write_str("Seller access required"),
            ForbiddenReason::Role(UserRole::Buyer) => f.write_str("Buyer access required"),
            ForbiddenReason::Ownership => f.write_str("You can only update your own products"),
            ForbiddenReason::AuthorOrAdmin => f.write_str("User must be an author or admin"),
        }
    }
}

/// Auth errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token signature or format")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Expected {expected} token, got '{found}'")]
    TypeMismatch { expected: TokenType, found: String },

    #[error("Token is missing required claim '{0}'")]
    MissingClaim(&'static str),

    #[error("User not found or inactive")]
    UserNotFoundOrInactive,

    #[error("{0}")]
    Forbidden(ForbiddenReason),

    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    #[error("Incorrect email or password")]
    IncorrectCredentials,

    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// True for failures of the token itself (as opposed to lookup or policy)
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::TypeMismatch { .. }
                | AuthError::MissingClaim(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_messages() {
        assert_eq!(
            AuthError::Forbidden(ForbiddenReason::Role(UserRole::Admin)).to_string(),
            "Admin access required"
        );
        assert_eq!(
            AuthError::Forbidden(ForbiddenReason::Ownership).to_string(),
            "You can only update your own products"
        );
    }

    #[test]
    fn test_token_error_classification() {
        assert!(AuthError::Expired.is_token_error());
        assert!(AuthError::MissingClaim("sub").is_token_error());
        assert!(!AuthError::UserNotFoundOrInactive.is_token_error());
        assert!(!AuthError::IncorrectCredentials.is_token_error());
    }
}
