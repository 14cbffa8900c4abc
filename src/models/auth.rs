//! Authentication models and request/response DTOs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::UserRole;

/// Registration body
#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(email, length(max = 100))]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    /// Only buyer and seller accounts can self-register
    #[serde(default)]
    #[validate(custom = "validate_registration_role")]
    pub role: UserRole,
}

fn validate_registration_role(role: &UserRole) -> Result<(), ValidationError> {
    match role {
        UserRole::Buyer | UserRole::Seller => Ok(()),
        UserRole::Admin => Err(ValidationError::new("role_must_be_buyer_or_seller")),
    }
}

/// User response (sanitized for API)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub role: UserRole,
}

/// Credential exchange form (`username` carries the email)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Role change request (admin only)
#[derive(Debug, Deserialize)]
pub struct UserRoleUpdate {
    pub new_role: UserRole,
}

/// Access + refresh token pair returned on login and full refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// Access token returned by the access-only refresh exchange
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_create_defaults_to_buyer() {
        let body: UserCreate =
            serde_json::from_str(r#"{"email":"a@example.com","password":"password123"}"#).unwrap();
        assert_eq!(body.role, UserRole::Buyer);
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_user_create_rejects_admin_and_short_password() {
        let admin: UserCreate = serde_json::from_str(
            r#"{"email":"a@example.com","password":"password123","role":"admin"}"#,
        )
        .unwrap();
        assert!(admin.validate().is_err());

        let short: UserCreate =
            serde_json::from_str(r#"{"email":"a@example.com","password":"short"}"#).unwrap();
        assert!(short.validate().is_err());

        let bad_email: UserCreate =
            serde_json::from_str(r#"{"email":"not-an-email","password":"password123"}"#).unwrap();
        assert!(bad_email.validate().is_err());
    }
}
