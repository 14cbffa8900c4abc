//! JWT token generation and validation
//!
//! Handles creation and verification of access and refresh tokens. Both are
//! HS256-signed with one secret that is loaded once at startup and shared
//! read-only.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::models::{User, UserRole};

use super::AuthError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims shared by access and refresh tokens
///
/// Refresh tokens carry only `id`; `sub` (email) and `role` are left out so a
/// leaked refresh token discloses as little as possible.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user email), access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// User ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// User role, access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Token type (access or refresh)
    #[serde(default)]
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }

    /// Claim that must be present for this token type to be usable
    fn required_claim(&self) -> &'static str {
        match self {
            TokenType::Access => "sub",
            TokenType::Refresh => "id",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signing and verification keys derived from the configured secret
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Token lifetimes, measured from issuance
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(30),
            refresh: Duration::days(7),
        }
    }
}

/// Builds signed access and refresh tokens
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<JwtKeys>,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(keys: Arc<JwtKeys>, lifetimes: TokenLifetimes) -> Self {
        Self { keys, lifetimes }
    }

    /// Generate an access token for a user
    pub fn issue_access(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(user.email.clone()),
            id: Some(user.id),
            role: Some(user.role),
            token_type: TokenType::Access.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetimes.access).timestamp(),
        };
        self.sign(&claims)
    }

    /// Generate a refresh token for a user
    pub fn issue_refresh(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: None,
            id: Some(user.id),
            role: None,
            token_type: TokenType::Refresh.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetimes.refresh).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(ALGORITHM), claims, &self.keys.encoding)
            .map_err(|e| AuthError::EncodingFailed(e.to_string()))
    }
}

/// Validates signature, expiry and claim shape of incoming tokens
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<JwtKeys>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: Arc<JwtKeys>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self { keys, validation }
    }

    /// Verify and decode a token of the expected type
    ///
    /// Checks run in order: signature and structure, expiry, token type,
    /// then the claim the token type requires.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature,
            })?
            .claims;

        if claims.token_type != expected.as_str() {
            return Err(AuthError::TypeMismatch {
                expected,
                found: claims.token_type,
            });
        }

        let present = match expected {
            TokenType::Access => claims.sub.is_some(),
            TokenType::Refresh => claims.id.is_some(),
        };
        if !present {
            return Err(AuthError::MissingClaim(expected.required_claim()));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key";

    fn create_test_user(role: UserRole) -> User {
        User {
            id: 42,
            email: "buyer@example.com".to_string(),
            hashed_password: "unused".to_string(),
            is_active: true,
            role,
        }
    }

    fn pair(secret: &str, lifetimes: TokenLifetimes) -> (TokenIssuer, TokenVerifier) {
        let keys = Arc::new(JwtKeys::from_secret(secret));
        (
            TokenIssuer::new(keys.clone(), lifetimes),
            TokenVerifier::new(keys),
        )
    }

    fn sign_raw(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(ALGORITHM),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_round_trip() {
        let (issuer, verifier) = pair(TEST_SECRET, TokenLifetimes::default());

        for role in [UserRole::Buyer, UserRole::Seller, UserRole::Admin] {
            let user = create_test_user(role);
            let token = issuer.issue_access(&user).unwrap();
            assert_eq!(token.split('.').count(), 3);

            let claims = verifier.verify(&token, TokenType::Access).unwrap();
            assert_eq!(claims.sub.as_deref(), Some("buyer@example.com"));
            assert_eq!(claims.id, Some(42));
            assert_eq!(claims.role, Some(role));
            assert_eq!(claims.token_type, "access");
            assert_eq!(claims.exp - claims.iat, 30 * 60);
        }
    }

    #[test]
    fn test_refresh_token_minimal_claims() {
        let (issuer, verifier) = pair(TEST_SECRET, TokenLifetimes::default());
        let token = issuer
            .issue_refresh(&create_test_user(UserRole::Seller))
            .unwrap();

        let claims = verifier.verify(&token, TokenType::Refresh).unwrap();
        assert_eq!(claims.id, Some(42));
        assert_eq!(claims.sub, None);
        assert_eq!(claims.role, None);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_token_type_mismatch() {
        let (issuer, verifier) = pair(TEST_SECRET, TokenLifetimes::default());
        let user = create_test_user(UserRole::Buyer);

        let refresh = issuer.issue_refresh(&user).unwrap();
        assert!(matches!(
            verifier.verify(&refresh, TokenType::Access),
            Err(AuthError::TypeMismatch {
                expected: TokenType::Access,
                ..
            })
        ));

        let access = issuer.issue_access(&user).unwrap();
        assert!(matches!(
            verifier.verify(&access, TokenType::Refresh),
            Err(AuthError::TypeMismatch {
                expected: TokenType::Refresh,
                ..
            })
        ));
    }

    #[test]
    fn test_expired_token() {
        let lifetimes = TokenLifetimes {
            access: Duration::seconds(-10),
            refresh: Duration::seconds(-10),
        };
        let (issuer, verifier) = pair(TEST_SECRET, lifetimes);
        let token = issuer
            .issue_access(&create_test_user(UserRole::Buyer))
            .unwrap();

        assert!(matches!(
            verifier.verify(&token, TokenType::Access),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let (issuer, _) = pair("secret1", TokenLifetimes::default());
        let (_, verifier) = pair("secret2", TokenLifetimes::default());
        let token = issuer
            .issue_access(&create_test_user(UserRole::Buyer))
            .unwrap();

        assert!(matches!(
            verifier.verify(&token, TokenType::Access),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_payload() {
        let (issuer, verifier) = pair(TEST_SECRET, TokenLifetimes::default());
        let buyer = issuer
            .issue_access(&create_test_user(UserRole::Buyer))
            .unwrap();
        let admin = issuer
            .issue_access(&create_test_user(UserRole::Admin))
            .unwrap();

        // Admin payload under the buyer token's signature
        let buyer_parts: Vec<&str> = buyer.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", buyer_parts[0], admin_parts[1], buyer_parts[2]);

        assert!(matches!(
            verifier.verify(&forged, TokenType::Access),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let (_, verifier) = pair(TEST_SECRET, TokenLifetimes::default());
        assert!(matches!(
            verifier.verify("invalid.token.here", TokenType::Access),
            Err(AuthError::InvalidSignature)
        ));
        assert!(matches!(
            verifier.verify("", TokenType::Access),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_missing_claims() {
        let (_, verifier) = pair(TEST_SECRET, TokenLifetimes::default());
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();

        let no_sub = sign_raw(&serde_json::json!({
            "id": 1, "role": "buyer", "token_type": "access", "iat": 0, "exp": exp
        }));
        assert!(matches!(
            verifier.verify(&no_sub, TokenType::Access),
            Err(AuthError::MissingClaim("sub"))
        ));

        let no_id = sign_raw(&serde_json::json!({
            "token_type": "refresh", "iat": 0, "exp": exp
        }));
        assert!(matches!(
            verifier.verify(&no_id, TokenType::Refresh),
            Err(AuthError::MissingClaim("id"))
        ));

        let no_type = sign_raw(&serde_json::json!({
            "sub": "a@example.com", "id": 1, "iat": 0, "exp": exp
        }));
        assert!(matches!(
            verifier.verify(&no_type, TokenType::Access),
            Err(AuthError::TypeMismatch { .. })
        ));
    }
}
