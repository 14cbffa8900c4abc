//! Authentication service
//!
//! Registration, credential exchange, token refresh and role management.

use std::sync::Arc;

use crate::models::{User, UserCreate, UserRole};
use crate::repository::{NewUser, RepositoryError, UserRepository};

use super::jwt::TokenIssuer;
use super::password::PasswordHasher;
use super::session::SessionResolver;
use super::AuthError;

/// Freshly issued token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    sessions: Arc<SessionResolver>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        sessions: Arc<SessionResolver>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
            sessions,
        }
    }

    /// Register a new buyer or seller account
    pub async fn register(&self, request: UserCreate) -> Result<User, AuthError> {
        if self.users.email_exists(&request.email).await? {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let hasher = self.hasher;
        let password = request.password;
        let hashed_password = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        let user = self
            .users
            .create_user(NewUser {
                email: request.email,
                hashed_password,
                role: request.role,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                RepositoryError::Conflict(_) => AuthError::EmailAlreadyRegistered,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Exchange email and password for a token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .users
            .find_active_user_by_email(email)
            .await?
            .ok_or(AuthError::IncorrectCredentials)?;

        let hasher = self.hasher;
        let password = password.to_string();
        let hash = user.hashed_password.clone();
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        if !valid {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::IncorrectCredentials);
        }

        let tokens = self.issue_pair(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(tokens)
    }

    /// Mint a new access token from a refresh token
    pub async fn access_token_from_refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user = self.user_from_refresh(refresh_token).await?;
        self.issuer.issue_access(&user)
    }

    /// Mint a new access and refresh token pair from a refresh token
    pub async fn tokens_from_refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let user = self.user_from_refresh(refresh_token).await?;
        self.issue_pair(&user)
    }

    /// Get an active user by ID
    pub async fn get_active_user(&self, user_id: i64) -> Result<User, AuthError> {
        self.users
            .find_active_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFoundOrInactive)
    }

    /// Change a user's role; callers must already hold the admin guard
    pub async fn update_role(&self, user_id: i64, role: UserRole) -> Result<User, AuthError> {
        let user = self
            .users
            .update_user_role(user_id, role)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => AuthError::UserNotFoundOrInactive,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = user.id, role = %user.role, "User role updated");
        Ok(user)
    }

    async fn user_from_refresh(&self, refresh_token: &str) -> Result<User, AuthError> {
        let user_id = self.sessions.resolve_from_refresh(refresh_token)?;
        self.get_active_user(user_id).await
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issuer.issue_access(user)?,
            refresh_token: self.issuer.issue_refresh(user)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{JwtKeys, TokenLifetimes, TokenType, TokenVerifier};
    use crate::repository::InMemoryUserRepository;

    struct Harness {
        service: AuthService,
        verifier: TokenVerifier,
        users: Arc<InMemoryUserRepository>,
    }

    fn harness() -> Harness {
        let keys = Arc::new(JwtKeys::from_secret("service-test-secret"));
        let users = Arc::new(InMemoryUserRepository::new());
        let verifier = TokenVerifier::new(keys.clone());
        let sessions = Arc::new(SessionResolver::new(verifier.clone(), users.clone()));
        let service = AuthService::new(
            users.clone(),
            PasswordHasher::new(4),
            TokenIssuer::new(keys, TokenLifetimes::default()),
            sessions,
        );
        Harness {
            service,
            verifier,
            users,
        }
    }

    fn registration(email: &str, role: UserRole) -> UserCreate {
        UserCreate {
            email: email.to_string(),
            password: "password123".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let h = harness();
        let user = h
            .service
            .register(registration("buyer@example.com", UserRole::Buyer))
            .await
            .unwrap();

        assert_ne!(user.hashed_password, "password123");
        assert!(user.hashed_password.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let h = harness();
        h.service
            .register(registration("buyer@example.com", UserRole::Buyer))
            .await
            .unwrap();

        assert!(matches!(
            h.service
                .register(registration("buyer@example.com", UserRole::Seller))
                .await,
            Err(AuthError::EmailAlreadyRegistered)
        ));
    }

    #[tokio::test]
    async fn test_login_issues_buyer_tokens() {
        let h = harness();
        let user = h
            .service
            .register(registration("buyer@example.com", UserRole::Buyer))
            .await
            .unwrap();

        let tokens = h
            .service
            .login("buyer@example.com", "password123")
            .await
            .unwrap();

        let access = h
            .verifier
            .verify(&tokens.access_token, TokenType::Access)
            .unwrap();
        assert_eq!(access.role, Some(UserRole::Buyer));
        assert_eq!(access.id, Some(user.id));

        let refresh = h
            .verifier
            .verify(&tokens.refresh_token, TokenType::Refresh)
            .unwrap();
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_login_wrong_password_or_unknown_email() {
        let h = harness();
        h.service
            .register(registration("buyer@example.com", UserRole::Buyer))
            .await
            .unwrap();

        assert!(matches!(
            h.service.login("buyer@example.com", "wrong-password").await,
            Err(AuthError::IncorrectCredentials)
        ));
        assert!(matches!(
            h.service.login("nobody@example.com", "password123").await,
            Err(AuthError::IncorrectCredentials)
        ));
    }

    #[tokio::test]
    async fn test_refresh_for_deactivated_user() {
        let h = harness();
        let user = h
            .service
            .register(registration("buyer@example.com", UserRole::Buyer))
            .await
            .unwrap();
        let tokens = h
            .service
            .login("buyer@example.com", "password123")
            .await
            .unwrap();

        assert!(h
            .service
            .access_token_from_refresh(&tokens.refresh_token)
            .await
            .is_ok());

        h.users.deactivate_user(user.id).await.unwrap();

        assert!(matches!(
            h.service.tokens_from_refresh(&tokens.refresh_token).await,
            Err(AuthError::UserNotFoundOrInactive)
        ));
    }

    #[tokio::test]
    async fn test_update_role() {
        let h = harness();
        let user = h
            .service
            .register(registration("buyer@example.com", UserRole::Buyer))
            .await
            .unwrap();

        let updated = h.service.update_role(user.id, UserRole::Seller).await.unwrap();
        assert_eq!(updated.role, UserRole::Seller);

        assert!(matches!(
            h.service.update_role(999, UserRole::Seller).await,
            Err(AuthError::UserNotFoundOrInactive)
        ));
    }
}
