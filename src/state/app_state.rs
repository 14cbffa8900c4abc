//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{
    AuthService, JwtKeys, PasswordHasher, SessionResolver, TokenIssuer, TokenLifetimes,
    TokenVerifier,
};
use crate::db::Database;
use crate::repository::{
    CategoryRepository, ProductRepository, ReviewRepository, UserRepository,
};
use crate::services::{CategoryService, ProductService, ReviewService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub session_resolver: Arc<SessionResolver>,
    pub category_service: Arc<CategoryService>,
    pub product_service: Arc<ProductService>,
    pub review_service: Arc<ReviewService>,
    /// `None` when running on in-memory repositories
    pub database: Option<Database>,
}

/// Persistence collaborators the state is wired against
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

impl AppState {
    /// Wire services from a signing secret and repositories
    ///
    /// The keys are derived once here and shared read-only by the issuer and
    /// the verifier for the life of the process.
    pub fn new(
        secret: &str,
        lifetimes: TokenLifetimes,
        hasher: PasswordHasher,
        repositories: Repositories,
        database: Option<Database>,
    ) -> Self {
        let keys = Arc::new(JwtKeys::from_secret(secret));
        let session_resolver = Arc::new(SessionResolver::new(
            TokenVerifier::new(keys.clone()),
            repositories.users.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            repositories.users,
            hasher,
            TokenIssuer::new(keys, lifetimes),
            session_resolver.clone(),
        ));
        let category_service = Arc::new(CategoryService::new(repositories.categories.clone()));
        let product_service = Arc::new(ProductService::new(
            repositories.products.clone(),
            repositories.categories,
        ));
        let review_service = Arc::new(ReviewService::new(
            repositories.reviews,
            repositories.products,
        ));

        Self {
            auth_service,
            session_resolver,
            category_service,
            product_service,
            review_service,
            database,
        }
    }
}

impl FromRef<AppState> for Arc<SessionResolver> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.session_resolver.clone()
    }
}
