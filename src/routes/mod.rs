//! Route definitions for the marketplace API

mod categories;
mod products;
mod reviews;
mod users;

use axum::{routing::get, Router};

use crate::handlers::health;
use crate::middleware;
use crate::state::AppState;

pub use categories::category_routes;
pub use products::product_routes;
pub use reviews::review_routes;
pub use users::user_routes;

/// Full API router with per-request tracing and security headers
///
/// Rate limiting and CORS are environment-specific and layered on in `main`.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .merge(user_routes())
        .merge(category_routes())
        .merge(product_routes())
        .merge(review_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
