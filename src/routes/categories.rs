//! Category route definitions

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::categories;
use crate::state::AppState;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:category_id",
            put(categories::update_category).delete(categories::delete_category),
        )
}
