//! Review route definitions

use axum::{
    routing::{delete, get},
    Router,
};

use crate::handlers::reviews;
use crate::state::AppState;

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route("/reviews/:review_id", delete(reviews::delete_review))
}
