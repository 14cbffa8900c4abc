//! User and authentication routes

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::users;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/users/token", post(users::login))
        .route(
            "/users/access_token",
            post(users::access_token_by_refresh_token),
        )
        .route("/users/refresh_token", post(users::tokens_by_refresh_token))
        .route("/users/me", get(users::get_current_user))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id/update_role", put(users::update_role))
}
