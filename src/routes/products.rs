//! Product route definitions

use axum::{routing::get, Router};

use crate::handlers::{products, reviews};
use crate::state::AppState;

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:product_id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/category/:category_id",
            get(products::list_products_by_category),
        )
        .route(
            "/products/:product_id/reviews",
            get(reviews::list_product_reviews),
        )
}
