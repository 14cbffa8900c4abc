//! API handlers for the marketplace backend

pub mod categories;
pub mod health;
pub mod products;
pub mod reviews;
pub mod users;

// Re-export extractors from middleware for handler use
pub use crate::middleware::auth::{AdminUser, AuthenticatedUser, BuyerUser, SellerUser};
